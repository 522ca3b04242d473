//! Link discovery and document fetching for the Federal Reserve site.
//!
//! This crate provides:
//! - [`Catalog`]: per-collection discovery of document links
//! - [`fetch_all`]: bounded, order-preserving concurrent fetching
//! - [`http`]: client construction and page retrieval
//! - [`Node`]: typed navigation over parsed listing pages

pub mod catalog;
pub mod fetcher;
pub mod http;
pub mod node;
pub mod progress;

pub use catalog::Catalog;
pub use fetcher::fetch_all;
pub use http::{build_client, fetch_bytes, fetch_text};
pub use node::Node;
pub use progress::{ProgressReporter, SilentProgress};
