//! Collection pipelines for fomc-corpus.
//!
//! This crate ties discovery, fetching and extraction together into
//! [`CollectionPipeline::get_contents`], applies speaker and date
//! normalization, and persists the resulting [`Dataset`](fomc_shared::Dataset).

pub mod chairs;
pub mod corrections;
pub mod pipeline;
pub mod sink;

pub use fomc_crawler::{ProgressReporter, SilentProgress};
pub use pipeline::CollectionPipeline;
pub use sink::{write_json, write_texts};
