//! Shared types, error model, and configuration for fomc-corpus.
//!
//! This crate is the foundation depended on by all other fomc-corpus crates.
//! It provides:
//! - [`FomcError`]: the unified error type
//! - Domain types ([`CollectionType`], [`DocumentDescriptor`], [`DocumentRecord`], [`Dataset`])
//! - Configuration ([`AppConfig`], [`PipelineConfig`], config loading)
//! - URL date extraction ([`date_from_link`])

pub mod config;
pub mod dates;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, PipelineConfig, SiteConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use dates::{date_from_link, parse_date, url_date_string};
pub use error::{FomcError, Result};
pub use types::{
    CollectionType, Dataset, DocumentDescriptor, DocumentFormat, DocumentRecord,
    SECTION_DELIMITER,
};
