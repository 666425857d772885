//! Shared types, error model, and configuration for blogbook.
//!
//! This crate is the foundation depended on by all other blogbook crates.
//! It provides:
//! - [`BlogbookError`]: the unified error type
//! - Domain types ([`PageEntry`], [`ImageRef`], [`BookMetadata`], [`Sequence`])
//! - Configuration ([`AppConfig`] and its sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ConverterConfig, DefaultsConfig, ExtractConfig, HttpConfig, config_dir,
    config_file_path, init_config, init_config_in, load_config, load_config_from,
};
pub use error::{BlogbookError, Result};
pub use types::{BookMetadata, ImageRef, PageEntry, Sequence};
