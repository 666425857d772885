//! Book assembly for blogbook.
//!
//! This crate ties together crawling, metadata resolution, ToC generation,
//! and e-book conversion into the end-to-end `build_book` workflow.

pub mod assembler;
pub mod convert;
pub mod metadata;
pub mod pipeline;
pub mod toc;

pub use assembler::{TOC_FILENAME, WorkingSet};
pub use convert::{ConversionRequest, Converter, EbookConvert, output_path, sanitize_output_name};
pub use metadata::{MetadataOverrides, MetadataPrompt, default_author, resolve_metadata};
pub use pipeline::{
    BookPipeline, BuildConfig, BuildResult, ProgressReporter, SilentProgress, build_book,
};
pub use toc::{render_toc, write_toc};
