//! URL source: resolves the list of pages a book is built from.
//!
//! The input is a local file or an `http(s)` resource holding either an HTML
//! dump (anchors are scanned) or a plain newline-separated list of URLs.

mod parser;

use std::path::PathBuf;

use blogbook_crawler::HttpFetcher;
use blogbook_shared::{BlogbookError, HttpConfig, Result};
use tracing::{debug, info, instrument};
use url::Url;

pub use parser::{InputKind, detect_kind, parse_url_list};

// ---------------------------------------------------------------------------
// InputSource
// ---------------------------------------------------------------------------

/// Where the input document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Fetched over HTTP.
    Remote(Url),
    /// Read from the local filesystem.
    Local(PathBuf),
}

impl InputSource {
    /// Classify a command-line argument: `http(s)://` URLs are remote,
    /// everything else is treated as a path.
    pub fn from_arg(arg: &str) -> Self {
        match Url::parse(arg) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Self::Remote(url),
            _ => Self::Local(PathBuf::from(arg)),
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry points
// ---------------------------------------------------------------------------

/// Read the raw input document.
#[instrument(skip_all, fields(source = %source))]
pub async fn load_source(source: &InputSource, http: &HttpConfig) -> Result<String> {
    match source {
        InputSource::Local(path) => {
            debug!("reading local input");
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| BlogbookError::io(path, e))
        }
        InputSource::Remote(url) => {
            debug!("fetching remote input");
            HttpFetcher::new(http)?.fetch_text(url).await
        }
    }
}

/// Load the input document and scan it into an ordered URL list.
#[instrument(skip_all, fields(source = %source))]
pub async fn resolve_urls(source: &InputSource, http: &HttpConfig) -> Result<Vec<String>> {
    let content = load_source(source, http).await?;
    let kind = detect_kind(&content);
    let urls = parse_url_list(&content);

    info!(?kind, count = urls.len(), "resolved input URLs");

    Ok(urls)
}
