//! Core domain types for a book build.

use std::fmt;

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Monotonic counter naming every generated file of a run.
///
/// Pages and images draw from the same sequence, so numbers interleave in
/// discovery order and are never reused within one run.
#[derive(Debug, Clone, Default)]
pub struct Sequence {
    last: u64,
}

impl Sequence {
    /// A sequence whose first number is 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sequence whose first number is `first`.
    pub fn starting_at(first: u64) -> Self {
        Self {
            last: first.saturating_sub(1),
        }
    }

    /// Return the next number, strictly greater than every previous one.
    pub fn next_number(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

// ---------------------------------------------------------------------------
// PageEntry / ImageRef
// ---------------------------------------------------------------------------

/// One extracted page, as listed in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// File name inside the working set (e.g. `1.html`).
    pub local_filename: String,
    /// Trimmed page title.
    pub title: String,
}

/// One `<img>` occurrence queued for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// File name inside the working set (e.g. `2.jpg`).
    pub local_filename: String,
    /// Absolute URL the `src` attribute resolved to.
    pub source_url: String,
}

// ---------------------------------------------------------------------------
// BookMetadata
// ---------------------------------------------------------------------------

/// Title and author of the book being built. Empty means "not yet known".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
}

impl BookMetadata {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
        }
    }
}

impl fmt::Display for BookMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" by {}", self.title, self.author)
    }
}
