//! Prioritized selector lists.
//!
//! A list such as `.entry-title, .post-title, title` is tried entry by entry;
//! the first entry matching anything wins, even if a later entry would match
//! an element earlier in the document.

use std::fmt;

use blogbook_shared::{BlogbookError, Result};
use scraper::{ElementRef, Html, Selector};

/// An ordered list of CSS selectors.
#[derive(Debug, Clone)]
pub struct SelectorList {
    source: String,
    selectors: Vec<Selector>,
}

impl SelectorList {
    /// Parse a comma-separated list. Each entry is trimmed and parsed on its
    /// own, so commas cannot appear inside a single entry.
    pub fn parse(expr: &str) -> Result<Self> {
        let mut selectors = Vec::new();

        for part in expr.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let selector = Selector::parse(part)
                .map_err(|e| BlogbookError::config(format!("invalid selector '{part}': {e}")))?;
            selectors.push(selector);
        }

        if selectors.is_empty() {
            return Err(BlogbookError::config(format!(
                "selector list '{expr}' is empty"
            )));
        }

        Ok(Self {
            source: expr.to_string(),
            selectors,
        })
    }

    /// The list as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// First element of the document matched by the highest-priority
    /// selector that matches at all.
    pub fn first_match<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|sel| doc.select(sel).next())
    }

    /// Every descendant of `root` matched by any entry, in list order.
    pub fn matches_within<'a>(&self, root: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.selectors
            .iter()
            .flat_map(|sel| root.select(sel))
            .filter(|el| el.id() != root.id())
            .collect()
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
