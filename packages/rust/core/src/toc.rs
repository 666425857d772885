//! Table-of-contents manifest.
//!
//! The manifest is the converter's root input. Its links sit in a hidden
//! container: they exist only so the converter can walk the chapters, and
//! the converter builds its own visible ToC from them.

use std::path::PathBuf;

use tracing::{debug, instrument};

use blogbook_crawler::{escape_attr, escape_text};
use blogbook_shared::{BookMetadata, PageEntry, Result};

use crate::assembler::WorkingSet;

/// Render the manifest document for `entries`, in the given order.
pub fn render_toc(metadata: &BookMetadata, entries: &[PageEntry]) -> String {
    let mut html = format!(
        "<html><head><title>{}</title><meta name=\"author\" content=\"{}\"></head><body>\n",
        escape_text(&metadata.title),
        escape_attr(&metadata.author),
    );

    html.push_str("<div style=\"display:none\">\n");
    for entry in entries {
        html.push_str(&format!(
            "<a href=\"{}\">{}</a>\n",
            escape_attr(&entry.local_filename),
            escape_text(&entry.title),
        ));
    }
    html.push_str("</div></body></html>\n");

    html
}

/// Render and write `toc.html` into the working set.
#[instrument(skip_all, fields(entries = entries.len()))]
pub fn write_toc(
    working_set: &WorkingSet,
    metadata: &BookMetadata,
    entries: &[PageEntry],
) -> Result<PathBuf> {
    let html = render_toc(metadata, entries);
    let path = working_set.write_toc(&html)?;
    debug!(path = %path.display(), "table of contents written");
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(file: &str, title: &str) -> PageEntry {
        PageEntry {
            local_filename: file.into(),
            title: title.into(),
        }
    }

    #[test]
    fn renders_head_and_hidden_links() {
        let meta = BookMetadata::new("Hello World", "blog.example.com");
        let html = render_toc(
            &meta,
            &[entry("1.html", "Hello World"), entry("3.html", "Second Post")],
        );

        assert_eq!(
            html,
            "<html><head><title>Hello World</title><meta name=\"author\" content=\"blog.example.com\"></head><body>\n\
             <div style=\"display:none\">\n\
             <a href=\"1.html\">Hello World</a>\n\
             <a href=\"3.html\">Second Post</a>\n\
             </div></body></html>\n"
        );
    }

    #[test]
    fn keeps_discovery_order() {
        let meta = BookMetadata::new("B", "a");
        let html = render_toc(
            &meta,
            &[entry("7.html", "Zebra"), entry("1.html", "Alpha"), entry("4.html", "Middle")],
        );
        let z = html.find("7.html").unwrap();
        let a = html.find("1.html").unwrap();
        let m = html.find("4.html").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn escapes_metadata_and_titles() {
        let meta = BookMetadata::new("Q&A <live>", "\"Ann\"");
        let html = render_toc(&meta, &[entry("1.html", "Fish & Chips")]);
        assert!(html.contains("<title>Q&amp;A &lt;live&gt;</title>"));
        assert!(html.contains("content=\"&quot;Ann&quot;\""));
        assert!(html.contains(">Fish &amp; Chips</a>"));
    }

    #[test]
    fn empty_entry_list_still_valid() {
        let html = render_toc(&BookMetadata::default(), &[]);
        assert!(html.contains("<div style=\"display:none\">\n</div>"));
    }

    #[test]
    fn write_toc_to_working_set() {
        let dir = tempfile::tempdir().unwrap();
        let ws = WorkingSet::open(dir.path()).unwrap();
        let meta = BookMetadata::new("T", "A");
        let path = write_toc(&ws, &meta, &[entry("1.html", "One")]).unwrap();

        assert_eq!(path, dir.path().join("toc.html"));
        let written = std::fs::read_to_string(path).unwrap();
        assert_eq!(written, render_toc(&meta, &[entry("1.html", "One")]));
    }
}
