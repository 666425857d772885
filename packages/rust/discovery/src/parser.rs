//! Input document scanning.
//!
//! The input is either an HTML dump (any `<a ` marker present), whose `href`
//! values are collected in document order, or a plain newline-separated list.

use regex::Regex;
use std::sync::LazyLock;

/// Marker that switches the scanner into HTML mode.
const ANCHOR_MARKER: &str = "<a ";

/// Matches a double-quoted `href` attribute value (non-greedy, single line).
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href="(.*?)""#).expect("href regex"));

/// How the input document was interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// HTML blob; anchors were scanned for `href` values.
    Html,
    /// Plain list, one URL per line.
    PlainList,
}

/// Decide how `content` should be read.
pub fn detect_kind(content: &str) -> InputKind {
    if content.contains(ANCHOR_MARKER) {
        InputKind::Html
    } else {
        InputKind::PlainList
    }
}

/// Turn the input document into an ordered list of URL strings.
///
/// Duplicates are kept and nothing is validated. In plain-list mode blank
/// lines in the middle of the list are kept as empty entries; only the empty
/// fields produced by trailing newlines are dropped.
pub fn parse_url_list(content: &str) -> Vec<String> {
    match detect_kind(content) {
        InputKind::Html => HREF_RE
            .captures_iter(content)
            .map(|caps| caps[1].to_string())
            .collect(),
        InputKind::PlainList => {
            let mut lines: Vec<String> = content.split('\n').map(String::from).collect();
            while lines.last().is_some_and(|l| l.is_empty()) {
                lines.pop();
            }
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_anchors_in_document_order() {
        let content = r#"<a href="http://blog.example.com/post1">One</a><a href="http://blog.example.com/post2">Two</a>"#;
        assert_eq!(detect_kind(content), InputKind::Html);
        assert_eq!(
            parse_url_list(content),
            vec!["http://blog.example.com/post1", "http://blog.example.com/post2"]
        );
    }

    #[test]
    fn html_keeps_duplicates() {
        let content = r#"<ul>
<li><a href="http://b.example/x">x</a></li>
<li><a class="more" href="http://b.example/y">y</a></li>
<li><a href="http://b.example/x">x again</a></li>
</ul>"#;
        assert_eq!(
            parse_url_list(content),
            vec!["http://b.example/x", "http://b.example/y", "http://b.example/x"]
        );
    }

    #[test]
    fn html_mode_also_picks_up_link_tags() {
        // Pattern matching, not DOM parsing: any href="..." counts.
        let content = r#"<link href="style.css"><a href="http://b.example/p">p</a>"#;
        assert_eq!(parse_url_list(content), vec!["style.css", "http://b.example/p"]);
    }

    #[test]
    fn plain_list_split_on_newlines() {
        let content = "http://b.example/1\nhttp://b.example/2\n";
        assert_eq!(detect_kind(content), InputKind::PlainList);
        assert_eq!(
            parse_url_list(content),
            vec!["http://b.example/1", "http://b.example/2"]
        );
    }

    #[test]
    fn plain_list_keeps_interior_blanks_and_whitespace() {
        let content = "http://b.example/1\n\n  http://b.example/2\n\n\n";
        assert_eq!(
            parse_url_list(content),
            vec!["http://b.example/1", "", "  http://b.example/2"]
        );
    }

    #[test]
    fn empty_input_gives_empty_list() {
        assert!(parse_url_list("").is_empty());
        assert!(parse_url_list("\n\n").is_empty());
    }

    #[test]
    fn anchor_without_space_is_not_html() {
        // `<a>` alone has no trailing space, so the input stays a plain list.
        let content = "<a>not a link</a>\nhttp://b.example/1";
        assert_eq!(detect_kind(content), InputKind::PlainList);
        assert_eq!(parse_url_list(content).len(), 2);
    }
}
