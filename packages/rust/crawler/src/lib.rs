//! Page fetching, content extraction, and image downloads.
//!
//! This crate provides:
//! - [`HttpFetcher`]: configured HTTP client for pages and images
//! - [`SelectorList`]: prioritized "first matching selector" lookup
//! - [`extract_page`]: turns a blog page into a standalone local document
//! - [`download_images`]: failure-tolerant image downloads

mod escape;
pub mod extract;
pub mod fetch;
pub mod images;
pub mod selectors;

pub use escape::{escape_attr, escape_text};
pub use extract::{ExtractRules, ExtractedPage, extract_page};
pub use fetch::HttpFetcher;
pub use images::{ImageFailure, ImageReport, download_images};
pub use selectors::SelectorList;

#[cfg(test)]
mod tests {
    use super::*;
    use blogbook_shared::{ExtractConfig, Sequence};
    use url::Url;

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/html/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn rules() -> ExtractRules {
        ExtractRules::from_config(&ExtractConfig::default()).unwrap()
    }

    // -----------------------------------------------------------------------
    // Fixture extraction tests
    // -----------------------------------------------------------------------

    #[test]
    fn wordpress_post() {
        let html = load_fixture("wordpress.html");
        let url = Url::parse("https://blog.example.com/2013/04/on-bookbinding/").unwrap();
        let page = extract_page(&html, &url, &mut Sequence::new(), &rules()).unwrap();

        assert_eq!(page.entry.title, "On Bookbinding");
        assert_eq!(page.entry.local_filename, "1.html");
        // Share box and comments stripped
        assert!(!page.document.contains("Share this"));
        assert!(!page.document.contains("Leave a Reply"));
        // Navigation outside the body never makes it in
        assert!(!page.document.contains("Recent Posts"));
        assert!(page.document.contains("Signatures are folded"));

        let urls: Vec<&str> = page.images.iter().map(|i| i.source_url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://blog.example.com/wp-content/uploads/2013/04/press.jpg",
                "https://cdn.example.net/img/stitch.png",
            ]
        );
        assert!(page.document.contains(r#"src="2.jpg""#));
        assert!(page.document.contains(r#"src="3.jpg""#));
        // Heading synthesized because the content has none
        assert!(page.synthesized_heading);
    }

    #[test]
    fn blogger_post() {
        let html = load_fixture("blogger.html");
        let url = Url::parse("http://someone.blogspot.com/2011/09/trip.html").unwrap();
        let page = extract_page(&html, &url, &mut Sequence::starting_at(4), &rules()).unwrap();

        assert_eq!(page.entry.title, "Trip Report: Day One");
        assert_eq!(page.entry.local_filename, "4.html");
        assert!(page.document.contains("We left early"));
        // The post body carries its own h2
        assert!(!page.synthesized_heading);
        assert_eq!(page.images.len(), 1);
        assert_eq!(page.images[0].local_filename, "5.jpg");
        assert_eq!(
            page.images[0].source_url,
            "http://someone.blogspot.com/2011/09/photos/road.jpg"
        );
    }
}
