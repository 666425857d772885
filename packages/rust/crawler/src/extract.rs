//! Page extraction: title/body selection, boilerplate removal, image
//! rewriting, and heading normalization.

use blogbook_shared::{BlogbookError, ExtractConfig, ImageRef, PageEntry, Result, Sequence};
use ego_tree::NodeId;
use scraper::node::{Element, Node};
use scraper::{ElementRef, Html};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::escape::escape_text;
use crate::selectors::SelectorList;

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Parsed form of the `[extract]` config section.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub title: SelectorList,
    pub body: SelectorList,
    pub boilerplate: SelectorList,
    pub image_extension: String,
}

impl ExtractRules {
    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        Ok(Self {
            title: SelectorList::parse(&config.title_selectors)?,
            body: SelectorList::parse(&config.body_selectors)?,
            boilerplate: SelectorList::parse(&config.boilerplate_selectors)?,
            image_extension: config.image_extension.trim_start_matches('.').to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// ExtractedPage
// ---------------------------------------------------------------------------

/// Result of extracting one page.
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// ToC entry (reserved filename + title).
    pub entry: PageEntry,
    /// Images found in the body, in document order.
    pub images: Vec<ImageRef>,
    /// Standalone `<html><body>…</body></html>` document to persist.
    pub document: String,
    /// Whether an `<h1>` with the page title was prepended.
    pub synthesized_heading: bool,
}

/// Extract title and body from `html`, fetched from `page_url`.
///
/// The page filename takes the next sequence number before any image on the
/// page does. Fails with [`BlogbookError::SelectorMiss`] when no title or
/// body selector matches.
#[instrument(skip_all, fields(url = %page_url))]
pub fn extract_page(
    html: &str,
    page_url: &Url,
    seq: &mut Sequence,
    rules: &ExtractRules,
) -> Result<ExtractedPage> {
    let local_filename = format!("{}.html", seq.next_number());
    let mut doc = Html::parse_document(html);

    let title = rules
        .title
        .first_match(&doc)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .ok_or_else(|| selector_miss("title", &rules.title, page_url))?;
    info!(%title, file = %local_filename, "extracted title");

    let body = rules
        .body
        .first_match(&doc)
        .ok_or_else(|| selector_miss("body", &rules.body, page_url))?;
    let body_id = body.id();

    let noise: Vec<NodeId> = rules
        .boilerplate
        .matches_within(body)
        .into_iter()
        .map(|el| {
            debug!(element = el.value().name(), "removing boilerplate");
            el.id()
        })
        .collect();
    for id in noise {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let body =
        element(&doc, body_id).ok_or_else(|| selector_miss("body", &rules.body, page_url))?;
    let scan = scan_body(body, page_url, &rules.image_extension, seq);

    for (id, local) in &scan.rewrites {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            if let Node::Element(img) = node.value() {
                set_src(img, local);
            }
        }
    }

    let synthesized_heading = scan.first_heading.is_none();
    match &scan.first_heading {
        Some(inline) => info!(inline_title = %inline, "keeping inline heading"),
        None => info!("inserting title heading"),
    }

    let body =
        element(&doc, body_id).ok_or_else(|| selector_miss("body", &rules.body, page_url))?;
    let mut document = String::from("<html><body>\n");
    if synthesized_heading {
        document.push_str(&format!("<h1>{}</h1>\n", escape_text(&title)));
    }
    document.push_str(&body.html());
    document.push_str("\n</body></html>\n");

    Ok(ExtractedPage {
        entry: PageEntry {
            local_filename,
            title,
        },
        images: scan.images,
        document,
        synthesized_heading,
    })
}

fn selector_miss(field: &'static str, list: &SelectorList, page_url: &Url) -> BlogbookError {
    BlogbookError::SelectorMiss {
        field,
        url: page_url.to_string(),
        selectors: list.to_string(),
    }
}

fn element(doc: &Html, id: NodeId) -> Option<ElementRef<'_>> {
    doc.tree.get(id).and_then(ElementRef::wrap)
}

/// Replace the value of every `src` attribute of `img`.
fn set_src(img: &mut Element, local: &str) {
    for (name, value) in img.attrs.iter_mut() {
        if name.local.as_ref() == "src" {
            *value = local.into();
        }
    }
}

// ---------------------------------------------------------------------------
// Body traversal
// ---------------------------------------------------------------------------

/// What a pass over the (boilerplate-free) body found.
struct BodyScan {
    images: Vec<ImageRef>,
    /// `src` replacements to apply, keyed by `<img>` node.
    rewrites: Vec<(NodeId, String)>,
    first_heading: Option<String>,
}

/// Walk the body in document order, numbering images as they are met.
fn scan_body(
    body: ElementRef<'_>,
    page_url: &Url,
    extension: &str,
    seq: &mut Sequence,
) -> BodyScan {
    let mut scan = BodyScan {
        images: Vec::new(),
        rewrites: Vec::new(),
        first_heading: None,
    };

    for node in body.descendants().skip(1) {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        match el.value().name() {
            "img" => {
                let Some(resolved) = resolve_src(el, page_url) else {
                    continue;
                };
                let local_filename = format!("{}.{extension}", seq.next_number());
                debug!(resolved = %resolved, file = %local_filename, "queued image");

                scan.rewrites.push((el.id(), local_filename.clone()));
                scan.images.push(ImageRef {
                    local_filename,
                    source_url: resolved.to_string(),
                });
            }
            "h1" | "h2" if scan.first_heading.is_none() => {
                scan.first_heading = Some(el.text().collect::<String>().trim().to_string());
            }
            _ => {}
        }
    }

    scan
}

/// Absolute URL of an `<img>`, or `None` (logged) when it has no usable `src`.
fn resolve_src(img: ElementRef<'_>, page_url: &Url) -> Option<Url> {
    let Some(src) = img.value().attr("src") else {
        debug!("image without src, leaving as is");
        return None;
    };

    match page_url.join(src) {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(src, error = %e, "unresolvable image src, leaving as is");
            None
        }
    }
}
