//! Book metadata resolution.
//!
//! Title and author start from the first page (its title, its host). Before
//! the manifest is written they can be replaced once, by explicit overrides
//! and then by an operator prompt.

use tracing::{debug, info};
use url::Url;

use blogbook_shared::{BookMetadata, Result};

/// Values supplied up front (e.g. `--title` / `--author`).
#[derive(Debug, Clone, Default)]
pub struct MetadataOverrides {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Asks the operator to confirm or replace a value.
pub trait MetadataPrompt {
    /// Present `field` with `current` as the default. An empty answer keeps it.
    fn ask(&self, field: &str, current: &str) -> Result<String>;
}

/// Default author for a book: the host of its first URL.
pub fn default_author(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_string()
}

/// Apply overrides, then the prompt (if any), to `defaults`.
pub fn resolve_metadata(
    defaults: BookMetadata,
    overrides: &MetadataOverrides,
    prompt: Option<&dyn MetadataPrompt>,
) -> Result<BookMetadata> {
    let mut title = pick(defaults.title, overrides.title.as_deref());
    let mut author = pick(defaults.author, overrides.author.as_deref());

    if let Some(prompt) = prompt {
        let answer = prompt.ask("Title", &title)?;
        title = pick(title, Some(answer.as_str()));
        let answer = prompt.ask("Author", &author)?;
        author = pick(author, Some(answer.as_str()));
    } else {
        debug!("no prompt, keeping resolved metadata");
    }

    let resolved = BookMetadata { title, author };
    info!(title = %resolved.title, author = %resolved.author, "book metadata resolved");
    Ok(resolved)
}

/// Replace `current` with the trimmed candidate unless it is empty.
fn pick(current: String, candidate: Option<&str>) -> String {
    match candidate.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replays canned answers and records what was asked.
    struct Scripted {
        answers: RefCell<Vec<&'static str>>,
        asked: RefCell<Vec<(String, String)>>,
    }

    impl Scripted {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: RefCell::new(answers.iter().rev().copied().collect()),
                asked: RefCell::new(Vec::new()),
            }
        }
    }

    impl MetadataPrompt for Scripted {
        fn ask(&self, field: &str, current: &str) -> Result<String> {
            self.asked
                .borrow_mut()
                .push((field.to_string(), current.to_string()));
            Ok(self.answers.borrow_mut().pop().unwrap_or_default().to_string())
        }
    }

    fn defaults() -> BookMetadata {
        BookMetadata::new("Hello World", "blog.example.com")
    }

    #[test]
    fn no_overrides_no_prompt_keeps_defaults() {
        let meta = resolve_metadata(defaults(), &MetadataOverrides::default(), None).unwrap();
        assert_eq!(meta, defaults());
    }

    #[test]
    fn overrides_replace_defaults() {
        let overrides = MetadataOverrides {
            title: Some("My Collected Posts".into()),
            author: None,
        };
        let meta = resolve_metadata(defaults(), &overrides, None).unwrap();
        assert_eq!(meta, BookMetadata::new("My Collected Posts", "blog.example.com"));
    }

    #[test]
    fn blank_override_is_ignored() {
        let overrides = MetadataOverrides {
            title: Some("   ".into()),
            author: Some(String::new()),
        };
        let meta = resolve_metadata(defaults(), &overrides, None).unwrap();
        assert_eq!(meta, defaults());
    }

    #[test]
    fn empty_answer_keeps_default() {
        let prompt = Scripted::new(&["", "Jane Doe"]);
        let meta =
            resolve_metadata(defaults(), &MetadataOverrides::default(), Some(&prompt)).unwrap();
        assert_eq!(meta, BookMetadata::new("Hello World", "Jane Doe"));
    }

    #[test]
    fn prompt_sees_overridden_default_and_answer_is_trimmed() {
        let prompt = Scripted::new(&["  Final Title  ", ""]);
        let overrides = MetadataOverrides {
            title: Some("Flag Title".into()),
            author: None,
        };
        let meta = resolve_metadata(defaults(), &overrides, Some(&prompt)).unwrap();

        assert_eq!(meta.title, "Final Title");
        assert_eq!(meta.author, "blog.example.com");
        assert_eq!(
            *prompt.asked.borrow(),
            vec![
                ("Title".to_string(), "Flag Title".to_string()),
                ("Author".to_string(), "blog.example.com".to_string()),
            ]
        );
    }

    #[test]
    fn author_defaults_to_host() {
        let url = Url::parse("http://blog.example.com:8080/2012/post").unwrap();
        assert_eq!(default_author(&url), "blog.example.com");
    }
}
