//! Application configuration for blogbook.
//!
//! User config lives at `~/.blogbook/blogbook.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BlogbookError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "blogbook.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".blogbook";

// ---------------------------------------------------------------------------
// Config structs (matching blogbook.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Selectors driving page extraction.
    #[serde(default)]
    pub extract: ExtractConfig,

    /// External e-book converter.
    #[serde(default)]
    pub converter: ConverterConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Directory the finished e-book is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    concat!("blogbook/", env!("CARGO_PKG_VERSION")).into()
}
fn default_max_redirects() -> usize {
    5
}

/// `[extract]` section.
///
/// Each selector field is a comma-separated list evaluated in priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Candidates for the page title.
    #[serde(default = "default_title_selectors")]
    pub title_selectors: String,

    /// Candidates for the article body.
    #[serde(default = "default_body_selectors")]
    pub body_selectors: String,

    /// Elements stripped from the body (share widgets, comments).
    #[serde(default = "default_boilerplate_selectors")]
    pub boilerplate_selectors: String,

    /// Extension given to every downloaded image, regardless of its real format.
    #[serde(default = "default_image_extension")]
    pub image_extension: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title_selectors: default_title_selectors(),
            body_selectors: default_body_selectors(),
            boilerplate_selectors: default_boilerplate_selectors(),
            image_extension: default_image_extension(),
        }
    }
}

fn default_title_selectors() -> String {
    ".entry-title, .post-title, title".into()
}
fn default_body_selectors() -> String {
    ".entry-content, .post-body".into()
}
fn default_boilerplate_selectors() -> String {
    ".sharedaddy, #comments".into()
}
fn default_image_extension() -> String {
    "jpg".into()
}

/// `[converter]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Converter executable (name on `PATH` or absolute path).
    #[serde(default = "default_converter_command")]
    pub command: String,

    /// Extension of the produced e-book; selects the output format.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// CSS properties the converter strips from the content.
    #[serde(default = "default_filter_css")]
    pub filter_css: Vec<String>,

    /// Extra arguments appended verbatim to the converter command line.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            command: default_converter_command(),
            output_extension: default_output_extension(),
            filter_css: default_filter_css(),
            extra_args: Vec::new(),
        }
    }
}

fn default_converter_command() -> String {
    "ebook-convert".into()
}
fn default_output_extension() -> String {
    "mobi".into()
}
fn default_filter_css() -> Vec<String> {
    ["font-family", "color", "margin-left", "margin-right"]
        .into_iter()
        .map(String::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.blogbook/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BlogbookError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.blogbook/blogbook.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BlogbookError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BlogbookError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_in(&config_dir()?)
}

/// Write a default config file into `dir`, creating it if needed.
pub fn init_config_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| BlogbookError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BlogbookError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BlogbookError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("title_selectors"));
        assert!(toml_str.contains("ebook-convert"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.http.timeout_secs, 30);
        assert_eq!(parsed.extract.image_extension, "jpg");
        assert_eq!(
            parsed.converter.filter_css,
            vec!["font-family", "color", "margin-left", "margin-right"]
        );
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[extract]
body_selectors = "article .content"

[converter]
output_extension = "epub"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.extract.body_selectors, "article .content");
        assert_eq!(config.extract.title_selectors, ".entry-title, .post-title, title");
        assert_eq!(config.converter.output_extension, "epub");
        assert_eq!(config.converter.command, "ebook-convert");
        assert_eq!(config.defaults.output_dir, ".");
    }

    #[test]
    fn init_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = init_config_in(dir.path()).expect("init");
        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.http.max_redirects, 5);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("blogbook.toml");
        std::fs::write(&path, "[http]\ntimeout_secs = \"soon\"").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, BlogbookError::Config { .. }));
    }
}
