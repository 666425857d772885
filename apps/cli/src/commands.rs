//! CLI command definitions, routing, and tracing setup.

use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use blogbook_core::pipeline::{BuildConfig, BuildResult, ProgressReporter};
use blogbook_core::{EbookConvert, MetadataOverrides, MetadataPrompt};
use blogbook_discovery::{InputSource, resolve_urls};
use blogbook_shared::{AppConfig, BlogbookError, init_config, load_config, load_config_from};
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// blogbook: turn blog posts into an e-book.
#[derive(Parser)]
#[command(
    name = "blogbook",
    version,
    about = "Download blog posts and their images and convert them into a single e-book.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build an e-book from a list of post URLs.
    Build {
        /// URL list: a local file or http(s) URL holding an HTML dump or one URL per line.
        /// Prompts for a single post URL when omitted.
        input: Option<String>,

        /// Book title (defaults to the first post's title).
        #[arg(short, long)]
        title: Option<String>,

        /// Book author (defaults to the first post's host name).
        #[arg(short, long)]
        author: Option<String>,

        /// Accept the title and author without prompting.
        #[arg(short, long)]
        yes: bool,

        /// Directory the e-book is written to.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Converter executable.
        #[arg(long, env = "BLOGBOOK_CONVERTER")]
        converter: Option<String>,

        /// Output format, as a file extension (mobi, epub, azw3...).
        #[arg(short, long)]
        format: Option<String>,

        /// Config file to use instead of ~/.blogbook/blogbook.toml.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show {
        /// Config file to show instead of ~/.blogbook/blogbook.toml.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "blogbook=info",
        1 => "blogbook=debug",
        _ => "blogbook=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            input,
            title,
            author,
            yes,
            out,
            converter,
            format,
            config,
        } => {
            let mut app_config = read_config(config.as_deref())?;
            apply_overrides(&mut app_config, out, converter, format);
            let overrides = MetadataOverrides { title, author };
            cmd_build(input.as_deref(), app_config, overrides, yes).await
        }
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show { config } => cmd_config_show(config.as_deref()).await,
        },
    }
}

fn read_config(path: Option<&Path>) -> Result<AppConfig> {
    Ok(match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    })
}

/// Fold command-line flags into the loaded config.
fn apply_overrides(
    config: &mut AppConfig,
    out: Option<PathBuf>,
    converter: Option<String>,
    format: Option<String>,
) {
    if let Some(out) = out {
        config.defaults.output_dir = out.to_string_lossy().to_string();
    }
    if let Some(converter) = converter {
        config.converter.command = converter;
    }
    if let Some(format) = format {
        config.converter.output_extension = format.trim_start_matches('.').to_string();
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_build(
    input: Option<&str>,
    config: AppConfig,
    overrides: MetadataOverrides,
    yes: bool,
) -> Result<()> {
    let interactive = !yes && std::io::stdin().is_terminal();

    let urls = match input {
        Some(arg) => {
            let source = InputSource::from_arg(arg);
            info!(%source, "reading URL list");
            resolve_urls(&source, &config.http).await?
        }
        None => vec![read_line("Enter URL: ")?],
    };

    let build_config = BuildConfig {
        urls,
        output_dir: PathBuf::from(&config.defaults.output_dir),
        http: config.http.clone(),
        extract: config.extract.clone(),
        converter: config.converter.clone(),
        overrides,
    };

    info!(
        urls = build_config.urls.len(),
        output_dir = %build_config.output_dir.display(),
        converter = %config.converter.command,
        "building book"
    );

    let converter = EbookConvert::from_config(&config.converter);
    let reporter = CliProgress::new();
    let terminal = TerminalPrompt {
        bar: reporter.spinner.clone(),
    };
    let prompt: Option<&dyn MetadataPrompt> = if interactive { Some(&terminal) } else { None };

    let result = match blogbook_core::build_book(&build_config, prompt, &converter, &reporter).await
    {
        Ok(result) => result,
        Err(e) => {
            reporter.spinner.finish_and_clear();
            return Err(e.into());
        }
    };

    // Print summary
    println!();
    println!("  Book created successfully!");
    println!("  Title:   {}", result.metadata.title);
    println!("  Author:  {}", result.metadata.author);
    println!("  Pages:   {}", result.page_count);
    println!("  Images:  {}", result.images_downloaded);
    if result.images_failed > 0 {
        println!("  Missing: {}", result.images_failed);
    }
    println!("  Path:    {}", result.output_path.display());
    println!("  Time:    {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = read_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal interaction
// ---------------------------------------------------------------------------

/// Print `label` and read one trimmed line from stdin.
fn read_line(label: &str) -> blogbook_shared::Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{label}")
        .and_then(|_| stdout.flush())
        .map_err(|e| BlogbookError::io("<stdout>", e))?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| BlogbookError::io("<stdin>", e))?;
    Ok(line.trim().to_string())
}

/// Asks for title/author on the terminal, hiding the spinner meanwhile.
struct TerminalPrompt {
    bar: ProgressBar,
}

impl MetadataPrompt for TerminalPrompt {
    fn ask(&self, field: &str, current: &str) -> blogbook_shared::Result<String> {
        self.bar.suspend(|| read_line(&format!("{field} [{current}]: ")))
    }
}

/// CLI progress reporter using indicatif spinners/bars.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_fetched(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching page [{current}/{total}] {url}"));
    }

    fn image_fetched(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Fetching image [{current}/{total}] {url}"));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_build_with_flags() {
        let cli = Cli::try_parse_from([
            "blogbook", "-vv", "build", "urls.txt", "--title", "My Blog", "--yes", "--format",
            "epub",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Build {
                input,
                title,
                yes,
                format,
                author,
                ..
            } => {
                assert_eq!(input.as_deref(), Some("urls.txt"));
                assert_eq!(title.as_deref(), Some("My Blog"));
                assert!(yes);
                assert_eq!(format.as_deref(), Some("epub"));
                assert!(author.is_none());
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn parse_build_without_input() {
        let cli = Cli::try_parse_from(["blogbook", "build"]).unwrap();
        assert!(matches!(cli.command, Command::Build { input: None, .. }));
    }

    #[test]
    fn flags_override_config() {
        let mut config = AppConfig::default();
        apply_overrides(
            &mut config,
            Some(PathBuf::from("books")),
            Some("/opt/calibre/ebook-convert".into()),
            Some(".epub".into()),
        );
        assert_eq!(config.defaults.output_dir, "books");
        assert_eq!(config.converter.command, "/opt/calibre/ebook-convert");
        assert_eq!(config.converter.output_extension, "epub");
    }

    #[test]
    fn no_flags_keep_config() {
        let mut config = AppConfig::default();
        apply_overrides(&mut config, None, None, None);
        assert_eq!(config.defaults.output_dir, ".");
        assert_eq!(config.converter.output_extension, "mobi");
    }
}
