//! Conversion invoker.
//!
//! The e-book converter is an opaque external command taking the manifest
//! path, the output path, and CSS filtering options. Its exit status is the
//! only signal of success.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info, instrument};

use blogbook_shared::{BlogbookError, ConverterConfig, Result};

/// Characters replaced by a space in output file names.
const UNSAFE_FILENAME_CHARS: &[char] = &[':', '/', '\\', '?', '*', '"', '<', '>', '|'];

/// Fallback file stem when the title sanitizes to nothing.
const FALLBACK_STEM: &str = "book";

/// One conversion to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Manifest document (`toc.html` in the working set).
    pub input: PathBuf,
    /// Destination e-book file.
    pub output: PathBuf,
}

/// Something that turns the manifest into an e-book.
pub trait Converter: Send + Sync {
    fn convert(&self, request: &ConversionRequest) -> Result<()>;

    /// Human-readable converter name for tracing.
    fn name(&self) -> &str;
}

/// Make a book title usable as a file name.
pub fn sanitize_output_name(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) || c.is_control() {
                ' '
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim().trim_end_matches('.').trim_end();
    if trimmed.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        trimmed.to_string()
    }
}

/// `<dir>/<sanitized title>.<extension>`
pub fn output_path(dir: &Path, title: &str, extension: &str) -> PathBuf {
    let extension = extension.trim_start_matches('.');
    dir.join(format!("{}.{extension}", sanitize_output_name(title)))
}

// ---------------------------------------------------------------------------
// EbookConvert
// ---------------------------------------------------------------------------

/// Runs an `ebook-convert`-compatible command as a subprocess.
#[derive(Debug, Clone)]
pub struct EbookConvert {
    command: String,
    filter_css: Vec<String>,
    extra_args: Vec<String>,
}

impl EbookConvert {
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            command: config.command.clone(),
            filter_css: config.filter_css.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Full argument list for `request`, without the command itself.
    pub fn args(&self, request: &ConversionRequest) -> Vec<OsString> {
        let mut args = vec![
            request.input.clone().into_os_string(),
            request.output.clone().into_os_string(),
        ];

        if !self.filter_css.is_empty() {
            args.push("--filter-css".into());
            args.push(self.filter_css.join(",").into());
        }

        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }
}

impl Converter for EbookConvert {
    #[instrument(skip_all, fields(command = %self.command, output = %request.output.display()))]
    fn convert(&self, request: &ConversionRequest) -> Result<()> {
        let args = self.args(request);
        info!(?args, "running converter");

        let output = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BlogbookError::Conversion(format!("failed to run {}: {e}", self.command)))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            debug!(target: "blogbook::converter", "{line}");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            return Err(BlogbookError::Conversion(format!(
                "{} exited with {}{}",
                self.command,
                output.status,
                if tail.is_empty() {
                    String::new()
                } else {
                    format!(": {}", tail.join("\n"))
                }
            )));
        }

        info!("conversion finished");
        Ok(())
    }

    fn name(&self) -> &str {
        &self.command
    }
}
