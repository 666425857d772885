//! Working-set writer.
//!
//! All generated files (`{n}.html` pages, `{n}.{ext}` images, `toc.html`)
//! live flat in one directory that is handed to the converter.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use blogbook_crawler::ExtractedPage;
use blogbook_shared::{BlogbookError, PageEntry, Result};

/// File name of the manifest document.
pub const TOC_FILENAME: &str = "toc.html";

/// A directory holding the files of one build.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    dir: PathBuf,
}

impl WorkingSet {
    /// Use an existing directory as the working set.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BlogbookError::validation(format!(
                "working directory {} does not exist",
                dir.display()
            )));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path of a file inside the working set.
    pub fn path(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Persist an extracted page under its reserved filename.
    pub fn write_page(&self, page: &ExtractedPage) -> Result<PathBuf> {
        self.write(&page.entry.local_filename, &page.document)
    }

    /// Persist the manifest document.
    pub fn write_toc(&self, html: &str) -> Result<PathBuf> {
        self.write(TOC_FILENAME, html)
    }

    fn write(&self, filename: &str, content: &str) -> Result<PathBuf> {
        let path = self.path(filename);
        std::fs::write(&path, content).map_err(|e| BlogbookError::io(&path, e))?;
        debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(path)
    }

    /// Check that the manifest and every page it lists are on disk.
    ///
    /// Images are not checked; a failed download leaves a dangling reference
    /// the converter tolerates.
    #[instrument(skip_all, fields(dir = %self.dir.display()))]
    pub fn validate(&self, entries: &[PageEntry]) -> Result<()> {
        if !self.path(TOC_FILENAME).exists() {
            return Err(BlogbookError::validation(format!("missing {TOC_FILENAME}")));
        }

        for entry in entries {
            if !self.path(&entry.local_filename).exists() {
                return Err(BlogbookError::validation(format!(
                    "ToC references missing page file: {}",
                    entry.local_filename
                )));
            }
        }

        Ok(())
    }
}
