//! End-to-end `build` pipeline: URLs → pages → images → metadata → ToC → e-book.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};
use url::Url;

use blogbook_crawler::{ExtractRules, HttpFetcher, ImageReport, extract_page};
use blogbook_shared::{
    BlogbookError, BookMetadata, ConverterConfig, ExtractConfig, HttpConfig, ImageRef, PageEntry,
    Result, Sequence,
};

use crate::assembler::{TOC_FILENAME, WorkingSet};
use crate::convert::{ConversionRequest, Converter, output_path};
use crate::metadata::{self, MetadataOverrides, MetadataPrompt, default_author};
use crate::toc;

/// Configuration for the `build_book` pipeline.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    /// Page URLs, in the order they become chapters.
    pub urls: Vec<String>,
    /// Directory receiving the finished e-book.
    pub output_dir: PathBuf,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Extraction selectors.
    pub extract: ExtractConfig,
    /// Converter settings (the output extension is taken from here).
    pub converter: ConverterConfig,
    /// Title/author supplied up front.
    pub overrides: MetadataOverrides,
}

/// Result of the `build_book` pipeline.
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Path of the produced e-book.
    pub output_path: PathBuf,
    /// Final title and author.
    pub metadata: BookMetadata,
    /// Number of chapters.
    pub page_count: usize,
    /// Images written to the working set.
    pub images_downloaded: usize,
    /// Images that could not be fetched.
    pub images_failed: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a page is fetched.
    fn page_fetched(&self, url: &str, current: usize, total: usize);
    /// Called before an image is fetched.
    fn image_fetched(&self, url: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &BuildResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_fetched(&self, _url: &str, _current: usize, _total: usize) {}
    fn image_fetched(&self, _url: &str, _current: usize, _total: usize) {}
    fn done(&self, _result: &BuildResult) {}
}

// ---------------------------------------------------------------------------
// BookPipeline
// ---------------------------------------------------------------------------

/// State carried through one build: numbering, ToC, image queue, metadata.
pub struct BookPipeline<'a> {
    working_set: WorkingSet,
    fetcher: HttpFetcher,
    rules: ExtractRules,
    progress: &'a dyn ProgressReporter,
    sequence: Sequence,
    toc: Vec<PageEntry>,
    images: Vec<ImageRef>,
    metadata: BookMetadata,
}

impl<'a> BookPipeline<'a> {
    /// Create a pipeline writing into the existing directory `workdir`.
    pub fn new(
        workdir: &Path,
        http: &HttpConfig,
        extract: &ExtractConfig,
        progress: &'a dyn ProgressReporter,
    ) -> Result<Self> {
        Ok(Self {
            working_set: WorkingSet::open(workdir)?,
            fetcher: HttpFetcher::new(http)?,
            rules: ExtractRules::from_config(extract)?,
            progress,
            sequence: Sequence::new(),
            toc: Vec::new(),
            images: Vec::new(),
            metadata: BookMetadata::default(),
        })
    }

    /// Number files from `sequence` instead of starting at 1.
    pub fn with_sequence(mut self, sequence: Sequence) -> Self {
        self.sequence = sequence;
        self
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn toc(&self) -> &[PageEntry] {
        &self.toc
    }

    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    pub fn metadata(&self) -> &BookMetadata {
        &self.metadata
    }

    /// Fetch and extract every URL in order. The first failure aborts.
    #[instrument(skip_all, fields(count = urls.len()))]
    pub async fn fetch_pages(&mut self, urls: &[String]) -> Result<()> {
        let total = urls.len();
        for (i, url) in urls.iter().enumerate() {
            self.progress.page_fetched(url, i + 1, total);
            self.fetch_page(url).await?;
        }
        info!(
            pages = self.toc.len(),
            images = self.images.len(),
            "pages extracted"
        );
        Ok(())
    }

    /// Fetch one page, persist it, and queue its images.
    pub async fn fetch_page(&mut self, url: &str) -> Result<PageEntry> {
        let page_url =
            Url::parse(url).map_err(|e| BlogbookError::parse(format!("invalid page URL '{url}': {e}")))?;

        info!(url = %page_url, "downloading page");
        let html = self.fetcher.fetch_text(&page_url).await?;
        let page = extract_page(&html, &page_url, &mut self.sequence, &self.rules)?;
        self.working_set.write_page(&page)?;

        if self.metadata.title.is_empty() {
            self.metadata.title = page.entry.title.clone();
        }
        if self.metadata.author.is_empty() {
            self.metadata.author = default_author(&page_url);
        }

        self.toc.push(page.entry.clone());
        self.images.extend(page.images);
        Ok(page.entry)
    }

    /// Download the queued images. Individual failures are only reported.
    pub async fn download_images(&self) -> Result<ImageReport> {
        let progress = self.progress;
        blogbook_crawler::download_images(
            &self.fetcher,
            &self.images,
            self.working_set.dir(),
            |current, total, image| progress.image_fetched(&image.source_url, current, total),
        )
        .await
    }

    /// Settle title and author. Runs once, after all downloads.
    pub fn resolve_metadata(
        &mut self,
        overrides: &MetadataOverrides,
        prompt: Option<&dyn MetadataPrompt>,
    ) -> Result<&BookMetadata> {
        let defaults = std::mem::take(&mut self.metadata);
        self.metadata = metadata::resolve_metadata(defaults, overrides, prompt)?;
        Ok(&self.metadata)
    }

    /// Write `toc.html` and check the working set is complete.
    pub fn write_toc(&self) -> Result<PathBuf> {
        let path = toc::write_toc(&self.working_set, &self.metadata, &self.toc)?;
        self.working_set.validate(&self.toc)?;
        Ok(path)
    }

    /// Hand the manifest to `converter`, producing the book in `output_dir`.
    pub fn convert(
        &self,
        converter: &dyn Converter,
        output_dir: &Path,
        extension: &str,
    ) -> Result<PathBuf> {
        let request = ConversionRequest {
            input: self.working_set.path(TOC_FILENAME),
            output: output_path(output_dir, &self.metadata.title, extension),
        };
        info!(
            converter = converter.name(),
            output = %request.output.display(),
            "converting"
        );
        converter.convert(&request)?;
        Ok(request.output)
    }
}

// ---------------------------------------------------------------------------
// build_book
// ---------------------------------------------------------------------------

/// Run the full pipeline inside a temporary working directory.
///
/// 1. Fetch and extract pages (fatal on any page failure)
/// 2. Download images (per-image failures tolerated)
/// 3. Resolve title/author
/// 4. Write the ToC manifest
/// 5. Run the converter
///
/// The working directory is removed on every exit path.
#[instrument(skip_all, fields(urls = config.urls.len()))]
pub async fn build_book(
    config: &BuildConfig,
    prompt: Option<&dyn MetadataPrompt>,
    converter: &dyn Converter,
    progress: &dyn ProgressReporter,
) -> Result<BuildResult> {
    let start = Instant::now();

    if config.urls.is_empty() {
        return Err(BlogbookError::validation("no URLs to process"));
    }

    let tmp = tempfile::Builder::new()
        .prefix("blogbook-")
        .tempdir()
        .map_err(|e| BlogbookError::io(std::env::temp_dir(), e))?;
    info!(workdir = %tmp.path().display(), "using temporary directory");

    let mut pipeline = BookPipeline::new(tmp.path(), &config.http, &config.extract, progress)?;

    // --- Phase 1: Pages ---
    progress.phase("Downloading pages");
    pipeline.fetch_pages(&config.urls).await?;

    // --- Phase 2: Images ---
    progress.phase("Downloading images");
    let report = pipeline.download_images().await?;

    // --- Phase 3: Metadata ---
    progress.phase("Confirming metadata");
    pipeline.resolve_metadata(&config.overrides, prompt)?;

    // --- Phase 4: Table of contents ---
    progress.phase("Writing table of contents");
    pipeline.write_toc()?;

    // --- Phase 5: Conversion ---
    progress.phase("Converting");
    let output_path = pipeline.convert(
        converter,
        &config.output_dir,
        &config.converter.output_extension,
    )?;

    let result = BuildResult {
        output_path,
        metadata: pipeline.metadata().clone(),
        page_count: pipeline.toc().len(),
        images_downloaded: report.downloaded,
        images_failed: report.failed.len(),
        elapsed: start.elapsed(),
    };

    progress.done(&result);

    info!(
        output = %result.output_path.display(),
        pages = result.page_count,
        images = result.images_downloaded,
        images_failed = result.images_failed,
        elapsed_ms = result.elapsed.as_millis(),
        "build complete"
    );

    Ok(result)
}
