//! Image fetcher: downloads queued images into the working set.
//!
//! Failures are isolated per image. A failed download is logged and recorded
//! in the report; the local reference in the page stays dangling.

use std::path::Path;

use blogbook_shared::{BlogbookError, ImageRef, Result};
use tracing::{info, instrument, warn};
use url::Url;

use crate::fetch::HttpFetcher;

/// An image that could not be downloaded.
#[derive(Debug, Clone)]
pub struct ImageFailure {
    pub image: ImageRef,
    pub reason: String,
}

/// Outcome of a download pass.
#[derive(Debug, Clone, Default)]
pub struct ImageReport {
    /// Number of images written to the working set.
    pub downloaded: usize,
    /// Images skipped because of fetch errors.
    pub failed: Vec<ImageFailure>,
}

/// Download every queued image, in queue order, into `workdir`.
///
/// Only filesystem errors abort the pass; network errors are recorded in
/// the returned report. `on_progress(current, total, image)` is called
/// before each download.
#[instrument(skip_all, fields(count = images.len()))]
pub async fn download_images<F>(
    fetcher: &HttpFetcher,
    images: &[ImageRef],
    workdir: &Path,
    mut on_progress: F,
) -> Result<ImageReport>
where
    F: FnMut(usize, usize, &ImageRef),
{
    let mut report = ImageReport::default();
    let total = images.len();

    for (i, image) in images.iter().enumerate() {
        on_progress(i + 1, total, image);
        info!(url = %image.source_url, file = %image.local_filename, "downloading image");

        let bytes = match fetch_image(fetcher, image).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(url = %image.source_url, error = %e, "unable to download image");
                report.failed.push(ImageFailure {
                    image: image.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let path = workdir.join(&image.local_filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| BlogbookError::io(&path, e))?;
        report.downloaded += 1;
    }

    info!(
        downloaded = report.downloaded,
        failed = report.failed.len(),
        "image downloads finished"
    );

    Ok(report)
}

async fn fetch_image(fetcher: &HttpFetcher, image: &ImageRef) -> Result<Vec<u8>> {
    let url = Url::parse(&image.source_url)
        .map_err(|e| BlogbookError::parse(format!("{}: {e}", image.source_url)))?;
    fetcher.fetch_bytes(&url).await
}
