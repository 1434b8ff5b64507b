//! Per-day results and batch outcomes.

use std::ops::ControlFlow;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::archive::ImageMetadata;
use crate::error::WallpaperError;

/// What happened to one day's wallpaper.
///
/// `image_path` is set only when the image was saved. Errors are shared
/// with the [`WallpaperError::Day`] that reported them, hence the `Arc`.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    /// Metadata the day was processed from.
    pub image: ImageMetadata,
    /// Where the image was written.
    pub image_path: Option<PathBuf>,
    /// Where the raw metadata JSON was written.
    pub json_path: Option<PathBuf>,
    /// Image fetch or save failure.
    pub download_error: Option<Arc<WallpaperError>>,
    /// Metadata JSON fetch or save failure; does not fail the day.
    pub json_error: Option<Arc<WallpaperError>>,
}

impl DownloadResult {
    /// Creates an empty result for `image`.
    #[must_use]
    pub fn new(image: ImageMetadata) -> Self {
        Self {
            image,
            image_path: None,
            json_path: None,
            download_error: None,
            json_error: None,
        }
    }

    /// Returns true if the image was saved.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.download_error.is_none() && self.image_path.is_some()
    }
}

/// Results of a multi-day run.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    results: Vec<DownloadResult>,
    attempted: usize,
    error: Option<WallpaperError>,
}

impl BatchOutcome {
    /// Per-day results in processing order.
    #[must_use]
    pub fn results(&self) -> &[DownloadResult] {
        &self.results
    }

    /// The terminal error of a stopped batch, or the summary error of a
    /// continue-on-error batch with failures.
    #[must_use]
    pub fn error(&self) -> Option<&WallpaperError> {
        self.error.as_ref()
    }

    /// Returns the number of days whose image was saved.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    /// Returns the number of attempted days that failed, including days
    /// that never produced a result.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.attempted - self.succeeded()
    }

    /// Returns the number of days attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.attempted
    }

    /// Splits into results and error.
    #[must_use]
    pub fn into_parts(self) -> (Vec<DownloadResult>, Option<WallpaperError>) {
        (self.results, self.error)
    }
}

/// Accumulates day outcomes into a [`BatchOutcome`].
pub(super) struct BatchRecorder {
    continue_on_error: bool,
    outcome: BatchOutcome,
    failures: usize,
    last_error: Option<Arc<WallpaperError>>,
}

impl BatchRecorder {
    pub(super) fn new(continue_on_error: bool, capacity: usize) -> Self {
        Self {
            continue_on_error,
            outcome: BatchOutcome {
                results: Vec::with_capacity(capacity),
                ..BatchOutcome::default()
            },
            failures: 0,
            last_error: None,
        }
    }

    /// Records one day. Breaks when the batch must stop.
    pub(super) fn record(
        &mut self,
        days_ago: u32,
        result: Result<DownloadResult, WallpaperError>,
    ) -> ControlFlow<()> {
        self.outcome.attempted += 1;

        let error = match result {
            Ok(result) => {
                self.outcome.results.push(result);
                return ControlFlow::Continue(());
            }
            Err(error) => error,
        };

        self.failures += 1;

        if self.continue_on_error {
            if let Some(partial) = error.partial_result() {
                self.outcome.results.push(partial.clone());
            }
            warn!(days_ago, error = %error, "wallpaper failed, continuing");
            self.last_error = Some(Arc::new(error));
            ControlFlow::Continue(())
        } else {
            error!(days_ago, error = %error, "wallpaper failed, stopping batch");
            self.outcome.error = Some(error);
            ControlFlow::Break(())
        }
    }

    pub(super) fn finish(mut self) -> BatchOutcome {
        if let Some(source) = self.last_error.take() {
            self.outcome.error = Some(WallpaperError::Partial {
                failed: self.failures,
                total: self.outcome.attempted,
                source,
            });
        }
        info!(
            succeeded = self.outcome.succeeded(),
            failed = self.outcome.failed(),
            "batch finished"
        );
        self.outcome
    }
}
