//! Wallpaper download pipelines.
//!
//! A [`Downloader`] ties a [`WallpaperSource`] to an [`ImageStorage`]. Each
//! day runs metadata, then image, then optional raw JSON, stopping at the
//! first stage that fails:
//!
//! - metadata failure aborts the day with no result
//! - image fetch or save failure aborts the day; the error carries the
//!   partial [`DownloadResult`]
//! - JSON failure is recorded in the result and the day still succeeds
//!
//! Batches run days one after another with a fixed pause in between.
//!
//! # Example
//!
//! ```no_run
//! use bing_wallpaper_core::client::{BingClient, ClientConfig};
//! use bing_wallpaper_core::downloader::Downloader;
//! use bing_wallpaper_core::logging::Logger;
//! use bing_wallpaper_core::storage::ImageStorage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BingClient::new(ClientConfig::default())?;
//! let storage = ImageStorage::new("wallpapers", Logger::none());
//! let downloader = Downloader::new(client, storage, Logger::none());
//!
//! let outcome = downloader.download_latest_wallpapers(7, true).await?;
//! println!("{} saved, {} failed", outcome.succeeded(), outcome.failed());
//! # Ok(())
//! # }
//! ```

mod result;

pub use result::{BatchOutcome, DownloadResult};

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use self::result::BatchRecorder;
use crate::archive::ImageMetadata;
use crate::client::{WallpaperSource, validate_day_count, validate_offset};
use crate::error::WallpaperError;
use crate::logging::Logger;
use crate::storage::ImageStorage;

/// Default pause between consecutive days in a batch.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);

/// Fetches wallpapers from a source and saves them to storage.
pub struct Downloader {
    source: Box<dyn WallpaperSource>,
    storage: ImageStorage,
    logger: Logger,
    save_json: bool,
    request_delay: Duration,
}

impl Downloader {
    /// Creates a downloader that saves JSON and pauses
    /// [`DEFAULT_REQUEST_DELAY`] between days.
    #[must_use]
    pub fn new(
        source: impl WallpaperSource + 'static,
        storage: ImageStorage,
        logger: Logger,
    ) -> Self {
        Self {
            source: Box::new(source),
            storage,
            logger,
            save_json: true,
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }

    /// Enables or disables saving the raw metadata JSON.
    #[must_use]
    pub fn with_save_json(mut self, enabled: bool) -> Self {
        self.save_json = enabled;
        self
    }

    /// Sets the pause between days; zero disables it.
    #[must_use]
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// The storage images are saved to.
    #[must_use]
    pub fn storage(&self) -> &ImageStorage {
        &self.storage
    }

    /// Mutable access to the storage, e.g. to change the output directory.
    pub fn storage_mut(&mut self) -> &mut ImageStorage {
        &mut self.storage
    }

    /// Fetches and saves the wallpaper from `days_ago` days back.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::InvalidOffset`] before any request when
    /// `days_ago` is 16 or more. Any later failure is a
    /// [`WallpaperError::Day`]; its partial result is present when the
    /// metadata was fetched.
    pub async fn fetch_and_save_wallpaper(
        &self,
        days_ago: u32,
    ) -> Result<DownloadResult, WallpaperError> {
        validate_offset(days_ago)?;

        let image = self
            .logger
            .instrument(self.source.fetch_image_data(days_ago))
            .await
            .map_err(|e| WallpaperError::Day {
                days_ago,
                partial: None,
                source: Arc::new(e),
            })?;

        self.save_wallpaper(&image, days_ago).await
    }

    /// Saves the image for `image`, then its raw metadata JSON if enabled.
    ///
    /// `days_ago` is the offset `image` was fetched at; it addresses the
    /// JSON request.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::Day`] carrying the partial result when the
    /// image cannot be fetched or saved.
    pub async fn save_wallpaper(
        &self,
        image: &ImageMetadata,
        days_ago: u32,
    ) -> Result<DownloadResult, WallpaperError> {
        self.logger
            .instrument(async {
                let mut result = DownloadResult::new(image.clone());
                info!(
                    days_ago,
                    title = %image.title,
                    start_date = %image.start_date,
                    "downloading wallpaper"
                );

                let bytes = match self.source.fetch_raw_image_data(image).await {
                    Ok(bytes) => bytes,
                    Err(e) => return Err(day_failure(days_ago, result, e)),
                };
                match self.storage.save_image(&bytes, image).await {
                    Ok(path) => result.image_path = Some(path),
                    Err(e) => return Err(day_failure(days_ago, result, e)),
                }

                if self.save_json {
                    match self.save_metadata_json(image, days_ago).await {
                        Ok(path) => result.json_path = Some(path),
                        Err(e) => {
                            warn!(days_ago, error = %e, "failed to save metadata JSON");
                            result.json_error = Some(Arc::new(e));
                        }
                    }
                }

                info!(days_ago, path = ?result.image_path, "wallpaper saved");
                Ok(result)
            })
            .await
    }

    /// Downloads the `days` most recent wallpapers using one metadata
    /// request.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::InvalidDayCount`] before any request when
    /// `days` is outside `1..=16`, or the metadata error when the batch
    /// request fails. Per-day failures are reported in the outcome.
    pub async fn download_latest_wallpapers(
        &self,
        days: u32,
        continue_on_error: bool,
    ) -> Result<BatchOutcome, WallpaperError> {
        validate_day_count(days)?;

        let images = self
            .logger
            .instrument(self.source.fetch_multiple_image_data(days))
            .await?;
        self.logger
            .in_scope(|| info!(requested = days, received = images.len(), "fetched batch metadata"));

        Ok(self.save_wallpapers(0, &images, continue_on_error).await)
    }

    /// Saves a contiguous run of records, the first being `start_offset`
    /// days back and each following one a day older.
    ///
    /// Without `continue_on_error` the first failing day ends the batch. The
    /// outcome lists only the days before it, and its [`WallpaperError::Day`]
    /// error keeps the failing day's partial result. With it, every day is
    /// attempted and a [`WallpaperError::Partial`] summarizes any failures.
    pub async fn save_wallpapers(
        &self,
        start_offset: u32,
        images: &[ImageMetadata],
        continue_on_error: bool,
    ) -> BatchOutcome {
        self.logger
            .instrument(async {
                let mut recorder = BatchRecorder::new(continue_on_error, images.len());
                for (days_ago, image) in (start_offset..).zip(images) {
                    if days_ago > start_offset {
                        self.pause().await;
                    }
                    let result = self.save_wallpaper(image, days_ago).await;
                    if recorder.record(days_ago, result).is_break() {
                        break;
                    }
                }
                recorder.finish()
            })
            .await
    }

    /// Downloads the `days` most recent wallpapers with one metadata request
    /// per day.
    ///
    /// # Errors
    ///
    /// Returns [`WallpaperError::InvalidDayCount`] before any request when
    /// `days` is outside `1..=16`. Per-day failures, metadata included, are
    /// reported in the outcome.
    pub async fn fetch_and_save_wallpapers(
        &self,
        days: u32,
        continue_on_error: bool,
    ) -> Result<BatchOutcome, WallpaperError> {
        validate_day_count(days)?;

        let outcome = self
            .logger
            .instrument(async {
                let mut recorder = BatchRecorder::new(continue_on_error, days as usize);
                for days_ago in 0..days {
                    if days_ago > 0 {
                        self.pause().await;
                    }
                    let result = self.fetch_and_save_wallpaper(days_ago).await;
                    if recorder.record(days_ago, result).is_break() {
                        break;
                    }
                }
                recorder.finish()
            })
            .await;
        Ok(outcome)
    }

    async fn save_metadata_json(
        &self,
        image: &ImageMetadata,
        days_ago: u32,
    ) -> Result<std::path::PathBuf, WallpaperError> {
        let url = self.source.archive_url(days_ago, 1);
        let raw = self.source.fetch_raw_json_data(&url).await?;
        self.storage.save_json(&raw, image).await
    }

    async fn pause(&self) {
        if self.request_delay.is_zero() {
            return;
        }
        debug!(delay_ms = self.request_delay.as_millis(), "pausing between requests");
        tokio::time::sleep(self.request_delay).await;
    }
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("storage", &self.storage)
            .field("save_json", &self.save_json)
            .field("request_delay", &self.request_delay)
            .finish_non_exhaustive()
    }
}

/// Marks `result` as failed by `error` and wraps both into a day error.
fn day_failure(days_ago: u32, mut result: DownloadResult, error: WallpaperError) -> WallpaperError {
    let source = Arc::new(error);
    result.download_error = Some(Arc::clone(&source));
    WallpaperError::Day {
        days_ago,
        partial: Some(Box::new(result)),
        source,
    }
}
