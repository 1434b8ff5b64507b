//! Archive client: metadata and image fetches.
//!
//! [`WallpaperSource`] is the contract the downloader depends on;
//! [`BingClient`] implements it over HTTP with `reqwest`.
//!
//! # Example
//!
//! ```no_run
//! use bing_wallpaper_core::client::{BingClient, ClientConfig, WallpaperSource};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BingClient::new(ClientConfig::default().with_locale("en-US"))?;
//! let today = client.fetch_image_data(0).await?;
//! let bytes = client.fetch_raw_image_data(&today).await?;
//! println!("{}: {} bytes", today.title, bytes.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod constants;
mod http;

pub use config::ClientConfig;
pub use constants::{
    DEFAULT_BASE_URL, DEFAULT_LOCALE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, MAX_ARCHIVE_DAYS,
    STANDARD_RESOLUTION_TOKEN, UHD_RESOLUTION_TOKEN,
};
pub use http::BingClient;

use async_trait::async_trait;

use crate::archive::ImageMetadata;
use crate::error::WallpaperError;

/// A source of wallpaper metadata and image bytes.
///
/// Implementations never retry; every failure is returned to the caller.
#[async_trait]
pub trait WallpaperSource: Send + Sync {
    /// Fetches the record `days_ago` days back (0 is the most recent).
    ///
    /// The offset is not range-checked here.
    async fn fetch_image_data(&self, days_ago: u32) -> Result<ImageMetadata, WallpaperError>;

    /// Fetches the `days` most recent records, most recent first.
    ///
    /// Fails with [`WallpaperError::InvalidDayCount`] before any request when
    /// `days` is outside `1..=MAX_ARCHIVE_DAYS`.
    async fn fetch_multiple_image_data(
        &self,
        days: u32,
    ) -> Result<Vec<ImageMetadata>, WallpaperError>;

    /// Fetches the image bytes for `image`.
    async fn fetch_raw_image_data(&self, image: &ImageMetadata) -> Result<Vec<u8>, WallpaperError>;

    /// Fetches `url` and returns the body unmodified.
    async fn fetch_raw_json_data(&self, url: &str) -> Result<Vec<u8>, WallpaperError>;

    /// Builds the archive URL for `count` records starting at `days_ago`.
    ///
    /// Identical inputs always produce the identical URL.
    fn archive_url(&self, days_ago: u32, count: u32) -> String;
}

/// Checks a batch day count against the archive window.
///
/// # Errors
///
/// Returns [`WallpaperError::InvalidDayCount`] outside `1..=MAX_ARCHIVE_DAYS`.
pub fn validate_day_count(days: u32) -> Result<(), WallpaperError> {
    if (1..=MAX_ARCHIVE_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(WallpaperError::invalid_day_count(days))
    }
}

/// Checks a single-day offset against the archive window.
///
/// # Errors
///
/// Returns [`WallpaperError::InvalidOffset`] outside `0..MAX_ARCHIVE_DAYS`.
pub fn validate_offset(days_ago: u32) -> Result<(), WallpaperError> {
    if days_ago < MAX_ARCHIVE_DAYS {
        Ok(())
    } else {
        Err(WallpaperError::invalid_offset(days_ago))
    }
}
