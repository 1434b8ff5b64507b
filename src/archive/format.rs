//! Human-readable rendering of archive dates and metadata.

use chrono::{Local, NaiveDate, NaiveDateTime};

use super::{ImageMetadata, START_DATE_FORMAT};
use crate::error::WallpaperError;

const FULL_START_DATE_FORMAT: &str = "%Y%m%d%H%M";

/// Formats a `YYYYMMDD` start date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`WallpaperError::InvalidDate`] when `value` is not a valid
/// eight-digit calendar date.
pub fn format_date(value: &str) -> Result<String, WallpaperError> {
    if value.len() != 8 {
        return Err(WallpaperError::invalid_date(value, "YYYYMMDD"));
    }
    NaiveDate::parse_from_str(value, START_DATE_FORMAT)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|_| WallpaperError::invalid_date(value, "YYYYMMDD"))
}

/// Formats a `YYYYMMDDHHMM` start date-time as `YYYY-MM-DD HH:MM`.
///
/// Characters past the first twelve are ignored.
///
/// # Errors
///
/// Returns [`WallpaperError::InvalidDate`] when the first twelve characters
/// are not a valid date and time.
pub fn format_full_date_time(value: &str) -> Result<String, WallpaperError> {
    let head = value
        .get(..12)
        .ok_or_else(|| WallpaperError::invalid_date(value, "YYYYMMDDHHMM"))?;
    NaiveDateTime::parse_from_str(head, FULL_START_DATE_FORMAT)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .map_err(|_| WallpaperError::invalid_date(value, "YYYYMMDDHHMM"))
}

/// Builds a short multi-line summary: title, description and date.
///
/// Empty parts are omitted.
#[must_use]
pub fn image_summary(image: &ImageMetadata) -> String {
    let mut lines = Vec::with_capacity(3);
    if !image.title.is_empty() {
        lines.push(format!("Title: {}", image.title));
    }
    if !image.copyright.is_empty() {
        lines.push(format!("Description: {}", image.copyright));
    }
    if let Ok(date) = format_date(&image.start_date) {
        lines.push(format!("Date: {date}"));
    }
    lines.join("\n")
}

/// Returns today's local date as `YYYYMMDD`.
#[must_use]
pub fn today_date_string() -> String {
    Local::now().format(START_DATE_FORMAT).to_string()
}

/// Whether `image` is the wallpaper for `today`.
#[must_use]
pub fn is_from_today(image: &ImageMetadata, today: NaiveDate) -> bool {
    image.date() == Some(today)
}
