//! Data model of the image-archive endpoint.
//!
//! The endpoint answers `GET ...?format=js` with an [`ArchiveResponse`]: an
//! ordered list of [`ImageMetadata`] (most recent first) and a display-only
//! [`Tooltips`] bundle.

mod format;

pub use format::{
    format_date, format_full_date_time, image_summary, is_from_today, today_date_string,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Layout of [`ImageMetadata::start_date`].
pub(crate) const START_DATE_FORMAT: &str = "%Y%m%d";

/// Metadata for one day's wallpaper.
///
/// Missing fields decode as empty strings / zero so a sparse archive entry
/// still yields a usable record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    /// Calendar day of the image, `YYYYMMDD`.
    #[serde(rename = "startdate")]
    pub start_date: String,
    /// Start date and time, `YYYYMMDDHHMM`.
    #[serde(rename = "fullstartdate")]
    pub full_start_date: String,
    /// Day after the image's last day, `YYYYMMDD`.
    #[serde(rename = "enddate")]
    pub end_date: String,
    /// Image path relative to the archive host, including query.
    pub url: String,
    /// Base path fragment for building other resolutions.
    #[serde(rename = "urlbase")]
    pub url_base: String,
    /// Copyright / description text.
    pub copyright: String,
    /// Link for the copyright text.
    #[serde(rename = "copyrightlink")]
    pub copyright_link: String,
    /// Short title. May be empty.
    pub title: String,
    /// Quiz link.
    pub quiz: String,
    /// Whether the image may be used as a wallpaper.
    #[serde(rename = "wp")]
    pub wallpaper: bool,
    /// Content hash.
    #[serde(rename = "hsh")]
    pub hash: String,
    /// Darkness score.
    #[serde(rename = "drk")]
    pub darkness: i64,
    /// Top crop offset.
    pub top: i64,
    /// Bottom crop offset.
    #[serde(rename = "bot")]
    pub bottom: i64,
    /// Hotspot entries.
    #[serde(rename = "hs")]
    pub hotspots: Vec<String>,
}

impl ImageMetadata {
    /// Returns the start date as a calendar date, if it is well-formed.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.start_date, START_DATE_FORMAT).ok()
    }
}

/// Tooltip strings shipped alongside the images. Display-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tooltips {
    pub loading: String,
    pub previous: String,
    pub next: String,
    pub walle: String,
    pub walls: String,
}

/// Decoded body of an archive request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveResponse {
    /// Images, most recent first.
    #[serde(default)]
    pub images: Vec<ImageMetadata>,
    /// Display-only tooltip texts.
    #[serde(default)]
    pub tooltips: Tooltips,
}
