//! Error types shared by the client, storage and downloader modules.
//!
//! Every variant carries the context (URL, path, offset) needed to make the
//! message useful on its own, and [`WallpaperError::kind`] classifies it into
//! one of the coarse [`ErrorKind`]s callers branch on.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::client::MAX_ARCHIVE_DAYS;
use crate::downloader::DownloadResult;

/// Coarse classification of a [`WallpaperError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad day count, offset, URL or output target.
    Validation,
    /// Network failure, timeout or client construction failure.
    Transport,
    /// The server answered with something other than 200 OK.
    HttpStatus,
    /// The archive body could not be decoded or held no images.
    Parse,
    /// Directory creation or file write failure.
    Io,
}

/// Errors produced while fetching and saving wallpapers.
#[derive(Debug, Error)]
pub enum WallpaperError {
    /// Requested day count is outside the archive window.
    #[error("invalid day count {days}: must be between 1 and {MAX_ARCHIVE_DAYS}")]
    InvalidDayCount {
        /// The rejected count.
        days: u32,
    },

    /// Requested offset is outside the archive window.
    #[error("invalid offset {days_ago}: must be between 0 and {}", MAX_ARCHIVE_DAYS - 1)]
    InvalidOffset {
        /// The rejected offset.
        days_ago: u32,
    },

    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL text.
        url: String,
    },

    /// A date string did not match the expected layout.
    #[error("invalid date {value}: expected {expected}")]
    InvalidDate {
        /// The rejected value.
        value: String,
        /// Human-readable layout description.
        expected: &'static str,
    },

    /// The fixed output file exists and overwriting was not requested.
    #[error("file {path} already exists (pass --overwrite to replace it)")]
    FileExists {
        /// The existing file.
        path: PathBuf,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS, connection refused, TLS, body read).
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned the status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The archive body was not valid JSON for the expected shape.
    #[error("failed to parse archive response from {url}: {source}")]
    Parse {
        /// The archive URL.
        url: String,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// The archive body decoded but contained no images.
    #[error("archive response from {url} contained no images")]
    EmptyArchive {
        /// The archive URL.
        url: String,
    },

    /// File system error while saving.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// One day's pipeline failed.
    ///
    /// `partial` holds the result built up to the failing stage; it is absent
    /// when the metadata itself could not be fetched.
    #[error("wallpaper from {days_ago} day(s) ago failed: {source}")]
    Day {
        /// Offset of the failing day.
        days_ago: u32,
        /// Result built before the failure, if any metadata was available.
        partial: Option<Box<DownloadResult>>,
        /// The stage error.
        #[source]
        source: Arc<WallpaperError>,
    },

    /// Summary of a continue-on-error batch in which some days failed.
    #[error("{failed} of {total} wallpapers failed; last error: {source}")]
    Partial {
        /// Number of failed days.
        failed: usize,
        /// Number of days attempted.
        total: usize,
        /// The last per-day error.
        #[source]
        source: Arc<WallpaperError>,
    },
}

impl WallpaperError {
    /// Creates an invalid day count error.
    pub fn invalid_day_count(days: u32) -> Self {
        Self::InvalidDayCount { days }
    }

    /// Creates an invalid offset error.
    pub fn invalid_offset(days_ago: u32) -> Self {
        Self::InvalidOffset { days_ago }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(value: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidDate {
            value: value.into(),
            expected,
        }
    }

    /// Creates a file-exists error.
    pub fn file_exists(path: impl Into<PathBuf>) -> Self {
        Self::FileExists { path: path.into() }
    }

    /// Creates a client construction error.
    pub fn client_build(source: reqwest::Error) -> Self {
        Self::ClientBuild { source }
    }

    /// Creates a network error, or a timeout error when `source` is one.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            return Self::timeout(url);
        }
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a parse error.
    pub fn parse(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            url: url.into(),
            source,
        }
    }

    /// Creates an empty-archive error.
    pub fn empty_archive(url: impl Into<String>) -> Self {
        Self::EmptyArchive { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the coarse kind of this error.
    ///
    /// Orchestration wrappers report the kind of the error they wrap.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDayCount { .. }
            | Self::InvalidOffset { .. }
            | Self::InvalidUrl { .. }
            | Self::InvalidDate { .. }
            | Self::FileExists { .. } => ErrorKind::Validation,
            Self::ClientBuild { .. } | Self::Network { .. } | Self::Timeout { .. } => {
                ErrorKind::Transport
            }
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
            Self::Parse { .. } | Self::EmptyArchive { .. } => ErrorKind::Parse,
            Self::Io { .. } => ErrorKind::Io,
            Self::Day { source, .. } | Self::Partial { source, .. } => source.kind(),
        }
    }

    /// Returns the partial result carried by a [`WallpaperError::Day`].
    #[must_use]
    pub fn partial_result(&self) -> Option<&DownloadResult> {
        match self {
            Self::Day { partial, .. } => partial.as_deref(),
            _ => None,
        }
    }
}

// No `From<reqwest::Error>` / `From<std::io::Error>` impls: every variant
// needs a URL or path the source error does not carry.
