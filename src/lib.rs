//! Bing Wallpaper Core Library
//!
//! Fetches the Bing daily wallpaper archive, downloads the images and
//! optionally their raw metadata JSON, and saves them under predictable
//! filenames.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`archive`] - Metadata records returned by the archive and date helpers
//! - [`client`] - HTTP client for metadata and image bytes
//! - [`storage`] - Filename generation and file persistence
//! - [`downloader`] - Single-day and batch download pipelines
//! - [`logging`] - Injectable `tracing` loggers
//! - [`error`] - Error types shared by all of the above

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod client;
pub mod downloader;
pub mod error;
pub mod logging;
pub mod storage;

// Re-export commonly used types
pub use archive::{ArchiveResponse, ImageMetadata, format_date, image_summary};
pub use client::{BingClient, ClientConfig, MAX_ARCHIVE_DAYS, WallpaperSource};
pub use downloader::{BatchOutcome, DownloadResult, Downloader};
pub use error::{ErrorKind, WallpaperError};
pub use logging::{LogConfig, LogLevel, Logger};
pub use storage::{
    DefaultFilenameGenerator, FileStorage, FilenameGenerator, FixedFilenameGenerator,
    ImageStorage, Storage,
};
