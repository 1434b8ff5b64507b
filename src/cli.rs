//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use bing_wallpaper_core::MAX_ARCHIVE_DAYS;
use bing_wallpaper_core::client::{DEFAULT_BASE_URL, DEFAULT_LOCALE};

/// Default request timeout for the command line, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Download the Bing daily wallpapers.
///
/// Fetches the most recent wallpapers from the Bing image archive and saves
/// them, optionally with their raw metadata, into a local directory.
#[derive(Parser, Debug)]
#[command(name = "bing-wallpaper")]
#[command(author, version, about)]
pub struct Args {
    /// Directory to save wallpapers into
    #[arg(long, default_value = "./bing_wallpapers")]
    pub dir: PathBuf,

    /// Number of recent days to download (1-16)
    #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_ARCHIVE_DAYS)))]
    pub days: u32,

    /// Only download the most recent wallpaper
    #[arg(long)]
    pub last: bool,

    /// Keep the standard resolution instead of UHD
    #[arg(long)]
    pub no_hd: bool,

    /// Also save the raw metadata JSON
    #[arg(long)]
    pub json: bool,

    /// Archive market (zh-CN, en-US, ja-JP, ...)
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,

    /// Log level (debug, info, warning, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Omit timestamps from log lines
    #[arg(long)]
    pub no_time: bool,

    /// Save the image under this fixed filename (e.g. my-wallpaper.jpg)
    #[arg(long)]
    pub name: Option<String>,

    /// Replace the file given by --name if it already exists
    #[arg(long, requires = "name")]
    pub overwrite: bool,

    /// Archive endpoint
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds (1-300)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: u64,
}

impl Args {
    /// Number of days to fetch; `--last` forces one.
    #[must_use]
    pub fn effective_days(&self) -> u32 {
        if self.last { 1 } else { self.days }
    }
}
