//! CLI entry point for the Bing wallpaper downloader.

use std::time::Duration;

use anyhow::{Context, Result};
use bing_wallpaper_core::{
    BatchOutcome, BingClient, ClientConfig, DownloadResult, Downloader, FixedFilenameGenerator,
    ImageStorage, LogConfig, LogLevel, Logger, WallpaperError, format_date,
};
use clap::Parser;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before logging, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > --log-level > default (info)
    let (level, unknown_level) = match args.log_level.parse::<LogLevel>() {
        Ok(level) => (level, None),
        Err(e) => (LogLevel::Info, Some(e)),
    };
    let logger = Logger::new(&LogConfig {
        level,
        show_time: !args.no_time,
        show_level: true,
        directives: std::env::var("RUST_LOG").ok().filter(|v| !v.trim().is_empty()),
    });

    logger.in_scope(|| {
        if let Some(e) = &unknown_level {
            warn!(error = %e, "falling back to info");
        }
        debug!(?args, "CLI arguments parsed");
        info!("bing-wallpaper starting");
    });

    let output_dir = std::path::absolute(&args.dir)
        .with_context(|| format!("cannot resolve output directory {}", args.dir.display()))?;

    let client = BingClient::new(
        ClientConfig::default()
            .with_base_url(args.base_url.as_str())
            .with_locale(args.locale.as_str())
            .with_high_quality(!args.no_hd)
            .with_timeout(Duration::from_secs(args.timeout))
            .with_logger(logger.clone()),
    )?;

    let mut storage = ImageStorage::new(output_dir.clone(), logger.clone());
    if let Some(name) = &args.name {
        let generator = FixedFilenameGenerator::new(name.as_str());
        let target = generator.fixed_path(&output_dir);
        if !args.overwrite && storage.exists(&target).await {
            return Err(WallpaperError::file_exists(target).into());
        }
        storage = storage.with_generator(generator);
    }

    let downloader = Downloader::new(client, storage, logger.clone()).with_save_json(args.json);

    if args.last {
        logger.in_scope(|| info!("downloading only the most recent wallpaper"));
        let result = downloader.fetch_and_save_wallpaper(0).await?;
        print_summary(1, 0);
        print_details(&result, args.json);
        return Ok(());
    }

    let outcome = downloader
        .download_latest_wallpapers(args.effective_days(), true)
        .await?;
    report(outcome)
}

/// Prints the batch summary and turns a batch error into the exit status.
fn report(outcome: BatchOutcome) -> Result<()> {
    print_summary(outcome.succeeded(), outcome.failed());
    match outcome.into_parts() {
        (_, Some(error)) => Err(error.into()),
        (_, None) => Ok(()),
    }
}

fn print_summary(succeeded: usize, failed: usize) {
    println!("\nDownload complete: {succeeded} succeeded, {failed} failed");
}

fn print_details(result: &DownloadResult, with_json: bool) {
    let image = &result.image;
    println!("\nWallpaper details:");
    println!("Title: {}", image.title);
    if let Ok(date) = format_date(&image.start_date) {
        println!("Date: {date}");
    }
    println!("Description: {}", image.copyright);
    if let Some(path) = &result.image_path {
        println!("Saved to: {}", path.display());
    }
    if let Some(path) = result.json_path.as_ref().filter(|_| with_json) {
        println!("Metadata: {}", path.display());
    }
}
