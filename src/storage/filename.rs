//! Filename derivation for saved wallpapers and their metadata.
//!
//! The default scheme is `{startdate}_{description}.jpg` for images and
//! `bing_data_{startdate}.json` for metadata, where the description comes
//! from [`describe`].

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::archive::ImageMetadata;

/// Extension appended to fixed filenames that have none.
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";

/// Maps a metadata record and a base directory to output paths.
pub trait FilenameGenerator: Send + Sync {
    /// Path for the image file.
    fn image_path(&self, image: &ImageMetadata, base_dir: &Path) -> PathBuf;

    /// Path for the raw metadata JSON file.
    fn json_path(&self, image: &ImageMetadata, base_dir: &Path) -> PathBuf;
}

/// Date-and-description naming.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFilenameGenerator;

impl FilenameGenerator for DefaultFilenameGenerator {
    fn image_path(&self, image: &ImageMetadata, base_dir: &Path) -> PathBuf {
        let filename = format!("{}_{}.jpg", image.start_date, describe(image));
        debug!(filename = %filename, "generated image filename");
        base_dir.join(filename)
    }

    fn json_path(&self, image: &ImageMetadata, base_dir: &Path) -> PathBuf {
        let filename = format!("bing_data_{}.json", image.start_date);
        debug!(filename = %filename, "generated JSON filename");
        base_dir.join(filename)
    }
}

/// Saves every image under one fixed name; JSON names follow the default
/// scheme.
#[derive(Debug, Clone)]
pub struct FixedFilenameGenerator {
    filename: String,
    fallback: DefaultFilenameGenerator,
}

impl FixedFilenameGenerator {
    /// Creates a generator for `filename`, appending `.jpg` when it has no
    /// extension.
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        let mut filename = filename.into();
        if Path::new(&filename).extension().is_none() {
            filename.push('.');
            filename.push_str(DEFAULT_IMAGE_EXTENSION);
        }
        Self {
            filename,
            fallback: DefaultFilenameGenerator,
        }
    }

    /// The fixed filename, extension included.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Path the image lands at under `base_dir`, independent of metadata.
    #[must_use]
    pub fn fixed_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.filename)
    }
}

impl FilenameGenerator for FixedFilenameGenerator {
    fn image_path(&self, _image: &ImageMetadata, base_dir: &Path) -> PathBuf {
        debug!(filename = %self.filename, "using fixed image filename");
        self.fixed_path(base_dir)
    }

    fn json_path(&self, image: &ImageMetadata, base_dir: &Path) -> PathBuf {
        self.fallback.json_path(image, base_dir)
    }
}

/// Derives the filename-safe description of `image`.
///
/// Prefers the title. Without one, takes the copyright text up to the first
/// full-width comma, then up to the first `(`. The result is trimmed and
/// passed through [`sanitize_description`].
#[must_use]
pub fn describe(image: &ImageMetadata) -> String {
    let raw = if image.title.is_empty() {
        let before_comma = image.copyright.split('，').next().unwrap_or_default();
        before_comma.split('(').next().unwrap_or_default()
    } else {
        image.title.as_str()
    };
    sanitize_description(raw.trim())
}

/// Replaces characters that are unsafe in filenames.
///
/// Space becomes `_`; `/`, `\`, `:` and `|` become `-`; `?`, `*`, `<`, `>`
/// are dropped; `"` becomes `'`. Applying it twice changes nothing.
#[must_use]
pub fn sanitize_description(value: &str) -> String {
    value
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            '/' | '\\' | ':' | '|' => Some('-'),
            '?' | '*' | '<' | '>' => None,
            '"' => Some('\''),
            c => Some(c),
        })
        .collect()
}
