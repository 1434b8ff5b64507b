//! Wallpaper-aware storage facade.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::io::AsyncRead;
use tracing::info;

use super::filename::{DefaultFilenameGenerator, FilenameGenerator};
use super::{FileStorage, Storage};
use crate::archive::ImageMetadata;
use crate::error::WallpaperError;
use crate::logging::Logger;

/// Saves wallpaper images and metadata under an output directory.
///
/// The backend and the naming strategy are both replaceable, e.g. with a
/// [`FixedFilenameGenerator`](super::FixedFilenameGenerator) to always write
/// the same file.
pub struct ImageStorage {
    storage: Box<dyn Storage>,
    generator: Box<dyn FilenameGenerator>,
    output_dir: PathBuf,
    logger: Logger,
}

impl ImageStorage {
    /// Creates filesystem-backed storage with default naming.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, logger: Logger) -> Self {
        Self {
            storage: Box::new(FileStorage::new(logger.clone())),
            generator: Box::new(DefaultFilenameGenerator),
            output_dir: output_dir.into(),
            logger,
        }
    }

    /// Replaces the storage backend.
    #[must_use]
    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    /// Replaces the naming strategy.
    #[must_use]
    pub fn with_generator(mut self, generator: impl FilenameGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Changes the output directory.
    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.output_dir = output_dir.into();
    }

    /// The output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the image for `image` would be saved.
    #[must_use]
    pub fn image_path(&self, image: &ImageMetadata) -> PathBuf {
        self.logger
            .in_scope(|| self.generator.image_path(image, &self.output_dir))
    }

    /// Where the metadata JSON for `image` would be saved.
    #[must_use]
    pub fn json_path(&self, image: &ImageMetadata) -> PathBuf {
        self.logger
            .in_scope(|| self.generator.json_path(image, &self.output_dir))
    }

    /// Whether something already exists at `path`.
    pub async fn exists(&self, path: &Path) -> bool {
        self.storage.exists(path).await
    }

    /// Saves image bytes and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, typically [`WallpaperError::Io`].
    pub async fn save_image(
        &self,
        data: &[u8],
        image: &ImageMetadata,
    ) -> Result<PathBuf, WallpaperError> {
        let path = self.image_path(image);
        self.logger
            .instrument(async {
                info!(path = %path.display(), "saving image");
                self.storage.save(data, &path).await
            })
            .await?;
        Ok(path)
    }

    /// Streams image bytes from `reader` and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, typically [`WallpaperError::Io`].
    pub async fn save_image_from_reader(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        image: &ImageMetadata,
    ) -> Result<PathBuf, WallpaperError> {
        let path = self.image_path(image);
        self.logger
            .instrument(async {
                info!(path = %path.display(), "saving image from stream");
                self.storage.save_from_reader(reader, &path).await
            })
            .await?;
        Ok(path)
    }

    /// Saves raw metadata JSON and returns the path written.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, typically [`WallpaperError::Io`].
    pub async fn save_json(
        &self,
        data: &[u8],
        image: &ImageMetadata,
    ) -> Result<PathBuf, WallpaperError> {
        let path = self.json_path(image);
        self.logger
            .instrument(async {
                info!(path = %path.display(), "saving metadata JSON");
                self.storage.save(data, &path).await
            })
            .await?;
        Ok(path)
    }
}

impl fmt::Debug for ImageStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageStorage")
            .field("output_dir", &self.output_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::FixedFilenameGenerator;
    use tempfile::TempDir;

    fn aurora() -> ImageMetadata {
        ImageMetadata {
            start_date: "20240115".to_string(),
            title: "Aurora Borealis".to_string(),
            ..ImageMetadata::default()
        }
    }

    #[tokio::test]
    async fn test_save_image_uses_generated_name() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ImageStorage::new(temp_dir.path(), Logger::none());

        let path = storage.save_image(b"jpeg", &aurora()).await.unwrap();

        assert_eq!(path, temp_dir.path().join("20240115_Aurora_Borealis.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");
    }

    #[tokio::test]
    async fn test_save_json_round_trips_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ImageStorage::new(temp_dir.path(), Logger::none());
        let raw = br#"{"images":[{"startdate":"20240115","title":"Aurora"}],"tooltips":{}}"#;

        let path = storage.save_json(raw, &aurora()).await.unwrap();

        assert_eq!(path, temp_dir.path().join("bing_data_20240115.json"));
        assert_eq!(std::fs::read(&path).unwrap(), raw);
    }

    #[tokio::test]
    async fn test_save_image_from_reader() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ImageStorage::new(temp_dir.path(), Logger::none());
        let mut reader: &[u8] = b"streamed";

        let path = storage
            .save_image_from_reader(&mut reader, &aurora())
            .await
            .unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"streamed");
    }

    #[tokio::test]
    async fn test_fixed_generator_overwrites_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = ImageStorage::new(temp_dir.path(), Logger::none())
            .with_generator(FixedFilenameGenerator::new("wallpaper"));

        let first = storage.save_image(b"one", &aurora()).await.unwrap();
        let mut other = aurora();
        other.start_date = "20240114".to_string();
        let second = storage.save_image(b"two", &other).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, temp_dir.path().join("wallpaper.jpg"));
        assert_eq!(std::fs::read(&first).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_set_output_dir_redirects_saves() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = ImageStorage::new(temp_dir.path().join("a"), Logger::none());
        storage.set_output_dir(temp_dir.path().join("b"));
        assert_eq!(storage.output_dir(), temp_dir.path().join("b"));

        let path = storage.save_image(b"x", &aurora()).await.unwrap();

        assert!(path.starts_with(temp_dir.path().join("b")));
        assert!(storage.exists(&path).await);
    }
}
