//! Persisting wallpapers and metadata.
//!
//! - [`Storage`] writes bytes to a path; [`FileStorage`] is the local
//!   filesystem backend.
//! - [`FilenameGenerator`] decides where a record's files go.
//! - [`ImageStorage`] combines the two with an output directory.

mod filename;
mod image_storage;

pub use filename::{
    DEFAULT_IMAGE_EXTENSION, DefaultFilenameGenerator, FilenameGenerator, FixedFilenameGenerator,
    describe, sanitize_description,
};
pub use image_storage::ImageStorage;

use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{DirBuilder, File, OpenOptions};
use tokio::io::{AsyncRead, AsyncWriteExt, BufWriter};
use tracing::{debug, error, info};

use crate::error::WallpaperError;
use crate::logging::Logger;

/// Permission bits for created directories (unix only).
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Permission bits for written files (unix only).
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Byte-oriented storage backend.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Writes `data` to `path`, creating parent directories as needed.
    async fn save(&self, data: &[u8], path: &Path) -> Result<(), WallpaperError>;

    /// Streams `reader` to `path`, returning the number of bytes written.
    async fn save_from_reader(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        path: &Path,
    ) -> Result<u64, WallpaperError>;

    /// Whether something exists at `path`.
    async fn exists(&self, path: &Path) -> bool;
}

/// Local filesystem storage.
///
/// A write that fails midway removes the partial file so a truncated image
/// is never left behind under its final name.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir_mode: u32,
    file_mode: u32,
    logger: Logger,
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(Logger::none())
    }
}

impl FileStorage {
    /// Creates a backend with the default directory and file modes.
    #[must_use]
    pub fn new(logger: Logger) -> Self {
        Self {
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            logger,
        }
    }

    /// Overrides the directory and file permission bits.
    #[must_use]
    pub fn with_modes(mut self, dir_mode: u32, file_mode: u32) -> Self {
        self.dir_mode = dir_mode;
        self.file_mode = file_mode;
        self
    }

    async fn ensure_parent(&self, path: &Path) -> Result<(), WallpaperError> {
        let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return Ok(());
        };
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(self.dir_mode);
        builder.create(parent).await.map_err(|e| {
            error!(path = %parent.display(), error = %e, "failed to create directory");
            WallpaperError::io(parent, e)
        })
    }

    async fn create_file(&self, path: &Path) -> Result<File, WallpaperError> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(self.file_mode);
        options.open(path).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "failed to create file");
            WallpaperError::io(path, e)
        })
    }

    async fn write_bytes(&self, data: &[u8], path: &Path) -> Result<(), WallpaperError> {
        let mut writer = BufWriter::new(self.create_file(path).await?);
        writer
            .write_all(data)
            .await
            .map_err(|e| WallpaperError::io(path, e))?;
        writer.flush().await.map_err(|e| WallpaperError::io(path, e))
    }

    async fn write_stream(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        path: &Path,
    ) -> Result<u64, WallpaperError> {
        let mut writer = BufWriter::new(self.create_file(path).await?);
        let written = tokio::io::copy(reader, &mut writer)
            .await
            .map_err(|e| WallpaperError::io(path, e))?;
        writer.flush().await.map_err(|e| WallpaperError::io(path, e))?;
        Ok(written)
    }
}

/// Removes a partially written file after a failed write.
async fn discard_partial(path: &Path) {
    debug!(path = %path.display(), "removing partial file after error");
    let _ = tokio::fs::remove_file(path).await;
}

#[async_trait]
impl Storage for FileStorage {
    async fn save(&self, data: &[u8], path: &Path) -> Result<(), WallpaperError> {
        self.logger
            .instrument(async {
                debug!(path = %path.display(), bytes = data.len(), "saving file");
                self.ensure_parent(path).await?;

                if let Err(e) = self.write_bytes(data, path).await {
                    error!(path = %path.display(), error = %e, "failed to write file");
                    discard_partial(path).await;
                    return Err(e);
                }

                info!(path = %path.display(), bytes = data.len(), "saved file");
                Ok::<_, WallpaperError>(())
            })
            .await
    }

    async fn save_from_reader(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        path: &Path,
    ) -> Result<u64, WallpaperError> {
        self.logger
            .instrument(async {
                debug!(path = %path.display(), "saving stream");
                self.ensure_parent(path).await?;

                match self.write_stream(reader, path).await {
                    Ok(written) => {
                        info!(path = %path.display(), bytes = written, "saved stream");
                        Ok(written)
                    }
                    Err(e) => {
                        error!(path = %path.display(), error = %e, "failed to write stream");
                        discard_partial(path).await;
                        Err(e)
                    }
                }
            })
            .await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}
