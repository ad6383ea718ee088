use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFileSystem;

#[async_trait]
impl FileSystem for TokioFileSystem {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// Reads text files relative to a fixed base directory.
#[derive(Debug, Clone)]
pub struct FileReader<F = TokioFileSystem> {
    base_dir: PathBuf,
    fs: F,
}

impl FileReader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_fs(base_dir, TokioFileSystem)
    }
}

impl<F: FileSystem> FileReader<F> {
    pub fn with_fs(base_dir: impl Into<PathBuf>, fs: F) -> Self {
        Self {
            base_dir: base_dir.into(),
            fs,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Returns `Ok(None)` if the file does not exist; any other I/O error is
    /// passed on.
    pub async fn read_file_asynchronously(
        &self,
        path_to_file: impl AsRef<Path>,
    ) -> io::Result<Option<String>> {
        let full_path = self.base_dir.join(path_to_file);
        match self.fs.read_to_string(&full_path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %full_path.display(), "file not found");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
