// Local file store for uploaded images

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

pub mod filename;

pub use filename::*;

/// Flat directory of uploaded files, served back under `/uploads`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if it does not exist yet
    pub async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await?;
        info!(path = %self.root.display(), "Uploads directory ready");
        Ok(())
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Open a new file for writing. Fails if the name is already taken.
    pub async fn create(&self, filename: &str) -> io::Result<fs::File> {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.path_for(filename))
            .await
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, filename: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(filename, "Tried to remove a file that does not exist");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn exists(&self, filename: &str) -> bool {
        fs::try_exists(self.path_for(filename)).await.unwrap_or(false)
    }

    /// Names of every stored file, sorted.
    pub async fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                names.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
