//! File system storage backend
//!
//! Implements StorageBackend on the local file system. The compiler uses it to
//! stage generated model files and archives under a configured root directory.
//!
//! Paths are relative to the base directory; `..` segments and absolute
//! prefixes are refused, and resolved paths must stay below the base.

use super::{StorageBackend, StorageError};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File system storage backend
pub struct FileSystemStorageBackend {
    base_path: PathBuf,
}

impl FileSystemStorageBackend {
    /// Create a new file system storage backend
    ///
    /// # Arguments
    ///
    /// * `base_path` - Base directory path for all file operations
    ///
    /// # Example
    ///
    /// ```rust
    /// use api_creator_sdk::storage::filesystem::FileSystemStorageBackend;
    ///
    /// let backend = FileSystemStorageBackend::new("/var/lib/api-creator/compiled_projects");
    /// assert!(backend.base_path().ends_with("compiled_projects"));
    /// ```
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Root directory of every path handled by this backend
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a relative staging path onto the base directory
    ///
    /// Only the path's components are inspected, so names such as
    /// `Acme Inc..zip` are fine while a `..` segment is refused. A path that
    /// already exists, or whose parent does, must also canonicalize to a
    /// location inside the base directory (symlinks cannot lead out).
    fn resolve_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(StorageError::PermissionDenied(format!(
                "Path leaves the staging root: {}",
                path
            )));
        }

        let full = self.base_path.join(relative);
        let anchor = if full.exists() {
            Some(full.as_path())
        } else {
            full.parent().filter(|parent| parent.exists())
        };

        if let Some(anchor) = anchor {
            let canonical = anchor
                .canonicalize()
                .map_err(|e| StorageError::IoError(format!("Failed to resolve {}: {}", path, e)))?;
            let base = self
                .base_path
                .canonicalize()
                .unwrap_or_else(|_| self.base_path.clone());
            if !canonical.starts_with(&base) {
                return Err(StorageError::PermissionDenied(format!(
                    "Path escapes the staging root: {}",
                    path
                )));
            }
        }

        Ok(full)
    }
}

#[async_trait]
impl StorageBackend for FileSystemStorageBackend {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to read file {}: {}", path, e))
            }
        })
    }

    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::IoError(format!("Failed to create directory for {}: {}", path, e))
            })?;
        }

        fs::write(&full_path, content)
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to write file {}: {}", path, e)))?;

        debug!("Wrote {} bytes to {}", content.len(), full_path.display());
        Ok(())
    }

    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StorageError> {
        let full_path = self.resolve_path(dir)?;

        let mut entries = Vec::new();
        let mut read_dir = fs::read_dir(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::DirectoryNotFound(dir.to_string())
            } else {
                StorageError::IoError(format!("Failed to read directory {}: {}", dir, e))
            }
        })?;

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::IoError(format!("Failed to read directory entry: {}", e)))?
        {
            if let Ok(file_type) = entry.file_type().await
                && file_type.is_file()
                && let Some(file_name) = entry.file_name().to_str()
            {
                entries.push(file_name.to_string());
            }
        }

        // Directory iteration order is platform dependent
        entries.sort();
        Ok(entries)
    }

    async fn delete_file(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        fs::remove_file(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::FileNotFound(path.to_string())
            } else {
                StorageError::IoError(format!("Failed to delete file {}: {}", path, e))
            }
        })
    }

    async fn create_dir(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve_path(path)?;

        // create_dir_all succeeds when the directory already exists
        fs::create_dir_all(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                StorageError::PermissionDenied(format!("Cannot create directory {}", path))
            } else {
                StorageError::IoError(format!("Failed to create directory {}: {}", path, e))
            }
        })
    }
}
