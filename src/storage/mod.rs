//! Storage backend abstraction
//!
//! Defines the StorageBackend trait used for staging generated files:
//! - FileSystemStorageBackend: native file system rooted at a base directory
//!
//! Paths passed to a backend are relative, `/`-separated strings. Use
//! [`join_path`] to build them.

use async_trait::async_trait;

pub mod filesystem;

pub use filesystem::FileSystemStorageBackend;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Trait for storage backends
///
/// This trait abstracts the file and directory operations the compiler needs
/// to stage generated sources and archives.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read a file from storage
    async fn read_file(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a file to storage, creating parent directories as needed
    async fn write_file(&self, path: &str, content: &[u8]) -> Result<(), StorageError>;

    /// List the files (not directories) in a directory
    async fn list_files(&self, dir: &str) -> Result<Vec<String>, StorageError>;

    /// Delete a file
    async fn delete_file(&self, path: &str) -> Result<(), StorageError>;

    /// Create a directory and its parents; succeeds if it already exists
    async fn create_dir(&self, path: &str) -> Result<(), StorageError>;
}

/// Join relative path segments with `/`, skipping empty segments and stray
/// separators at the joins.
///
/// ```rust
/// use api_creator_sdk::storage::join_path;
///
/// assert_eq!(join_path(&["7", "projects/", "/3"]), "7/projects/3");
/// ```
pub fn join_path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| s.trim_matches('/'))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
