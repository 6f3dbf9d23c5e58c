//! Compiler configuration
//!
//! Loaded from a TOML file at startup:
//!
//! ```toml
//! staging_dir = "/var/lib/api-creator/compiled_projects"
//! compression = "deflated"
//! persist_archive = true
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Compression method for archive entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCompression {
    #[default]
    Deflated,
    Stored,
}

impl std::str::FromStr for ArchiveCompression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deflated" | "deflate" => Ok(ArchiveCompression::Deflated),
            "stored" | "none" => Ok(ArchiveCompression::Stored),
            _ => Err(format!(
                "Invalid compression: {}. Valid options: deflated, stored",
                s
            )),
        }
    }
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings of the project compiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Root of the staging area; generated files are written below
    /// `<staging_dir>/<owner>/projects/<project>/`
    pub staging_dir: PathBuf,
    /// Compression used for archive entries
    pub compression: ArchiveCompression,
    /// Also write each archive next to its staged files
    pub persist_archive: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("compiled_projects"),
            compression: ArchiveCompression::default(),
            persist_archive: true,
        }
    }
}

impl CompilerConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Use a different staging root
    pub fn with_staging_dir(mut self, staging_dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = staging_dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert_eq!(config.staging_dir, PathBuf::from("compiled_projects"));
        assert!(config.persist_archive);
    }

    #[test]
    fn test_partial_override() {
        let config = CompilerConfig::from_toml_str(
            "staging_dir = \"/tmp/staging\"\ncompression = \"stored\"\n",
        )
        .unwrap();
        assert_eq!(config.staging_dir, PathBuf::from("/tmp/staging"));
        assert_eq!(config.compression, ArchiveCompression::Stored);
        assert!(config.persist_archive);
    }

    #[test]
    fn test_invalid_compression_rejected() {
        let result = CompilerConfig::from_toml_str("compression = \"lzma\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        assert!("lzma".parse::<ArchiveCompression>().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = CompilerConfig::load("/nonexistent/api-creator.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
