//! CLI error types

use crate::compiler::CompileError;
use crate::config::ConfigError;
use crate::store::StoreError;
use std::path::PathBuf;

/// Errors reported by CLI commands
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Failed to write {0}: {1}")]
    FileWriteError(PathBuf, String),

    #[error("Invalid schema snapshot: {0}")]
    InvalidSnapshot(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}
