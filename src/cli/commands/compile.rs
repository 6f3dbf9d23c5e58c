//! Compile command implementation

use super::load_snapshot;
use crate::cli::error::CliError;
use crate::cli::output::format_compile_summary;
use crate::compiler::ProjectCompiler;
use crate::config::CompilerConfig;
use crate::models::{ProjectId, UserId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Arguments of the compile command
#[derive(Debug, Clone)]
pub struct CompileArgs {
    pub snapshot: PathBuf,
    pub owner: UserId,
    pub project: ProjectId,
    pub config: Option<PathBuf>,
    /// Overrides the configured staging root
    pub staging_dir: Option<PathBuf>,
    /// Defaults to `<project name>.zip` in the working directory
    pub output: Option<PathBuf>,
}

/// Handle the compile command, returning where the archive was written
pub async fn handle_compile(args: CompileArgs) -> Result<PathBuf, CliError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            CompilerConfig::load(path)?
        }
        None => CompilerConfig::default(),
    };
    if let Some(staging_dir) = args.staging_dir {
        config = config.with_staging_dir(staging_dir);
    }

    let store = Arc::new(load_snapshot(&args.snapshot)?);
    let compiler = ProjectCompiler::on_filesystem(store, config);
    let archive = compiler.compile(args.owner, args.project).await?;

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(&archive.file_name));
    tokio::fs::write(&output, &archive.bytes)
        .await
        .map_err(|e| CliError::FileWriteError(output.clone(), e.to_string()))?;

    println!("{}", format_compile_summary(&archive, &output));
    Ok(output)
}
