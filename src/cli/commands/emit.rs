//! Emit command implementation

use super::load_snapshot;
use crate::cli::error::CliError;
use crate::cli::output::format_emitted;
use crate::compiler::ProjectCompiler;
use crate::config::CompilerConfig;
use crate::models::{ProjectId, UserId};
use std::path::Path;
use std::sync::Arc;

/// Handle the emit command: print every generated model file to stdout
///
/// Nothing is staged, so the configured staging root is never touched.
pub async fn handle_emit(snapshot: &Path, owner: UserId, project: ProjectId) -> Result<(), CliError> {
    let store = Arc::new(load_snapshot(snapshot)?);
    let compiler = ProjectCompiler::on_filesystem(store, CompilerConfig::default());
    let generated = compiler.generate(owner, project).await?;

    print!("{}", format_emitted(&generated));
    Ok(())
}
