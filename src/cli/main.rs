//! `api-creator`: compile stored project schemas into Sails.js model archives.
//!
//! Usage:
//!   api-creator compile --snapshot <schema.json> --owner <id> --project <id>
//!   api-creator emit --snapshot <schema.json> --owner <id> --project <id>
//!
//! The snapshot is a JSON dump of the schema rows (`projects`, `objects`,
//! `attributes`, `actions`), with attribute types as integer codes.

use api_creator_sdk::cli::commands::{CompileArgs, handle_compile, handle_emit};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// API Creator project compiler.
#[derive(Parser, Debug)]
#[command(name = "api-creator", version, about = "Compile data models into Sails.js sources")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a project into a zip archive.
    Compile {
        /// Schema snapshot JSON file (`-` for stdin).
        #[arg(long)]
        snapshot: PathBuf,

        /// Id of the user owning the project.
        #[arg(long)]
        owner: u64,

        /// Project id.
        #[arg(long)]
        project: u64,

        /// Compiler configuration file (TOML).
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Staging root (overrides the configuration file).
        #[arg(long)]
        staging_dir: Option<PathBuf>,

        /// Archive path (default: `<project name>.zip`).
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Print the generated model files of a project.
    Emit {
        /// Schema snapshot JSON file (`-` for stdin).
        #[arg(long)]
        snapshot: PathBuf,

        /// Id of the user owning the project.
        #[arg(long)]
        owner: u64,

        /// Project id.
        #[arg(long)]
        project: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `emit` output stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match Cli::parse().command {
        Command::Compile {
            snapshot,
            owner,
            project,
            config,
            staging_dir,
            output,
        } => {
            handle_compile(CompileArgs {
                snapshot,
                owner,
                project,
                config,
                staging_dir,
                output,
            })
            .await?;
        }
        Command::Emit {
            snapshot,
            owner,
            project,
        } => handle_emit(&snapshot, owner, project).await?,
    }

    Ok(())
}
