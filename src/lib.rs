//! API Creator SDK - compile user-defined data models into backend sources
//!
//! Provides:
//! - Schema records (projects, objects, typed attributes, actions) and their
//!   validation
//! - A schema store abstraction with an in-memory implementation
//! - Sails.js model generation (type mapping and per-object emission)
//! - The project compiler: staging, archiving and per-project locking
//! - Framework-independent API handlers, including the archive download
//! - Storage backends for staged files

pub mod api;
pub mod auth;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod export;
pub mod models;
pub mod storage;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use api::{ApiError, ApiResponse, ApiService, ResponseBody};
pub use auth::AuthState;
pub use compiler::{CompileError, CompiledArchive, ProjectCompiler};
pub use config::{ArchiveCompression, CompilerConfig, ConfigError};
pub use export::{GeneratedFile, SailsModelExporter, map_type};
pub use storage::{FileSystemStorageBackend, StorageBackend, StorageError};
pub use store::{InMemorySchemaStore, SchemaSnapshot, SchemaStore, StoreError};
pub use validation::ValidationError;

// Re-export models
pub use models::enums::*;
pub use models::{
    Action, Attribute, NewAction, NewAttribute, NewObject, NewProject, Object, Project,
    ReturnValue,
};
