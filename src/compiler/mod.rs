//! Project compiler
//!
//! Turns a project's stored schema into generated Sails.js sources:
//!
//! 1. the project is looked up for the requesting owner (a foreign or missing
//!    project is reported as not found before anything touches the disk);
//! 2. its objects and their attributes are read in creation order and each
//!    object is emitted as one model file;
//! 3. the files are staged below `<owner>/projects/<project>/objects/`,
//!    stale files of deleted objects are pruned;
//! 4. the staged files are packed into one zip archive with entries at
//!    `<project name>/api/models/<Object>.js`.
//!
//! Every compile regenerates the whole project. Compiles of the same project
//! wait for each other; compiles of different projects run in parallel.

pub mod archive;
pub mod staging;

use crate::config::CompilerConfig;
use crate::export::{GeneratedFile, SailsModelExporter};
use crate::models::{Object, Project, ProjectId, UserId};
use crate::storage::{FileSystemStorageBackend, StorageBackend, StorageError};
use crate::store::{SchemaStore, StoreError};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use archive::{ArchiveEntry, build_archive, entry_name};
pub use staging::{StagingLayout, StagingLocks};

/// Error type for compiling a project
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The project does not exist or belongs to someone else
    #[error("Project id={0} does not exist")]
    ProjectNotFound(ProjectId),
    /// Stored data violates a schema invariant
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),
    #[error("Schema store error: {0}")]
    Store(StoreError),
    #[error("Staging error: {0}")]
    Storage(#[from] StorageError),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl From<StoreError> for CompileError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProjectNotFound(id) => CompileError::ProjectNotFound(id),
            err @ StoreError::CorruptRecord { .. } => {
                CompileError::InternalConsistency(err.to_string())
            }
            err => CompileError::Store(err),
        }
    }
}

/// One emitted model file
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedModel {
    pub object: Object,
    /// File name inside the staging area (`<Object>.js`)
    pub file_name: String,
    pub file: GeneratedFile,
}

/// Every model file of a project, in object creation order
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProject {
    pub project: Project,
    pub models: Vec<GeneratedModel>,
}

/// Result of a compile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledArchive {
    /// Suggested download name (`<project name>.zip`)
    pub file_name: String,
    /// Zip archive bytes
    pub bytes: Vec<u8>,
    /// Archive entry names, in archive order
    pub entries: Vec<String>,
}

/// Compiles stored projects into Sails.js model archives
pub struct ProjectCompiler<S, B> {
    store: Arc<S>,
    storage: B,
    config: CompilerConfig,
    locks: StagingLocks,
}

impl<S: SchemaStore> ProjectCompiler<S, FileSystemStorageBackend> {
    /// Compiler staging on the local file system at `config.staging_dir`
    pub fn on_filesystem(store: Arc<S>, config: CompilerConfig) -> Self {
        let storage = FileSystemStorageBackend::new(&config.staging_dir);
        Self::new(store, storage, config)
    }
}

impl<S: SchemaStore, B: StorageBackend> ProjectCompiler<S, B> {
    pub fn new(store: Arc<S>, storage: B, config: CompilerConfig) -> Self {
        Self {
            store,
            storage,
            config,
            locks: StagingLocks::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn storage(&self) -> &B {
        &self.storage
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Per-project locks held while a compile stages and archives
    pub fn locks(&self) -> &StagingLocks {
        &self.locks
    }

    /// Emit every model file of a project without touching the staging area
    pub async fn generate(
        &self,
        owner: UserId,
        project_id: ProjectId,
    ) -> Result<GeneratedProject, CompileError> {
        let project = self.store.get_project(owner, project_id).await?;

        let mut objects = self.store.list_objects(owner, project_id).await?;
        objects.sort_by_key(|object| object.id);

        let mut models = Vec::with_capacity(objects.len());
        for object in objects {
            let mut attributes = self.store.list_attributes(owner, object.id).await?;
            attributes.sort_by_key(|attribute| attribute.id);

            let file = SailsModelExporter::export_file(&object, &attributes);
            models.push(GeneratedModel {
                file_name: SailsModelExporter::file_name(&object),
                object,
                file,
            });
        }

        Ok(GeneratedProject { project, models })
    }

    /// Regenerate a project, stage its files and pack them into an archive
    pub async fn compile(
        &self,
        owner: UserId,
        project_id: ProjectId,
    ) -> Result<CompiledArchive, CompileError> {
        let generated = self.generate(owner, project_id).await?;
        let project = &generated.project;

        let _guard = self.locks.acquire(owner, project_id).await;
        info!(
            "Compiling project {} '{}' of owner {} ({} objects)",
            project_id,
            project.name,
            owner,
            generated.models.len()
        );

        let objects_dir = StagingLayout::objects_dir(owner, project_id);
        self.storage.create_dir(&objects_dir).await?;

        let mut staged = Vec::with_capacity(generated.models.len());
        for model in &generated.models {
            let path = StagingLayout::object_file(owner, project_id, &model.file_name);
            self.storage
                .write_file(&path, model.file.content.as_bytes())
                .await?;
            debug!("Staged {}", path);
            staged.push(path);
        }

        self.prune_stale(&objects_dir, &generated).await?;

        let mut entries = Vec::with_capacity(staged.len());
        for (model, path) in generated.models.iter().zip(&staged) {
            entries.push(ArchiveEntry {
                name: entry_name(&project.name, &model.file.path),
                content: self.storage.read_file(path).await?,
            });
        }

        let bytes = build_archive(&entries, self.config.compression)?;
        if self.config.persist_archive {
            let path = StagingLayout::archive_file(owner, project_id, &project.name);
            self.storage.write_file(&path, &bytes).await?;
        }

        info!(
            "Compiled project {} '{}': {} entries, {} bytes",
            project_id,
            project.name,
            entries.len(),
            bytes.len()
        );

        Ok(CompiledArchive {
            file_name: format!("{}.zip", project.name),
            bytes,
            entries: entries.into_iter().map(|entry| entry.name).collect(),
        })
    }

    /// Remove staged files whose object no longer exists
    async fn prune_stale(
        &self,
        objects_dir: &str,
        generated: &GeneratedProject,
    ) -> Result<(), CompileError> {
        let current: HashSet<&str> = generated
            .models
            .iter()
            .map(|model| model.file_name.as_str())
            .collect();

        for file_name in self.storage.list_files(objects_dir).await? {
            if current.contains(file_name.as_str()) {
                continue;
            }
            let path = format!("{}/{}", objects_dir, file_name);
            warn!("Removing stale staged file {}", path);
            match self.storage.delete_file(&path).await {
                // Lost a race with another cleanup of the same file
                Ok(()) | Err(StorageError::FileNotFound(_)) => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttributeType, NewAttribute, NewObject, NewProject};
    use crate::store::InMemorySchemaStore;
    use tempfile::TempDir;

    async fn fixture() -> (Arc<InMemorySchemaStore>, ProjectId) {
        let store = Arc::new(InMemorySchemaStore::new());
        let project = store.create_project(1, NewProject::new("Shop")).await.unwrap();
        store
            .create_object(
                1,
                project.id,
                NewObject::new("Item")
                    .with_attribute(NewAttribute::new("title", AttributeType::Text).required())
                    .with_attribute(NewAttribute::new("price", AttributeType::Decimal)),
            )
            .await
            .unwrap();
        store
            .create_object(1, project.id, NewObject::new("Cart"))
            .await
            .unwrap();
        (store, project.id)
    }

    #[tokio::test]
    async fn test_generate_in_creation_order() {
        let (store, project_id) = fixture().await;
        let temp = TempDir::new().unwrap();
        let compiler = ProjectCompiler::on_filesystem(
            store,
            CompilerConfig::default().with_staging_dir(temp.path()),
        );

        let generated = compiler.generate(1, project_id).await.unwrap();
        let names: Vec<&str> = generated
            .models
            .iter()
            .map(|model| model.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["Item.js", "Cart.js"]);
        assert!(
            generated.models[0]
                .file
                .content
                .contains("title: { type: 'string', required: true },")
        );
        // Generating alone stages nothing
        assert!(!temp.path().join("1").exists());
    }

    #[tokio::test]
    async fn test_compile_stages_and_persists() {
        let (store, project_id) = fixture().await;
        let temp = TempDir::new().unwrap();
        let compiler = ProjectCompiler::on_filesystem(
            store,
            CompilerConfig::default().with_staging_dir(temp.path()),
        );

        let archive = compiler.compile(1, project_id).await.unwrap();
        assert_eq!(archive.file_name, "Shop.zip");
        assert_eq!(
            archive.entries,
            vec!["Shop/api/models/Item.js", "Shop/api/models/Cart.js"]
        );

        let staged = temp.path().join(format!("1/projects/{}", project_id));
        assert!(staged.join("objects/Item.js").is_file());
        assert!(staged.join("objects/Cart.js").is_file());
        assert_eq!(std::fs::read(staged.join("Shop.zip")).unwrap(), archive.bytes);
        assert_eq!(compiler.locks().active(), 0);
    }

    #[tokio::test]
    async fn test_foreign_project_touches_nothing() {
        let (store, project_id) = fixture().await;
        let temp = TempDir::new().unwrap();
        let compiler = ProjectCompiler::on_filesystem(
            store,
            CompilerConfig::default().with_staging_dir(temp.path()),
        );

        let err = compiler.compile(2, project_id).await.unwrap_err();
        assert!(matches!(err, CompileError::ProjectNotFound(id) if id == project_id));
        assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_store_error_mapping() {
        let err: CompileError = StoreError::CorruptRecord {
            table: "attribute",
            id: 3,
            reason: "Unknown attribute type code: 9".to_string(),
        }
        .into();
        assert!(matches!(err, CompileError::InternalConsistency(_)));

        let err: CompileError = StoreError::ProjectNotFound(4).into();
        assert!(matches!(err, CompileError::ProjectNotFound(4)));

        let err: CompileError = StoreError::Backend("down".to_string()).into();
        assert!(matches!(err, CompileError::Store(_)));
    }
}
