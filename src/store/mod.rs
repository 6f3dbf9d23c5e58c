//! Schema store abstraction
//!
//! Defines the SchemaStore trait through which projects, objects, attributes
//! and actions are persisted, and an in-memory implementation:
//! - InMemorySchemaStore: row tables behind a lock (tests, CLI snapshots)
//!
//! # Ordering
//!
//! Every `list_*` method returns records in ascending id order, which is the
//! order they were created in. The generator relies on this to emit
//! byte-identical output for unchanged data.
//!
//! # Ownership
//!
//! Every lookup is scoped to the requesting owner. A record that exists but
//! belongs to another user is reported exactly like a missing one.

use crate::models::{
    Action, Attribute, NewAction, NewObject, NewProject, Object, ObjectId, Project,
    ProjectId, UserId,
};
use crate::validation::ValidationError;
use async_trait::async_trait;

pub mod memory;

pub use memory::{InMemorySchemaStore, SchemaSnapshot};

/// Which uniqueness rule a write violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameConflict {
    Project,
    Object,
    Attribute,
    Action,
}

impl NameConflict {
    /// User-facing description of the conflict
    pub fn message(self) -> &'static str {
        match self {
            NameConflict::Project => "Project with this name already exists",
            NameConflict::Object => "Object with this name already exists for this project",
            NameConflict::Attribute => "Duplicate attribute names for this object",
            NameConflict::Action => "Action with this name already exists for this object",
        }
    }
}

/// Error type for schema store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project id={0} does not exist")]
    ProjectNotFound(ProjectId),
    #[error("Object id={0} does not exist")]
    ObjectNotFound(ObjectId),
    #[error("{}", .0.message())]
    Duplicate(NameConflict),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A stored row violates a schema invariant (e.g. unknown type tag)
    #[error("Corrupt {table} record id={id}: {reason}")]
    CorruptRecord {
        table: &'static str,
        id: u64,
        reason: String,
    },
    #[error("Schema store error: {0}")]
    Backend(String),
}

/// Trait for schema stores
///
/// Implementations enforce uniqueness of (name, parent) pairs, referential
/// integrity and cascading deletes along ownership.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Create a project owned by `owner`
    async fn create_project(&self, owner: UserId, project: NewProject)
    -> Result<Project, StoreError>;

    /// Get a project owned by `owner`
    async fn get_project(&self, owner: UserId, id: ProjectId) -> Result<Project, StoreError>;

    /// List all projects owned by `owner`
    async fn list_projects(&self, owner: UserId) -> Result<Vec<Project>, StoreError>;

    /// Rename a project (the only mutable project field)
    async fn rename_project(
        &self,
        owner: UserId,
        id: ProjectId,
        name: &str,
    ) -> Result<Project, StoreError>;

    /// Delete a project with its objects, attributes and actions
    async fn delete_project(&self, owner: UserId, id: ProjectId) -> Result<(), StoreError>;

    /// Create an object together with its attributes, all or nothing
    async fn create_object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        object: NewObject,
    ) -> Result<Object, StoreError>;

    /// Get an object of a project owned by `owner`
    async fn get_object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        id: ObjectId,
    ) -> Result<Object, StoreError>;

    /// List the objects of a project in creation order
    async fn list_objects(
        &self,
        owner: UserId,
        project_id: ProjectId,
    ) -> Result<Vec<Object>, StoreError>;

    /// Delete an object with its attributes and actions
    async fn delete_object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        id: ObjectId,
    ) -> Result<(), StoreError>;

    /// List the attributes of an object in creation order
    async fn list_attributes(
        &self,
        owner: UserId,
        object_id: ObjectId,
    ) -> Result<Vec<Attribute>, StoreError>;

    /// Create an action on an object
    async fn create_action(
        &self,
        owner: UserId,
        project_id: ProjectId,
        object_id: ObjectId,
        action: NewAction,
    ) -> Result<Action, StoreError>;

    /// List the actions of an object in creation order
    async fn list_actions(
        &self,
        owner: UserId,
        project_id: ProjectId,
        object_id: ObjectId,
    ) -> Result<Vec<Action>, StoreError>;
}

/// Resolve the identifier of a new action, deriving it from the friendly name
/// when the caller did not supply one.
pub fn action_identifier(action: &NewAction) -> String {
    use convert_case::{Case, Casing};

    match &action.identifier {
        Some(identifier) => identifier.clone(),
        None => action.friendly_name.trim().to_case(Case::Kebab),
    }
}
