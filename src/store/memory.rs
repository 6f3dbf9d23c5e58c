//! In-memory schema store
//!
//! Keeps one ordered row table per record kind. Rows mirror the persisted
//! shape of the schema: attribute types and project languages are stored as
//! their integer codes and decoded on the way out, so a row carrying an unknown
//! code surfaces as [`StoreError::CorruptRecord`] instead of being coerced.

use super::{NameConflict, SchemaStore, StoreError, action_identifier};
use crate::models::{
    Action, ActionId, Attribute, AttributeId, AttributeType, NewAction, NewObject, NewProject,
    Object, ObjectId, Project, ProjectId, TargetLanguage, UserId,
};
use crate::validation::{
    find_duplicate_attribute_names, validate_action_identifier, validate_attribute_name,
    validate_new_action, validate_new_object, validate_object_name, validate_project_name,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};

/// Persisted project row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRow {
    pub id: ProjectId,
    pub name: String,
    pub owner: UserId,
    #[serde(default = "default_language_code")]
    pub language: u8,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_language_code() -> u8 {
    TargetLanguage::SailsJs.code()
}

/// Persisted object row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRow {
    pub id: ObjectId,
    pub name: String,
    pub project_id: ProjectId,
    pub owner: UserId,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Persisted attribute row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRow {
    pub id: AttributeId,
    pub object_id: ObjectId,
    pub owner: UserId,
    pub name: String,
    /// Attribute type code, see [`AttributeType::code`]
    #[serde(rename = "type")]
    pub type_code: u8,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Persisted action row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRow {
    pub owner: UserId,
    #[serde(flatten)]
    pub action: Action,
}

/// Dump of every row in a store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub projects: Vec<ProjectRow>,
    #[serde(default)]
    pub objects: Vec<ObjectRow>,
    #[serde(default)]
    pub attributes: Vec<AttributeRow>,
    #[serde(default)]
    pub actions: Vec<ActionRow>,
}

#[derive(Debug, Default)]
struct Tables {
    projects: BTreeMap<ProjectId, ProjectRow>,
    objects: BTreeMap<ObjectId, ObjectRow>,
    attributes: BTreeMap<AttributeId, AttributeRow>,
    actions: BTreeMap<ActionId, ActionRow>,
}

impl Tables {
    fn next_id<V>(table: &BTreeMap<u64, V>) -> u64 {
        table.keys().next_back().map_or(1, |id| id + 1)
    }

    fn project(&self, owner: UserId, id: ProjectId) -> Result<&ProjectRow, StoreError> {
        self.projects
            .get(&id)
            .filter(|row| row.owner == owner)
            .ok_or(StoreError::ProjectNotFound(id))
    }

    fn object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        id: ObjectId,
    ) -> Result<&ObjectRow, StoreError> {
        self.project(owner, project_id)?;
        self.objects
            .get(&id)
            .filter(|row| row.owner == owner && row.project_id == project_id)
            .ok_or(StoreError::ObjectNotFound(id))
    }

    fn remove_object_children(&mut self, object_id: ObjectId) {
        self.attributes.retain(|_, row| row.object_id != object_id);
        self.actions.retain(|_, row| row.action.object_id != object_id);
    }
}

fn decode_project(row: &ProjectRow) -> Result<Project, StoreError> {
    let language = match row.language {
        code if code == TargetLanguage::SailsJs.code() => TargetLanguage::SailsJs,
        code => {
            return Err(StoreError::CorruptRecord {
                table: "project",
                id: row.id,
                reason: format!("Unknown language code: {}", code),
            });
        }
    };
    Ok(Project {
        id: row.id,
        name: row.name.clone(),
        owner: row.owner,
        language,
        created_at: row.created_at,
    })
}

fn decode_object(row: &ObjectRow) -> Object {
    Object {
        id: row.id,
        name: row.name.clone(),
        project_id: row.project_id,
        owner: row.owner,
        created_at: row.created_at,
    }
}

fn decode_attribute(row: &AttributeRow) -> Result<Attribute, StoreError> {
    let attribute_type =
        AttributeType::try_from(row.type_code).map_err(|e| StoreError::CorruptRecord {
            table: "attribute",
            id: row.id,
            reason: e.to_string(),
        })?;
    Ok(Attribute {
        id: row.id,
        object_id: row.object_id,
        name: row.name.clone(),
        attribute_type,
        required: row.required,
        description: row.description.clone(),
    })
}

fn insert_unique<V>(
    table: &mut BTreeMap<u64, V>,
    kind: &'static str,
    id: u64,
    row: V,
) -> Result<(), StoreError> {
    if table.contains_key(&id) {
        return Err(StoreError::CorruptRecord {
            table: kind,
            id,
            reason: "id is used by more than one row".to_string(),
        });
    }
    table.insert(id, row);
    Ok(())
}

/// Object names become model file names, which must not collide on
/// case-insensitive file systems.
fn same_object_name(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Schema store held entirely in memory
///
/// # Example
///
/// ```rust
/// use api_creator_sdk::models::NewProject;
/// use api_creator_sdk::store::{InMemorySchemaStore, SchemaStore};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = InMemorySchemaStore::new();
/// let project = store.create_project(1, NewProject::new("Pet Store")).await.unwrap();
/// assert_eq!(store.get_project(1, project.id).await.unwrap().name, "Pet Store");
/// assert!(store.get_project(2, project.id).await.is_err());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemorySchemaStore {
    tables: RwLock<Tables>,
}

impl InMemorySchemaStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a row dump
    ///
    /// Rows go through the same checks as writes through [`SchemaStore`]:
    /// names are validated, (name, parent) pairs are unique, children belong
    /// to an existing parent of the same owner and ids are not reused. Type
    /// codes are loaded as-is and only decoded on read.
    pub fn from_snapshot(snapshot: SchemaSnapshot) -> Result<Self, StoreError> {
        let mut tables = Tables::default();

        for row in snapshot.projects {
            validate_project_name(&row.name)?;
            if tables
                .projects
                .values()
                .any(|other| other.owner == row.owner && other.name == row.name)
            {
                return Err(StoreError::Duplicate(NameConflict::Project));
            }
            insert_unique(&mut tables.projects, "project", row.id, row)?;
        }
        for row in snapshot.objects {
            match tables.projects.get(&row.project_id) {
                Some(project) if project.owner == row.owner => {}
                _ => return Err(StoreError::ProjectNotFound(row.project_id)),
            }
            validate_object_name(&row.name)?;
            if tables.objects.values().any(|other| {
                other.project_id == row.project_id && same_object_name(&other.name, &row.name)
            }) {
                return Err(StoreError::Duplicate(NameConflict::Object));
            }
            insert_unique(&mut tables.objects, "object", row.id, row)?;
        }
        for row in snapshot.attributes {
            match tables.objects.get(&row.object_id) {
                Some(object) if object.owner == row.owner => {}
                _ => return Err(StoreError::ObjectNotFound(row.object_id)),
            }
            validate_attribute_name(&row.name)?;
            if tables
                .attributes
                .values()
                .any(|other| other.object_id == row.object_id && other.name == row.name)
            {
                return Err(StoreError::Duplicate(NameConflict::Attribute));
            }
            insert_unique(&mut tables.attributes, "attribute", row.id, row)?;
        }
        for row in snapshot.actions {
            match tables.objects.get(&row.action.object_id) {
                Some(object) if object.owner == row.owner => {}
                _ => return Err(StoreError::ObjectNotFound(row.action.object_id)),
            }
            validate_action_identifier(&row.action.identifier)?;
            if tables.actions.values().any(|other| {
                other.action.object_id == row.action.object_id
                    && other.action.identifier == row.action.identifier
            }) {
                return Err(StoreError::Duplicate(NameConflict::Action));
            }
            insert_unique(&mut tables.actions, "action", row.action.id, row)?;
        }

        info!(
            "Loaded schema snapshot: {} projects, {} objects, {} attributes, {} actions",
            tables.projects.len(),
            tables.objects.len(),
            tables.attributes.len(),
            tables.actions.len()
        );

        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Dump every row in id order
    pub fn snapshot(&self) -> Result<SchemaSnapshot, StoreError> {
        let tables = self.read()?;
        Ok(SchemaSnapshot {
            projects: tables.projects.values().cloned().collect(),
            objects: tables.objects.values().cloned().collect(),
            attributes: tables.attributes.values().cloned().collect(),
            actions: tables.actions.values().cloned().collect(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("schema store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("schema store lock poisoned".to_string()))
    }
}

#[async_trait]
impl SchemaStore for InMemorySchemaStore {
    async fn create_project(
        &self,
        owner: UserId,
        project: NewProject,
    ) -> Result<Project, StoreError> {
        validate_project_name(&project.name)?;

        let mut tables = self.write()?;
        if tables
            .projects
            .values()
            .any(|row| row.owner == owner && row.name == project.name)
        {
            return Err(StoreError::Duplicate(NameConflict::Project));
        }

        let row = ProjectRow {
            id: Tables::next_id(&tables.projects),
            name: project.name,
            owner,
            language: project.language.code(),
            created_at: Utc::now(),
        };
        debug!("Created project {} '{}' for owner {}", row.id, row.name, owner);
        let decoded = decode_project(&row)?;
        tables.projects.insert(row.id, row);
        Ok(decoded)
    }

    async fn get_project(&self, owner: UserId, id: ProjectId) -> Result<Project, StoreError> {
        let tables = self.read()?;
        decode_project(tables.project(owner, id)?)
    }

    async fn list_projects(&self, owner: UserId) -> Result<Vec<Project>, StoreError> {
        let tables = self.read()?;
        tables
            .projects
            .values()
            .filter(|row| row.owner == owner)
            .map(decode_project)
            .collect()
    }

    async fn rename_project(
        &self,
        owner: UserId,
        id: ProjectId,
        name: &str,
    ) -> Result<Project, StoreError> {
        validate_project_name(name)?;

        let mut tables = self.write()?;
        tables.project(owner, id)?;
        if tables
            .projects
            .values()
            .any(|row| row.owner == owner && row.id != id && row.name == name)
        {
            return Err(StoreError::Duplicate(NameConflict::Project));
        }

        let row = tables
            .projects
            .get_mut(&id)
            .ok_or(StoreError::ProjectNotFound(id))?;
        row.name = name.to_string();
        decode_project(row)
    }

    async fn delete_project(&self, owner: UserId, id: ProjectId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.project(owner, id)?;

        let object_ids: Vec<ObjectId> = tables
            .objects
            .values()
            .filter(|row| row.project_id == id)
            .map(|row| row.id)
            .collect();
        for object_id in &object_ids {
            tables.remove_object_children(*object_id);
            tables.objects.remove(object_id);
        }
        tables.projects.remove(&id);

        info!(
            "Deleted project {} of owner {} ({} objects)",
            id,
            owner,
            object_ids.len()
        );
        Ok(())
    }

    async fn create_object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        object: NewObject,
    ) -> Result<Object, StoreError> {
        validate_new_object(&object)?;

        let mut tables = self.write()?;
        tables.project(owner, project_id)?;

        if tables.objects.values().any(|row| {
            row.project_id == project_id && same_object_name(&row.name, &object.name)
        }) {
            return Err(StoreError::Duplicate(NameConflict::Object));
        }
        if !find_duplicate_attribute_names(&object.attributes).is_empty() {
            return Err(StoreError::Duplicate(NameConflict::Attribute));
        }

        // Every check has passed; the inserts below cannot fail part way.
        let row = ObjectRow {
            id: Tables::next_id(&tables.objects),
            name: object.name,
            project_id,
            owner,
            created_at: Utc::now(),
        };
        let object_id = row.id;
        let decoded = decode_object(&row);
        tables.objects.insert(object_id, row);

        for attribute in object.attributes {
            let id = Tables::next_id(&tables.attributes);
            tables.attributes.insert(
                id,
                AttributeRow {
                    id,
                    object_id,
                    owner,
                    name: attribute.name,
                    type_code: attribute.attribute_type.code(),
                    required: attribute.required,
                    description: attribute.description,
                },
            );
        }

        debug!(
            "Created object {} '{}' in project {}",
            object_id, decoded.name, project_id
        );
        Ok(decoded)
    }

    async fn get_object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        id: ObjectId,
    ) -> Result<Object, StoreError> {
        let tables = self.read()?;
        Ok(decode_object(tables.object(owner, project_id, id)?))
    }

    async fn list_objects(
        &self,
        owner: UserId,
        project_id: ProjectId,
    ) -> Result<Vec<Object>, StoreError> {
        let tables = self.read()?;
        tables.project(owner, project_id)?;
        Ok(tables
            .objects
            .values()
            .filter(|row| row.owner == owner && row.project_id == project_id)
            .map(decode_object)
            .collect())
    }

    async fn delete_object(
        &self,
        owner: UserId,
        project_id: ProjectId,
        id: ObjectId,
    ) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        tables.object(owner, project_id, id)?;
        tables.remove_object_children(id);
        tables.objects.remove(&id);
        Ok(())
    }

    async fn list_attributes(
        &self,
        owner: UserId,
        object_id: ObjectId,
    ) -> Result<Vec<Attribute>, StoreError> {
        let tables = self.read()?;
        let object = tables
            .objects
            .get(&object_id)
            .filter(|row| row.owner == owner)
            .ok_or(StoreError::ObjectNotFound(object_id))?;
        tables
            .attributes
            .values()
            .filter(|row| row.object_id == object.id)
            .map(decode_attribute)
            .collect()
    }

    async fn create_action(
        &self,
        owner: UserId,
        project_id: ProjectId,
        object_id: ObjectId,
        action: NewAction,
    ) -> Result<Action, StoreError> {
        let identifier = action_identifier(&action);
        validate_new_action(&action, &identifier)?;

        let mut tables = self.write()?;
        tables.object(owner, project_id, object_id)?;
        if tables
            .actions
            .values()
            .any(|row| row.action.object_id == object_id && row.action.identifier == identifier)
        {
            return Err(StoreError::Duplicate(NameConflict::Action));
        }

        let created = Action {
            id: Tables::next_id(&tables.actions),
            object_id,
            friendly_name: action.friendly_name,
            identifier,
            method: action.method,
            route: action.route,
            description: action.description,
            return_values: action.return_values,
        };
        tables.actions.insert(
            created.id,
            ActionRow {
                owner,
                action: created.clone(),
            },
        );
        Ok(created)
    }

    async fn list_actions(
        &self,
        owner: UserId,
        project_id: ProjectId,
        object_id: ObjectId,
    ) -> Result<Vec<Action>, StoreError> {
        let tables = self.read()?;
        tables.object(owner, project_id, object_id)?;
        Ok(tables
            .actions
            .values()
            .filter(|row| row.action.object_id == object_id)
            .map(|row| row.action.clone())
            .collect())
    }
}
