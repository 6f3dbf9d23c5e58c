//! Object and attribute models

use super::enums::AttributeType;
use super::{AttributeId, ObjectId, ProjectId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-defined entity within a project (akin to a database table)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Object {
    pub id: ObjectId,
    /// Object name (unique within its project)
    pub name: String,
    pub project_id: ProjectId,
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
}

/// A named, typed field on an object
///
/// # Example
///
/// ```rust
/// use api_creator_sdk::models::{Attribute, AttributeType};
///
/// let attr = Attribute::new(1, 1, "email", AttributeType::Text).required();
/// assert!(attr.required);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attribute {
    pub id: AttributeId,
    pub object_id: ObjectId,
    /// Attribute name (unique within its object)
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Attribute {
    pub fn new(
        id: AttributeId,
        object_id: ObjectId,
        name: impl Into<String>,
        attribute_type: AttributeType,
    ) -> Self {
        Self {
            id,
            object_id,
            name: name.into(),
            attribute_type,
            required: false,
            description: None,
        }
    }

    /// Mark the attribute as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Fields supplied when creating an object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewObject {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<NewAttribute>,
}

impl NewObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: NewAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

/// Fields supplied when creating an attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewAttribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            required: false,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}
