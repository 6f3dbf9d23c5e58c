//! Action model
//!
//! Actions describe user-defined API operations on an object. They are stored
//! with the schema but not consumed by the model generator.

use super::enums::HttpMethod;
use super::{ActionId, ObjectId};
use serde::{Deserialize, Serialize};

/// Sort direction for query-backed return values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Pagination, sort and filter parameters of a return value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub sort_direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

/// How part of an action's response is computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ReturnValue {
    /// A static literal
    Literal { value: serde_json::Value },
    /// The result of a database query
    Query {
        query: String,
        #[serde(default)]
        options: ResultOptions,
    },
    /// Echo of an attribute of the action's object
    Attribute {
        attribute: String,
        #[serde(default)]
        options: ResultOptions,
    },
}

/// A user-defined API operation on an object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub id: ActionId,
    pub object_id: ObjectId,
    pub friendly_name: String,
    /// URL-safe identifier, unique within the object
    pub identifier: String,
    pub method: HttpMethod,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub return_values: Vec<ReturnValue>,
}

/// Fields supplied when creating an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAction {
    #[serde(rename = "name")]
    pub friendly_name: String,
    /// Derived from the friendly name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub method: HttpMethod,
    pub route: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub return_values: Vec<ReturnValue>,
}
