//! Project model

use super::enums::TargetLanguage;
use super::{ProjectId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named collection of objects owned by one user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    /// Project name (unique per owner)
    pub name: String,
    pub owner: UserId,
    #[serde(default)]
    pub language: TargetLanguage,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub language: TargetLanguage,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: TargetLanguage::default(),
        }
    }
}
