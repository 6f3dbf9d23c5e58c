//! Staging area layout and per-project compile locks
//!
//! Generated files are staged below the storage root as
//!
//! ```text
//! <owner>/projects/<project>/objects/<Object>.js
//! <owner>/projects/<project>/<Project name>.zip
//! ```
//!
//! so compiles of different users, or of different projects of one user, never
//! touch the same files. Compiles of the same (owner, project) pair are
//! serialized through [`StagingLocks`].

use crate::models::{ProjectId, UserId};
use crate::storage::join_path;
use crate::validation::sanitize_filename;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Path layout of the staging area
pub struct StagingLayout;

impl StagingLayout {
    /// Directory holding everything staged for one project
    pub fn project_dir(owner: UserId, project_id: ProjectId) -> String {
        join_path(&[&owner.to_string(), "projects", &project_id.to_string()])
    }

    /// Directory holding the staged model files of one project
    pub fn objects_dir(owner: UserId, project_id: ProjectId) -> String {
        join_path(&[&Self::project_dir(owner, project_id), "objects"])
    }

    /// Staged path of one model file
    pub fn object_file(owner: UserId, project_id: ProjectId, file_name: &str) -> String {
        join_path(&[&Self::objects_dir(owner, project_id), file_name])
    }

    /// Staged path of a project's archive
    pub fn archive_file(owner: UserId, project_id: ProjectId, project_name: &str) -> String {
        join_path(&[
            &Self::project_dir(owner, project_id),
            &format!("{}.zip", sanitize_filename(project_name)),
        ])
    }
}

/// One async mutex per (owner, project) pair
#[derive(Debug, Default)]
pub struct StagingLocks {
    locks: Mutex<HashMap<(UserId, ProjectId), Arc<AsyncMutex<()>>>>,
}

impl StagingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of a project's staging directory
    pub async fn acquire(&self, owner: UserId, project_id: ProjectId) -> OwnedMutexGuard<()> {
        let lock = {
            // The map is only touched in this block, so a poisoned lock still
            // holds a consistent map.
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Entries referenced only by the map are idle
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry((owner, project_id)).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of (owner, project) pairs with a compile in flight or waiting
    pub fn active(&self) -> usize {
        let locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .values()
            .filter(|lock| Arc::strong_count(lock) > 1)
            .count()
    }
}
