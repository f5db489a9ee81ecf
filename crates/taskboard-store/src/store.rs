use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use taskboard_core::{NewTask, Task, TaskPatch};

use crate::error::StoreError;
use crate::memory::MemoryTaskStore;
use crate::sqlite::SqliteTaskStore;

/// Row-store contract shared by both backends. Handlers hold this behind an
/// `Arc<dyn TaskStore>` and never learn which implementation they got.
///
/// Absent rows are `Ok(None)`, not errors: the route layer decides what a
/// miss means.
pub trait TaskStore: Send + Sync {
    /// All tasks, newest first.
    fn list(&self) -> Result<Vec<Task>, StoreError>;

    /// A single task, or `None` when the id is unknown.
    fn get(&self, id: i64) -> Result<Option<Task>, StoreError>;

    /// Create a task: next sequential id, status pending, both timestamps
    /// set to the same instant.
    fn insert(&self, new: NewTask) -> Result<Task, StoreError>;

    /// Apply a partial update and refresh `updated_at`. `None` when the id
    /// is unknown.
    fn update(&self, id: i64, patch: TaskPatch) -> Result<Option<Task>, StoreError>;

    /// Remove and return the task, or `None` when the id is unknown.
    fn delete(&self, id: i64) -> Result<Option<Task>, StoreError>;
}

/// Select the backend at process startup: a SQLite database when
/// `database_url` is set, the in-memory fallback otherwise. There is no
/// runtime switching.
pub fn open_store(database_url: Option<&str>) -> Result<Arc<dyn TaskStore>, StoreError> {
    match database_url {
        Some(url) => {
            let path = url.strip_prefix("sqlite://").unwrap_or(url);
            let store = SqliteTaskStore::open(Path::new(path))?;
            info!(path, "using SQLite task store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL is not set; using in-memory task store");
            Ok(Arc::new(MemoryTaskStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_memory_without_url() {
        let store = open_store(None).unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn opens_sqlite_with_url() {
        let dir = std::env::temp_dir().join(format!(
            "taskboard-open-store-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        let path = dir.join("tasks.db");
        let url = format!("sqlite://{}", path.display());

        let store = open_store(Some(&url)).unwrap();
        let task = store
            .insert(NewTask {
                title: "persisted".into(),
                description: None,
                priority: None,
            })
            .unwrap();
        assert_eq!(task.id, 1);
        assert!(path.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
