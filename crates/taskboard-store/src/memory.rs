use chrono::Utc;
use parking_lot::Mutex;
use tracing::instrument;

use taskboard_core::{NewTask, Task, TaskPatch, TaskStatus};

use crate::error::StoreError;
use crate::store::TaskStore;

/// In-process fallback store, used when no database is configured. Contents
/// live and die with the process. The task list and id counter are owned by
/// the store instance; nothing here is module-level state.
pub struct MemoryTaskStore {
    inner: Mutex<Inner>,
}

struct Inner {
    tasks: Vec<Task>,
    next_id: i64,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for MemoryTaskStore {
    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<Task>, StoreError> {
        let inner = self.inner.lock();
        let mut tasks = inner.tasks.clone();
        // Stable sort: insertion keeps newest at the front, so equal
        // timestamps still come out newest-id-first.
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    #[instrument(skip(self))]
    fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner.tasks.iter().find(|t| t.id == id).cloned())
    }

    #[instrument(skip(self, new), fields(title = %new.title))]
    fn insert(&self, new: NewTask) -> Result<Task, StoreError> {
        let now = Utc::now().to_rfc3339();
        let mut inner = self.inner.lock();

        let task = Task {
            id: inner.next_id,
            title: new.title,
            description: new.description,
            status: TaskStatus::Pending,
            priority: new.priority.unwrap_or_default(),
            created_at: now.clone(),
            updated_at: now,
        };
        inner.next_id += 1;
        inner.tasks.insert(0, task.clone());

        Ok(task)
    }

    #[instrument(skip(self, patch))]
    fn update(&self, id: i64, patch: TaskPatch) -> Result<Option<Task>, StoreError> {
        let now = Utc::now().to_rfc3339();
        let mut inner = self.inner.lock();

        let Some(task) = inner.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        task.updated_at = now;

        Ok(Some(task.clone()))
    }

    #[instrument(skip(self))]
    fn delete(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.lock();
        match inner.tasks.iter().position(|t| t.id == id) {
            Some(idx) => Ok(Some(inner.tasks.remove(idx))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_core::TaskPriority;

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: None,
            priority: None,
        }
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = MemoryTaskStore::new();
        let a = store.insert(new_task("A")).unwrap();
        let b = store.insert(new_task("B")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn insert_forces_pending_and_defaults_priority() {
        let store = MemoryTaskStore::new();
        let task = store.insert(new_task("A")).unwrap();
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn list_is_newest_first() {
        let store = MemoryTaskStore::new();
        store.insert(new_task("A")).unwrap();
        store.insert(new_task("B")).unwrap();

        let titles: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn list_returns_defensive_copies() {
        let store = MemoryTaskStore::new();
        store.insert(new_task("A")).unwrap();

        let mut listed = store.list().unwrap();
        listed[0].title = "mutated".into();

        assert_eq!(store.get(1).unwrap().unwrap().title, "A");
    }

    #[test]
    fn update_patches_subset_and_advances_updated_at() {
        let store = MemoryTaskStore::new();
        let task = store.insert(new_task("A")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));

        let updated = store
            .update(
                task.id,
                TaskPatch {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, "A");
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at > task.updated_at);
    }

    #[test]
    fn update_nonexistent_is_none() {
        let store = MemoryTaskStore::new();
        let result = store.update(42, TaskPatch::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn delete_then_get_is_none() {
        let store = MemoryTaskStore::new();
        let task = store.insert(new_task("A")).unwrap();

        let deleted = store.delete(task.id).unwrap().unwrap();
        assert_eq!(deleted.title, "A");
        assert!(store.get(task.id).unwrap().is_none());
    }

    #[test]
    fn delete_nonexistent_is_none() {
        let store = MemoryTaskStore::new();
        assert!(store.delete(42).unwrap().is_none());
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let store = MemoryTaskStore::new();
        let a = store.insert(new_task("A")).unwrap();
        store.delete(a.id).unwrap();
        let b = store.insert(new_task("B")).unwrap();
        assert_eq!(b.id, 2);
    }
}
