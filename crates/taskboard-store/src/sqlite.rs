use std::path::Path;

use chrono::Utc;
use rusqlite::types::ToSql;
use rusqlite::Connection;
use tracing::instrument;

use taskboard_core::{NewTask, Task, TaskPatch, TaskStatus};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers;
use crate::store::TaskStore;

const TASK_COLUMNS: &str = "id, title, description, status, priority, created_at, updated_at";

/// SQLite-backed task store. Every statement binds parameters natively;
/// values are never spliced into SQL text.
pub struct SqliteTaskStore {
    db: Database,
}

impl SqliteTaskStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open or create the database file and its schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(Database::open(path)?))
    }
}

impl TaskStore for SqliteTaskStore {
    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {TASK_COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC"
            ))?;
            let mut rows = stmt.query([])?;
            let mut tasks = Vec::new();
            while let Some(row) = rows.next()? {
                tasks.push(row_to_task(row)?);
            }
            Ok(tasks)
        })
    }

    #[instrument(skip(self))]
    fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        self.db.with_conn(|conn| select_task(conn, id))
    }

    #[instrument(skip(self, new), fields(title = %new.title))]
    fn insert(&self, new: NewTask) -> Result<Task, StoreError> {
        let now = Utc::now().to_rfc3339();
        let priority = new.priority.unwrap_or_default();

        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, description, status, priority, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    new.title,
                    new.description,
                    TaskStatus::Pending.to_string(),
                    priority.to_string(),
                    now,
                    now,
                ],
            )?;

            Ok(Task {
                id: conn.last_insert_rowid(),
                title: new.title.clone(),
                description: new.description.clone(),
                status: TaskStatus::Pending,
                priority,
                created_at: now.clone(),
                updated_at: now.clone(),
            })
        })
    }

    #[instrument(skip(self, patch))]
    fn update(&self, id: i64, patch: TaskPatch) -> Result<Option<Task>, StoreError> {
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            let mut sets: Vec<String> = Vec::new();
            let mut params: Vec<Box<dyn ToSql>> = Vec::new();

            if let Some(title) = patch.title {
                sets.push(format!("title = ?{}", params.len() + 1));
                params.push(Box::new(title));
            }
            if let Some(description) = patch.description {
                sets.push(format!("description = ?{}", params.len() + 1));
                params.push(Box::new(description));
            }
            if let Some(status) = patch.status {
                sets.push(format!("status = ?{}", params.len() + 1));
                params.push(Box::new(status.to_string()));
            }
            if let Some(priority) = patch.priority {
                sets.push(format!("priority = ?{}", params.len() + 1));
                params.push(Box::new(priority.to_string()));
            }

            sets.push(format!("updated_at = ?{}", params.len() + 1));
            params.push(Box::new(now));

            let sql = format!(
                "UPDATE tasks SET {} WHERE id = ?{}",
                sets.join(", "),
                params.len() + 1
            );
            params.push(Box::new(id));

            let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
            let affected = conn.execute(&sql, param_refs.as_slice())?;
            if affected == 0 {
                return Ok(None);
            }

            select_task(conn, id)
        })
    }

    #[instrument(skip(self))]
    fn delete(&self, id: i64) -> Result<Option<Task>, StoreError> {
        self.db.with_conn(|conn| {
            let Some(task) = select_task(conn, id)? else {
                return Ok(None);
            };
            conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
            Ok(Some(task))
        })
    }
}

fn select_task(conn: &Connection, id: i64) -> Result<Option<Task>, StoreError> {
    let mut stmt = conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"))?;
    let mut rows = stmt.query([id])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_task(row)?)),
        None => Ok(None),
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> Result<Task, StoreError> {
    let status: String = row_helpers::get(row, 3, "tasks", "status")?;
    let priority: String = row_helpers::get(row, 4, "tasks", "priority")?;

    Ok(Task {
        id: row_helpers::get(row, 0, "tasks", "id")?,
        title: row_helpers::get(row, 1, "tasks", "title")?,
        description: row_helpers::get_opt(row, 2, "tasks", "description")?,
        status: row_helpers::parse_enum(&status, "tasks", "status")?,
        priority: row_helpers::parse_enum(&priority, "tasks", "priority")?,
        created_at: row_helpers::get(row, 5, "tasks", "created_at")?,
        updated_at: row_helpers::get(row, 6, "tasks", "updated_at")?,
    })
}
