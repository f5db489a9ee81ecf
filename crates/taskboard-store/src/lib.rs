pub mod database;
pub mod error;
pub mod memory;
pub mod row_helpers;
pub mod schema;
pub mod sqlite;
pub mod store;

pub use database::Database;
pub use error::StoreError;
pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;
pub use store::{open_store, TaskStore};
