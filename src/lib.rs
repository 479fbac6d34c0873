// tasklist - Single-user task list persisted to a local key-value slot

pub mod config;
pub mod display;
pub mod error;
pub mod filter;
pub mod models;
pub mod slot;
pub mod sqlite;
pub mod store;

// Re-export main types for convenience
pub use config::{Backend, Config, StorageConfig};
pub use error::TaskError;
pub use filter::{StatusFilter, filtered_view};
pub use models::{Task, TaskDraft, TaskStatus, now_iso, now_ms, parse_deadline};
pub use slot::{FileSlots, KeyValueStore, MemorySlots};
pub use sqlite::SqliteSlots;
pub use store::{Applied, DEFAULT_KEY, TaskStore, decode_tasks, encode_tasks};
