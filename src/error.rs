// Rejected task operations

use thiserror::Error;

/// Why an operation left the task list unchanged
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// Title is empty or whitespace-only
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// No task with the given ID
    #[error("task not found: {0}")]
    NotFound(String),
}
