// Task store: the authoritative in-memory list mirrored to a key-value slot

use crate::error::TaskError;
use crate::filter::{StatusFilter, filtered_view};
use crate::models::{Task, TaskDraft, TaskStatus, now_iso};
use crate::slot::KeyValueStore;
use eyre::{Context, Result};
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Default slot key for the task list
pub const DEFAULT_KEY: &str = "todos";

/// A mutation that has been applied to the in-memory list
///
/// The change stands even when writing it to the slot failed; `flush_error`
/// carries that failure so the caller can warn the user.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub flush_error: Option<eyre::Report>,
}

impl<T> Applied<T> {
    pub fn is_flushed(&self) -> bool {
        self.flush_error.is_none()
    }
}

/// Ordered task list, newest first, with filter and editing selections
pub struct TaskStore {
    slots: Box<dyn KeyValueStore>,
    key: String,
    tasks: Vec<Task>,
    filter: StatusFilter,
    editing: Option<String>,
}

impl TaskStore {
    /// Load the list stored under `key`
    ///
    /// Never fails: a missing, unreadable or unparseable slot yields an empty list.
    pub fn open(slots: Box<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();

        let tasks = match slots.get(&key) {
            Ok(Some(content)) => decode_tasks(&content),
            Ok(None) => {
                info!(key = %key, "No saved task list, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %key, error = ?e, "Failed to read saved task list, starting empty");
                Vec::new()
            }
        };

        info!(key = %key, count = tasks.len(), "Opened task store");

        Self {
            slots,
            key,
            tasks,
            filter: StatusFilter::default(),
            editing: None,
        }
    }

    /// The full list, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Prepend a new pending task built from `draft`, returning its ID
    pub fn add(&mut self, draft: TaskDraft) -> Result<Applied<String>, TaskError> {
        if !draft.has_title() {
            debug!("add: rejected empty title");
            return Err(TaskError::EmptyTitle);
        }

        let id = self.fresh_id();
        let task = Task::from_draft(id.clone(), draft, now_iso());
        self.tasks.insert(0, task);

        debug!(id = %id, count = self.tasks.len(), "add: task created");
        Ok(self.commit(id))
    }

    /// Replace the title, description and deadline of task `id` in place
    pub fn edit(&mut self, id: &str, draft: TaskDraft) -> Result<Applied<()>, TaskError> {
        if !draft.has_title() {
            debug!(id, "edit: rejected empty title");
            return Err(TaskError::EmptyTitle);
        }

        let task = self.find_mut(id)?;
        task.apply_draft(draft);
        self.editing = None;

        debug!(id, "edit: task updated");
        Ok(self.commit(()))
    }

    /// Flip task `id` between pending and completed, returning the new status
    pub fn toggle_status(&mut self, id: &str) -> Result<Applied<TaskStatus>, TaskError> {
        let task = self.find_mut(id)?;
        task.status = task.status.toggled();
        let status = task.status;

        debug!(id, %status, "toggle_status: status changed");
        Ok(self.commit(status))
    }

    /// Remove task `id`, returning the removed task
    pub fn delete(&mut self, id: &str) -> Result<Applied<Task>, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;

        let removed = self.tasks.remove(index);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }

        debug!(id, count = self.tasks.len(), "delete: task removed");
        Ok(self.commit(removed))
    }

    // ========================================================================
    // Editing selection
    // ========================================================================

    /// Select task `id` for editing and return a draft prefilled from it
    pub fn start_editing(&mut self, id: &str) -> Result<TaskDraft, TaskError> {
        let task = self.get(id).ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let draft = TaskDraft::from(task);
        self.editing = Some(id.to_string());
        Ok(draft)
    }

    /// ID of the task currently selected for editing
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn cancel_editing(&mut self) {
        self.editing = None;
    }

    /// Save `draft` into the task being edited, or add it as a new task
    pub fn submit(&mut self, draft: TaskDraft) -> Result<Applied<String>, TaskError> {
        match self.editing.clone() {
            Some(id) => {
                let applied = self.edit(&id, draft)?;
                Ok(Applied {
                    value: id,
                    flush_error: applied.flush_error,
                })
            }
            None => self.add(draft),
        }
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Tasks matching the current filter, in list order
    pub fn visible(&self) -> Vec<&Task> {
        filtered_view(&self.tasks, self.filter)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Write the full list to the slot
    pub fn flush(&mut self) -> Result<()> {
        let content = encode_tasks(&self.tasks)?;
        self.slots
            .set(&self.key, &content)
            .wrap_err_with(|| format!("Failed to save task list to slot {}", self.key))?;
        debug!(key = %self.key, count = self.tasks.len(), "Flushed task list");
        Ok(())
    }

    fn commit<T>(&mut self, value: T) -> Applied<T> {
        let flush_error = match self.flush() {
            Ok(()) => None,
            Err(e) => {
                warn!(key = %self.key, error = ?e, "Task list changed in memory but was not saved");
                Some(e)
            }
        };
        Applied { value, flush_error }
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Serialize the list for its slot
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize task list")
}

/// Parse a slot value into a task list
///
/// Unparseable content yields an empty list. Entries of a JSON array that do
/// not decode as tasks or have a blank title are skipped, as are repeated IDs
/// after their first occurrence.
pub fn decode_tasks(content: &str) -> Vec<Task> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let entries: Vec<serde_json::Value> = match serde_json::from_str(content) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = ?e, "Saved task list is not a JSON array, starting empty");
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        let task: Task = match serde_json::from_value(entry) {
            Ok(t) => t,
            Err(e) => {
                warn!(index, error = ?e, "Failed to parse saved task, skipping");
                continue;
            }
        };

        if task.title.trim().is_empty() {
            warn!(index, id = %task.id, "Saved task has an empty title, skipping");
            continue;
        }

        if !seen.insert(task.id.clone()) {
            warn!(index, id = %task.id, "Duplicate task ID in saved list, skipping");
            continue;
        }

        tasks.push(task);
    }

    tasks
}
