// Status filtering over the task list

use crate::models::{Task, TaskStatus};
use std::str::FromStr;

/// View selector applied read-only over the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Pending, StatusFilter::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => task.status == TaskStatus::Pending,
            StatusFilter::Completed => task.status == TaskStatus::Completed,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatusFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| format!("unknown filter: {} (expected all, pending or completed)", s))
    }
}

/// Tasks matching `filter`, in their original order
pub fn filtered_view(tasks: &[Task], filter: StatusFilter) -> Vec<&Task> {
    tasks.iter().filter(|task| filter.matches(task)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: format!("Task {}", id),
            description: String::new(),
            deadline: String::new(),
            status,
            created_at: "2026-10-19T08:30:00.000Z".to_string(),
        }
    }

    fn ids(view: &[&Task]) -> Vec<String> {
        view.iter().map(|t| t.id.clone()).collect()
    }

    fn mixed() -> Vec<Task> {
        vec![
            task("a", TaskStatus::Pending),
            task("b", TaskStatus::Completed),
            task("c", TaskStatus::Pending),
            task("d", TaskStatus::Completed),
        ]
    }

    #[test]
    fn test_all_passes_everything_in_order() {
        let tasks = mixed();
        let view = filtered_view(&tasks, StatusFilter::All);
        assert_eq!(ids(&view), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_pending_and_completed_preserve_order() {
        let tasks = mixed();
        assert_eq!(ids(&filtered_view(&tasks, StatusFilter::Pending)), vec!["a", "c"]);
        assert_eq!(ids(&filtered_view(&tasks, StatusFilter::Completed)), vec!["b", "d"]);
    }

    #[test]
    fn test_filtered_view_is_repeatable() {
        let tasks = mixed();
        let first = ids(&filtered_view(&tasks, StatusFilter::Pending));
        let second = ids(&filtered_view(&tasks, StatusFilter::Pending));
        assert_eq!(first, second);
        assert_eq!(tasks.len(), 4);
    }

    #[test]
    fn test_empty_list() {
        assert!(filtered_view(&[], StatusFilter::Completed).is_empty());
    }

    #[test]
    fn test_filter_parse_and_display() {
        for filter in StatusFilter::ALL {
            assert_eq!(filter.to_string().parse::<StatusFilter>().unwrap(), filter);
        }
        assert!("done".parse::<StatusFilter>().is_err());
        assert_eq!(StatusFilter::default(), StatusFilter::All);
    }
}
