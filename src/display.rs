// Terminal rendering of tasks

use crate::filter::StatusFilter;
use crate::models::Task;
use chrono::NaiveDateTime;
use colored::Colorize;

/// One task as a short block of text
pub fn render_task(task: &Task, now: NaiveDateTime) -> String {
    let (mark, title) = if task.is_completed() {
        ("[x]".green(), task.title.strikethrough().dimmed())
    } else {
        ("[ ]".normal(), task.title.bold())
    };

    let mut out = format!("{} {}  {}", mark, title, task.id.dimmed());

    if !task.description.is_empty() {
        out.push_str(&format!("\n    {}", task.description));
    }

    if !task.deadline.is_empty() {
        let when = match task.deadline_at() {
            Some(deadline) => deadline.format("%a %d %b %Y %H:%M").to_string(),
            None => task.deadline.clone(),
        };
        let line = format!("due {}", when);
        let line = if task.is_overdue(now) { line.red() } else { line.normal() };
        out.push_str(&format!("\n    {}", line));
    }

    out
}

/// The filtered view, or a placeholder when nothing matches
pub fn render_list(tasks: &[&Task], filter: StatusFilter, now: NaiveDateTime) -> String {
    if tasks.is_empty() {
        return "No tasks found".dimmed().to_string();
    }

    let header = format!("{} ({} shown)", capitalize(filter.as_str()), tasks.len());
    let body: Vec<String> = tasks.iter().map(|task| render_task(task, now)).collect();
    format!("{}\n{}", header.bold(), body.join("\n"))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskStatus, parse_deadline};

    fn plain() {
        colored::control::set_override(false);
    }

    fn task(title: &str, status: TaskStatus, deadline: &str) -> Task {
        Task {
            id: "0192-abc".to_string(),
            title: title.to_string(),
            description: String::new(),
            deadline: deadline.to_string(),
            status,
            created_at: "2026-10-19T08:30:00.000Z".to_string(),
        }
    }

    fn now() -> NaiveDateTime {
        parse_deadline("2026-10-19T12:00").unwrap()
    }

    #[test]
    fn test_render_pending_task() {
        plain();
        let out = render_task(&task("Buy milk", TaskStatus::Pending, ""), now());
        assert_eq!(out, "[ ] Buy milk  0192-abc");
    }

    #[test]
    fn test_render_completed_task_with_details() {
        plain();
        let mut t = task("Ship it", TaskStatus::Completed, "2026-10-20T09:00");
        t.description = "release notes".to_string();

        let out = render_task(&t, now());
        assert!(out.starts_with("[x] Ship it"));
        assert!(out.contains("\n    release notes"));
        assert!(out.contains("due Tue 20 Oct 2026 09:00"));
    }

    #[test]
    fn test_render_unparseable_deadline_verbatim() {
        plain();
        let out = render_task(&task("Odd", TaskStatus::Pending, "someday"), now());
        assert!(out.contains("due someday"));
    }

    #[test]
    fn test_render_empty_list() {
        plain();
        assert_eq!(render_list(&[], StatusFilter::Pending, now()), "No tasks found");
    }

    #[test]
    fn test_render_list_header() {
        plain();
        let t = task("One", TaskStatus::Pending, "");
        let out = render_list(&[&t], StatusFilter::Pending, now());
        assert!(out.starts_with("Pending (1 shown)\n[ ] One"));
    }
}
