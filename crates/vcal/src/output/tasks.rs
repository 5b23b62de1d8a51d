//! Task output formatting.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde::Serialize;
use vault_calendar_core::Task;

use super::helpers::{format_due, truncate_str};

/// JSON output structure for task lists.
#[derive(Serialize)]
pub struct TaskListOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeOutput>,
    pub tasks: Vec<TaskOutput<'a>>,
}

/// Inclusive date range of a period task list.
#[derive(Serialize)]
pub struct RangeOutput {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// JSON output structure for a single task.
#[derive(Serialize)]
pub struct TaskOutput<'a> {
    pub text: &'a str,
    pub clean_text: String,
    pub completed: bool,
    pub path: &'a str,
    pub due: Option<NaiveDate>,
}

impl<'a> From<&'a Task> for TaskOutput<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            text: &task.raw_text,
            clean_text: task.clean_text(),
            completed: task.completed,
            path: &task.source_path,
            due: task.due_date,
        }
    }
}

/// Formats tasks as JSON.
pub fn format_tasks_json(
    tasks: &[Task],
    range: Option<(NaiveDate, NaiveDate)>,
) -> Result<String, serde_json::Error> {
    let output = TaskListOutput {
        range: range.map(|(start, end)| RangeOutput { start, end }),
        tasks: tasks.iter().map(TaskOutput::from).collect(),
    };
    serde_json::to_string_pretty(&output)
}

/// Formats tasks as a table.
pub fn format_tasks_table(tasks: &[Task], today: NaiveDate, use_colors: bool) -> String {
    if tasks.is_empty() {
        return "No tasks found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<4} {:<12} {:<28} {}", "", "Due", "Note", "Task");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for task in tasks {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        let due = format_due(task.due_date, today, false);
        let path = truncate_str(&task.source_path, 28);
        let text = task.clean_text();

        let line = format!("{:<4} {:<12} {:<28} {}", checkbox, due, path, text);
        if use_colors && task.completed {
            output.push_str(&line.dimmed().to_string());
        } else if use_colors && task.due_date.is_some_and(|d| d < today) {
            output.push_str(&line.red().to_string());
        } else {
            output.push_str(&line);
        }
        output.push('\n');
    }

    output
}

/// Formats a newly added task as JSON.
pub fn format_added_task_json(task: &Task) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&TaskOutput::from(task))
}

/// Formats a newly added task for humans.
pub fn format_added_task(task: &Task, use_colors: bool) -> String {
    let prefix = if use_colors {
        "Added".green().to_string()
    } else {
        "Added".to_string()
    };
    format!("{prefix} to {}: {}\n", task.source_path, task.raw_text)
}

/// Formats a completed or reopened task as JSON.
pub fn format_status_change_json(task: &Task, completed: bool) -> Result<String, serde_json::Error> {
    let output = serde_json::json!({
        "status": if completed { "completed" } else { "reopened" },
        "path": task.source_path,
        "text": task.raw_text,
    });
    serde_json::to_string_pretty(&output)
}

/// Formats a completed or reopened task for humans.
pub fn format_status_change(task: &Task, completed: bool, use_colors: bool) -> String {
    let verb = if completed { "Completed" } else { "Reopened" };
    let verb = if use_colors {
        verb.green().to_string()
    } else {
        verb.to_string()
    };
    format!("{verb}: {} ({})\n", task.raw_text, task.source_path)
}
