//! Tasks stored as markdown checkbox lines.
//!
//! A task is a line of the form `- [ ] text` (open) or `- [x] text`
//! (completed) anywhere in a note. Its due date is an inline token in the
//! text: `📅 2024-03-15`, `due: 2024-03-15`, `@2024-03-15` or `#2024-03-15`.
//!
//! - [`extract`] / [`scan`] - read tasks from documents
//! - [`add_task`] / [`set_task_status`] - write tasks back

mod extract;
mod write;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::notes::NoteError;
use crate::store::StoreError;

pub use extract::{extract, extract_document, find_due_date, scan, Extraction, SkippedDocument};
pub use write::{add_task, set_task_status, toggle_line, TaskDraft};

/// A task extracted from a note.
///
/// Tasks have no identity of their own; they are rebuilt on every extraction
/// pass and recognized across passes by [`Task::key`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    /// The line content after the `- [ ] ` marker, exactly as written
    /// (without a trailing carriage return).
    pub raw_text: String,
    /// True for `[x]` / `[X]`.
    pub completed: bool,
    /// Vault-relative path of the note holding the task.
    pub source_path: String,
    /// Due date parsed from an inline due-date token.
    pub due_date: Option<NaiveDate>,
}

impl Task {
    /// Creates a task, parsing the due date from `raw_text`.
    pub fn new(source_path: impl Into<String>, raw_text: impl Into<String>, completed: bool) -> Self {
        let raw_text = raw_text.into();
        let due_date = find_due_date(&raw_text).map(|(date, _)| date);
        Self {
            raw_text,
            completed,
            source_path: source_path.into(),
            due_date,
        }
    }

    /// Returns the `(text, path)` pair that identifies the task across
    /// extraction passes.
    pub fn key(&self) -> (&str, &str) {
        (&self.raw_text, &self.source_path)
    }

    /// Returns the task text with its due-date token removed.
    pub fn clean_text(&self) -> String {
        let text = match find_due_date(&self.raw_text) {
            Some((_, range)) => {
                let mut text = self.raw_text.clone();
                text.replace_range(range, "");
                text
            }
            None => self.raw_text.clone(),
        };
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Returns true if the task is not completed.
    pub fn is_open(&self) -> bool {
        !self.completed
    }
}

/// Errors that can occur while writing tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    /// The task line was not found in its note, typically because the note
    /// changed since the task was extracted.
    #[error("task '{text}' not found in '{path}'")]
    NotFound {
        /// Note that was searched.
        path: String,
        /// Task text that was searched for.
        text: String,
    },

    /// The task text is empty or spans several lines.
    #[error("task text must be a single non-empty line")]
    InvalidText,

    /// Document store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error resolving or creating the target note.
    #[error(transparent)]
    Note(#[from] NoteError),
}
