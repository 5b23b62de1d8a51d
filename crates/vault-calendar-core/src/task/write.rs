//! Creating task lines and toggling their completion state.

use chrono::NaiveDate;
use regex::Regex;

use super::{Task, TaskError};
use crate::notes;
use crate::settings::Settings;
use crate::store::DocumentStore;

/// Marker of an open task line.
const OPEN_PREFIX: &str = "- [ ] ";

/// A task about to be written to a note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub text: String,
    /// Written as `📅 YYYY-MM-DD`.
    pub due: Option<NaiveDate>,
    /// Written as `🔨 YYYY-MM-DD`.
    pub created: Option<NaiveDate>,
    /// Written as a `#priority` tag.
    pub priority: Option<String>,
}

impl TaskDraft {
    /// Creates a draft with only text set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Sets the due date.
    pub fn due(mut self, date: NaiveDate) -> Self {
        self.due = Some(date);
        self
    }

    /// Sets the creation date.
    pub fn created(mut self, date: NaiveDate) -> Self {
        self.created = Some(date);
        self
    }

    /// Sets the priority tag.
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Returns the text that follows the checkbox marker.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::InvalidText` if the text is blank or contains a
    /// line break.
    pub fn body(&self) -> Result<String, TaskError> {
        let text = self.text.trim();
        if text.is_empty() || text.contains(|c: char| c == '\n' || c == '\r') {
            return Err(TaskError::InvalidText);
        }

        let mut body = text.to_string();
        if let Some(created) = self.created {
            body.push_str(&format!(" 🔨 {}", created.format("%Y-%m-%d")));
        }
        if let Some(due) = self.due {
            body.push_str(&format!(" 📅 {}", due.format("%Y-%m-%d")));
        }
        if let Some(priority) = self.priority.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            body.push_str(" #");
            body.push_str(priority.trim_start_matches('#'));
        }
        Ok(body)
    }

    /// Renders the full markdown line.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use vault_calendar_core::task::TaskDraft;
    ///
    /// let line = TaskDraft::new("Buy milk")
    ///     .due(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    ///     .priority("high")
    ///     .render()
    ///     .unwrap();
    /// assert_eq!(line, "- [ ] Buy milk 📅 2024-03-15 #high");
    /// ```
    pub fn render(&self) -> Result<String, TaskError> {
        Ok(format!("{OPEN_PREFIX}{}", self.body()?))
    }
}

/// Rewrites the checkbox of the first line holding `raw_text`.
///
/// Only the character between the brackets changes (`x` when `completed`,
/// a space otherwise); every other byte of `content` is preserved. Returns
/// `None` when no checkbox line with exactly that text exists.
pub fn toggle_line(content: &str, raw_text: &str, completed: bool) -> Option<String> {
    let pattern = format!(r"(?m)^([ \t]*- \[)[^\]](\] {}\r?)$", regex::escape(raw_text));
    let line = Regex::new(&pattern).ok()?;
    let captures = line.captures(content)?;
    let whole = captures.get(0)?;

    let marker = if completed { "x" } else { " " };
    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..whole.start()]);
    updated.push_str(&captures[1]);
    updated.push_str(marker);
    updated.push_str(&captures[2]);
    updated.push_str(&content[whole.end()..]);
    Some(updated)
}

/// Marks `task` completed or open in its note.
///
/// # Errors
///
/// - Returns `TaskError::NotFound` if the line is no longer in the note.
/// - Returns `TaskError::Store` if the note cannot be read or written.
pub async fn set_task_status<S: DocumentStore>(
    store: &S,
    task: &Task,
    completed: bool,
) -> Result<(), TaskError> {
    let content = store.read(&task.source_path).await?;
    let updated =
        toggle_line(&content, &task.raw_text, completed).ok_or_else(|| TaskError::NotFound {
            path: task.source_path.clone(),
            text: task.raw_text.clone(),
        })?;

    if let Err(e) = store.write(&task.source_path, &updated).await {
        tracing::error!(path = %task.source_path, error = %e, "failed to update task status");
        return Err(e.into());
    }
    Ok(())
}

/// Appends a new task to the note of `date` for the configured target kind,
/// creating the note first when it does not exist.
///
/// Returns the task as it will be extracted from the note.
pub async fn add_task<S: DocumentStore>(
    store: &S,
    settings: &Settings,
    draft: &TaskDraft,
    date: NaiveDate,
) -> Result<Task, TaskError> {
    let body = draft.body()?;
    let path = notes::ensure_note(store, settings, settings.tasks.target, date).await?;

    let mut content = store.read(&path).await?;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(OPEN_PREFIX);
    content.push_str(&body);
    content.push('\n');

    if let Err(e) = store.write(&path, &content).await {
        tracing::error!(path = %path, error = %e, "failed to append task");
        return Err(e.into());
    }
    tracing::debug!(path = %path, "task added");
    Ok(Task::new(path, body, false))
}
