//! Add command implementation.
//!
//! Appends a task to the periodic note configured as the task target,
//! creating the note from its template when needed.

use chrono::NaiveDate;
use vault_calendar_core::task::{add_task, TaskDraft};
use vault_calendar_core::Settings;

use super::{CommandContext, Result, Workspace};
use crate::output::{format_added_task, format_added_task_json};

/// Options for the add command.
#[derive(Debug)]
pub struct AddOptions {
    pub text: String,
    pub due: Option<NaiveDate>,
    pub priority: Option<String>,
    /// Date of the note the task goes into.
    pub date: NaiveDate,
}

/// Executes the add command.
///
/// # Errors
///
/// Returns an error if the text is not a single non-blank line or the note
/// cannot be created or written.
pub async fn execute(ctx: &CommandContext, workspace: &Workspace, opts: &AddOptions) -> Result<()> {
    let draft = build_draft(opts, &workspace.settings, ctx.today);
    let task = add_task(&workspace.store, &workspace.settings, &draft, opts.date).await?;

    if ctx.json_output {
        println!("{}", format_added_task_json(&task)?);
    } else if !ctx.quiet {
        print!("{}", format_added_task(&task, ctx.use_colors));
    }
    Ok(())
}

fn build_draft(opts: &AddOptions, settings: &Settings, today: NaiveDate) -> TaskDraft {
    let mut draft = TaskDraft::new(opts.text.as_str());
    if let Some(due) = opts.due {
        draft = draft.due(due);
    }
    if let Some(priority) = &opts.priority {
        draft = draft.priority(priority.as_str());
    }
    if settings.tasks.record_created {
        draft = draft.created(today);
    }
    draft
}
