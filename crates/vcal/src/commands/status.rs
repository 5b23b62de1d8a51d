//! Done/reopen command implementation.

use vault_calendar_core::task::set_task_status;
use vault_calendar_core::Task;

use super::{CommandContext, Result, Workspace};
use crate::output::{format_status_change, format_status_change_json};

/// Options for the done and reopen commands.
#[derive(Debug)]
pub struct StatusOptions {
    /// Vault-relative path of the note holding the task.
    pub path: String,
    /// Task text after the checkbox, as written in the note.
    pub text: String,
    /// The new state.
    pub completed: bool,
}

/// Executes the done or reopen command.
///
/// # Errors
///
/// Returns `TaskError::NotFound` if the note no longer holds the task line.
pub async fn execute(ctx: &CommandContext, workspace: &Workspace, opts: &StatusOptions) -> Result<()> {
    let task = Task::new(opts.path.as_str(), opts.text.as_str(), !opts.completed);
    set_task_status(&workspace.store, &task, opts.completed).await?;

    let updated = Task {
        completed: opts.completed,
        ..task
    };
    if ctx.json_output {
        println!("{}", format_status_change_json(&updated, opts.completed)?);
    } else if !ctx.quiet {
        print!("{}", format_status_change(&updated, opts.completed, ctx.use_colors));
    }
    Ok(())
}
