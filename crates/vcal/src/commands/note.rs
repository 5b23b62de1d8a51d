//! Note command implementation.
//!
//! Resolves, creates or opens the periodic note of a date.

use chrono::NaiveDate;
use serde::Serialize;
use vault_calendar_core::notes::{create_note, ensure_note, note_exists, note_path};
use vault_calendar_core::NoteKind;

use super::{CommandContext, Result, Workspace};

/// What to do with the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    /// Print the vault-relative path and whether it exists.
    Path,
    /// Create the note, failing if it exists.
    Create,
    /// Create the note when missing and print its absolute path.
    OpenOrCreate,
}

/// Options for the note command.
#[derive(Debug)]
pub struct NoteOptions {
    pub action: NoteAction,
    pub kind: NoteKind,
    pub date: NaiveDate,
}

#[derive(Serialize)]
struct NoteOutput<'a> {
    kind: NoteKind,
    path: &'a str,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    absolute_path: Option<String>,
}

/// Executes the note command.
///
/// # Errors
///
/// - Returns `CommandError::Format` if the file name template is malformed.
/// - Returns `NoteError::AlreadyExists` from `create` when the note exists.
pub async fn execute(ctx: &CommandContext, workspace: &Workspace, opts: &NoteOptions) -> Result<()> {
    let store = &workspace.store;
    let settings = &workspace.settings;

    let output = match opts.action {
        NoteAction::Path => {
            let path = note_path(settings, opts.kind, opts.date)?;
            let exists = note_exists(store, settings, opts.kind, opts.date).await;
            NoteOutput {
                kind: opts.kind,
                path: &path,
                exists,
                created: None,
                absolute_path: None,
            }
            .emit(ctx, &path)?
        }
        NoteAction::Create => {
            let path = create_note(store, settings, opts.kind, opts.date).await?;
            NoteOutput {
                kind: opts.kind,
                path: &path,
                exists: true,
                created: Some(true),
                absolute_path: None,
            }
            .emit(ctx, &format!("Created {path}"))?
        }
        NoteAction::OpenOrCreate => {
            let existed = note_exists(store, settings, opts.kind, opts.date).await;
            let path = ensure_note(store, settings, opts.kind, opts.date).await?;
            let absolute = store.resolve(&path).display().to_string();
            NoteOutput {
                kind: opts.kind,
                path: &path,
                exists: true,
                created: Some(!existed),
                absolute_path: Some(absolute.clone()),
            }
            .emit(ctx, &absolute)?
        }
    };

    if let Some(line) = output {
        println!("{line}");
    }
    Ok(())
}

impl NoteOutput<'_> {
    /// Returns the line to print: JSON, the human text, or nothing when quiet.
    fn emit(&self, ctx: &CommandContext, text: &str) -> Result<Option<String>> {
        if ctx.json_output {
            Ok(Some(serde_json::to_string_pretty(self)?))
        } else if ctx.quiet {
            Ok(None)
        } else {
            Ok(Some(text.to_string()))
        }
    }
}
