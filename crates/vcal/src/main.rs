use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod dispatch;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError, Workspace};
use dispatch::{StandaloneCommand, StandaloneDispatch, VaultCommand, VaultDispatch};
use vault_calendar_core::{NoteError, StoreError, TaskError};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                match serde_json::to_string_pretty(&error_json) {
                    Ok(text) => eprintln!("{text}"),
                    Err(_) => eprintln!("Error: {e}"),
                }
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` applies unless `--verbose`
/// forces debug output; `--quiet` keeps errors only.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    // Config, completions, week and help run without a vault
    if let Some(dispatch) = StandaloneDispatch::try_from_cli(cli) {
        return dispatch.execute(&ctx);
    }

    if let Some(dispatch) = VaultDispatch::from_cli(cli) {
        let config = load_config()?;
        let workspace = Workspace::open(cli.vault.as_ref(), config).await?;
        return dispatch.execute(&ctx, &workspace).await;
    }

    Ok(())
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Store(StoreError::NotFound { .. }) => "NOT_FOUND",
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Task(TaskError::NotFound { .. }) => "TASK_NOT_FOUND",
        CommandError::Task(TaskError::InvalidText) => "INVALID_TASK",
        CommandError::Task(_) => "TASK_ERROR",
        CommandError::Note(NoteError::AlreadyExists { .. }) => "NOTE_EXISTS",
        CommandError::Note(_) => "NOTE_ERROR",
        CommandError::Format(_) => "FORMAT_ERROR",
        CommandError::Holiday(_) => "HOLIDAY_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Config(_) => ExitCode::from(5),
        CommandError::Holiday(_) => ExitCode::from(5),
        CommandError::Format(_) => ExitCode::from(5),
        CommandError::Store(StoreError::NotFound { .. }) => ExitCode::from(4),
        CommandError::Task(TaskError::NotFound { .. }) => ExitCode::from(4),
        CommandError::Task(TaskError::InvalidText) => ExitCode::from(1),
        CommandError::Task(TaskError::Store(StoreError::NotFound { .. })) => ExitCode::from(4),
        CommandError::Note(NoteError::AlreadyExists { .. }) => ExitCode::from(1),
        CommandError::Note(NoteError::Format(_)) => ExitCode::from(5),
        CommandError::Task(_) | CommandError::Note(_) | CommandError::Store(_) => ExitCode::from(3),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Json(_) => ExitCode::from(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_calendar_core::note_format::FormatError;

    #[test]
    fn test_error_codes() {
        let not_found = CommandError::Task(TaskError::NotFound {
            path: "a.md".to_string(),
            text: "x".to_string(),
        });
        assert_eq!(error_code(&not_found), "TASK_NOT_FOUND");
        assert_eq!(error_exit_code(&not_found), ExitCode::from(4));

        let exists = CommandError::Note(NoteError::AlreadyExists {
            path: "2024.md".to_string(),
        });
        assert_eq!(error_code(&exists), "NOTE_EXISTS");
        assert_eq!(error_exit_code(&exists), ExitCode::from(1));

        let config = CommandError::Config("no vault".to_string());
        assert_eq!(error_code(&config), "CONFIG_ERROR");
        assert_eq!(error_exit_code(&config), ExitCode::from(5));
    }

    #[test]
    fn test_nested_error_codes() {
        let bad_template = CommandError::Note(NoteError::Format(FormatError::UnterminatedLiteral {
            position: 0,
        }));
        assert_eq!(error_code(&bad_template), "NOTE_ERROR");
        assert_eq!(error_exit_code(&bad_template), ExitCode::from(5));

        let missing_note = CommandError::Task(TaskError::Store(StoreError::NotFound {
            path: "gone.md".to_string(),
        }));
        assert_eq!(error_exit_code(&missing_note), ExitCode::from(4));
    }
}
