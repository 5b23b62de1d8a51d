//! Command dispatch module for routing CLI commands to their handlers.
//!
//! Commands split into two groups: those that work without a vault (config,
//! completions, week information, help) and those that open one.

use chrono::{Datelike, NaiveDate};

use crate::cli::{Cli, Commands, ConfigCommands, NoteCommands, PeriodArg, Shell, StatusArg};
use crate::commands::{self, CommandContext, CommandError, Result, Workspace};

/// Trait for commands that can be executed without a vault.
pub trait StandaloneCommand {
    /// Execute the command without opening the vault.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that work on a vault.
#[allow(async_fn_in_trait)]
pub trait VaultCommand {
    /// Execute the command against an opened vault.
    async fn execute(&self, ctx: &CommandContext, workspace: &Workspace) -> Result<()>;
}

/// Commands that don't need a vault.
pub enum StandaloneDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a Shell),
    Week(Option<NaiveDate>),
    Help,
}

impl<'a> StandaloneDispatch<'a> {
    /// Try to create a standalone dispatch from the CLI command.
    /// Returns None if the command needs a vault.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            Some(Commands::Week { date }) => Some(Self::Week(*date)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl StandaloneCommand for StandaloneDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Week(date) => commands::week::execute(ctx, date.unwrap_or(ctx.today)),
            Self::Help => {
                if !ctx.quiet {
                    println!("vcal - vault calendar");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Init) => commands::config::execute_init(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
    }
}

/// Commands that open the vault.
pub enum VaultDispatch<'a> {
    Month {
        date: Option<NaiveDate>,
        offset: i32,
    },
    Year {
        year: Option<i32>,
    },
    Tasks {
        date: Option<NaiveDate>,
        period: Option<PeriodArg>,
        filter: Option<&'a str>,
        status: Option<StatusArg>,
    },
    Add {
        text: &'a str,
        due: Option<NaiveDate>,
        priority: Option<&'a str>,
        date: Option<NaiveDate>,
    },
    SetStatus {
        path: &'a str,
        text: &'a str,
        completed: bool,
    },
    Note(&'a NoteCommands),
}

impl<'a> VaultDispatch<'a> {
    /// Create a vault dispatch from the CLI command.
    /// Returns None for commands handled by [`StandaloneDispatch`].
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Month { date, offset }) => Some(Self::Month {
                date: *date,
                offset: *offset,
            }),
            Some(Commands::Year { year }) => Some(Self::Year { year: *year }),
            Some(Commands::Tasks {
                date,
                period,
                filter,
                status,
            }) => Some(Self::Tasks {
                date: *date,
                period: *period,
                filter: filter.as_deref(),
                status: *status,
            }),
            Some(Commands::Add {
                text,
                due,
                priority,
                date,
            }) => Some(Self::Add {
                text,
                due: *due,
                priority: priority.as_deref(),
                date: *date,
            }),
            Some(Commands::Done { path, text }) => Some(Self::SetStatus {
                path,
                text,
                completed: true,
            }),
            Some(Commands::Reopen { path, text }) => Some(Self::SetStatus {
                path,
                text,
                completed: false,
            }),
            Some(Commands::Note { command }) => Some(Self::Note(command)),
            // Already handled by StandaloneDispatch
            Some(Commands::Config { .. })
            | Some(Commands::Completions { .. })
            | Some(Commands::Week { .. })
            | None => None,
        }
    }
}

impl VaultCommand for VaultDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext, workspace: &Workspace) -> Result<()> {
        match self {
            Self::Month { date, offset } => {
                let opts = commands::month::MonthOptions {
                    date: date.unwrap_or(ctx.today),
                    offset: *offset,
                };
                commands::month::execute(ctx, workspace, &opts).await
            }
            Self::Year { year } => {
                let year = year.unwrap_or_else(|| ctx.today.year());
                commands::year::execute(ctx, workspace, year).await
            }
            Self::Tasks {
                date,
                period,
                filter,
                status,
            } => {
                let opts = commands::tasks::TasksOptions {
                    date: date.unwrap_or(ctx.today),
                    period: *period,
                    filter: filter.map(str::to_string),
                    status: status.map(Into::into),
                };
                commands::tasks::execute(ctx, workspace, &opts).await
            }
            Self::Add {
                text,
                due,
                priority,
                date,
            } => {
                let opts = commands::add::AddOptions {
                    text: text.to_string(),
                    due: *due,
                    priority: priority.map(str::to_string),
                    date: date.unwrap_or(ctx.today),
                };
                commands::add::execute(ctx, workspace, &opts).await
            }
            Self::SetStatus {
                path,
                text,
                completed,
            } => {
                let opts = commands::status::StatusOptions {
                    path: path.to_string(),
                    text: text.to_string(),
                    completed: *completed,
                };
                commands::status::execute(ctx, workspace, &opts).await
            }
            Self::Note(command) => dispatch_note(ctx, workspace, command).await,
        }
    }
}

/// Dispatch note subcommands.
async fn dispatch_note(
    ctx: &CommandContext,
    workspace: &Workspace,
    command: &NoteCommands,
) -> Result<()> {
    use commands::note::NoteAction;

    let (action, kind, date) = match command {
        NoteCommands::Path { kind, date } => (NoteAction::Path, kind, date),
        NoteCommands::Create { kind, date } => (NoteAction::Create, kind, date),
        NoteCommands::OpenOrCreate { kind, date } => (NoteAction::OpenOrCreate, kind, date),
    };
    let opts = commands::note::NoteOptions {
        action,
        kind: (*kind).into(),
        date: date.unwrap_or(ctx.today),
    };
    commands::note::execute(ctx, workspace, &opts).await
}
