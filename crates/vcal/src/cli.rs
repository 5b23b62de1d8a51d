//! CLI argument parsing using clap derive macros.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use vault_calendar_core::date_math::Period;
use vault_calendar_core::{NoteKind, StatusFilter};

/// vcal - calendar, periodic notes and tasks for a markdown vault
#[derive(Parser, Debug)]
#[command(name = "vcal")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Vault root directory (default: from config)
    #[arg(long, global = true, env = "VCAL_VAULT")]
    pub vault: Option<PathBuf>,

    /// Date used as "today"
    #[arg(long, global = true, env = "VCAL_TODAY", hide = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a month calendar
    #[command(alias = "m")]
    Month {
        /// Any day of the month to show (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Months to move forward (or back, when negative) from the date
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,
    },

    /// Show all months of a year
    Year {
        /// Year to show (default: current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// List tasks
    #[command(alias = "t")]
    Tasks {
        /// Day to list tasks for (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// List tasks due within the period holding the date
        #[arg(short, long, value_enum)]
        period: Option<PeriodArg>,

        /// Filter expression, e.g. "work and !#someday" (default: from config)
        #[arg(short, long)]
        filter: Option<String>,

        /// Which tasks to show (default: from config)
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Add a task to the note of a day
    #[command(alias = "a")]
    Add {
        /// Task text
        text: String,

        /// Due date
        #[arg(short, long)]
        due: Option<NaiveDate>,

        /// Priority tag, written as #<priority>
        #[arg(short = 'P', long)]
        priority: Option<String>,

        /// Day whose note receives the task (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Mark a task as done
    #[command(alias = "d")]
    Done {
        /// Note holding the task (vault-relative)
        #[arg(long)]
        path: String,

        /// Task text as written after the checkbox
        text: String,
    },

    /// Mark a task as not done
    Reopen {
        /// Note holding the task (vault-relative)
        #[arg(long)]
        path: String,

        /// Task text as written after the checkbox
        text: String,
    },

    /// Periodic notes
    #[command(alias = "n")]
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Show ISO week information for a date
    #[command(alias = "w")]
    Week {
        /// Date (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Note subcommands
#[derive(Subcommand, Debug)]
pub enum NoteCommands {
    /// Print the path of a note
    Path {
        #[arg(value_enum)]
        kind: NoteKindArg,

        /// Any day in the note's period (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Create a note from its template
    Create {
        #[arg(value_enum)]
        kind: NoteKindArg,

        /// Any day in the note's period (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Print the path of a note, creating it first if needed
    OpenOrCreate {
        #[arg(value_enum)]
        kind: NoteKindArg,

        /// Any day in the note's period (default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Write a commented default config file
    Init,

    /// Set a configuration value
    Set {
        /// Configuration key, e.g. tasks.filter or daily.save_path
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}

/// Period for task lists
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodArg {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl From<PeriodArg> for Period {
    fn from(arg: PeriodArg) -> Self {
        match arg {
            PeriodArg::Day => Period::Day,
            PeriodArg::Week => Period::Week,
            PeriodArg::Month => Period::Month,
            PeriodArg::Quarter => Period::Quarter,
            PeriodArg::Year => Period::Year,
        }
    }
}

impl PeriodArg {
    /// The note kind covering this period; `None` for a single day.
    pub fn note_kind(self) -> Option<NoteKind> {
        match self {
            PeriodArg::Day => None,
            PeriodArg::Week => Some(NoteKind::Weekly),
            PeriodArg::Month => Some(NoteKind::Monthly),
            PeriodArg::Quarter => Some(NoteKind::Quarterly),
            PeriodArg::Year => Some(NoteKind::Yearly),
        }
    }
}

/// Task status selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    All,
    Todo,
    Done,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => StatusFilter::All,
            StatusArg::Todo => StatusFilter::Todo,
            StatusArg::Done => StatusFilter::Done,
        }
    }
}

/// Periodic note kinds
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteKindArg {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl From<NoteKindArg> for NoteKind {
    fn from(arg: NoteKindArg) -> Self {
        match arg {
            NoteKindArg::Daily => NoteKind::Daily,
            NoteKindArg::Weekly => NoteKind::Weekly,
            NoteKindArg::Monthly => NoteKind::Monthly,
            NoteKindArg::Quarterly => NoteKind::Quarterly,
            NoteKindArg::Yearly => NoteKind::Yearly,
        }
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}
