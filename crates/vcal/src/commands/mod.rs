//! Command implementations for the vcal CLI.

pub mod add;
pub mod completions;
pub mod config;
pub mod month;
pub mod note;
pub mod status;
pub mod tasks;
pub mod week;
pub mod year;

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use vault_calendar_core::lunar::{HolidayError, NoLunarData};
use vault_calendar_core::note_format::FormatError;
use vault_calendar_core::{
    Almanac, HolidaySchedule, NoteError, Settings, StoreError, TaskError, VaultStore,
};

use crate::cli::Cli;
use config::Config;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Document store error.
    #[error("vault error: {0}")]
    Store(#[from] StoreError),

    /// Task update error.
    #[error("task error: {0}")]
    Task(#[from] TaskError),

    /// Note creation error.
    #[error("note error: {0}")]
    Note(#[from] NoteError),

    /// Note name template error.
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// Holiday file error.
    #[error("holiday error: {0}")]
    Holiday(#[from] HolidayError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// The date treated as today.
    pub today: NaiveDate,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
            quiet: cli.quiet,
            today: cli.today.unwrap_or_else(|| Local::now().date_naive()),
        }
    }
}

/// An opened vault with the settings and annotations commands work with.
pub struct Workspace {
    pub store: VaultStore,
    pub settings: Settings,
    pub oracle: Almanac<NoLunarData>,
}

impl Workspace {
    /// Opens the vault named by `--vault`/`VCAL_VAULT` or the config file.
    ///
    /// A relative holiday file path is resolved against the vault root.
    pub async fn open(vault: Option<&PathBuf>, config: Config) -> Result<Self> {
        let root = vault.cloned().or(config.vault.root).ok_or_else(|| {
            CommandError::Config(
                "no vault configured. Use --vault, VCAL_VAULT or 'vcal config set vault.root <dir>'"
                    .to_string(),
            )
        })?;

        if !root.is_dir() {
            return Err(CommandError::Config(format!(
                "vault directory '{}' does not exist",
                root.display()
            )));
        }

        let schedule = match &config.settings.calendar.holidays {
            Some(path) => HolidaySchedule::load(&root.join(path)).await?,
            None => HolidaySchedule::default(),
        };

        tracing::debug!(vault = %root.display(), holidays = schedule.holidays.len(), "vault opened");
        Ok(Self {
            store: VaultStore::new(root),
            settings: config.settings,
            oracle: Almanac::new(NoLunarData, schedule),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_requires_vault() {
        let result = Workspace::open(None, Config::default()).await;
        assert!(matches!(result, Err(CommandError::Config(_))));
    }

    #[tokio::test]
    async fn test_open_missing_directory() {
        let missing = PathBuf::from("/nonexistent/vcal-vault");
        let result = Workspace::open(Some(&missing), Config::default()).await;
        assert!(matches!(result, Err(CommandError::Config(msg)) if msg.contains("does not exist")));
    }

    #[tokio::test]
    async fn test_open_flag_overrides_config_and_loads_holidays() {
        let flag_dir = TempDir::new().unwrap();
        std::fs::write(
            flag_dir.path().join("holidays.toml"),
            "workdays = [\"2024-02-04\"]\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.vault.root = Some(PathBuf::from("/nonexistent/from-config"));
        config.settings.calendar.holidays = Some(PathBuf::from("holidays.toml"));

        let root = flag_dir.path().to_path_buf();
        let workspace = Workspace::open(Some(&root), config).await.unwrap();
        assert_eq!(workspace.store.root(), flag_dir.path());
        assert_eq!(workspace.oracle.schedule().workdays.len(), 1);
    }

    #[tokio::test]
    async fn test_open_bad_holiday_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("holidays.toml"), "holidays = 3").unwrap();
        let mut config = Config::default();
        config.settings.calendar.holidays = Some(PathBuf::from("holidays.toml"));

        let root = dir.path().to_path_buf();
        let result = Workspace::open(Some(&root), config).await;
        assert!(matches!(result, Err(CommandError::Holiday(_))));
    }
}
