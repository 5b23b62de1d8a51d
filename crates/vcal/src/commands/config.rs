//! Config command implementation.
//!
//! View and manage configuration settings.
//! Config file is located at ~/.config/vcal/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use vault_calendar_core::note_format;
use vault_calendar_core::{NoteKind, Settings, StatusFilter};

use super::{CommandContext, CommandError, Result};

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# vcal - vault calendar configuration

# Config schema version (do not modify)
version = 1

[vault]
# Vault root directory (can also use VCAL_VAULT env var or --vault)
# root = "/home/me/notes"

# Periodic notes. Paths are relative to the vault root.
[daily]
# save_path = "daily"
# template_path = "templates/daily.md"
# file_name_format = "YYYY-MM-DD"

[weekly]
# file_name_format = "GGGG-[W]WW"

[monthly]
# file_name_format = "YYYY-MM"

[quarterly]
# file_name_format = "YYYY-[Q]Q"

[yearly]
# file_name_format = "YYYY"

[tasks]
# filter = "work and !#someday"  # tags (#tag), paths, !, and, or, ( )
# status = "todo"                # "all", "todo", "done"
# target = "daily"               # note kind that receives new tasks
# record_created = false         # append 🔨 YYYY-MM-DD to new tasks

[calendar]
# holidays = "holidays.toml"     # relative to the vault root
# week_numbers = true
"#;

/// Keys accepted by `config set`.
const VALID_KEYS: &str = "vault.root, <kind>.save_path, <kind>.template_path, \
<kind>.file_name_format (kind: daily, weekly, monthly, quarterly, yearly), tasks.filter, \
tasks.status, tasks.target, tasks.record_created, calendar.holidays, calendar.week_numbers";

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Vault settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Note, task and calendar settings.
    #[serde(flatten)]
    pub settings: Settings,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            vault: VaultConfig::default(),
            settings: Settings::default(),
        }
    }
}

/// Vault configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Vault root directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

/// Gets the config file path.
///
/// Resolution order: `VCAL_CONFIG`, then `$XDG_CONFIG_HOME/vcal/config.toml`,
/// then `~/.config/vcal/config.toml` on all platforms.
pub fn get_config_path() -> Result<PathBuf> {
    if let Ok(path) = env::var("VCAL_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("vcal").join("config.toml"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("vcal").join("config.toml"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Loads the configuration from disk.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
/// Returns the config as-is if already at current version.
fn migrate_config(mut config: Config) -> Result<Config> {
    // Version 1 is the initial schema. Later versions get a step each:
    //
    // if config.version < 2 {
    //     config.version = 2;
    // }
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Saves the configuration to disk.
fn save_config(config: &Config) -> Result<()> {
    let path = get_config_path()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| CommandError::Config(format!("Failed to create config directory: {}", e)))?;
    }

    let content = toml::to_string_pretty(config)
        .map_err(|e| CommandError::Config(format!("Failed to serialize config: {}", e)))?;

    fs::write(&path, content)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    Ok(())
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": config,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        println!("[vault]");
        match &config.vault.root {
            Some(root) => println!("  root: {}", root.display()),
            None => println!("  root: (not set)"),
        }

        let settings = &config.settings;
        for kind in NoteKind::ALL {
            let note = settings.note(kind);
            println!("\n[{kind}]");
            println!("  save_path: {}", display_or_root(&note.save_path));
            if let Some(template) = &note.template_path {
                println!("  template_path: {}", template);
            }
            println!("  file_name_format: {}", settings.file_name_format(kind));
        }

        println!("\n[tasks]");
        println!("  filter: {}", settings.tasks.filter);
        println!("  status: {}", settings.tasks.status);
        println!("  target: {}", settings.tasks.target);
        println!("  record_created: {}", settings.tasks.record_created);

        println!("\n[calendar]");
        if let Some(holidays) = &settings.calendar.holidays {
            println!("  holidays: {}", holidays.display());
        }
        println!("  week_numbers: {}", settings.calendar.week_numbers);

        if !path.exists() {
            println!("\n(No config file exists. Run 'vcal config init' to create one.)");
        }
    }

    Ok(())
}

fn display_or_root(save_path: &str) -> &str {
    if save_path.is_empty() {
        "(vault root)"
    } else {
        save_path
    }
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;
    let created = !path.exists();

    if created {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                CommandError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }
        fs::write(&path, DEFAULT_CONFIG)
            .map_err(|e| CommandError::Config(format!("Failed to create config file: {}", e)))?;
    }

    if ctx.json_output {
        let output = serde_json::json!({
            "status": if created { "created" } else { "exists" },
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        if created {
            println!("Created default config at: {}", path.display());
        } else {
            println!("Config already exists at: {}", path.display());
        }
    }

    Ok(())
}

/// Options for the config set command.
pub struct ConfigSetOptions {
    /// Configuration key.
    pub key: String,
    /// Configuration value.
    pub value: String,
}

/// Applies `key = value` to `config`.
fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let (section, field) = key.split_once('.').ok_or_else(|| unknown_key(key))?;

    if let Ok(kind) = section.parse::<NoteKind>() {
        let note = config.settings.note_mut(kind);
        match field {
            "save_path" => note.save_path = value.trim_matches('/').to_string(),
            "template_path" => note.template_path = non_empty(value),
            "file_name_format" => {
                // Reject templates that cannot render
                note_format::format(chrono::NaiveDate::default(), value).map_err(|e| {
                    CommandError::Config(format!("Invalid file_name_format '{}': {}", value, e))
                })?;
                note.file_name_format = non_empty(value);
            }
            _ => return Err(unknown_key(key)),
        }
        return Ok(());
    }

    let settings = &mut config.settings;
    match (section, field) {
        ("vault", "root") => config.vault.root = non_empty(value).map(PathBuf::from),
        ("tasks", "filter") => settings.tasks.filter = value.to_string(),
        ("tasks", "status") => {
            settings.tasks.status = value.parse::<StatusFilter>().map_err(CommandError::Config)?;
        }
        ("tasks", "target") => {
            settings.tasks.target = value.parse::<NoteKind>().map_err(CommandError::Config)?;
        }
        ("tasks", "record_created") => settings.tasks.record_created = parse_bool(value)?,
        ("calendar", "holidays") => settings.calendar.holidays = non_empty(value).map(PathBuf::from),
        ("calendar", "week_numbers") => settings.calendar.week_numbers = parse_bool(value)?,
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}

fn unknown_key(key: &str) -> CommandError {
    CommandError::Config(format!("Unknown config key '{}'. Valid keys: {}", key, VALID_KEYS))
}

/// Empty strings clear optional settings.
fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Executes the config set command.
pub fn execute_set(ctx: &CommandContext, opts: &ConfigSetOptions) -> Result<()> {
    let mut config = load_config()?;
    let path = get_config_path()?;

    apply_setting(&mut config, &opts.key, &opts.value)?;
    save_config(&config)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "key": opts.key,
            "value": opts.value,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Set {} = {}", opts.key, opts.value);
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Parses a boolean value from string.
fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(CommandError::Config(format!(
            "Invalid boolean value '{}'. Use true/false, yes/no, 1/0, or on/off",
            s
        ))),
    }
}
