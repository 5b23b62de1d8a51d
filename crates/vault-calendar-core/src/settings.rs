//! Settings shared by every operation.
//!
//! `Settings` is plain data: the CLI loads it from the `[daily]`..`[yearly]`,
//! `[tasks]` and `[calendar]` tables of its config file and passes it by
//! reference.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::notes::NoteKind;
use crate::pipeline::StatusFilter;

/// Where and how notes of one kind are created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteTemplateSettings {
    /// Folder for new notes, relative to the vault root. Empty means the
    /// vault root.
    pub save_path: String,

    /// Vault-relative path of a note whose content seeds new notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,

    /// File name template, without the `.md` extension.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name_format: Option<String>,
}

/// Task list preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSettings {
    /// Filter expression applied to day views.
    pub filter: String,

    /// Which tasks the list shows.
    pub status: StatusFilter,

    /// Note kind that receives new tasks.
    pub target: NoteKind,

    /// Stamp new tasks with their creation date.
    pub record_created: bool,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            filter: String::new(),
            status: StatusFilter::Todo,
            target: NoteKind::Daily,
            record_created: false,
        }
    }
}

/// Calendar display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarSettings {
    /// TOML file with statutory holidays and adjusted workdays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holidays: Option<PathBuf>,

    /// Show the ISO week number column.
    pub week_numbers: bool,
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            holidays: None,
            week_numbers: true,
        }
    }
}

/// All settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub daily: NoteTemplateSettings,
    pub weekly: NoteTemplateSettings,
    pub monthly: NoteTemplateSettings,
    pub quarterly: NoteTemplateSettings,
    pub yearly: NoteTemplateSettings,
    pub tasks: TaskSettings,
    pub calendar: CalendarSettings,
}

impl Settings {
    /// Returns the note settings of `kind`.
    pub fn note(&self, kind: NoteKind) -> &NoteTemplateSettings {
        match kind {
            NoteKind::Daily => &self.daily,
            NoteKind::Weekly => &self.weekly,
            NoteKind::Monthly => &self.monthly,
            NoteKind::Quarterly => &self.quarterly,
            NoteKind::Yearly => &self.yearly,
        }
    }

    /// Returns the note settings of `kind` for editing.
    pub fn note_mut(&mut self, kind: NoteKind) -> &mut NoteTemplateSettings {
        match kind {
            NoteKind::Daily => &mut self.daily,
            NoteKind::Weekly => &mut self.weekly,
            NoteKind::Monthly => &mut self.monthly,
            NoteKind::Quarterly => &mut self.quarterly,
            NoteKind::Yearly => &mut self.yearly,
        }
    }

    /// Returns the file name template of `kind`, falling back to the kind's
    /// default when unset or blank.
    pub fn file_name_format(&self, kind: NoteKind) -> &str {
        self.note(kind)
            .file_name_format
            .as_deref()
            .filter(|format| !format.trim().is_empty())
            .unwrap_or_else(|| kind.default_format())
    }
}
