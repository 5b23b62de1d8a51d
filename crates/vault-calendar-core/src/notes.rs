//! Periodic notes: one note per day, week, month, quarter or year.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::date_math::{period_range, Period};
use crate::note_format::{self, FormatError};
use crate::settings::{NoteTemplateSettings, Settings};
use crate::store::{DocumentStore, StoreError};

/// The kinds of periodic note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl NoteKind {
    /// All kinds, shortest period first.
    pub const ALL: [NoteKind; 5] = [
        NoteKind::Daily,
        NoteKind::Weekly,
        NoteKind::Monthly,
        NoteKind::Quarterly,
        NoteKind::Yearly,
    ];

    /// Returns the period a note of this kind covers.
    pub fn period(self) -> Period {
        match self {
            NoteKind::Daily => Period::Day,
            NoteKind::Weekly => Period::Week,
            NoteKind::Monthly => Period::Month,
            NoteKind::Quarterly => Period::Quarter,
            NoteKind::Yearly => Period::Year,
        }
    }

    /// Returns the first and last day of the period holding `date`.
    pub fn period_range(self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        period_range(self.period(), date)
    }

    /// Default file name template.
    pub fn default_format(self) -> &'static str {
        match self {
            NoteKind::Daily => "YYYY-MM-DD",
            NoteKind::Weekly => "GGGG-[W]WW",
            NoteKind::Monthly => "YYYY-MM",
            NoteKind::Quarterly => "YYYY-[Q]Q",
            NoteKind::Yearly => "YYYY",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NoteKind::Daily => "daily",
            NoteKind::Weekly => "weekly",
            NoteKind::Monthly => "monthly",
            NoteKind::Quarterly => "quarterly",
            NoteKind::Yearly => "yearly",
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NoteKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown note kind '{s}'"))
    }
}

/// Errors that can occur while resolving or creating notes.
#[derive(Debug, Error)]
pub enum NoteError {
    /// The file name template is malformed.
    #[error("invalid note name format: {0}")]
    Format(#[from] FormatError),

    /// Document store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The note to create is already present.
    #[error("note already exists: '{path}'")]
    AlreadyExists {
        /// Vault-relative path of the note.
        path: String,
    },
}

/// Returns the vault-relative path of the `kind` note for `date`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use vault_calendar_core::notes::note_path;
/// use vault_calendar_core::{NoteKind, Settings};
///
/// let mut settings = Settings::default();
/// settings.weekly.save_path = "weekly".to_string();
/// let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
///
/// assert_eq!(note_path(&settings, NoteKind::Daily, date).unwrap(), "2023-01-01.md");
/// assert_eq!(note_path(&settings, NoteKind::Weekly, date).unwrap(), "weekly/2022-W52.md");
/// ```
pub fn note_path(settings: &Settings, kind: NoteKind, date: NaiveDate) -> Result<String, FormatError> {
    let name = note_format::format(date, settings.file_name_format(kind))?;
    let name = name.trim_start_matches('/');
    let folder = settings.note(kind).save_path.trim_matches('/');

    Ok(if folder.is_empty() {
        format!("{name}.md")
    } else {
        format!("{folder}/{name}.md")
    })
}

/// Returns true if the `kind` note for `date` exists.
///
/// A malformed file name template counts as "no note".
pub async fn note_exists<S: DocumentStore>(
    store: &S,
    settings: &Settings,
    kind: NoteKind,
    date: NaiveDate,
) -> bool {
    match note_path(settings, kind, date) {
        Ok(path) => store.exists(&path).await,
        Err(_) => false,
    }
}

/// Reads the template note, if one is configured.
///
/// A template that cannot be read yields an empty note.
async fn template_content<S: DocumentStore>(store: &S, note: &NoteTemplateSettings) -> String {
    let Some(template) = note
        .template_path
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    else {
        return String::new();
    };

    let path = if template.ends_with(".md") {
        template.to_string()
    } else {
        format!("{template}.md")
    };

    match store.read(&path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(template = %path, error = %e, "note template unavailable, creating empty note");
            String::new()
        }
    }
}

/// Creates the `kind` note for `date` from its template and returns its path.
///
/// # Errors
///
/// - Returns `NoteError::AlreadyExists` if the note is already present.
/// - Returns `NoteError::Format` if the file name template is malformed.
/// - Returns `NoteError::Store` if the note cannot be written.
pub async fn create_note<S: DocumentStore>(
    store: &S,
    settings: &Settings,
    kind: NoteKind,
    date: NaiveDate,
) -> Result<String, NoteError> {
    let path = note_path(settings, kind, date)?;
    if store.exists(&path).await {
        return Err(NoteError::AlreadyExists { path });
    }

    let content = template_content(store, settings.note(kind)).await;
    store.create(&path, &content).await.map_err(|e| match e {
        StoreError::AlreadyExists { path } => NoteError::AlreadyExists { path },
        other => NoteError::Store(other),
    })?;

    tracing::debug!(path = %path, kind = %kind, "note created");
    Ok(path)
}

/// Returns the path of the `kind` note for `date`, creating it first when it
/// does not exist.
pub async fn ensure_note<S: DocumentStore>(
    store: &S,
    settings: &Settings,
    kind: NoteKind,
    date: NaiveDate,
) -> Result<String, NoteError> {
    match create_note(store, settings, kind, date).await {
        Ok(path) | Err(NoteError::AlreadyExists { path }) => Ok(path),
        Err(e) => Err(e),
    }
}
