//! Calendar and task core for markdown note vaults.
//!
//! This crate provides the pieces a calendar side panel needs without any
//! rendering: calendar arithmetic, lunar/holiday annotation, task extraction
//! from checkbox lines, a small filter expression language over tags and
//! paths, and note-name templating.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use vault_calendar_core::filter::{FilterEvaluator, FilterParser};
//! use vault_calendar_core::task::extract;
//!
//! let tasks = extract([("work/plan.md", "- [ ] Ship it #urgent 📅 2024-03-15")]);
//! assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2024, 3, 15));
//!
//! let expr = FilterParser::parse("work and #urgent").unwrap();
//! assert!(FilterEvaluator::new(&expr).matches(&tasks[0]));
//! ```

pub mod date_math;
pub mod filter;
pub mod lunar;
pub mod note_format;
pub mod notes;
pub mod panel;
pub mod pipeline;
pub mod settings;
pub mod store;
pub mod task;

pub use lunar::{Almanac, HolidaySchedule, LunarLabel, LunarLabelKind, LunarOracle, WorkdayStatus};
pub use notes::{NoteError, NoteKind};
pub use panel::{Panel, Refresh, RefreshTracker, ViewState};
pub use pipeline::StatusFilter;
pub use settings::{NoteTemplateSettings, Settings};
pub use store::{DocumentStore, MemoryStore, StoreError, VaultStore};
pub use task::{Task, TaskError};
