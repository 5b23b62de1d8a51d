//! Output formatting utilities for the vcal CLI.
//!
//! - [`tasks`] - Task lists, added tasks and status changes
//! - [`calendar`] - Month, year and week views
//! - [`helpers`] - Common formatting utilities (truncation, due dates, padding)

mod calendar;
pub mod helpers;
mod tasks;

pub use calendar::{
    format_month_table, format_week_json, format_week_table, format_year_json, format_year_table,
    WeekSummary, YearMonthSummary, YearSummary,
};
pub use tasks::{
    format_added_task, format_added_task_json, format_status_change, format_status_change_json,
    format_tasks_json, format_tasks_table,
};
