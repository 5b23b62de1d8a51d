//! Week command implementation.
//!
//! Prints the ISO week, quarter and week range of a day. Works without a
//! vault; the weekly note path comes from the config file.

use chrono::NaiveDate;
use vault_calendar_core::date_math::{iso_week_info, period_range, quarter, Period};
use vault_calendar_core::notes::note_path;
use vault_calendar_core::{NoteKind, Settings};

use super::config::load_config;
use super::{CommandContext, Result};
use crate::output::{format_week_json, format_week_table, WeekSummary};

/// Executes the week command.
///
/// # Errors
///
/// Returns an error if the config file cannot be read.
pub fn execute(ctx: &CommandContext, date: NaiveDate) -> Result<()> {
    let config = load_config()?;
    let summary = summarize(&config.settings, date);

    if ctx.json_output {
        println!("{}", format_week_json(&summary)?);
    } else if !ctx.quiet {
        print!("{}", format_week_table(&summary, ctx.use_colors));
    }
    Ok(())
}

fn summarize(settings: &Settings, date: NaiveDate) -> WeekSummary {
    let info = iso_week_info(date);
    let (start, end) = period_range(Period::Week, date);
    let weekly_note = match note_path(settings, NoteKind::Weekly, date) {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(error = %e, "invalid weekly note name format");
            None
        }
    };

    WeekSummary {
        date,
        iso_year: info.iso_year,
        week: info.week,
        quarter: quarter(date),
        start,
        end,
        weekly_note,
    }
}
