//! Year command implementation.
//!
//! Shows the twelve months of a year with the periodic notes that exist.

use chrono::{Datelike, NaiveDate};
use vault_calendar_core::date_math::{quarter, year_grid};
use vault_calendar_core::notes::note_exists;
use vault_calendar_core::{DocumentStore, NoteKind, Settings};

use super::{CommandContext, Result, Workspace};
use crate::output::{format_year_json, format_year_table, YearMonthSummary, YearSummary};

/// Executes the year command.
///
/// # Errors
///
/// Returns an error if the output cannot be serialized.
pub async fn execute(ctx: &CommandContext, workspace: &Workspace, year: i32) -> Result<()> {
    let summary = summarize(&workspace.store, &workspace.settings, year).await;

    if ctx.json_output {
        println!("{}", format_year_json(&summary)?);
    } else if !ctx.quiet {
        print!("{}", format_year_table(&summary, ctx.today, ctx.use_colors));
    }
    Ok(())
}

/// Collects which notes of `year` exist in `store`.
pub async fn summarize<S: DocumentStore>(store: &S, settings: &Settings, year: i32) -> YearSummary {
    let mut months = Vec::with_capacity(12);
    let mut yearly_note = false;

    for (index, grid) in year_grid(year).into_iter().enumerate() {
        let Some(first) = NaiveDate::from_ymd_opt(grid.year, grid.month, 1) else {
            continue;
        };
        if index == 0 {
            yearly_note = note_exists(store, settings, NoteKind::Yearly, first).await;
        }

        let mut days_with_notes = Vec::new();
        for cell in grid.rows.iter().flatten().filter(|cell| !cell.is_other_month) {
            if note_exists(store, settings, NoteKind::Daily, cell.date).await {
                days_with_notes.push(cell.date.day());
            }
        }

        months.push(YearMonthSummary {
            month: grid.month,
            quarter: quarter(first),
            monthly_note: note_exists(store, settings, NoteKind::Monthly, first).await,
            quarterly_note: note_exists(store, settings, NoteKind::Quarterly, first).await,
            days_with_notes,
        });
    }

    YearSummary {
        year,
        yearly_note,
        months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vault_calendar_core::MemoryStore;

    #[tokio::test]
    async fn test_summarize_finds_notes() {
        let store = MemoryStore::new()
            .with_document("2024.md", "")
            .with_document("2024-Q2.md", "")
            .with_document("2024-03.md", "")
            .with_document("2024-03-15.md", "")
            .with_document("2024-03-01.md", "");
        let summary = summarize(&store, &Settings::default(), 2024).await;

        assert!(summary.yearly_note);
        assert_eq!(summary.months.len(), 12);
        let march = &summary.months[2];
        assert!(march.monthly_note);
        assert!(!march.quarterly_note);
        assert_eq!(march.days_with_notes, vec![1, 15]);

        let april = &summary.months[3];
        assert_eq!(april.quarter, 2);
        assert!(april.quarterly_note);
        assert!(april.days_with_notes.is_empty());
    }

    #[tokio::test]
    async fn test_summarize_empty_vault() {
        let summary = summarize(&MemoryStore::new(), &Settings::default(), 2023).await;
        assert!(!summary.yearly_note);
        assert!(summary.months.iter().all(|m| !m.monthly_note && m.days_with_notes.is_empty()));
    }
}
