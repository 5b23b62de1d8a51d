//! Month command implementation.
//!
//! Shows the month grid of a day together with the task list of that day,
//! the same content the calendar panel renders.

use chrono::NaiveDate;
use vault_calendar_core::date_math::{shift, ShiftUnit};
use vault_calendar_core::{Panel, Refresh, ViewState};

use super::{CommandContext, Result, Workspace};
use crate::output::{format_month_table, format_tasks_table};

/// Options for the month command.
#[derive(Debug)]
pub struct MonthOptions {
    /// The selected day before applying the offset.
    pub date: NaiveDate,
    /// Months to move from `date`.
    pub offset: i32,
}

/// Executes the month command.
///
/// # Errors
///
/// Returns an error if the vault cannot be listed.
pub async fn execute(ctx: &CommandContext, workspace: &Workspace, opts: &MonthOptions) -> Result<()> {
    let view = view_for(ctx, workspace, opts);
    let panel = Panel::new(&workspace.store, &workspace.oracle, &workspace.settings);

    let Some(update) = panel.refresh(Refresh::Full, &view).await? else {
        tracing::debug!("month refresh superseded");
        return Ok(());
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&update)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    if let Some(calendar) = &update.calendar {
        print!(
            "{}",
            format_month_table(calendar, workspace.settings.calendar.week_numbers, ctx.use_colors)
        );
    }
    if let Some(tasks) = &update.tasks {
        println!();
        println!("Tasks for {}", view.selected);
        print!("{}", format_tasks_table(tasks, ctx.today, ctx.use_colors));
    }
    Ok(())
}

fn view_for(ctx: &CommandContext, workspace: &Workspace, opts: &MonthOptions) -> ViewState {
    let mut view = ViewState::new(ctx.today, workspace.settings.tasks.status);
    view.selected = shift(opts.date, ShiftUnit::Month, opts.offset);
    view
}
