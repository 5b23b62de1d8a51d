//! Tasks command implementation.
//!
//! Lists the tasks of a day (due by that day or undated, narrowed by the
//! filter expression) or of a whole period (due within it).

use std::borrow::Cow;

use chrono::NaiveDate;
use vault_calendar_core::date_math::period_range;
use vault_calendar_core::{Panel, Refresh, Settings, StatusFilter, ViewState};

use super::{CommandContext, Result, Workspace};
use crate::cli::PeriodArg;
use crate::output::{format_tasks_json, format_tasks_table};

/// Options for the tasks command.
#[derive(Debug)]
pub struct TasksOptions {
    pub date: NaiveDate,
    /// List the period holding `date` instead of the day.
    pub period: Option<PeriodArg>,
    /// Filter expression overriding the configured one.
    pub filter: Option<String>,
    /// Status filter overriding the configured one.
    pub status: Option<StatusFilter>,
}

/// Executes the tasks command.
///
/// # Errors
///
/// Returns an error if the vault cannot be listed.
pub async fn execute(ctx: &CommandContext, workspace: &Workspace, opts: &TasksOptions) -> Result<()> {
    let settings = effective_settings(&workspace.settings, opts);
    let view = view_for(ctx, &settings, opts);
    let panel = Panel::new(&workspace.store, &workspace.oracle, &settings);

    let Some(update) = panel.refresh(Refresh::TaskList, &view).await? else {
        tracing::debug!("task refresh superseded");
        return Ok(());
    };
    let tasks = update.tasks.unwrap_or_default();
    let range = opts.period.map(|period| period_range(period.into(), opts.date));

    if ctx.json_output {
        println!("{}", format_tasks_json(&tasks, range)?);
    } else if !ctx.quiet {
        match range {
            Some((start, end)) if start != end => println!("Tasks due {start} .. {end}"),
            _ => println!("Tasks for {}", opts.date),
        }
        print!("{}", format_tasks_table(&tasks, ctx.today, ctx.use_colors));
    }
    Ok(())
}

fn effective_settings<'a>(settings: &'a Settings, opts: &TasksOptions) -> Cow<'a, Settings> {
    match &opts.filter {
        Some(filter) => {
            let mut settings = settings.clone();
            settings.tasks.filter = filter.clone();
            Cow::Owned(settings)
        }
        None => Cow::Borrowed(settings),
    }
}

fn view_for(ctx: &CommandContext, settings: &Settings, opts: &TasksOptions) -> ViewState {
    let mut view = ViewState::new(ctx.today, opts.status.unwrap_or(settings.tasks.status));
    view.selected = opts.date;
    view.period = opts.period.and_then(PeriodArg::note_kind);
    view
}
