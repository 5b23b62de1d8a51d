//! Calendar output formatting.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use serde::Serialize;
use vault_calendar_core::date_math::{is_weekend, year_grid, WEEKDAY_HEADERS};
use vault_calendar_core::lunar::LunarLabelKind;
use vault_calendar_core::panel::{DayCell, MonthView};

use super::helpers::pad_display;

/// Width of a month view cell: day number, note marker, workday marker.
const CELL_WIDTH: usize = 5;

/// Width of a day in the compact year view.
const YEAR_CELL_WIDTH: usize = 3;

/// Formats a month view as a grid followed by the day labels.
///
/// Days with a daily note carry a `*`, as do week numbers with a weekly note.
/// Adjusted workdays carry their marker.
pub fn format_month_table(view: &MonthView, week_numbers: bool, use_colors: bool) -> String {
    let mut output = String::new();

    let title = NaiveDate::from_ymd_opt(view.year, view.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", view.year, view.month));
    if use_colors {
        output.push_str(&format!("{}\n", title.bold()));
    } else {
        output.push_str(&title);
        output.push('\n');
    }

    let mut header = String::new();
    if week_numbers {
        header.push_str("Wk  ");
    }
    let names: Vec<String> = WEEKDAY_HEADERS
        .iter()
        .map(|name| format!("{name:>2}{}", " ".repeat(CELL_WIDTH - 2)))
        .collect();
    header.push_str(names.join(" ").trim_end());
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for row in &view.weeks {
        let mut line = String::new();
        if week_numbers {
            let marker = if row.has_note { "*" } else { " " };
            let week = format!("{:>2}{marker} ", row.week);
            if use_colors {
                line.push_str(&week.dimmed().to_string());
            } else {
                line.push_str(&week);
            }
        }
        let cells: Vec<String> = row.days.iter().map(|day| format_cell(day, use_colors)).collect();
        line.push_str(&cells.join(" "));
        output.push_str(line.trim_end());
        output.push('\n');
    }

    let labels: Vec<&DayCell> = view
        .weeks
        .iter()
        .flat_map(|row| &row.days)
        .filter(|day| !day.is_other_month)
        .filter(|day| {
            day.label
                .as_ref()
                .is_some_and(|label| label.kind != LunarLabelKind::DayName)
        })
        .collect();

    if !labels.is_empty() {
        output.push('\n');
        for day in labels {
            if let Some(label) = &day.label {
                output.push_str(&format!("{} {}\n", day.date.format("%m-%d"), label.text));
            }
        }
    }

    output
}

fn format_cell(day: &DayCell, use_colors: bool) -> String {
    let marker = if day.has_note { "*" } else { " " };
    let cell = format!(
        "{:>2}{marker}{}",
        day.date.day(),
        pad_display(day.workday.marker(), CELL_WIDTH - 3)
    );

    if !use_colors {
        return cell;
    }
    if day.is_today {
        cell.bold().reversed().to_string()
    } else if day.is_other_month {
        cell.dimmed().to_string()
    } else if day.open_tasks > 0 {
        cell.yellow().to_string()
    } else if is_weekend(day.date) {
        cell.cyan().to_string()
    } else {
        cell
    }
}

/// Which periodic notes of a year exist.
#[derive(Debug, Serialize)]
pub struct YearSummary {
    pub year: i32,
    pub yearly_note: bool,
    pub months: Vec<YearMonthSummary>,
}

/// Note presence within one month of a [`YearSummary`].
#[derive(Debug, Serialize)]
pub struct YearMonthSummary {
    pub month: u32,
    pub quarter: u32,
    pub monthly_note: bool,
    pub quarterly_note: bool,
    /// Days of the month that have a daily note.
    pub days_with_notes: Vec<u32>,
}

/// Formats a year summary as JSON.
pub fn format_year_json(summary: &YearSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

/// Formats a year as four rows of three months, one row per quarter.
///
/// A `*` after a title or a day marks an existing note.
pub fn format_year_table(summary: &YearSummary, today: NaiveDate, use_colors: bool) -> String {
    let mut output = String::new();
    let grid_width = YEAR_CELL_WIDTH * 7;

    let title = format!("{}{}", summary.year, if summary.yearly_note { " *" } else { "" });
    if use_colors {
        output.push_str(&format!("{}\n", title.bold()));
    } else {
        output.push_str(&title);
        output.push('\n');
    }

    let blocks: Vec<Vec<String>> = year_grid(summary.year)
        .iter()
        .zip(&summary.months)
        .map(|(grid, month)| {
            let mut lines = Vec::new();
            let name = NaiveDate::from_ymd_opt(grid.year, grid.month, 1)
                .map(|d| d.format("%B").to_string())
                .unwrap_or_default();
            let name = format!("{name}{}", if month.monthly_note { " *" } else { "" });
            lines.push(format!("{name:<grid_width$}"));

            let header: String = WEEKDAY_HEADERS
                .iter()
                .map(|h| format!("{h:<YEAR_CELL_WIDTH$}"))
                .collect();
            lines.push(header);

            for row in &grid.rows {
                let mut line = String::new();
                for cell in row {
                    if cell.is_other_month {
                        line.push_str(&" ".repeat(YEAR_CELL_WIDTH));
                        continue;
                    }
                    let day = cell.date.day();
                    let marker = if month.days_with_notes.contains(&day) { "*" } else { " " };
                    let text = format!("{day:>2}{marker}");
                    if use_colors && cell.date == today {
                        line.push_str(&text.bold().reversed().to_string());
                    } else {
                        line.push_str(&text);
                    }
                }
                lines.push(line);
            }
            lines
        })
        .collect();

    for (index, quarter) in blocks.chunks(3).enumerate() {
        let quarterly_note = summary
            .months
            .get(index * 3)
            .is_some_and(|m| m.quarterly_note);
        let heading = format!("\nQ{}{}", index + 1, if quarterly_note { " *" } else { "" });
        if use_colors {
            output.push_str(&format!("{}\n", heading.dimmed()));
        } else {
            output.push_str(&heading);
            output.push('\n');
        }

        // Every block line is already `grid_width` columns wide
        let blank = " ".repeat(grid_width);
        let height = quarter.iter().map(Vec::len).max().unwrap_or(0);
        for line_index in 0..height {
            let parts: Vec<&str> = quarter
                .iter()
                .map(|block| block.get(line_index).map(String::as_str).unwrap_or(&blank))
                .collect();
            output.push_str(parts.join("  ").trim_end());
            output.push('\n');
        }
    }

    output
}

/// Calendar facts about a single day.
#[derive(Debug, Serialize)]
pub struct WeekSummary {
    pub date: NaiveDate,
    pub iso_year: i32,
    pub week: u32,
    pub quarter: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Path of the weekly note, when the name template is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_note: Option<String>,
}

/// Formats week information as JSON.
pub fn format_week_json(summary: &WeekSummary) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(summary)
}

/// Formats week information for humans.
pub fn format_week_table(summary: &WeekSummary, use_colors: bool) -> String {
    let week = format!("{}-W{:02}", summary.iso_year, summary.week);
    let week = if use_colors {
        week.bold().to_string()
    } else {
        week
    };

    let mut output = String::new();
    output.push_str(&format!("Date:     {} ({})\n", summary.date, summary.date.format("%A")));
    output.push_str(&format!("Week:     {week}\n"));
    output.push_str(&format!("Quarter:  Q{}\n", summary.quarter));
    output.push_str(&format!("Range:    {} .. {}\n", summary.start, summary.end));
    if let Some(path) = &summary.weekly_note {
        output.push_str(&format!("Note:     {path}\n"));
    }
    output
}
