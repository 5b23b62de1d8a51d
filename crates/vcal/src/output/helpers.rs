//! Common helper functions for output formatting.

use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a due date relative to `today`.
pub fn format_due(due_date: Option<NaiveDate>, today: NaiveDate, use_colors: bool) -> String {
    let Some(date) = due_date else {
        return String::new();
    };

    let display = if date == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".to_string()
    } else if today.pred_opt() == Some(date) {
        "Yesterday".to_string()
    } else if date < today {
        format!("{} days ago", (today - date).num_days())
    } else if date.year() == today.year() {
        date.format("%b %d").to_string()
    } else {
        date.format("%Y-%m-%d").to_string()
    };

    if use_colors {
        if date < today {
            display.red().to_string()
        } else if date == today {
            display.yellow().to_string()
        } else {
            display
        }
    } else {
        display
    }
}

/// Pads `text` to `width` terminal columns. Wide characters such as CJK
/// markers take two columns; combining and zero-width characters take none.
pub fn pad_display(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}
