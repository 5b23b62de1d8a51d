//! Turning the extracted task list into the visible one.
//!
//! Day views use [`filter_by_date`]: everything due by the end of the day
//! plus undated tasks, narrowed by the configured filter expression. Period
//! views use [`filter_by_range`], which only answers "what is due in this
//! period". [`StatusFilter::apply`] runs last over either result.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::filter::{FilterEvaluator, FilterParser};
use crate::task::Task;

/// Which tasks a list shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    All,
    #[default]
    Todo,
    Done,
}

impl StatusFilter {
    /// Returns true if `task` passes the filter.
    pub fn accepts(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Todo => !task.completed,
            StatusFilter::Done => task.completed,
        }
    }

    /// Keeps the tasks that pass the filter.
    pub fn apply(self, tasks: Vec<Task>) -> Vec<Task> {
        tasks.into_iter().filter(|task| self.accepts(task)).collect()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Todo => "todo",
            StatusFilter::Done => "done",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "todo" => Ok(StatusFilter::Todo),
            "done" => Ok(StatusFilter::Done),
            _ => Err(format!("unknown status '{s}', expected all, todo or done")),
        }
    }
}

/// Last representable millisecond of `date`: `23:59:59.999`.
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::milliseconds(86_399_999)
}

/// Returns true if something due at `due_at` is due by the end of `cutoff`.
pub fn is_due_by(due_at: NaiveDateTime, cutoff: NaiveDate) -> bool {
    due_at <= end_of_day(cutoff)
}

/// Keeps undated tasks and tasks due by the end of `cutoff`, then applies the
/// filter expression `filter` (no-op when blank).
pub fn filter_by_date(tasks: &[Task], filter: &str, cutoff: NaiveDate) -> Vec<Task> {
    let expression = FilterParser::parse(filter);
    let evaluator = expression.as_ref().map(FilterEvaluator::new);

    tasks
        .iter()
        .filter(|task| match task.due_date {
            Some(due) => is_due_by(due.and_time(NaiveTime::MIN), cutoff),
            None => true,
        })
        .filter(|task| evaluator.as_ref().is_none_or(|e| e.matches(task)))
        .cloned()
        .collect()
}

/// Keeps tasks due within `[start, end]`. Undated tasks are dropped.
pub fn filter_by_range(tasks: &[Task], start: NaiveDate, end: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.due_date.is_some_and(|due| start <= due && due <= end))
        .cloned()
        .collect()
}

fn compare_due(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders tasks for display: open before completed, then by due date with
/// undated tasks last, then by note path.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| compare_due(a.due_date, b.due_date))
            .then_with(|| a.source_path.cmp(&b.source_path))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Task> {
        vec![
            Task::new("work/a.md", "Report 📅 2024-03-14 #urgent", false),
            Task::new("work/a.md", "Slides 📅 2024-03-15", false),
            Task::new("home/b.md", "Laundry 📅 2024-03-16", false),
            Task::new("home/b.md", "Someday #idea", false),
            Task::new("work/c.md", "Old 📅 2024-03-01", true),
        ]
    }

    fn texts(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.raw_text.as_str()).collect()
    }

    // ==================== Date Window Tests ====================

    #[test]
    fn test_end_of_day_boundary() {
        let cutoff = date(2024, 3, 15);
        let last_ms = date(2024, 3, 15).and_hms_milli_opt(23, 59, 59, 999).unwrap();
        assert_eq!(end_of_day(cutoff), last_ms);
        assert!(is_due_by(last_ms, cutoff));
        assert!(!is_due_by(last_ms + Duration::microseconds(1), cutoff));
        assert!(!is_due_by(date(2024, 3, 16).and_time(NaiveTime::MIN), cutoff));
    }

    #[test]
    fn test_filter_by_date_keeps_due_and_undated() {
        let tasks = filter_by_date(&sample(), "", date(2024, 3, 15));
        assert_eq!(texts(&tasks), vec!["Report 📅 2024-03-14 #urgent", "Slides 📅 2024-03-15", "Someday #idea", "Old 📅 2024-03-01"]);
    }

    #[test]
    fn test_filter_by_date_applies_expression() {
        let tasks = filter_by_date(&sample(), "work and !#urgent", date(2024, 3, 15));
        assert_eq!(texts(&tasks), vec!["Slides 📅 2024-03-15", "Old 📅 2024-03-01"]);
    }

    #[test]
    fn test_filter_by_date_whitespace_filter_is_noop() {
        assert_eq!(filter_by_date(&sample(), "   ", date(2024, 3, 31)).len(), 5);
    }

    #[test]
    fn test_filter_by_range_drops_undated() {
        let tasks = filter_by_range(&sample(), date(2024, 3, 11), date(2024, 3, 17));
        assert_eq!(texts(&tasks), vec!["Report 📅 2024-03-14 #urgent", "Slides 📅 2024-03-15", "Laundry 📅 2024-03-16"]);
        assert!(tasks.iter().all(|t| t.due_date.is_some()));
    }

    #[test]
    fn test_filter_by_range_inclusive_bounds() {
        let tasks = filter_by_range(&sample(), date(2024, 3, 14), date(2024, 3, 14));
        assert_eq!(tasks.len(), 1);
    }

    // ==================== Status Tests ====================

    #[test]
    fn test_status_filter() {
        assert_eq!(StatusFilter::All.apply(sample()).len(), 5);
        assert_eq!(StatusFilter::Todo.apply(sample()).len(), 4);
        assert_eq!(texts(&StatusFilter::Done.apply(sample())), vec!["Old 📅 2024-03-01"]);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("DONE".parse::<StatusFilter>(), Ok(StatusFilter::Done));
        assert!("open".parse::<StatusFilter>().is_err());
    }

    // ==================== Sort Tests ====================

    #[test]
    fn test_sort_tasks() {
        let mut tasks = sample();
        sort_tasks(&mut tasks);
        assert_eq!(
            texts(&tasks),
            vec![
                "Report 📅 2024-03-14 #urgent",
                "Slides 📅 2024-03-15",
                "Laundry 📅 2024-03-16",
                "Someday #idea",
                "Old 📅 2024-03-01",
            ]
        );
    }
}
