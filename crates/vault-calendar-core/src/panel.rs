//! The calendar side panel: a month view and a task list, recomputed on
//! request.
//!
//! Every [`Panel::refresh`] takes a generation number from a
//! [`RefreshTracker`]. When several refreshes are in flight, a result older
//! than the last one applied is discarded, so a slow scan never overwrites a
//! newer view.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::date_math::{iso_week_info, month_grid};
use crate::lunar::{LunarLabel, LunarOracle, WorkdayStatus};
use crate::notes::{note_exists, NoteKind};
use crate::pipeline::{filter_by_date, filter_by_range, sort_tasks, StatusFilter};
use crate::settings::Settings;
use crate::store::{DocumentStore, StoreError};
use crate::task::{scan, Task};

/// What to recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// Calendar and task list.
    Full,
    TaskList,
    Calendar,
}

impl Refresh {
    fn calendar(self) -> bool {
        matches!(self, Refresh::Full | Refresh::Calendar)
    }

    fn task_list(self) -> bool {
        matches!(self, Refresh::Full | Refresh::TaskList)
    }
}

/// Hands out refresh generations and remembers the newest one applied.
#[derive(Debug, Default)]
pub struct RefreshTracker {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RefreshTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a refresh and returns its generation.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Records that `generation` finished. Returns false if a newer
    /// generation was already applied, in which case the result is stale.
    pub fn commit(&self, generation: u64) -> bool {
        self.applied.fetch_max(generation, Ordering::SeqCst) < generation
    }

    /// Generation of the newest applied refresh, 0 if none.
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}

/// What the panel is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// The selected day; its month is shown.
    pub selected: NaiveDate,
    pub today: NaiveDate,
    pub status: StatusFilter,
    /// A period selection (week, month, ...) instead of a single day.
    pub period: Option<NoteKind>,
}

impl ViewState {
    /// A day view of `today` with the given status filter.
    pub fn new(today: NaiveDate, status: StatusFilter) -> Self {
        Self {
            selected: today,
            today,
            status,
            period: None,
        }
    }
}

/// One day of the month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_other_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LunarLabel>,
    pub workday: WorkdayStatus,
    pub has_note: bool,
    /// Open tasks due on this day.
    pub open_tasks: usize,
}

/// One Monday-to-Sunday row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekRow {
    pub week: u32,
    pub iso_year: i32,
    /// Whether the weekly note for this row exists.
    pub has_note: bool,
    pub days: Vec<DayCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<WeekRow>,
}

/// Result of an applied refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelUpdate {
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar: Option<MonthView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

/// Computes the task list for `view` from all extracted tasks.
///
/// A period view (weekly and longer) lists tasks due within the period. A
/// day view lists tasks due by the selected day plus undated ones, narrowed
/// by the configured filter expression. The status filter and display order
/// apply to both.
pub fn visible_tasks(tasks: &[Task], settings: &Settings, view: &ViewState) -> Vec<Task> {
    let selected = match view.period.filter(|kind| *kind != NoteKind::Daily) {
        Some(kind) => {
            let (start, end) = kind.period_range(view.selected);
            filter_by_range(tasks, start, end)
        }
        None => filter_by_date(tasks, &settings.tasks.filter, view.selected),
    };

    let mut visible = view.status.apply(selected);
    sort_tasks(&mut visible);
    visible
}

/// The side panel over a store and a lunar oracle.
pub struct Panel<'a, S, O> {
    store: &'a S,
    oracle: &'a O,
    settings: &'a Settings,
    tracker: RefreshTracker,
}

impl<'a, S: DocumentStore, O: LunarOracle> Panel<'a, S, O> {
    pub fn new(store: &'a S, oracle: &'a O, settings: &'a Settings) -> Self {
        Self {
            store,
            oracle,
            settings,
            tracker: RefreshTracker::new(),
        }
    }

    pub fn tracker(&self) -> &RefreshTracker {
        &self.tracker
    }

    /// Recomputes what `request` asks for.
    ///
    /// Returns `Ok(None)` when a newer refresh finished first.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store cannot list its documents.
    /// Unreadable documents are skipped.
    pub async fn refresh(
        &self,
        request: Refresh,
        view: &ViewState,
    ) -> Result<Option<PanelUpdate>, StoreError> {
        let generation = self.tracker.begin();
        let extraction = scan(self.store).await?;

        let calendar = if request.calendar() {
            Some(self.month_view(&extraction.tasks, view).await)
        } else {
            None
        };
        let tasks = request
            .task_list()
            .then(|| visible_tasks(&extraction.tasks, self.settings, view));

        if !self.tracker.commit(generation) {
            tracing::debug!(generation, applied = self.tracker.applied(), "discarding stale refresh");
            return Ok(None);
        }

        Ok(Some(PanelUpdate {
            generation,
            calendar,
            tasks,
        }))
    }

    async fn month_view(&self, tasks: &[Task], view: &ViewState) -> MonthView {
        let mut weeks = Vec::new();

        for row in month_grid(view.selected) {
            let monday = row[0].date;
            let info = iso_week_info(monday);
            let mut days = Vec::with_capacity(7);
            for cell in row {
                let date = cell.date;
                days.push(DayCell {
                    date,
                    is_other_month: cell.is_other_month,
                    is_today: date == view.today,
                    is_selected: date == view.selected,
                    label: self.oracle.lunar_label(date),
                    workday: self.oracle.workday_status(date),
                    has_note: note_exists(self.store, self.settings, NoteKind::Daily, date).await,
                    open_tasks: tasks
                        .iter()
                        .filter(|t| !t.completed && t.due_date == Some(date))
                        .count(),
                });
            }
            weeks.push(WeekRow {
                week: info.week,
                iso_year: info.iso_year,
                has_note: note_exists(self.store, self.settings, NoteKind::Weekly, monday).await,
                days,
            });
        }

        MonthView {
            year: view.selected.year(),
            month: view.selected.month(),
            weeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use super::*;
    use crate::lunar::{Almanac, HolidaySchedule};
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn vault() -> MemoryStore {
        MemoryStore::new()
            .with_document("2024-02-14.md", "- [ ] Flowers 📅 2024-02-14\n- [x] Card 📅 2024-02-14\n")
            .with_document("work/plan.md", "- [ ] Review 📅 2024-02-20 #work\n- [ ] Someday\n")
    }

    fn almanac() -> Almanac {
        let schedule = HolidaySchedule::from_toml_str(
            "[[holidays]]\nname = \"春节\"\nstart = \"2024-02-10\"\nend = \"2024-02-17\"\n",
        )
        .unwrap();
        Almanac::new(crate::lunar::NoLunarData, schedule)
    }

    // ==================== Tracker Tests ====================

    #[test]
    fn test_tracker_discards_older_generation() {
        let tracker = RefreshTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(second > first);
        assert!(tracker.commit(second));
        assert!(!tracker.commit(first));
        assert_eq!(tracker.applied(), second);
    }

    #[test]
    fn test_tracker_in_order_commits() {
        let tracker = RefreshTracker::new();
        let first = tracker.begin();
        assert!(tracker.commit(first));
        let second = tracker.begin();
        assert!(tracker.commit(second));
    }

    // ==================== Refresh Tests ====================

    #[tokio::test]
    async fn test_full_refresh() {
        let store = vault();
        let oracle = almanac();
        let settings = Settings::default();
        let panel = Panel::new(&store, &oracle, &settings);
        let view = ViewState::new(date(2024, 2, 14), StatusFilter::Todo);

        let update = panel.refresh(Refresh::Full, &view).await.unwrap().unwrap();
        assert_eq!(update.generation, 1);

        let calendar = update.calendar.unwrap();
        assert_eq!((calendar.year, calendar.month), (2024, 2));
        assert_eq!(calendar.weeks.len(), 5);
        assert_eq!(calendar.weeks[0].week, 5);

        let cell = calendar
            .weeks
            .iter()
            .flat_map(|w| &w.days)
            .find(|d| d.date == date(2024, 2, 14))
            .unwrap();
        assert!(cell.is_today && cell.is_selected && cell.has_note);
        assert_eq!(cell.open_tasks, 1);
        assert_eq!(cell.workday, WorkdayStatus::Rest);

        let first = &calendar.weeks[0].days[0];
        assert_eq!(first.date, date(2024, 1, 29));
        assert!(first.is_other_month);

        let tasks = update.tasks.unwrap();
        let texts: Vec<_> = tasks.iter().map(|t| t.raw_text.as_str()).collect();
        assert_eq!(texts, vec!["Flowers 📅 2024-02-14", "Someday"]);
    }

    #[tokio::test]
    async fn test_week_rows_mark_weekly_notes() {
        let store = vault().with_document("2024-W07.md", "");
        let oracle = almanac();
        let settings = Settings::default();
        let panel = Panel::new(&store, &oracle, &settings);
        let view = ViewState::new(date(2024, 2, 14), StatusFilter::Todo);

        let update = panel.refresh(Refresh::Full, &view).await.unwrap().unwrap();
        let marked: Vec<u32> = update
            .calendar
            .unwrap()
            .weeks
            .iter()
            .filter(|w| w.has_note)
            .map(|w| w.week)
            .collect();
        assert_eq!(marked, vec![7]);
    }

    #[tokio::test]
    async fn test_partial_refreshes() {
        let store = vault();
        let oracle = almanac();
        let settings = Settings::default();
        let panel = Panel::new(&store, &oracle, &settings);
        let view = ViewState::new(date(2024, 2, 14), StatusFilter::All);

        let calendar_only = panel.refresh(Refresh::Calendar, &view).await.unwrap().unwrap();
        assert!(calendar_only.calendar.is_some() && calendar_only.tasks.is_none());

        let tasks_only = panel.refresh(Refresh::TaskList, &view).await.unwrap().unwrap();
        assert!(tasks_only.calendar.is_none());
        assert_eq!(tasks_only.tasks.unwrap().len(), 3);
    }

    #[test]
    fn test_visible_tasks_period_view() {
        let tasks = crate::task::extract([
            ("a.md", "- [ ] Mon 📅 2024-02-19\n- [ ] Sun 📅 2024-02-25\n- [ ] Next 📅 2024-02-26\n- [ ] Undated\n"),
        ]);
        let mut view = ViewState::new(date(2024, 2, 21), StatusFilter::Todo);
        view.period = Some(NoteKind::Weekly);

        let visible = visible_tasks(&tasks, &Settings::default(), &view);
        let texts: Vec<_> = visible.iter().map(|t| t.raw_text.as_str()).collect();
        assert_eq!(texts, vec!["Mon 📅 2024-02-19", "Sun 📅 2024-02-25"]);
    }

    #[test]
    fn test_visible_tasks_day_view_uses_filter() {
        let tasks = crate::task::extract([
            ("work/a.md", "- [ ] A 📅 2024-02-19\n"),
            ("home/b.md", "- [ ] B 📅 2024-02-19\n"),
        ]);
        let mut settings = Settings::default();
        settings.tasks.filter = "work".to_string();
        let view = ViewState::new(date(2024, 2, 21), StatusFilter::Todo);

        let visible = visible_tasks(&tasks, &settings, &view);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].source_path, "work/a.md");
    }

    /// Delays the first listing so that a later refresh finishes first.
    struct SlowFirstList {
        inner: MemoryStore,
        calls: AtomicUsize,
    }

    impl DocumentStore for SlowFirstList {
        async fn list_documents(&self) -> crate::store::Result<Vec<String>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
            self.inner.list_documents().await
        }

        async fn read(&self, path: &str) -> crate::store::Result<String> {
            self.inner.read(path).await
        }

        async fn write(&self, path: &str, content: &str) -> crate::store::Result<()> {
            self.inner.write(path, content).await
        }

        async fn exists(&self, path: &str) -> bool {
            self.inner.exists(path).await
        }

        async fn create(&self, path: &str, content: &str) -> crate::store::Result<()> {
            self.inner.create(path, content).await
        }
    }

    #[tokio::test]
    async fn test_stale_refresh_is_discarded() {
        let store = SlowFirstList {
            inner: vault(),
            calls: AtomicUsize::new(0),
        };
        let oracle = almanac();
        let settings = Settings::default();
        let panel = Panel::new(&store, &oracle, &settings);
        let view = ViewState::new(date(2024, 2, 14), StatusFilter::Todo);

        let (slow, fast) = tokio::join!(
            panel.refresh(Refresh::TaskList, &view),
            panel.refresh(Refresh::TaskList, &view),
        );

        assert!(slow.unwrap().is_none());
        assert_eq!(fast.unwrap().unwrap().generation, 2);
        assert_eq!(panel.tracker().applied(), 2);
    }
}
