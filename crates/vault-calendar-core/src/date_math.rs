//! Calendar arithmetic: ISO weeks, quarters, month grids and period ranges.
//!
//! Every function here is pure. Grids are Monday-first; the weekday numbering
//! returned by [`first_weekday_of_month`] follows the Sunday = 0 convention and
//! is only used to compute the number of leading days.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// ISO-8601 week number together with the week-numbering year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsoWeekInfo {
    /// Week number (1-53).
    pub week: u32,
    /// The ISO week-numbering year, which differs from the calendar year
    /// for days around January 1st.
    pub iso_year: i32,
}

/// A single cell in a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDay {
    pub date: NaiveDate,
    /// True for leading/trailing days borrowed from the adjacent months.
    pub is_other_month: bool,
}

/// A month grid tagged with the month it displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<[GridDay; 7]>,
}

/// Unit used by [`shift`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftUnit {
    Year,
    Quarter,
    Month,
}

/// Calendar period used to compute inclusive date ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

/// Returns the ISO week number and ISO week-year of `date`.
pub fn iso_week_info(date: NaiveDate) -> IsoWeekInfo {
    let iso = date.iso_week();
    IsoWeekInfo {
        week: iso.week(),
        iso_year: iso.year(),
    }
}

/// Returns the quarter (1-4) containing `date`.
pub fn quarter(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// Returns the weekday of the first day of `date`'s month, 0 = Sunday.
pub fn first_weekday_of_month(date: NaiveDate) -> u32 {
    first_of_month(date).weekday().num_days_from_sunday()
}

/// Number of days from the previous month shown before day 1 in a
/// Monday-first grid.
pub fn leading_days_from_prev_month(first_weekday: u32) -> u32 {
    if first_weekday == 0 {
        6
    } else {
        first_weekday - 1
    }
}

/// Returns the number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 31,
    }
}

/// Moves `date` by `days`, saturating at chrono's first and last
/// representable day.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
}

/// Returns the first day of `date`'s month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Returns the Monday of the ISO week containing `date`, or the first
/// representable day when that Monday lies before it.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    add_days(date, -i64::from(date.weekday().num_days_from_monday()))
}

/// Builds the Monday-first grid for `date`'s month.
///
/// The grid has `ceil((leading + days_in_month) / 7)` rows; cells before day 1
/// and after the last day are filled from the adjacent months. Cells beyond
/// chrono's date range repeat the boundary day and count as other-month days.
pub fn month_grid(date: NaiveDate) -> Vec<[GridDay; 7]> {
    let first = first_of_month(date);
    let leading = leading_days_from_prev_month(first_weekday_of_month(first));
    let total = leading + days_in_month(first.year(), first.month());
    let row_count = total.div_ceil(7);

    (0..row_count)
        .map(|row| {
            std::array::from_fn(|col| {
                let offset = i64::from(row * 7) + col as i64 - i64::from(leading);
                match first.checked_add_signed(Duration::days(offset)) {
                    Some(cell) => GridDay {
                        date: cell,
                        is_other_month: cell.month() != first.month() || cell.year() != first.year(),
                    },
                    None => GridDay {
                        date: add_days(first, offset),
                        is_other_month: true,
                    },
                }
            })
        })
        .collect()
}

/// Builds the twelve month grids of `year`. Returns an empty list for years
/// outside chrono's supported range.
pub fn year_grid(year: i32) -> Vec<MonthGrid> {
    (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|first| MonthGrid {
            year,
            month: first.month(),
            rows: month_grid(first),
        })
        .collect()
}

/// Moves `date` by `steps` units (negative steps go back in time).
///
/// The day of month is clamped to the length of the target month, so
/// January 31st plus one month is the last day of February. Results outside
/// chrono's representable range leave `date` unchanged.
pub fn shift(date: NaiveDate, unit: ShiftUnit, steps: i32) -> NaiveDate {
    let months_per_step = match unit {
        ShiftUnit::Year => 12,
        ShiftUnit::Quarter => 3,
        ShiftUnit::Month => 1,
    };
    let months = months_per_step * steps.unsigned_abs();
    let shifted = if steps >= 0 {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    };
    shifted.unwrap_or(date)
}

/// Returns the inclusive `(start, end)` range of the period containing `date`.
pub fn period_range(period: Period, date: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        Period::Day => (date, date),
        Period::Week => {
            let monday = start_of_week(date);
            (monday, add_days(monday, 6))
        }
        Period::Month => {
            let first = first_of_month(date);
            let last = add_days(first, i64::from(days_in_month(first.year(), first.month())) - 1);
            (first, last)
        }
        Period::Quarter => {
            let first_month = (quarter(date) - 1) * 3 + 1;
            let first = date.with_day(1).and_then(|d| d.with_month(first_month)).unwrap_or(date);
            let last_month = first_month + 2;
            let last = NaiveDate::from_ymd_opt(first.year(), last_month, days_in_month(first.year(), last_month))
                .unwrap_or(first);
            (first, last)
        }
        Period::Year => {
            let first = NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date);
            let last = NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date);
            (first, last)
        }
    }
}

/// Short English weekday names in Monday-first grid order.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// Returns true for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_week_jan_first_belongs_to_previous_year() {
        assert_eq!(
            iso_week_info(date(2023, 1, 1)),
            IsoWeekInfo {
                week: 52,
                iso_year: 2022
            }
        );
    }

    #[test]
    fn test_iso_week_late_december_belongs_to_next_year() {
        // 2024-12-30 is a Monday in the week containing Thursday 2025-01-02.
        assert_eq!(
            iso_week_info(date(2024, 12, 30)),
            IsoWeekInfo {
                week: 1,
                iso_year: 2025
            }
        );
    }

    #[test]
    fn test_iso_week_53() {
        // 2020 starts on a Wednesday and is a leap year, so it has 53 weeks.
        assert_eq!(iso_week_info(date(2020, 12, 31)).week, 53);
        assert_eq!(iso_week_info(date(2021, 1, 3)).week, 53);
        assert_eq!(iso_week_info(date(2021, 1, 3)).iso_year, 2020);
    }

    #[test]
    fn test_jan_first_friday_saturday_sunday_use_previous_iso_year() {
        // 2021-01-01 Friday, 2022-01-01 Saturday, 2023-01-01 Sunday
        for year in [2021, 2022, 2023] {
            let info = iso_week_info(date(year, 1, 1));
            assert_eq!(info.iso_year, year - 1, "year {year}");
            assert!(info.week >= 52);
        }
    }

    #[test]
    fn test_quarter() {
        assert_eq!(quarter(date(2024, 1, 1)), 1);
        assert_eq!(quarter(date(2024, 3, 31)), 1);
        assert_eq!(quarter(date(2024, 4, 1)), 2);
        assert_eq!(quarter(date(2024, 9, 30)), 3);
        assert_eq!(quarter(date(2024, 12, 31)), 4);
    }

    #[test]
    fn test_first_weekday_and_leading_days() {
        // February 2024 starts on a Thursday.
        assert_eq!(first_weekday_of_month(date(2024, 2, 14)), 4);
        assert_eq!(leading_days_from_prev_month(4), 3);
        // September 2024 starts on a Sunday.
        assert_eq!(first_weekday_of_month(date(2024, 9, 10)), 0);
        assert_eq!(leading_days_from_prev_month(0), 6);
        // July 2024 starts on a Monday.
        assert_eq!(leading_days_from_prev_month(first_weekday_of_month(date(2024, 7, 1))), 0);
    }

    #[test]
    fn test_month_grid_february_2024() {
        let grid = month_grid(date(2024, 2, 10));
        assert_eq!(grid.len(), 5);

        let first_row = &grid[0];
        assert_eq!(first_row[0].date, date(2024, 1, 29));
        assert_eq!(first_row[1].date, date(2024, 1, 30));
        assert_eq!(first_row[2].date, date(2024, 1, 31));
        assert!(first_row[..3].iter().all(|d| d.is_other_month));
        assert_eq!(first_row[3].date, date(2024, 2, 1));
        assert!(!first_row[3].is_other_month);

        let last_row = &grid[4];
        assert_eq!(last_row[3].date, date(2024, 2, 29));
        assert!(!last_row[3].is_other_month);
        assert_eq!(last_row[4].date, date(2024, 3, 1));
        assert_eq!(last_row[6].date, date(2024, 3, 3));
        assert!(last_row[4..].iter().all(|d| d.is_other_month));
    }

    #[test]
    fn test_month_grid_six_rows_when_month_starts_sunday() {
        // September 2024: 6 leading days + 30 days = 36 cells.
        let grid = month_grid(date(2024, 9, 1));
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0][6].date, date(2024, 9, 1));
    }

    #[test]
    fn test_month_grid_rows_start_on_monday() {
        for row in month_grid(date(2025, 6, 1)) {
            assert_eq!(row[0].date.weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn test_shift_month_rollover() {
        assert_eq!(shift(date(2024, 12, 15), ShiftUnit::Month, 1), date(2025, 1, 15));
        assert_eq!(shift(date(2024, 1, 15), ShiftUnit::Month, -1), date(2023, 12, 15));
    }

    #[test]
    fn test_shift_clamps_day_of_month() {
        assert_eq!(shift(date(2024, 1, 31), ShiftUnit::Month, 1), date(2024, 2, 29));
        assert_eq!(shift(date(2024, 2, 29), ShiftUnit::Year, 1), date(2025, 2, 28));
    }

    #[test]
    fn test_shift_quarter_and_year() {
        assert_eq!(shift(date(2024, 11, 5), ShiftUnit::Quarter, 1), date(2025, 2, 5));
        assert_eq!(shift(date(2024, 2, 5), ShiftUnit::Quarter, -1), date(2023, 11, 5));
        assert_eq!(shift(date(2024, 6, 1), ShiftUnit::Year, -1), date(2023, 6, 1));
    }

    #[test]
    fn test_period_ranges() {
        let d = date(2024, 5, 15); // Wednesday
        assert_eq!(period_range(Period::Day, d), (d, d));
        assert_eq!(period_range(Period::Week, d), (date(2024, 5, 13), date(2024, 5, 19)));
        assert_eq!(period_range(Period::Month, d), (date(2024, 5, 1), date(2024, 5, 31)));
        assert_eq!(period_range(Period::Quarter, d), (date(2024, 4, 1), date(2024, 6, 30)));
        assert_eq!(period_range(Period::Year, d), (date(2024, 1, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_period_range_quarter_from_last_day_of_month() {
        assert_eq!(
            period_range(Period::Quarter, date(2024, 8, 31)),
            (date(2024, 7, 1), date(2024, 9, 30))
        );
    }

    #[test]
    fn test_add_days_saturates() {
        assert_eq!(add_days(date(2024, 2, 28), 2), date(2024, 3, 1));
        assert_eq!(add_days(NaiveDate::MAX, 1), NaiveDate::MAX);
        assert_eq!(add_days(NaiveDate::MIN, -1), NaiveDate::MIN);
    }

    #[test]
    fn test_range_limits_do_not_panic() {
        for edge in [NaiveDate::MIN, NaiveDate::MAX] {
            let grid = month_grid(edge);
            assert!(grid.iter().flatten().any(|cell| cell.date == edge && !cell.is_other_month));

            for period in [Period::Day, Period::Week, Period::Month, Period::Quarter, Period::Year] {
                let (start, end) = period_range(period, edge);
                assert!(start <= edge && edge <= end, "{period:?} {edge}");
            }
            assert!(start_of_week(edge) <= edge);
            assert_eq!(shift(edge, ShiftUnit::Year, if edge == NaiveDate::MAX { 1 } else { -1 }), edge);
        }


        // Padding past the last representable day repeats it as an other-month cell
        let cells: Vec<GridDay> = month_grid(NaiveDate::MAX).into_iter().flatten().collect();
        let in_month = cells.iter().filter(|cell| cell.date == NaiveDate::MAX && !cell.is_other_month);
        assert_eq!(in_month.count(), 1);
    }

    #[test]
    fn test_year_grid() {
        let grids = year_grid(2024);
        assert_eq!(grids.len(), 12);
        assert_eq!(grids[1].month, 2);
        assert_eq!(grids[1].rows.len(), 5);
    }
}
