//! Lunar calendar and statutory holiday annotations.
//!
//! Astronomical data (lunar dates, solar terms, traditional festivals) comes
//! from a [`LunarSource`]; statutory holidays and adjusted workdays come from
//! a [`HolidaySchedule`] file. [`Almanac`] combines both behind the
//! [`LunarOracle`] interface the calendar view uses.

use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What a day label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarLabelKind {
    /// A festival or the first day of a statutory holiday.
    Festival,
    SolarTerm,
    /// First day of a lunar month.
    MonthName,
    DayName,
}

/// The short annotation shown under a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LunarLabel {
    pub text: String,
    pub kind: LunarLabelKind,
}

impl LunarLabel {
    fn new(text: impl Into<String>, kind: LunarLabelKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// Workday adjustment of a day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkdayStatus {
    #[default]
    Regular,
    /// Day off during a statutory holiday.
    Rest,
    /// Weekend day turned into a compensatory workday.
    Work,
}

impl WorkdayStatus {
    /// The marker shown in the day cell.
    pub fn marker(self) -> &'static str {
        match self {
            WorkdayStatus::Regular => "",
            WorkdayStatus::Rest => "休",
            WorkdayStatus::Work => "班",
        }
    }
}

/// A date in the lunar calendar, as named by a [`LunarSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunarDay {
    /// Day of the lunar month, starting at 1.
    pub day: u32,
    /// Name of the lunar month, e.g. `正月`.
    pub month_name: String,
    /// Name of the day, e.g. `初二`.
    pub day_name: String,
}

/// Provider of lunar calendar data.
pub trait LunarSource {
    fn lunar_day(&self, date: NaiveDate) -> Option<LunarDay>;

    /// Name of the solar term starting on `date`.
    fn solar_term(&self, date: NaiveDate) -> Option<String>;

    /// Name of the traditional festival on `date`.
    fn festival(&self, date: NaiveDate) -> Option<String>;
}

/// A source without any lunar data.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLunarData;

impl LunarSource for NoLunarData {
    fn lunar_day(&self, _date: NaiveDate) -> Option<LunarDay> {
        None
    }

    fn solar_term(&self, _date: NaiveDate) -> Option<String> {
        None
    }

    fn festival(&self, _date: NaiveDate) -> Option<String> {
        None
    }
}

/// Answers the two calendar annotation questions.
pub trait LunarOracle {
    /// Returns the label to show for `date`, if any.
    fn lunar_label(&self, date: NaiveDate) -> Option<LunarLabel>;

    /// Returns the workday adjustment of `date`.
    fn workday_status(&self, date: NaiveDate) -> WorkdayStatus;
}

/// Errors that can occur while loading a holiday schedule.
#[derive(Debug, Error)]
pub enum HolidayError {
    #[error("failed to read holiday file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid holiday file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A statutory holiday spanning `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Holiday {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A named day, such as a festival not covered by the lunar source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDay {
    pub name: String,
    pub date: NaiveDate,
}

/// Statutory holidays and adjusted workdays, loaded from TOML:
///
/// ```toml
/// workdays = ["2024-02-04", "2024-02-18"]
///
/// [[holidays]]
/// name = "春节"
/// start = "2024-02-10"
/// end = "2024-02-17"
///
/// [[festivals]]
/// name = "情人节"
/// date = "2024-02-14"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HolidaySchedule {
    pub holidays: Vec<Holiday>,
    /// Weekend days that are working days.
    pub workdays: Vec<NaiveDate>,
    pub festivals: Vec<NamedDay>,
}

impl HolidaySchedule {
    pub fn from_toml_str(content: &str) -> Result<Self, HolidayError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads a schedule file.
    pub async fn load(path: &Path) -> Result<Self, HolidayError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| HolidayError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml_str(&content)
    }

    fn holiday(&self, date: NaiveDate) -> Option<&Holiday> {
        self.holidays.iter().find(|h| h.contains(date))
    }

    fn festival(&self, date: NaiveDate) -> Option<&str> {
        self.festivals
            .iter()
            .find(|f| f.date == date)
            .map(|f| f.name.as_str())
    }
}

/// A [`LunarOracle`] over a lunar source and a holiday schedule.
#[derive(Debug, Clone, Default)]
pub struct Almanac<S = NoLunarData> {
    source: S,
    schedule: HolidaySchedule,
}

impl<S: LunarSource> Almanac<S> {
    pub fn new(source: S, schedule: HolidaySchedule) -> Self {
        Self { source, schedule }
    }

    pub fn schedule(&self) -> &HolidaySchedule {
        &self.schedule
    }
}

impl<S: LunarSource> LunarOracle for Almanac<S> {
    /// Priority: festival, holiday name (first day only), solar term, month
    /// name on the first lunar day, day name.
    fn lunar_label(&self, date: NaiveDate) -> Option<LunarLabel> {
        if let Some(name) = self.source.festival(date) {
            return Some(LunarLabel::new(name, LunarLabelKind::Festival));
        }
        if let Some(name) = self.schedule.festival(date) {
            return Some(LunarLabel::new(name, LunarLabelKind::Festival));
        }
        if let Some(holiday) = self.schedule.holiday(date).filter(|h| h.start == date) {
            return Some(LunarLabel::new(holiday.name.clone(), LunarLabelKind::Festival));
        }
        if let Some(term) = self.source.solar_term(date) {
            return Some(LunarLabel::new(term, LunarLabelKind::SolarTerm));
        }

        let day = self.source.lunar_day(date)?;
        Some(if day.day == 1 {
            LunarLabel::new(day.month_name, LunarLabelKind::MonthName)
        } else {
            LunarLabel::new(day.day_name, LunarLabelKind::DayName)
        })
    }

    fn workday_status(&self, date: NaiveDate) -> WorkdayStatus {
        if self.schedule.workdays.contains(&date) {
            WorkdayStatus::Work
        } else if self.schedule.holiday(date).is_some() {
            WorkdayStatus::Rest
        } else {
            WorkdayStatus::Regular
        }
    }
}
