//! Date templates for note file names and previews.
//!
//! Templates use the token vocabulary common to date-formatting libraries
//! (`YYYY-MM-DD`, `dddd, MMMM Do`, ...). Text inside `[...]` is copied
//! verbatim. Three tokens are resolved before the generic vocabulary so that
//! they always mean the same thing:
//!
//! | Token  | Meaning                                   |
//! |--------|-------------------------------------------|
//! | `GGGG` | ISO week-numbering year                   |
//! | `WW`   | ISO week number, zero-padded to 2 digits  |
//! | `Q`    | Quarter (1-4)                             |
//!
//! Generic tokens: `YYYY`, `YY`, `M`, `MM`, `MMM`, `MMMM`, `D`, `DD`, `Do`,
//! `DDD`, `DDDD` (day of year), `d` (0 = Sunday), `dd`, `ddd`, `dddd`, `E`
//! (ISO weekday), `W` (ISO week), `w`, `ww`, `gggg` (Sunday-start week in
//! which January 1st falls in week 1).

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::date_math::{add_days, iso_week_info, quarter};

/// Text shown in place of a preview when a template cannot be rendered.
pub const INVALID_FORMAT_PLACEHOLDER: &str = "Invalid date format";

/// Errors that can occur while reading a template.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatError {
    /// A `[` literal was never closed.
    #[error("unterminated literal starting at position {position}")]
    UnterminatedLiteral {
        /// Byte offset of the opening bracket.
        position: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    IsoWeekYear,
    IsoWeekPadded,
    Quarter,
    Year,
    YearShort,
    MonthName,
    MonthShortName,
    MonthPadded,
    Month,
    DayOfYearPadded,
    DayOfYear,
    DayPadded,
    DayOrdinal,
    Day,
    WeekdayName,
    WeekdayShortName,
    WeekdayMinName,
    Weekday,
    IsoWeekday,
    IsoWeek,
    LocaleWeekYear,
    LocaleWeekPadded,
    LocaleWeek,
}

/// Token spellings in match order: the week/quarter tokens first, then the
/// generic vocabulary longest-first.
const TOKENS: &[(&str, Token)] = &[
    ("GGGG", Token::IsoWeekYear),
    ("WW", Token::IsoWeekPadded),
    ("Q", Token::Quarter),
    ("YYYY", Token::Year),
    ("MMMM", Token::MonthName),
    ("DDDD", Token::DayOfYearPadded),
    ("dddd", Token::WeekdayName),
    ("gggg", Token::LocaleWeekYear),
    ("MMM", Token::MonthShortName),
    ("DDD", Token::DayOfYear),
    ("ddd", Token::WeekdayShortName),
    ("YY", Token::YearShort),
    ("MM", Token::MonthPadded),
    ("DD", Token::DayPadded),
    ("Do", Token::DayOrdinal),
    ("dd", Token::WeekdayMinName),
    ("ww", Token::LocaleWeekPadded),
    ("M", Token::Month),
    ("D", Token::Day),
    ("d", Token::Weekday),
    ("E", Token::IsoWeekday),
    ("W", Token::IsoWeek),
    ("w", Token::LocaleWeek),
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Token(Token),
}

/// Splits a template into literal text and tokens.
fn lex(template: &str) -> Result<Vec<Piece>, FormatError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut rest = template;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            let position = template.len() - rest.len();
            let close = rest.find(']').ok_or(FormatError::UnterminatedLiteral { position })?;
            literal.push_str(&rest[1..close]);
            rest = &rest[close + 1..];
            continue;
        }

        if let Some((spelling, token)) = TOKENS.iter().find(|(spelling, _)| rest.starts_with(spelling)) {
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Token(*token));
            rest = &rest[spelling.len()..];
            continue;
        }

        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

fn ordinal_suffix(n: u32) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Sunday-start week in which the week containing January 1st is week 1.
/// Returns `(week_year, week)`.
fn locale_week(date: NaiveDate) -> (i32, u32) {
    let saturday = add_days(date, i64::from(6 - date.weekday().num_days_from_sunday()));
    (saturday.year(), saturday.ordinal0() / 7 + 1)
}

fn render(token: Token, date: NaiveDate) -> String {
    let weekday = date.weekday().num_days_from_sunday() as usize;
    match token {
        Token::IsoWeekYear => format!("{:04}", iso_week_info(date).iso_year),
        Token::IsoWeekPadded => format!("{:02}", iso_week_info(date).week),
        Token::Quarter => quarter(date).to_string(),
        Token::Year => format!("{:04}", date.year()),
        Token::YearShort => format!("{:02}", date.year().rem_euclid(100)),
        Token::MonthName => date.format("%B").to_string(),
        Token::MonthShortName => date.format("%b").to_string(),
        Token::MonthPadded => format!("{:02}", date.month()),
        Token::Month => date.month().to_string(),
        Token::DayOfYearPadded => format!("{:03}", date.ordinal()),
        Token::DayOfYear => date.ordinal().to_string(),
        Token::DayPadded => format!("{:02}", date.day()),
        Token::DayOrdinal => format!("{}{}", date.day(), ordinal_suffix(date.day())),
        Token::Day => date.day().to_string(),
        Token::WeekdayName => date.format("%A").to_string(),
        Token::WeekdayShortName => date.format("%a").to_string(),
        Token::WeekdayMinName => date.format("%a").to_string().chars().take(2).collect(),
        Token::Weekday => weekday.to_string(),
        Token::IsoWeekday => date.weekday().number_from_monday().to_string(),
        Token::IsoWeek => iso_week_info(date).week.to_string(),
        Token::LocaleWeekYear => format!("{:04}", locale_week(date).0),
        Token::LocaleWeekPadded => format!("{:02}", locale_week(date).1),
        Token::LocaleWeek => locale_week(date).1.to_string(),
    }
}

/// Renders `date` with `template`.
///
/// # Errors
///
/// Returns `FormatError::UnterminatedLiteral` if a `[` is never closed.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use vault_calendar_core::note_format::format;
///
/// let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// assert_eq!(format(date, "YYYY-MM-DD").unwrap(), "2023-01-01");
/// assert_eq!(format(date, "GGGG-[W]WW").unwrap(), "2022-W52");
/// assert_eq!(format(date, "YYYY-[Q]Q").unwrap(), "2023-Q1");
/// ```
pub fn format(date: NaiveDate, template: &str) -> Result<String, FormatError> {
    let pieces = lex(template)?;
    let mut out = String::with_capacity(template.len() + 8);
    for piece in pieces {
        match piece {
            Piece::Literal(text) => out.push_str(&text),
            Piece::Token(token) => out.push_str(&render(token, date)),
        }
    }
    Ok(out)
}

/// Renders `date` with `template`, or returns
/// [`INVALID_FORMAT_PLACEHOLDER`] when the template is malformed.
pub fn format_or_placeholder(date: NaiveDate, template: &str) -> String {
    format(date, template).unwrap_or_else(|_| INVALID_FORMAT_PLACEHOLDER.to_string())
}

#[derive(Debug, Default)]
struct ParsedFields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    quarter: Option<u32>,
    iso_year: Option<i32>,
    iso_week: Option<u32>,
}

/// Reads between `min` and `max` ASCII digits from the start of `text`.
fn take_digits(text: &str, min: usize, max: usize) -> Option<(u32, &str)> {
    let len = text
        .bytes()
        .take(max)
        .take_while(u8::is_ascii_digit)
        .count();
    if len < min {
        return None;
    }
    let value = text[..len].parse().ok()?;
    Some((value, &text[len..]))
}

/// Parses `text` produced by [`format`] with the same `template` back into a
/// date.
///
/// Supports the numeric tokens `YYYY`, `MM`, `M`, `DD`, `D`, `Q`, `GGGG` and
/// `WW`. Missing fields default to the start of the period: `YYYY-MM` parses
/// to the first of the month, `YYYY-[Q]Q` to the first day of the quarter,
/// `GGGG-[W]WW` to the Monday of the ISO week. Returns `None` if the text
/// does not match the template or the template uses other tokens.
pub fn parse(text: &str, template: &str) -> Option<NaiveDate> {
    let pieces = lex(template).ok()?;
    let mut fields = ParsedFields::default();
    let mut rest = text;

    for piece in pieces {
        match piece {
            Piece::Literal(literal) => rest = rest.strip_prefix(literal.as_str())?,
            Piece::Token(token) => {
                let (value, remaining) = match token {
                    Token::Year | Token::IsoWeekYear => take_digits(rest, 4, 4)?,
                    Token::MonthPadded | Token::DayPadded | Token::IsoWeekPadded => take_digits(rest, 2, 2)?,
                    Token::Month | Token::Day => take_digits(rest, 1, 2)?,
                    Token::Quarter => take_digits(rest, 1, 1)?,
                    _ => return None,
                };
                match token {
                    Token::Year => fields.year = Some(value as i32),
                    Token::IsoWeekYear => fields.iso_year = Some(value as i32),
                    Token::MonthPadded | Token::Month => fields.month = Some(value),
                    Token::DayPadded | Token::Day => fields.day = Some(value),
                    Token::IsoWeekPadded => fields.iso_week = Some(value),
                    Token::Quarter => fields.quarter = Some(value),
                    _ => return None,
                }
                rest = remaining;
            }
        }
    }

    if !rest.is_empty() {
        return None;
    }

    if let (Some(iso_year), Some(week)) = (fields.iso_year, fields.iso_week) {
        return NaiveDate::from_isoywd_opt(iso_year, week, chrono::Weekday::Mon);
    }

    let year = fields.year?;
    let month = match (fields.month, fields.quarter) {
        (Some(month), _) => month,
        (None, Some(q)) if (1..=4).contains(&q) => (q - 1) * 3 + 1,
        (None, Some(_)) => return None,
        (None, None) => 1,
    };
    NaiveDate::from_ymd_opt(year, month, fields.day.unwrap_or(1))
}
