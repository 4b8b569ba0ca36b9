//! Recency window and free-text date recognition.
//!
//! [`find_recent_dates`] scans text with a fixed, ordered list of date-shaped
//! patterns and keeps every match that parses under one of the supported
//! formats and falls inside a [`Window`]. The window carries its own "now",
//! so one run (or one test) compares every date against the same instant.
//!
//! # Supported parse formats
//!
//! | Shape | Example |
//! |-------|---------|
//! | `%Y-%m-%d` | `2025-03-08` |
//! | `%d/%m/%Y` | `08/03/2025` |
//! | `D de Month de YYYY` | `8 de março de 2025` |
//! | `%Y.%m.%d` | `2025.03.08` |
//! | `%B %d, %Y` | `March 8, 2025` (full English month name only) |
//! | `%d.%m.%Y` | `08.03.2025` |
//! | `%d-%m-%Y` | `08-03-2025` |
//! | `%Y/%m/%d` | `2025/03/08` |
//! | `%Y%m%d` | `20250308` |
//! | `%Y-%m-%dT%H:%M:%S` | `2025-03-08T10:00:00` |
//! | `%Y年%m月%d日` | `2025年3月8日` |
//!
//! Anything the patterns catch that none of these formats accept (for
//! example `March 2025` or `25/03/08`) is dropped without error.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing span of days ending at a fixed "now", inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    now: NaiveDateTime,
    days: u32,
}

impl Window {
    /// Window ending at the current local wall-clock time.
    pub fn trailing_days(days: u32) -> Self {
        Self::at(Local::now().naive_local(), days)
    }

    /// Window ending at an explicit instant.
    pub fn at(now: NaiveDateTime, days: u32) -> Self {
        Self { now, days }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Earliest instant inside the window. Spans reaching past the
    /// representable calendar clamp to [`NaiveDateTime::MIN`].
    pub fn start(&self) -> NaiveDateTime {
        self.now
            .checked_sub_signed(Duration::days(i64::from(self.days)))
            .unwrap_or(NaiveDateTime::MIN)
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start() <= instant && instant <= self.now
    }

    /// Parse `text` with a single strftime format and test it against the window.
    ///
    /// Used by extractors that read a date field directly instead of scanning.
    pub fn contains_text(&self, text: &str, format: &str) -> bool {
        parse_with(text, format).is_some_and(|instant| self.contains(instant))
    }
}

/// Parse `text` with one strftime format. Date-only formats resolve to midnight.
pub fn parse_with(text: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, format)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d{4}-\d{2}-\d{2}",
        r"\d{2}/\d{2}/\d{4}",
        r"\d{1,2} de \w+ de \d{4}",
        r"\d{4}\.\d{2}\.\d{2}",
        r"\w+ \d{1,2}, \d{4}",
        r"\d{2}-\d{2}-\d{4}",
        r"\w{3} \d{1,2}, \d{4}",
        r"\d{1,2} \w{3} \d{4}",
        r"\d{4}/\d{2}/\d{2}",
        r"\d{8}",
        r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}",
        r"\w+ de \d{4}",
        r"\w+ \d{1,2}(?:st|nd|rd|th), \d{4}",
        r"\d{4}\w{3}\d{2}",
        r"\d{2}/\d{2}/\d{2}",
        r"\w{3}, \d{4}",
        r"\d{4}-\d{2}",
        r"\d{4}, \w{3} \d{1,2}(?:st|nd|rd|th)",
        r"\d{2}\.\d{2}\.\d{4}",
        r"\d{4}年\d{1,2}月\d{1,2}日",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("date pattern must compile"))
    .collect()
});

static LONG_FORM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2}) de (\w+) de (\d{4})$").expect("long-form pattern must compile"));

enum DateFormat {
    Strftime(&'static str),
    /// `%B %d, %Y`, restricted to full month names; chrono's `%B` would
    /// also take `Mar`.
    FullMonthName,
    /// `D de Month de YYYY`, with English or Portuguese month names.
    LongForm,
}

const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Strftime("%Y-%m-%d"),
    DateFormat::Strftime("%d/%m/%Y"),
    DateFormat::LongForm,
    DateFormat::Strftime("%Y.%m.%d"),
    DateFormat::FullMonthName,
    DateFormat::Strftime("%d.%m.%Y"),
    DateFormat::Strftime("%d-%m-%Y"),
    DateFormat::Strftime("%Y/%m/%d"),
    DateFormat::Strftime("%Y%m%d"),
    DateFormat::Strftime("%Y-%m-%dT%H:%M:%S"),
    DateFormat::Strftime("%Y年%m月%d日"),
];

const MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("janeiro", 1),
    ("february", 2),
    ("fevereiro", 2),
    ("march", 3),
    ("março", 3),
    ("marco", 3),
    ("april", 4),
    ("abril", 4),
    ("may", 5),
    ("maio", 5),
    ("june", 6),
    ("junho", 6),
    ("july", 7),
    ("julho", 7),
    ("august", 8),
    ("agosto", 8),
    ("september", 9),
    ("setembro", 9),
    ("october", 10),
    ("outubro", 10),
    ("november", 11),
    ("novembro", 11),
    ("december", 12),
    ("dezembro", 12),
];

const ENGLISH_MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn parse_full_month_name(text: &str) -> Option<NaiveDateTime> {
    let month = text.split_whitespace().next()?.to_lowercase();
    if !ENGLISH_MONTHS.contains(&month.as_str()) {
        return None;
    }
    parse_with(text, "%B %d, %Y")
}

fn parse_long_form(text: &str) -> Option<NaiveDateTime> {
    let caps = LONG_FORM.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let name = caps[2].to_lowercase();
    let month = MONTHS.iter().find(|(m, _)| *m == name).map(|(_, n)| *n)?;
    let year: i32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)
}

/// Parse a raw match with the first supported format that accepts it.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    DATE_FORMATS.iter().find_map(|format| match format {
        DateFormat::Strftime(f) => parse_with(text, f),
        DateFormat::FullMonthName => parse_full_month_name(text),
        DateFormat::LongForm => parse_long_form(text),
    })
}

/// Return every date-shaped substring of `text` that falls inside `window`.
///
/// Patterns are applied in priority order and each contributes its
/// non-overlapping matches, so the same text may be returned more than once.
/// The original substrings are returned, not normalized dates.
pub fn find_recent_dates(text: &str, window: &Window) -> Vec<String> {
    let mut kept = Vec::new();
    for pattern in DATE_PATTERNS.iter() {
        for m in pattern.find_iter(text) {
            let raw = m.as_str();
            if parse_date(raw).is_some_and(|instant| window.contains(instant)) {
                kept.push(raw.to_string());
            }
        }
    }
    kept
}
