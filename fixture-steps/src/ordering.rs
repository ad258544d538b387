// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Order Verification
//!
//! Asserts that a sequence of scalars is sorted in a given direction.
//!
//! Values are normalized before comparison. The branch is chosen once, from
//! the first element only:
//! - a first element that reads as a date and is not purely numeric turns the
//!   whole sequence into Unix timestamps;
//! - anything else compares text case-insensitively and numbers by magnitude.
//!
//! Later elements never re-trigger detection, so `["5", "2020-01-01"]` is
//! compared as plain text. In a date sequence, numbers and numeric text are
//! parse failures; write `@<seconds>` for an explicit Unix timestamp.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FixtureError, FixtureResult};

/// Diagnostic attached to failures when date normalization was applied.
pub const DATE_NORMALIZATION_NOTE: &str = "Array of dates converted to unix timestamp for comparison";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%b %d, %Y %I:%M:%S %p",
    "%B %d, %Y %I:%M:%S %p",
    "%b %d, %Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// A scalar under comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderedValue {
    /// Numeric literal.
    Number(f64),
    /// Free text or a date-like string.
    Text(String),
}

impl OrderedValue {
    /// Returns true for numbers and for text that is purely a decimal number.
    pub fn is_numeric(&self) -> bool {
        match self {
            OrderedValue::Number(_) => true,
            OrderedValue::Text(text) => is_numeric_text(text),
        }
    }

    fn render(&self) -> String {
        match self {
            OrderedValue::Number(n) => format_number(*n),
            OrderedValue::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for OrderedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderedValue::Number(n) => write!(f, "{}", format_number(*n)),
            OrderedValue::Text(text) => write!(f, "'{}'", text),
        }
    }
}

impl From<&str> for OrderedValue {
    fn from(value: &str) -> Self {
        OrderedValue::Text(value.to_string())
    }
}

impl From<String> for OrderedValue {
    fn from(value: String) -> Self {
        OrderedValue::Text(value)
    }
}

impl From<f64> for OrderedValue {
    fn from(value: f64) -> Self {
        OrderedValue::Number(value)
    }
}

impl From<i64> for OrderedValue {
    fn from(value: i64) -> Self {
        OrderedValue::Number(value as f64)
    }
}

impl From<i32> for OrderedValue {
    fn from(value: i32) -> Self {
        OrderedValue::Number(f64::from(value))
    }
}

/// Direction a sequence must be sorted in.
///
/// Step arguments are read leniently: `asc`/`ascending` in any case select
/// ascending, every other value selects descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Reads a sort order argument as passed by a test script.
    pub fn from_order_arg(arg: &str) -> Self {
        match arg.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }

    /// Short form used in scripts.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    fn accepts(&self, previous: &SortKey, current: &SortKey) -> bool {
        match (self, previous.compare(current)) {
            (_, None) => false,
            (_, Some(Ordering::Equal)) => true,
            (SortDirection::Ascending, Some(ord)) => ord == Ordering::Less,
            (SortDirection::Descending, Some(ord)) => ord == Ordering::Greater,
        }
    }
}

impl From<String> for SortDirection {
    fn from(value: String) -> Self {
        Self::from_order_arg(&value)
    }
}

impl From<SortDirection> for String {
    fn from(value: SortDirection) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Normalization branch applied to a whole sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Normalization {
    /// Every element converted to a Unix timestamp.
    Dates,
    /// Text lowercased, numbers kept as numbers.
    Plain,
}

impl Normalization {
    /// Diagnostic to attach to a failure, if any.
    pub fn diagnostic(&self) -> Option<&'static str> {
        match self {
            Normalization::Dates => Some(DATE_NORMALIZATION_NOTE),
            Normalization::Plain => None,
        }
    }
}

/// An adjacent pair that breaks the requested order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortViolation {
    /// Index of the later element of the pair.
    pub index: usize,
    /// Original value at `index - 1`.
    pub previous: OrderedValue,
    /// Original value at `index`.
    pub current: OrderedValue,
}

/// Outcome of checking one sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortReport {
    direction: SortDirection,
    normalization: Normalization,
    checked: usize,
    violations: Vec<SortViolation>,
}

impl SortReport {
    /// Whether every adjacent pair is in order.
    pub fn is_sorted(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn normalization(&self) -> Normalization {
        self.normalization
    }

    /// Number of elements checked.
    pub fn checked(&self) -> usize {
        self.checked
    }

    /// All violations, in sequence order.
    pub fn violations(&self) -> &[SortViolation] {
        &self.violations
    }

    /// The violation a failure is reported on.
    pub fn first_violation(&self) -> Option<&SortViolation> {
        self.violations.first()
    }

    /// Failure message for the first violation, if any.
    pub fn failure_message(&self) -> Option<String> {
        let violation = self.first_violation()?;
        let relation = match self.direction {
            SortDirection::Ascending => "greater than or equal to",
            SortDirection::Descending => "less than or equal to",
        };
        let mut message = format!(
            "element {} {} is not {} element {} {} ({} order, {} violation(s))",
            violation.index,
            violation.current,
            relation,
            violation.index - 1,
            violation.previous,
            self.direction,
            self.violations.len()
        );
        if let Some(note) = self.normalization.diagnostic() {
            message = format!("{}: {}", note, message);
        }
        Some(message)
    }

    /// Turns an unsorted report into an assertion error.
    pub fn into_result(self) -> FixtureResult<()> {
        match self.failure_message() {
            Some(message) => Err(FixtureError::assertion(message)),
            None => Ok(()),
        }
    }
}

/// Normalized comparison key.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Timestamp(i64),
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Option<Ordering> {
        match (self, other) {
            (SortKey::Timestamp(a), SortKey::Timestamp(b)) => Some(a.cmp(b)),
            (SortKey::Number(a), SortKey::Number(b)) => a.partial_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => Some(a.cmp(b)),
            (SortKey::Number(a), SortKey::Text(b)) => Some(format_number(*a).as_str().cmp(b)),
            (SortKey::Text(a), SortKey::Number(b)) => Some(a.as_str().cmp(&format_number(*b))),
            // Timestamps only ever appear alongside other timestamps.
            _ => None,
        }
    }
}

/// Checks whether `values` are sorted in `direction` after normalization.
///
/// Returns an error only for unusable input: an empty sequence, or an element
/// of a date-normalized sequence that is not a date. Ordering mismatches are
/// part of the returned report.
pub fn verify_sorted(values: &[OrderedValue], direction: SortDirection) -> FixtureResult<SortReport> {
    let first = values
        .first()
        .ok_or_else(|| FixtureError::invalid_input("cannot verify the order of an empty sequence"))?;

    let now = Utc::now();
    let normalization = if !first.is_numeric() && parse_value_timestamp(first, now).is_some() {
        Normalization::Dates
    } else {
        Normalization::Plain
    };
    debug!(
        "Verifying {} value(s) in {} order ({:?} normalization)",
        values.len(),
        direction,
        normalization
    );

    let keys = normalize(values, normalization, now)?;

    let violations = keys
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| !direction.accepts(&pair[0], &pair[1]))
        .map(|(i, _)| SortViolation {
            index: i + 1,
            previous: values[i].clone(),
            current: values[i + 1].clone(),
        })
        .collect();

    Ok(SortReport {
        direction,
        normalization,
        checked: values.len(),
        violations,
    })
}

/// Asserts that `values` are sorted in `direction`.
///
/// An unsorted sequence yields [`FixtureError::Assertion`].
pub fn assert_sorted(values: &[OrderedValue], direction: SortDirection) -> FixtureResult<()> {
    verify_sorted(values, direction)?.into_result()
}

fn normalize(
    values: &[OrderedValue],
    normalization: Normalization,
    now: DateTime<Utc>,
) -> FixtureResult<Vec<SortKey>> {
    match normalization {
        Normalization::Dates => values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                parse_value_timestamp(value, now)
                    .map(SortKey::Timestamp)
                    .ok_or_else(|| FixtureError::DateParse {
                        index,
                        value: value.render(),
                    })
            })
            .collect(),
        Normalization::Plain => Ok(values
            .iter()
            .map(|value| match value {
                OrderedValue::Number(n) => SortKey::Number(*n),
                OrderedValue::Text(text) => SortKey::Text(text.to_lowercase()),
            })
            .collect()),
    }
}

fn parse_value_timestamp(value: &OrderedValue, now: DateTime<Utc>) -> Option<i64> {
    match value {
        OrderedValue::Number(_) => None,
        OrderedValue::Text(text) => parse_timestamp_at(text, now),
    }
}

/// Parses a date/time expression into a Unix timestamp (seconds, UTC unless
/// the expression carries an offset).
pub fn parse_timestamp(text: &str) -> Option<i64> {
    parse_timestamp_at(text, Utc::now())
}

fn parse_timestamp_at(text: &str, now: DateTime<Utc>) -> Option<i64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Some(seconds) = text.strip_prefix('@') {
        return seconds.parse::<i64>().ok();
    }

    let midnight = |date: NaiveDate| date.and_time(NaiveTime::MIN).and_utc().timestamp();
    match text.to_ascii_lowercase().as_str() {
        "now" => return Some(now.timestamp()),
        "today" => return Some(midnight(now.date_naive())),
        "yesterday" => return Some(midnight(now.date_naive() - Duration::days(1))),
        "tomorrow" => return Some(midnight(now.date_naive() + Duration::days(1))),
        _ => {}
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.timestamp());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(dt.and_utc().timestamp());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .map(midnight)
}

fn is_numeric_text(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty()
        && text.bytes().any(|b| b.is_ascii_digit())
        && text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
        && text.parse::<f64>().is_ok()
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
