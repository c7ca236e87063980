use std::{fmt, str::FromStr, sync::LazyLock};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use regex::Regex;
use rust_decimal::Decimal;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single cell. Loaded cells are `Empty` or `Raw`; once the pipeline has run
/// every cell is `Text`, `Number` or `Timestamp` according to its column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Empty,
    Raw(String),
    Text(String),
    Number(Decimal),
    Timestamp(NaiveDateTime),
}

impl Value {
    /// Builds a loaded cell, treating blanks and missing-value tokens as `Empty`.
    pub fn from_raw(raw: &str) -> Self {
        if is_missing_token(raw) {
            Value::Empty
        } else {
            Value::Raw(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    /// The unprocessed text of a loaded cell.
    pub fn raw(&self) -> Option<&str> {
        match self {
            Value::Raw(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Empty => String::new(),
            Value::Raw(s) | Value::Text(s) => s.clone(),
            Value::Number(d) => d.to_string(),
            Value::Timestamp(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

/// Result of parsing one cell: a value, a failed parse, or nothing to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome<T> {
    Parsed(T),
    Failed,
    Missing,
}

impl<T> CellOutcome<T> {
    pub fn from_option(parsed: Option<T>) -> Self {
        match parsed {
            Some(value) => CellOutcome::Parsed(value),
            None => CellOutcome::Failed,
        }
    }

    /// Failed and missing parses both collapse to `Value::Empty`.
    pub fn into_value(self, wrap: impl FnOnce(T) -> Value) -> Value {
        match self {
            CellOutcome::Parsed(value) => wrap(value),
            CellOutcome::Failed | CellOutcome::Missing => Value::Empty,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CellOutcome::Failed)
    }
}

/// Tokens read as missing, matched exactly and case-sensitively.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing_token(value: &str) -> bool {
    value.is_empty() || MISSING_TOKENS.contains(&value)
}

// Month-first variants precede day-first ones so ambiguous dates read as US
// order, and day-first only applies when the month-first reading is invalid.
// Two-digit year forms precede four-digit ones because `%Y` accepts "24";
// anything outside four-digit years is rejected.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%m-%d-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M:%S",
    "%m-%d-%Y %H:%M",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%y",
    "%d/%m/%y",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y/%m/%d",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Parses a date or date/time in any of the supported layouts. Dates without a
/// time component resolve to midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let datetimes = DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok());
    let rfc3339 = DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|parsed| parsed.naive_local());
    let dates = DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .filter_map(|date| date.and_hms_opt(0, 0, 0));
    datetimes
        .chain(rfc3339)
        .chain(dates)
        .find(|parsed| (1000..=9999).contains(&parsed.year()))
}

static PLAIN_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("valid plain number pattern")
});

/// True for an undecorated number such as `-5`, `+0.25`, `.5` or `1e3`.
pub fn looks_plain_number(value: &str) -> bool {
    PLAIN_NUMBER.is_match(value.trim())
}

pub fn strip_numeric_decoration(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | ','))
        .collect()
}

/// Parses a decorated number such as `$1,234.56` into a normalized decimal.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let cleaned = strip_numeric_decoration(value);
    let trimmed = cleaned.trim();
    let trimmed = match trimmed.strip_suffix('.') {
        Some(rest) if rest.ends_with(|c: char| c.is_ascii_digit()) => rest,
        _ => trimmed,
    };
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .map(|d| d.normalize())
}
