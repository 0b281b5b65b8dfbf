//! Error types for isodatetime operations.

use thiserror::Error;

/// A field combination that is not a valid date under the active calendar mode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("month {month} out of bounds 1-12")]
    Month { month: i64 },

    #[error("day {day} out of bounds 1-{max} for {year:04}-{month:02}")]
    DayOfMonth { year: i64, month: u32, day: i64, max: u32 },

    #[error("day-of-year {day} out of bounds 1-{max} for year {year}")]
    DayOfYear { year: i64, day: i64, max: u32 },

    #[error("week {week} out of bounds 1-{max} for week-year {year}")]
    Week { year: i64, week: i64, max: u32 },

    #[error("day-of-week {day} out of bounds 1-7")]
    DayOfWeek { day: i64 },

    #[error("year {year} is outside the supported range")]
    YearRange { year: i64 },
}

/// Malformed ISO 8601 text.
///
/// `position` is the furthest byte offset any grammar rule reached before
/// failing; `expected` lists the rules that got that far.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Invalid ISO 8601 {kind} representation: '{input}' (no rule matched at position {position}; tried {})",
    .expected.join(", ")
)]
pub struct ParseError {
    pub kind: &'static str,
    pub input: String,
    pub position: usize,
    pub expected: Vec<String>,
}

impl ParseError {
    pub(crate) fn new(kind: &'static str, input: &str, position: usize, expected: Vec<String>) -> Self {
        Self {
            kind,
            input: input.to_string(),
            position,
            expected,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IsoError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Invalid calendar date: {0}")]
    Calendar(#[from] CalendarError),

    #[error("Invalid time point: {0}")]
    TimePoint(String),

    #[error("Invalid duration: {0}")]
    Duration(String),

    #[error("Cannot compare: {0}")]
    Comparison(String),

    #[error("Cannot format: {0}")]
    Format(String),

    #[error("Invalid recurrence: {0}")]
    Recurrence(String),
}

pub type Result<T> = std::result::Result<T, IsoError>;
