//! Parsing and construction options.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarMode;

/// Options threaded through parsers and point constructors.
///
/// `Config` replaces any process-wide default: two threads can parse with
/// different calendar modes at the same time.
///
/// # Examples
///
/// ```
/// use isodatetime::{CalendarMode, Config};
///
/// let config = Config::default()
///     .with_calendar(CalendarMode::Day360)
///     .with_expanded_year_digits(2);
/// assert_eq!(config.expanded_year_digits, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Day-counting rules for every point built under this config.
    pub calendar: CalendarMode,
    /// Extra year digits beyond four, signalled by a leading `+`/`-`.
    pub expanded_year_digits: u8,
    /// Offset given to parsed points that carry no zone designator. `None`
    /// leaves such points time-zone naive.
    pub assumed_offset_minutes: Option<i32>,
    /// Accept truncated representations such as `--0501` or `-W031`.
    pub allow_truncated: bool,
    /// Reject extended (separator) forms.
    pub allow_only_basic: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar: CalendarMode::Gregorian,
            expanded_year_digits: 0,
            assumed_offset_minutes: Some(0),
            allow_truncated: true,
            allow_only_basic: false,
        }
    }
}

impl Config {
    pub fn with_calendar(mut self, calendar: CalendarMode) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn with_expanded_year_digits(mut self, digits: u8) -> Self {
        self.expanded_year_digits = digits;
        self
    }

    pub fn with_assumed_offset(mut self, offset_minutes: Option<i32>) -> Self {
        self.assumed_offset_minutes = offset_minutes;
        self
    }

    pub fn with_allow_truncated(mut self, allow: bool) -> Self {
        self.allow_truncated = allow;
        self
    }

    pub fn with_allow_only_basic(mut self, only_basic: bool) -> Self {
        self.allow_only_basic = only_basic;
        self
    }
}
