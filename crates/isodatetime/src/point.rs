//! Calendar instants, complete or truncated.
//!
//! A complete [`TimePoint`] stores its year, one date representation
//! (calendar, week or ordinal) and the nanoseconds elapsed since local
//! midnight, plus an optional UTC offset. A truncated point (ISO 8601 §4.2.2.3
//! and §4.2.2.5, e.g. `--05-01` or `T-30`) stores only the fields that were
//! given; it has no instant of its own until resolved against a reference
//! with [`TimePoint::complete_with`].
//!
//! Points are immutable: arithmetic and conversion return new values.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, Timelike};
use serde::{Serialize, Serializer};

use crate::calendar::{check_year, CalendarMode, MAX_YEAR, NANOS_IN_DAY, NANOS_IN_SECOND, SECONDS_IN_HOUR, SECONDS_IN_MINUTE};
use crate::config::Config;
use crate::duration::Duration;
use crate::error::{CalendarError, IsoError, Result};

pub(crate) const NANOS_IN_MINUTE: i64 = SECONDS_IN_MINUTE * NANOS_IN_SECOND;
pub(crate) const NANOS_IN_HOUR: i64 = SECONDS_IN_HOUR * NANOS_IN_SECOND;
const NANOS_PER_DAY: i64 = NANOS_IN_DAY as i64;

/// Largest UTC offset magnitude, `±99:59`.
pub const MAX_OFFSET_MINUTES: i32 = 99 * 60 + 59;

/// Days scanned by [`TimePoint::complete_with`] before giving up (two
/// Gregorian 400-year cycles).
const COMPLETION_SEARCH_DAYS: i64 = 2 * 146_097;

// ── Field types ─────────────────────────────────────────────────────────────

/// The date fields of a complete point. Exactly one representation is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DateRepr {
    Calendar { month: u32, day: u32 },
    /// `year` of the owning point is the ISO week-year.
    Week { week: u32, day_of_week: u32 },
    Ordinal { day_of_year: u32 },
}

/// The low-order digits kept by a truncated year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TruncatedYear {
    /// `YY` (0-99).
    YearOfCentury(u8),
    /// `z`, as in `-z-Www` (0-9).
    YearOfDecade(u8),
}

impl TruncatedYear {
    fn value(self) -> u8 {
        match self {
            TruncatedYear::YearOfCentury(y) | TruncatedYear::YearOfDecade(y) => y,
        }
    }

    fn modulus(self) -> i64 {
        match self {
            TruncatedYear::YearOfCentury(_) => 100,
            TruncatedYear::YearOfDecade(_) => 10,
        }
    }

    fn matches(self, year: i64) -> bool {
        year.rem_euclid(self.modulus()) == i64::from(self.value())
    }

    /// First year after `year` with the same low-order digits.
    fn next_after(self, year: i64) -> i64 {
        let modulus = self.modulus();
        let candidate = year - year.rem_euclid(modulus) + i64::from(self.value());
        if candidate > year {
            candidate
        } else {
            candidate + modulus
        }
    }
}

/// Fields present in a truncated point. Absent fields are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct TruncatedFields {
    pub year: Option<TruncatedYear>,
    pub month: Option<u32>,
    pub day_of_month: Option<u32>,
    pub week: Option<u32>,
    pub day_of_week: Option<u32>,
    pub day_of_year: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// Billionths of the lowest present time unit.
    pub fraction: u32,
}

impl TruncatedFields {
    fn has_time(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }

    fn has_date(&self) -> bool {
        self.year.is_some()
            || self.month.is_some()
            || self.day_of_month.is_some()
            || self.week.is_some()
            || self.day_of_week.is_some()
            || self.day_of_year.is_some()
    }

    /// Which fields are present, used to decide comparability.
    fn shape(&self) -> [bool; 10] {
        [
            matches!(self.year, Some(TruncatedYear::YearOfCentury(_))),
            matches!(self.year, Some(TruncatedYear::YearOfDecade(_))),
            self.month.is_some(),
            self.day_of_month.is_some(),
            self.week.is_some(),
            self.day_of_week.is_some(),
            self.day_of_year.is_some(),
            self.hour.is_some(),
            self.minute.is_some(),
            self.second.is_some(),
        ]
    }

    /// Length of the lowest present time unit, in nanoseconds.
    fn fraction_unit_nanos(&self) -> i64 {
        if self.second.is_some() {
            NANOS_IN_SECOND
        } else if self.minute.is_some() {
            NANOS_IN_MINUTE
        } else {
            NANOS_IN_HOUR
        }
    }

    fn fraction_nanos(&self) -> i64 {
        i64::from(self.fraction) * (self.fraction_unit_nanos() / NANOS_IN_SECOND)
    }

    fn repr_kind(&self) -> ReprKind {
        if self.week.is_some() || self.day_of_week.is_some() {
            ReprKind::Week
        } else if self.day_of_year.is_some() {
            ReprKind::Ordinal
        } else {
            ReprKind::Calendar
        }
    }

    fn validate(&self, calendar: CalendarMode) -> Result<()> {
        if !self.has_date() && !self.has_time() {
            return Err(IsoError::TimePoint("a truncated point needs at least one field".to_string()));
        }
        let calendar_fields = self.month.is_some() || self.day_of_month.is_some();
        let week_fields = self.week.is_some() || self.day_of_week.is_some();
        let ordinal_fields = self.day_of_year.is_some();
        if [calendar_fields, week_fields, ordinal_fields].iter().filter(|&&f| f).count() > 1 {
            return Err(IsoError::TimePoint(
                "conflicting calendar, week and ordinal date fields".to_string(),
            ));
        }
        match self.year {
            Some(TruncatedYear::YearOfCentury(y)) if y > 99 => {
                return Err(out_of_bounds("year of century", i64::from(y), 0, 99));
            }
            Some(TruncatedYear::YearOfDecade(y)) if y > 9 => {
                return Err(out_of_bounds("year of decade", i64::from(y), 0, 9));
            }
            _ => {}
        }
        if let Some(month) = self.month {
            check_field("month", month, 1, 12)?;
        }
        if let Some(day) = self.day_of_month {
            let max = match self.month {
                Some(month) => calendar.max_days_in_month(month),
                None => (1..=12).map(|m| calendar.max_days_in_month(m)).max().unwrap_or(31),
            };
            check_field("day of month", day, 1, max)?;
        }
        if let Some(week) = self.week {
            check_field("week", week, 1, 53)?;
        }
        if let Some(day) = self.day_of_week {
            check_field("day of week", day, 1, 7)?;
        }
        if let Some(day) = self.day_of_year {
            check_field("day of year", day, 1, calendar.max_days_in_year())?;
        }
        if let Some(hour) = self.hour {
            check_field("hour", hour, 0, 23)?;
        }
        if let Some(minute) = self.minute {
            check_field("minute", minute, 0, 59)?;
        }
        if let Some(second) = self.second {
            check_field("second", second, 0, 59)?;
        }
        if self.fraction != 0 && !self.has_time() {
            return Err(IsoError::TimePoint("a decimal fraction needs a time field".to_string()));
        }
        if i64::from(self.fraction) >= NANOS_IN_SECOND {
            return Err(IsoError::TimePoint(format!("fraction {} out of range", self.fraction)));
        }
        Ok(())
    }

    fn sort_key(&self) -> (Option<u8>, [Option<u32>; 8], u32) {
        (
            self.year.map(TruncatedYear::value),
            [
                self.month,
                self.week,
                self.day_of_year,
                self.day_of_month,
                self.day_of_week,
                self.hour,
                self.minute,
                self.second,
            ],
            self.fraction,
        )
    }
}

fn out_of_bounds(name: &str, value: i64, min: i64, max: i64) -> IsoError {
    IsoError::TimePoint(format!("{name} {value} out of bounds {min}-{max}"))
}

fn check_field(name: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if value < min || value > max {
        return Err(out_of_bounds(name, i64::from(value), i64::from(min), i64::from(max)));
    }
    Ok(())
}

fn check_offset(offset_minutes: i32) -> Result<()> {
    if offset_minutes.abs() > MAX_OFFSET_MINUTES {
        return Err(IsoError::TimePoint(format!(
            "UTC offset {offset_minutes} minutes out of bounds ±{MAX_OFFSET_MINUTES}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReprKind {
    Calendar,
    Week,
    Ordinal,
}

// ── Layout hint ─────────────────────────────────────────────────────────────

/// Date detail shown by a default dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum DatePrecision {
    /// `CC`
    Century,
    /// `CCYY`
    Year,
    /// `CCYY-MM`
    Month,
    /// `CCYY-Www`
    Week,
    /// A complete date.
    #[default]
    Day,
}

/// Lowest time unit shown by a default dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum TimePrecision {
    None,
    Hour,
    Minute,
    #[default]
    Second,
}

/// How the UTC offset is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ZoneStyle {
    /// No designator; the offset was assumed.
    Absent,
    /// `Z` for UTC, otherwise `±hh:mm`.
    #[default]
    Utc,
    /// `±hh`
    Hours,
    /// `±hhmm`
    Basic,
    /// `±hh:mm`
    Extended,
}

/// The textual shape a point was read from. Never part of equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Layout {
    pub extended: bool,
    pub date: DatePrecision,
    pub time: TimePrecision,
    /// Whether the lowest time unit carries a decimal fraction.
    pub decimal: bool,
    pub zone: ZoneStyle,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            extended: true,
            date: DatePrecision::Day,
            time: TimePrecision::Second,
            decimal: false,
            zone: ZoneStyle::Utc,
        }
    }
}

// ── TimePoint ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Value {
    Complete { year: i64, date: DateRepr, nanos_of_day: i64 },
    Truncated(TruncatedFields),
}

/// A calendar instant, possibly truncated.
///
/// # Equality
///
/// Complete points are equal when they denote the same instant: compared in
/// UTC when both carry offsets, or on the local time line when both are
/// naive. A naive point never equals a zoned one. Truncated points are equal
/// when the same fields hold the same values. The [`Layout`] hint is ignored.
///
/// # Examples
///
/// ```
/// use isodatetime::{parse_duration, parse_point, Config};
///
/// let config = Config::default();
/// let point = parse_point("2020-01-31", &config).unwrap();
/// let later = point.add(&parse_duration("P1M").unwrap()).unwrap();
/// assert_eq!(later.calendar_date(), Some((2020, 2, 29)));
/// ```
#[derive(Debug, Clone)]
pub struct TimePoint {
    calendar: CalendarMode,
    expanded_year_digits: u8,
    value: Value,
    offset_minutes: Option<i32>,
    layout: Layout,
}

impl TimePoint {
    fn complete(config: &Config, year: i64, date: DateRepr) -> Result<Self> {
        if let Some(offset) = config.assumed_offset_minutes {
            check_offset(offset)?;
        }
        Ok(Self {
            calendar: config.calendar,
            expanded_year_digits: config.expanded_year_digits,
            value: Value::Complete {
                year,
                date,
                nanos_of_day: 0,
            },
            offset_minutes: config.assumed_offset_minutes,
            layout: Layout::default(),
        })
    }

    /// Midnight on a calendar date, at the config's assumed offset.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Calendar`] if the date does not exist in the
    /// config's calendar mode, and [`IsoError::TimePoint`] if the assumed
    /// offset exceeds ±99:59.
    pub fn from_calendar_date(year: i64, month: u32, day: u32, config: &Config) -> Result<Self> {
        config.calendar.validate_calendar_date(year, month, day)?;
        Self::complete(config, year, DateRepr::Calendar { month, day })
    }

    /// Midnight on an ISO week date; `year` is the week-year.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Calendar`] if the week date does not exist.
    pub fn from_week_date(year: i64, week: u32, day_of_week: u32, config: &Config) -> Result<Self> {
        config.calendar.validate_week_date(year, week, day_of_week)?;
        Self::complete(config, year, DateRepr::Week { week, day_of_week })
    }

    /// Midnight on an ordinal date.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Calendar`] if the day-of-year does not exist.
    pub fn from_ordinal_date(year: i64, day_of_year: u32, config: &Config) -> Result<Self> {
        config.calendar.validate_ordinal_date(year, day_of_year)?;
        Self::complete(config, year, DateRepr::Ordinal { day_of_year })
    }

    /// A truncated point holding only `fields`.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] if a field is out of bounds, if no
    /// field is present, or if fields from different date representations
    /// are mixed.
    pub fn truncated(fields: TruncatedFields, config: &Config) -> Result<Self> {
        fields.validate(config.calendar)?;
        if let Some(offset) = config.assumed_offset_minutes {
            check_offset(offset)?;
        }
        Ok(Self {
            calendar: config.calendar,
            expanded_year_digits: config.expanded_year_digits,
            value: Value::Truncated(fields),
            offset_minutes: config.assumed_offset_minutes,
            layout: Layout::default(),
        })
    }

    /// Sets the local time of day.
    ///
    /// Hour 24 is accepted only as `24:00:00` and becomes midnight of the
    /// following day. Second 60 is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for out-of-bounds fields or when
    /// called on a truncated point.
    pub fn with_time(&self, hour: u32, minute: u32, second: u32, nanosecond: u32) -> Result<Self> {
        let Value::Complete { .. } = self.value else {
            return Err(IsoError::TimePoint(format!("{self} is truncated; set its fields instead")));
        };
        check_field("hour", hour, 0, 24)?;
        check_field("minute", minute, 0, 59)?;
        check_field("second", second, 0, 59)?;
        if i64::from(nanosecond) >= NANOS_IN_SECOND {
            return Err(out_of_bounds("nanosecond", i64::from(nanosecond), 0, NANOS_IN_SECOND - 1));
        }
        if hour == 24 && (minute != 0 || second != 0 || nanosecond != 0) {
            return Err(IsoError::TimePoint(format!(
                "hour 24 is only valid as 24:00:00, got 24:{minute:02}:{second:02}"
            )));
        }
        let nanos = i64::from(hour) * NANOS_IN_HOUR
            + i64::from(minute) * NANOS_IN_MINUTE
            + i64::from(second) * NANOS_IN_SECOND
            + i64::from(nanosecond);
        let day_number = self.day_number().unwrap_or_default();
        self.rebuilt(i128::from(day_number) * NANOS_IN_DAY + i128::from(nanos), self.repr_kind())
    }

    /// Attaches (or removes) a UTC offset without moving the local time.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] if the offset exceeds ±99:59.
    pub fn with_offset(&self, offset_minutes: Option<i32>) -> Result<Self> {
        if let Some(offset) = offset_minutes {
            check_offset(offset)?;
        }
        let mut point = self.clone();
        point.offset_minutes = offset_minutes;
        if offset_minutes.is_some() && point.layout.zone == ZoneStyle::Absent {
            point.layout.zone = ZoneStyle::Utc;
        }
        Ok(point)
    }

    /// Replaces the layout hint used by default dumps.
    pub fn with_layout(&self, layout: Layout) -> Self {
        let mut point = self.clone();
        point.layout = layout;
        point
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn calendar(&self) -> CalendarMode {
        self.calendar
    }

    pub fn expanded_year_digits(&self) -> u8 {
        self.expanded_year_digits
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// UTC offset in minutes; `None` for time-zone naive points.
    pub fn offset_minutes(&self) -> Option<i32> {
        self.offset_minutes
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self.value, Value::Truncated(_))
    }

    pub fn truncated_fields(&self) -> Option<&TruncatedFields> {
        match &self.value {
            Value::Truncated(fields) => Some(fields),
            Value::Complete { .. } => None,
        }
    }

    /// The date representation of a complete point.
    pub fn date_repr(&self) -> Option<DateRepr> {
        match self.value {
            Value::Complete { date, .. } => Some(date),
            Value::Truncated(_) => None,
        }
    }

    /// Year of a complete point in its own representation (the ISO
    /// week-year for week dates).
    pub fn year(&self) -> Option<i64> {
        match self.value {
            Value::Complete { year, .. } => Some(year),
            Value::Truncated(_) => None,
        }
    }

    pub fn calendar_date(&self) -> Option<(i64, u32, u32)> {
        self.day_number().map(|n| self.calendar.date_from_day_number(n))
    }

    pub fn week_date(&self) -> Option<(i64, u32, u32)> {
        self.day_number().map(|n| self.calendar.week_from_day_number(n))
    }

    pub fn ordinal_date(&self) -> Option<(i64, u32)> {
        self.day_number().map(|n| self.calendar.ordinal_from_day_number(n))
    }

    pub fn hour(&self) -> Option<u32> {
        match self.value {
            Value::Complete { nanos_of_day, .. } => Some((nanos_of_day / NANOS_IN_HOUR) as u32),
            Value::Truncated(fields) => fields.hour,
        }
    }

    pub fn minute(&self) -> Option<u32> {
        match self.value {
            Value::Complete { nanos_of_day, .. } => Some((nanos_of_day % NANOS_IN_HOUR / NANOS_IN_MINUTE) as u32),
            Value::Truncated(fields) => fields.minute,
        }
    }

    pub fn second(&self) -> Option<u32> {
        match self.value {
            Value::Complete { nanos_of_day, .. } => {
                Some((nanos_of_day % NANOS_IN_MINUTE / NANOS_IN_SECOND) as u32)
            }
            Value::Truncated(fields) => fields.second,
        }
    }

    /// Sub-second part of a complete point.
    pub fn nanosecond(&self) -> Option<u32> {
        match self.value {
            Value::Complete { nanos_of_day, .. } => Some((nanos_of_day % NANOS_IN_SECOND) as u32),
            Value::Truncated(_) => None,
        }
    }

    pub(crate) fn nanos_of_day(&self) -> Option<i64> {
        match self.value {
            Value::Complete { nanos_of_day, .. } => Some(nanos_of_day),
            Value::Truncated(_) => None,
        }
    }

    pub(crate) fn day_number(&self) -> Option<i64> {
        let Value::Complete { year, date, .. } = self.value else {
            return None;
        };
        let calendar = self.calendar;
        let day_number = match date {
            DateRepr::Calendar { month, day } => {
                let ordinal = calendar.ordinal_from_calendar(year, month, day).ok()?;
                calendar.day_number(year, ordinal)
            }
            DateRepr::Week { week, day_of_week } => calendar.day_number_from_week(year, week, day_of_week).ok()?,
            DateRepr::Ordinal { day_of_year } => calendar.day_number(year, day_of_year),
        };
        Some(day_number)
    }

    pub(crate) fn repr_kind(&self) -> ReprKind {
        match self.value {
            Value::Complete { date: DateRepr::Calendar { .. }, .. } => ReprKind::Calendar,
            Value::Complete { date: DateRepr::Week { .. }, .. } => ReprKind::Week,
            Value::Complete { date: DateRepr::Ordinal { .. }, .. } => ReprKind::Ordinal,
            Value::Truncated(fields) => fields.repr_kind(),
        }
    }

    /// Nanoseconds on the local time line since 0000-01-01T00:00.
    fn local_nanos(&self) -> Option<i128> {
        let day_number = self.day_number()?;
        Some(i128::from(day_number) * NANOS_IN_DAY + i128::from(self.nanos_of_day()?))
    }

    /// UTC instant for zoned points, local instant for naive ones.
    fn instant(&self) -> Option<i128> {
        let local = self.local_nanos()?;
        let offset = i128::from(self.offset_minutes.unwrap_or(0)) * i128::from(NANOS_IN_MINUTE);
        Some(local - offset)
    }

    /// Re-expresses a local-time-line position in the given representation,
    /// keeping everything else about this point.
    fn rebuilt(&self, local_nanos: i128, kind: ReprKind) -> Result<Self> {
        let day = local_nanos.div_euclid(NANOS_IN_DAY);
        let nanos_of_day = local_nanos.rem_euclid(NANOS_IN_DAY) as i64;
        if day.unsigned_abs() > (MAX_YEAR as u128 + 1) * 366 {
            let year = if day < 0 { -MAX_YEAR - 1 } else { MAX_YEAR + 1 };
            return Err(CalendarError::YearRange { year }.into());
        }
        let day = day as i64;
        let calendar = self.calendar;
        let (year, date) = match kind {
            ReprKind::Calendar => {
                let (year, month, day) = calendar.date_from_day_number(day);
                (year, DateRepr::Calendar { month, day })
            }
            ReprKind::Week => {
                let (year, week, day_of_week) = calendar.week_from_day_number(day);
                (year, DateRepr::Week { week, day_of_week })
            }
            ReprKind::Ordinal => {
                let (year, day_of_year) = calendar.ordinal_from_day_number(day);
                (year, DateRepr::Ordinal { day_of_year })
            }
        };
        check_year(year)?;
        Ok(Self {
            value: Value::Complete {
                year,
                date,
                nanos_of_day,
            },
            ..self.clone()
        })
    }

    fn require_complete(&self, operation: &str) -> Result<()> {
        if self.is_truncated() {
            return Err(IsoError::TimePoint(format!("cannot {operation} truncated point {self}")));
        }
        Ok(())
    }

    // ── Representation conversion ───────────────────────────────────────

    /// The same instant as a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for truncated points.
    pub fn to_calendar_date(&self) -> Result<Self> {
        self.converted(ReprKind::Calendar)
    }

    /// The same instant as an ISO week date.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for truncated points.
    pub fn to_week_date(&self) -> Result<Self> {
        self.converted(ReprKind::Week)
    }

    /// The same instant as an ordinal date.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for truncated points.
    pub fn to_ordinal_date(&self) -> Result<Self> {
        self.converted(ReprKind::Ordinal)
    }

    fn converted(&self, kind: ReprKind) -> Result<Self> {
        self.require_complete("convert")?;
        let local = self.local_nanos().unwrap_or_default();
        let mut point = self.rebuilt(local, kind)?;
        point.layout.date = DatePrecision::Day;
        Ok(point)
    }

    // ── Time zones ──────────────────────────────────────────────────────

    /// The same instant expressed at another UTC offset, carrying across
    /// day, month and year boundaries as needed.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for truncated or naive points, or an
    /// offset beyond ±99:59.
    pub fn with_time_zone(&self, offset_minutes: i32) -> Result<Self> {
        check_offset(offset_minutes)?;
        self.require_complete("re-zone")?;
        let Some(current) = self.offset_minutes else {
            return Err(IsoError::TimePoint(format!(
                "{self} is time-zone naive; attach an offset with with_offset first"
            )));
        };
        let shift = i128::from(offset_minutes - current) * i128::from(NANOS_IN_MINUTE);
        let local = self.local_nanos().unwrap_or_default();
        let mut point = self.rebuilt(local + shift, self.repr_kind())?;
        point.offset_minutes = Some(offset_minutes);
        point.layout.zone = match (offset_minutes, point.layout.zone) {
            (0, _) => ZoneStyle::Utc,
            (_, ZoneStyle::Absent) if point.layout.extended => ZoneStyle::Extended,
            (_, ZoneStyle::Absent) => ZoneStyle::Basic,
            (_, ZoneStyle::Hours) if offset_minutes % 60 != 0 => {
                if point.layout.extended {
                    ZoneStyle::Extended
                } else {
                    ZoneStyle::Basic
                }
            }
            (_, style) => style,
        };
        if point.layout.time == TimePrecision::None {
            point.layout.time = TimePrecision::Hour;
        }
        Ok(point)
    }

    /// Shorthand for `with_time_zone(0)`.
    ///
    /// # Errors
    ///
    /// As for [`TimePoint::with_time_zone`].
    pub fn to_utc(&self) -> Result<Self> {
        self.with_time_zone(0)
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    /// `self + duration`.
    ///
    /// Years and months are applied first as a calendar-month shift, with
    /// the day of month clamped to the target month (`2020-01-31 + P1M` is
    /// `2020-02-29`). The exact part is then added as a fixed number of
    /// nanoseconds. Week and ordinal points are shifted through their
    /// calendar equivalent and keep their own representation.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for truncated points and
    /// [`IsoError::Calendar`] if the result leaves the supported year range.
    pub fn add(&self, duration: &Duration) -> Result<Self> {
        self.require_complete("add a duration to")?;
        let mut day_number = self.day_number().unwrap_or_default();
        let months = duration.signed_months();
        if months != 0 {
            let (year, month, day) = self.calendar.date_from_day_number(day_number);
            let total = i128::from(year) * 12 + i128::from(month - 1) + months;
            let new_year = i64::try_from(total.div_euclid(12)).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX });
            let new_month = (total.rem_euclid(12) + 1) as u32;
            check_year(new_year)?;
            let max_day = self.calendar.days_in_month(new_year, new_month)?;
            let ordinal = self
                .calendar
                .ordinal_from_calendar(new_year, new_month, day.min(max_day))?;
            day_number = self.calendar.day_number(new_year, ordinal);
        }
        let local = i128::from(day_number) * NANOS_IN_DAY
            + i128::from(self.nanos_of_day().unwrap_or_default())
            + duration.signed_nanos();
        self.rebuilt(local, self.repr_kind())
    }

    /// `self - duration`.
    ///
    /// # Errors
    ///
    /// As for [`TimePoint::add`].
    pub fn subtract(&self, duration: &Duration) -> Result<Self> {
        self.add(&duration.negate())
    }

    /// Exact elapsed time `self - other`, in days and seconds.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Comparison`] if either point is truncated, if
    /// one is naive and the other zoned, or if the calendar modes differ.
    pub fn difference(&self, other: &TimePoint) -> Result<Duration> {
        let (a, b) = self.comparable_instants(other)?;
        Duration::from_exact_nanos(a - b)
    }

    fn comparable_instants(&self, other: &TimePoint) -> Result<(i128, i128)> {
        if self.calendar != other.calendar {
            return Err(IsoError::Comparison(format!(
                "{self} ({}) and {other} ({}) use different calendar modes",
                self.calendar, other.calendar
            )));
        }
        if self.offset_minutes.is_some() != other.offset_minutes.is_some() {
            return Err(IsoError::Comparison(format!(
                "{self} and {other}: one is time-zone naive"
            )));
        }
        match (self.instant(), other.instant()) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(IsoError::Comparison(format!(
                "{self} and {other}: truncated points have no instant"
            ))),
        }
    }

    /// Three-way comparison.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Comparison`] when comparing a truncated point
    /// with a complete one, two truncated points with different fields,
    /// a naive point with a zoned one, or points in different calendars.
    pub fn compare(&self, other: &TimePoint) -> Result<Ordering> {
        match (&self.value, &other.value) {
            (Value::Truncated(a), Value::Truncated(b)) => {
                if self.calendar != other.calendar {
                    return Err(IsoError::Comparison(format!(
                        "{self} ({}) and {other} ({}) use different calendar modes",
                        self.calendar, other.calendar
                    )));
                }
                if a.shape() != b.shape() || self.offset_minutes != other.offset_minutes {
                    return Err(IsoError::Comparison(format!(
                        "{self} and {other} are truncated differently"
                    )));
                }
                Ok(a.sort_key().cmp(&b.sort_key()))
            }
            (Value::Truncated(_), _) | (_, Value::Truncated(_)) => Err(IsoError::Comparison(format!(
                "cannot compare truncated and complete points: {self}, {other}"
            ))),
            _ => {
                let (a, b) = self.comparable_instants(other)?;
                Ok(a.cmp(&b))
            }
        }
    }

    // ── Truncated completion ────────────────────────────────────────────

    /// The first complete point at or after `reference` that matches every
    /// field of this truncated point. Complete points are returned as-is.
    ///
    /// Fields absent from the truncated point take the reference's values;
    /// missing time fields below a present one are zero (`T12` means
    /// `12:00:00`).
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] if `reference` is truncated, uses a
    /// different calendar mode, or no match exists within 800 years.
    ///
    /// # Examples
    ///
    /// ```
    /// use isodatetime::{parse_point, Config};
    ///
    /// let config = Config::default();
    /// let reference = parse_point("2020-06-15T10:00Z", &config).unwrap();
    /// let truncated = parse_point("--0501T09Z", &config).unwrap();
    /// let next = truncated.complete_with(&reference).unwrap();
    /// assert_eq!(next.calendar_date(), Some((2021, 5, 1)));
    /// ```
    pub fn complete_with(&self, reference: &TimePoint) -> Result<Self> {
        let Value::Truncated(fields) = self.value else {
            return Ok(self.clone());
        };
        if reference.is_truncated() {
            return Err(IsoError::TimePoint(format!("reference {reference} is itself truncated")));
        }
        if reference.calendar != self.calendar {
            return Err(IsoError::TimePoint(format!(
                "reference {reference} uses calendar {} but {self} uses {}",
                reference.calendar, self.calendar
            )));
        }
        let reference = match (self.offset_minutes, reference.offset_minutes) {
            (Some(offset), Some(_)) => reference.with_time_zone(offset)?,
            (Some(offset), None) => reference.with_offset(Some(offset))?,
            (None, _) => reference.clone(),
        };
        let start_day = reference.day_number().unwrap_or_default();
        let reference_nanos = reference.nanos_of_day().unwrap_or_default();
        let kind = fields.repr_kind();

        let mut day = start_day;
        while day <= start_day + COMPLETION_SEARCH_DAYS {
            match self.match_day(&fields, day) {
                DayMatch::Skip(next) => {
                    day = next;
                    continue;
                }
                DayMatch::No => {}
                DayMatch::Yes => {
                    let lower = if day == start_day { reference_nanos } else { 0 };
                    if let Some(nanos) = time_on_day(&fields, lower, reference_nanos) {
                        let local = i128::from(day) * NANOS_IN_DAY + i128::from(nanos);
                        let mut point = reference.rebuilt(local, kind)?;
                        point.expanded_year_digits = self.expanded_year_digits;
                        point.layout = Layout {
                            extended: self.layout.extended,
                            date: DatePrecision::Day,
                            time: if fields.has_time() {
                                self.layout.time
                            } else {
                                reference.layout.time
                            },
                            decimal: fields.has_time() && self.layout.decimal,
                            zone: if self.offset_minutes.is_some() {
                                self.layout.zone
                            } else {
                                reference.layout.zone
                            },
                        };
                        tracing::trace!(truncated = %self, completed = %point, "completed truncated point");
                        return Ok(point);
                    }
                }
            }
            day += 1;
        }
        Err(IsoError::TimePoint(format!(
            "no point at or after {reference} matches {self}"
        )))
    }

    fn match_day(&self, fields: &TruncatedFields, day: i64) -> DayMatch {
        let calendar = self.calendar;
        let kind = fields.repr_kind();
        if let Some(truncated_year) = fields.year {
            let year = match kind {
                ReprKind::Week => calendar.week_from_day_number(day).0,
                _ => calendar.ordinal_from_day_number(day).0,
            };
            if !truncated_year.matches(year) {
                let next = truncated_year.next_after(year);
                return DayMatch::Skip(match kind {
                    ReprKind::Week => calendar.week_year_start(next),
                    _ => calendar.day_number(next, 1),
                });
            }
        }
        let matched = match kind {
            ReprKind::Calendar => {
                let (_, month, day_of_month) = calendar.date_from_day_number(day);
                fields.month.is_none_or(|m| m == month) && fields.day_of_month.is_none_or(|d| d == day_of_month)
            }
            ReprKind::Week => {
                let (_, week, day_of_week) = calendar.week_from_day_number(day);
                fields.week.is_none_or(|w| w == week) && fields.day_of_week.is_none_or(|d| d == day_of_week)
            }
            ReprKind::Ordinal => {
                let (_, day_of_year) = calendar.ordinal_from_day_number(day);
                fields.day_of_year.is_none_or(|d| d == day_of_year)
            }
        };
        if matched {
            DayMatch::Yes
        } else {
            DayMatch::No
        }
    }

    // ── Epoch and chrono interop ────────────────────────────────────────

    /// Whole seconds since 1970-01-01T00:00:00Z (floored).
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for truncated or naive points.
    pub fn seconds_since_unix_epoch(&self) -> Result<i64> {
        self.require_complete("take the epoch seconds of")?;
        if self.offset_minutes.is_none() {
            return Err(IsoError::TimePoint(format!("{self} is time-zone naive")));
        }
        let epoch = i128::from(self.calendar.day_number(1970, 1)) * NANOS_IN_DAY;
        let instant = self.instant().unwrap_or_default();
        i64::try_from((instant - epoch).div_euclid(i128::from(NANOS_IN_SECOND)))
            .map_err(|_| IsoError::TimePoint(format!("{self} is too far from the epoch")))
    }

    /// The UTC point `seconds` after 1970-01-01T00:00:00Z in the config's
    /// calendar mode.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Calendar`] if the result leaves the year range.
    pub fn from_unix_seconds(seconds: i64, config: &Config) -> Result<Self> {
        let epoch = Self::from_calendar_date(1970, 1, 1, config)?.with_offset(Some(0))?;
        let local = epoch.local_nanos().unwrap_or_default() + i128::from(seconds) * i128::from(NANOS_IN_SECOND);
        epoch.rebuilt(local, ReprKind::Calendar)
    }

    /// Converts a chrono datetime into a Gregorian point with the same
    /// offset.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] if the offset is not a whole number
    /// of minutes.
    pub fn from_chrono(datetime: &DateTime<FixedOffset>) -> Result<Self> {
        let offset_seconds = datetime.offset().local_minus_utc();
        if offset_seconds % 60 != 0 {
            return Err(IsoError::TimePoint(format!(
                "offset of {offset_seconds}s is not a whole number of minutes"
            )));
        }
        let local = datetime.naive_local();
        let config = Config::default().with_assumed_offset(Some(offset_seconds / 60));
        Self::from_calendar_date(i64::from(local.year()), local.month(), local.day(), &config)?.with_time(
            local.hour(),
            local.minute(),
            local.second(),
            // chrono encodes a leap second as nanosecond >= 1e9.
            local.nanosecond().min(NANOS_IN_SECOND as u32 - 1),
        )
    }

    /// Converts a zoned Gregorian point into a chrono datetime.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::TimePoint`] for truncated, naive or non-Gregorian
    /// points, or years chrono cannot represent.
    pub fn to_chrono(&self) -> Result<DateTime<FixedOffset>> {
        self.require_complete("convert")?;
        if self.calendar != CalendarMode::Gregorian {
            return Err(IsoError::TimePoint(format!("{self} is not a Gregorian point")));
        }
        let offset = self
            .offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
            .ok_or_else(|| IsoError::TimePoint(format!("{self} has no usable UTC offset")))?;
        let (year, month, day) = self.calendar_date().unwrap_or_default();
        let unrepresentable = || IsoError::TimePoint(format!("{self} is outside chrono's range"));
        let date = i32::try_from(year)
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, month, day))
            .ok_or_else(unrepresentable)?;
        let nanos_of_day = self.nanos_of_day().unwrap_or_default();
        let time = NaiveTime::from_num_seconds_from_midnight_opt(
            (nanos_of_day / NANOS_IN_SECOND) as u32,
            (nanos_of_day % NANOS_IN_SECOND) as u32,
        )
        .ok_or_else(unrepresentable)?;
        date.and_time(time)
            .and_local_timezone(offset)
            .single()
            .ok_or_else(unrepresentable)
    }
}

enum DayMatch {
    Yes,
    No,
    /// Jump ahead to this day number.
    Skip(i64),
}

/// Earliest local time on a matching day, at or after `lower`, that fits the
/// truncated time fields.
fn time_on_day(fields: &TruncatedFields, lower: i64, reference_nanos: i64) -> Option<i64> {
    if !fields.has_time() {
        return (reference_nanos >= lower).then_some(reference_nanos);
    }
    let base = i64::from(fields.minute.unwrap_or(0)) * NANOS_IN_MINUTE
        + i64::from(fields.second.unwrap_or(0)) * NANOS_IN_SECOND
        + fields.fraction_nanos();
    let (base, period) = match (fields.hour, fields.minute) {
        (Some(hour), _) => (base + i64::from(hour) * NANOS_IN_HOUR, NANOS_PER_DAY),
        (None, Some(_)) => (base, NANOS_IN_HOUR),
        (None, None) => (base, NANOS_IN_MINUTE),
    };
    let steps = if lower > base {
        (lower - base + period - 1) / period
    } else {
        0
    };
    let candidate = base + steps * period;
    (candidate < NANOS_PER_DAY).then_some(candidate)
}

// ── Trait impls ─────────────────────────────────────────────────────────────

impl PartialEq for TimePoint {
    fn eq(&self, other: &Self) -> bool {
        if self.calendar != other.calendar {
            return false;
        }
        match (&self.value, &other.value) {
            (Value::Truncated(a), Value::Truncated(b)) => a == b && self.offset_minutes == other.offset_minutes,
            (Value::Complete { .. }, Value::Complete { .. }) => {
                self.offset_minutes.is_some() == other.offset_minutes.is_some() && self.instant() == other.instant()
            }
            _ => false,
        }
    }
}

impl Eq for TimePoint {}

impl Hash for TimePoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.calendar.hash(state);
        match &self.value {
            Value::Truncated(fields) => {
                1u8.hash(state);
                fields.hash(state);
                self.offset_minutes.hash(state);
            }
            Value::Complete { .. } => {
                0u8.hash(state);
                self.offset_minutes.is_some().hash(state);
                self.instant().hash(state);
            }
        }
    }
}

impl PartialOrd for TimePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl fmt::Display for TimePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::dumper::display_point(self))
    }
}

impl FromStr for TimePoint {
    type Err = IsoError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_point(s, &Config::default())
    }
}

impl Serialize for TimePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> Config {
        Config::default()
    }

    fn p(text: &str) -> TimePoint {
        crate::parser::parse_point(text, &config()).unwrap()
    }

    fn d(text: &str) -> Duration {
        text.parse().unwrap()
    }

    // ── construction ────────────────────────────────────────────────────

    #[test]
    fn test_construction_validates_through_calendar() {
        assert!(TimePoint::from_calendar_date(2020, 2, 29, &config()).is_ok());
        assert!(matches!(
            TimePoint::from_calendar_date(2021, 2, 29, &config()),
            Err(IsoError::Calendar(_))
        ));
        assert!(TimePoint::from_week_date(2020, 53, 1, &config()).is_ok());
        assert!(TimePoint::from_week_date(2021, 53, 1, &config()).is_err());
        assert!(TimePoint::from_ordinal_date(2021, 366, &config()).is_err());
    }

    #[test]
    fn test_construction_rejects_out_of_range_offset() {
        let far = config().with_assumed_offset(Some(MAX_OFFSET_MINUTES + 1));
        assert!(matches!(TimePoint::from_calendar_date(2020, 1, 1, &far), Err(IsoError::TimePoint(_))));
        assert!(matches!(TimePoint::from_week_date(2020, 1, 1, &far), Err(IsoError::TimePoint(_))));
        assert!(matches!(TimePoint::from_ordinal_date(2020, 1, &far), Err(IsoError::TimePoint(_))));
        let edge = config().with_assumed_offset(Some(-MAX_OFFSET_MINUTES));
        assert!(TimePoint::from_calendar_date(2020, 1, 1, &edge).is_ok());
    }

    #[test]
    fn test_hour_24_normalises_to_next_day() {
        let point = TimePoint::from_calendar_date(2020, 12, 31, &config())
            .unwrap()
            .with_time(24, 0, 0, 0)
            .unwrap();
        assert_eq!(point.calendar_date(), Some((2021, 1, 1)));
        assert_eq!(point.hour(), Some(0));
        let base = TimePoint::from_calendar_date(2020, 12, 31, &config()).unwrap();
        assert!(base.with_time(24, 0, 1, 0).is_err());
        assert!(base.with_time(12, 0, 60, 0).is_err());
    }

    #[test]
    fn test_truncated_fields_validated() {
        let conflicting = TruncatedFields {
            month: Some(5),
            week: Some(3),
            ..TruncatedFields::default()
        };
        assert!(TimePoint::truncated(conflicting, &config()).is_err());
        assert!(TimePoint::truncated(TruncatedFields::default(), &config()).is_err());
        let feb_30 = TruncatedFields {
            month: Some(2),
            day_of_month: Some(30),
            ..TruncatedFields::default()
        };
        assert!(TimePoint::truncated(feb_30, &config()).is_err());
        assert!(TimePoint::truncated(feb_30, &config().with_calendar(CalendarMode::Day360)).is_ok());
    }

    // ── arithmetic ──────────────────────────────────────────────────────

    #[test]
    fn test_nominal_clamp() {
        assert_eq!(p("2020-01-31").add(&d("P1M")).unwrap().calendar_date(), Some((2020, 2, 29)));
        assert_eq!(p("2021-01-31").add(&d("P1M")).unwrap().calendar_date(), Some((2021, 2, 28)));
        assert_eq!(p("2020-02-29").add(&d("P1Y")).unwrap().calendar_date(), Some((2021, 2, 28)));
        assert_eq!(p("2020-03-31").subtract(&d("P1M")).unwrap().calendar_date(), Some((2020, 2, 29)));
    }

    #[test]
    fn test_exact_addition_carries_across_years() {
        let later = p("2020-12-31T23:30Z").add(&d("PT45M")).unwrap();
        assert_eq!(later.calendar_date(), Some((2021, 1, 1)));
        assert_eq!((later.hour(), later.minute()), (Some(0), Some(15)));
        assert_eq!(later, p("2021-01-01T00:15Z"));
    }

    #[test]
    fn test_week_and_ordinal_points_keep_their_representation() {
        let week = p("2020-W53-7").add(&d("P1D")).unwrap();
        assert_eq!(week.date_repr(), Some(DateRepr::Week { week: 1, day_of_week: 1 }));
        assert_eq!(week.year(), Some(2021));
        let ordinal = p("2020-366").add(&d("P1M")).unwrap();
        assert_eq!(ordinal.date_repr(), Some(DateRepr::Ordinal { day_of_year: 31 }));
        assert_eq!(ordinal.year(), Some(2021));
    }

    #[test]
    fn test_fixed_calendar_arithmetic() {
        let config = config().with_calendar(CalendarMode::Day360);
        let point = crate::parser::parse_point("2020-02-30", &config).unwrap();
        assert_eq!(point.add(&d("P1D")).unwrap().calendar_date(), Some((2020, 3, 1)));
        assert_eq!(point.add(&d("P1Y")).unwrap().calendar_date(), Some((2021, 2, 30)));
    }

    #[test]
    fn test_difference_is_exact() {
        let span = p("2020-03-01T00Z").difference(&p("2020-02-01T00Z")).unwrap();
        assert_eq!(span, d("P29D"));
        let back = p("2020-02-01T00Z").difference(&p("2020-03-01T12Z")).unwrap();
        assert_eq!(back.to_string(), "-P29DT43200S");
    }

    #[test]
    fn test_truncated_points_reject_durations() {
        assert!(p("--0501").add(&d("P1D")).is_err());
    }

    // ── comparison ──────────────────────────────────────────────────────

    #[test]
    fn test_equality_across_offsets() {
        assert_eq!(p("2020-01-01T12:00Z"), p("2020-01-01T13:00+01:00"));
        assert_eq!(p("2020-001T00Z"), p("2020-01-01T00Z"));
        assert_eq!(p("2020-W01-3T00Z"), p("2020-01-01T00Z"));
    }

    #[test]
    fn test_truncated_vs_complete_comparison_fails() {
        let err = p("--0501").compare(&p("2020-05-01")).unwrap_err();
        assert!(matches!(err, IsoError::Comparison(_)));
        assert!(p("--0501").compare(&p("---01")).is_err());
        assert_eq!(p("--0501").compare(&p("--0601")).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_truncated_points_in_different_calendars_do_not_compare() {
        let day360 = config().with_calendar(CalendarMode::Day360);
        let other = crate::parser::parse_point("--0501", &day360).unwrap();
        assert!(matches!(p("--0501").compare(&other), Err(IsoError::Comparison(_))));
        assert_eq!(p("--0501").partial_cmp(&other), None);
    }

    #[test]
    fn test_naive_vs_zoned_comparison_fails() {
        let naive_config = config().with_assumed_offset(None);
        let naive = crate::parser::parse_point("2020-01-01T00", &naive_config).unwrap();
        assert!(matches!(naive.compare(&p("2020-01-01T00Z")), Err(IsoError::Comparison(_))));
        assert_ne!(naive, p("2020-01-01T00Z"));
    }

    // ── time zones ──────────────────────────────────────────────────────

    #[test]
    fn test_with_time_zone_carries() {
        let point = p("2020-12-31T23:00Z").with_time_zone(90).unwrap();
        assert_eq!(point.calendar_date(), Some((2021, 1, 1)));
        assert_eq!((point.hour(), point.minute()), (Some(0), Some(30)));
        assert_eq!(point.offset_minutes(), Some(90));
        assert_eq!(point.to_utc().unwrap().calendar_date(), Some((2020, 12, 31)));
        assert!(p("2020-01-01T00Z").with_time_zone(6000).is_err());
    }

    // ── completion ──────────────────────────────────────────────────────

    #[test]
    fn test_complete_with_time_only() {
        let reference = p("2020-06-15T10:00Z");
        let next = p("T09Z").complete_with(&reference).unwrap();
        assert_eq!(next, p("2020-06-16T09:00Z"));
        let same_day = p("T11Z").complete_with(&reference).unwrap();
        assert_eq!(same_day, p("2020-06-15T11:00Z"));
        let minute = p("T-30Z").complete_with(&reference).unwrap();
        assert_eq!(minute, p("2020-06-15T10:30Z"));
    }

    #[test]
    fn test_complete_with_date_fields() {
        let reference = p("2020-06-15T10:00Z");
        assert_eq!(p("---30").complete_with(&reference).unwrap(), p("2020-06-30T10:00Z"));
        assert_eq!(p("--0229").complete_with(&reference).unwrap(), p("2024-02-29T10:00Z"));
        assert_eq!(p("-W-1").complete_with(&reference).unwrap(), p("2020-06-15T10:00Z"));
        let century = p("-9001").complete_with(&reference).unwrap();
        assert_eq!(century.calendar_date(), Some((2090, 1, 1)));
    }

    #[test]
    fn test_complete_with_week_year_of_decade() {
        let reference = p("2020-06-15T00Z");
        let point = p("-1-W02").complete_with(&reference).unwrap();
        assert_eq!(point.week_date(), Some((2021, 2, 1)));
    }

    // ── epoch and chrono ────────────────────────────────────────────────

    #[test]
    fn test_unix_epoch_round_trip() {
        let point = p("2001-09-09T01:46:40Z");
        assert_eq!(point.seconds_since_unix_epoch().unwrap(), 1_000_000_000);
        assert_eq!(TimePoint::from_unix_seconds(1_000_000_000, &config()).unwrap(), point);
        assert_eq!(TimePoint::from_unix_seconds(-1, &config()).unwrap(), p("1969-12-31T23:59:59Z"));
    }

    #[test]
    fn test_chrono_interop() {
        let offset = FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap();
        let datetime = offset.with_ymd_and_hms(2024, 2, 29, 18, 15, 7).unwrap();
        let point = TimePoint::from_chrono(&datetime).unwrap();
        assert_eq!(point, p("2024-02-29T18:15:07+05:30"));
        assert_eq!(point.to_chrono().unwrap(), datetime);
        assert!(p("--0501").to_chrono().is_err());
    }
}
