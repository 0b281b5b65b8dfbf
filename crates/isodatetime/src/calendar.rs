//! Calendar engine: day counting and date-representation conversion.
//!
//! Every computation is parameterised by a [`CalendarMode`] value. There is
//! no process-wide default: callers pass the mode explicitly (usually via
//! [`crate::Config`]), which keeps the engine free of shared mutable state.
//!
//! Dates are converted through a *day number*: the count of days since
//! 0000-01-01 in the given mode (year zero exists, as in the proleptic
//! Gregorian calendar of ISO 8601). Year blocks are summed in closed form, so
//! counting the days between two dates is constant time regardless of how
//! far apart they are.
//!
//! # Week dates
//!
//! ISO 8601 week 1 is the week containing the first Thursday of the year.
//! Weekdays are anchored on Monday 2000-01-03 in every mode, so the
//! fixed-length calendars get the same deterministic week structure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, IsoError};

/// Largest absolute year accepted (nine digits).
pub const MAX_YEAR: i64 = 999_999_999;

pub const MONTHS_IN_YEAR: u32 = 12;
pub const DAYS_IN_WEEK: u32 = 7;
pub const SECONDS_IN_MINUTE: i64 = 60;
pub const SECONDS_IN_HOUR: i64 = 3_600;
pub const SECONDS_IN_DAY: i64 = 86_400;
pub const NANOS_IN_SECOND: i64 = 1_000_000_000;
pub const NANOS_IN_DAY: i128 = SECONDS_IN_DAY as i128 * NANOS_IN_SECOND as i128;

const DAYS_IN_MONTHS_360: [u32; 12] = [30; 12];
const DAYS_IN_MONTHS_365: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_IN_MONTHS_366: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days in a 400-year Gregorian cycle.
const DAYS_IN_GREGORIAN_CYCLE: i64 = 146_097;

/// Day-counting rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CalendarMode {
    /// Proleptic Gregorian: leap years every 4 years except centuries not
    /// divisible by 400.
    #[default]
    #[serde(rename = "gregorian")]
    Gregorian,
    /// Twelve 30-day months.
    #[serde(rename = "360day", alias = "360_day")]
    Day360,
    /// Gregorian month lengths, never a leap year.
    #[serde(rename = "365day", alias = "365_day")]
    Day365,
    /// Gregorian month lengths, always a leap year.
    #[serde(rename = "366day", alias = "366_day")]
    Day366,
}

impl CalendarMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarMode::Gregorian => "gregorian",
            CalendarMode::Day360 => "360day",
            CalendarMode::Day365 => "365day",
            CalendarMode::Day366 => "366day",
        }
    }

    /// Whether `year` has a leap day. Only ever true in Gregorian mode: the
    /// fixed-length modes have no leap-year logic at all.
    pub fn is_leap_year(self, year: i64) -> bool {
        match self {
            CalendarMode::Gregorian => year % 4 == 0 && (year % 100 != 0 || year % 400 == 0),
            _ => false,
        }
    }

    fn month_lengths(self, year: i64) -> &'static [u32; 12] {
        match self {
            CalendarMode::Gregorian if self.is_leap_year(year) => &DAYS_IN_MONTHS_366,
            CalendarMode::Gregorian | CalendarMode::Day365 => &DAYS_IN_MONTHS_365,
            CalendarMode::Day360 => &DAYS_IN_MONTHS_360,
            CalendarMode::Day366 => &DAYS_IN_MONTHS_366,
        }
    }

    pub fn days_in_year(self, year: i64) -> u32 {
        match self {
            CalendarMode::Gregorian if self.is_leap_year(year) => 366,
            CalendarMode::Gregorian | CalendarMode::Day365 => 365,
            CalendarMode::Day360 => 360,
            CalendarMode::Day366 => 366,
        }
    }

    /// Number of days in `month` of `year`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Month`] if `month` is not in 1-12.
    pub fn days_in_month(self, year: i64, month: u32) -> Result<u32, CalendarError> {
        if !(1..=MONTHS_IN_YEAR).contains(&month) {
            return Err(CalendarError::Month {
                month: i64::from(month),
            });
        }
        Ok(self.month_lengths(year)[month as usize - 1])
    }

    /// Largest day-of-month any month can have in this mode (used to bound
    /// truncated points that carry no year).
    pub fn max_days_in_month(self, month: u32) -> u32 {
        match self {
            CalendarMode::Day360 => 30,
            CalendarMode::Day365 => DAYS_IN_MONTHS_365[(month as usize).clamp(1, 12) - 1],
            _ => DAYS_IN_MONTHS_366[(month as usize).clamp(1, 12) - 1],
        }
    }

    /// Largest day-of-year any year can have in this mode.
    pub fn max_days_in_year(self) -> u32 {
        match self {
            CalendarMode::Day360 => 360,
            CalendarMode::Day365 => 365,
            _ => 366,
        }
    }

    // ── Day numbers ─────────────────────────────────────────────────────

    /// Days from 0000-01-01 to the first day of `year`.
    ///
    /// Closed form: whole years times the common-year length, plus one day
    /// per leap year in `[0, year)` (negative for years before zero).
    pub fn days_before_year(self, year: i64) -> i64 {
        match self {
            CalendarMode::Gregorian => {
                let y = year - 1;
                365 * year + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400) + 1
            }
            fixed => i64::from(fixed.days_in_year(0)) * year,
        }
    }

    /// Total days in the inclusive year range `start..=end`; zero when
    /// `start > end`.
    pub fn days_in_year_range(self, start: i64, end: i64) -> i64 {
        if start > end {
            return 0;
        }
        self.days_before_year(end + 1) - self.days_before_year(start)
    }

    /// Day number of an ordinal date. Does not validate `day_of_year`.
    pub fn day_number(self, year: i64, day_of_year: u32) -> i64 {
        self.days_before_year(year) + i64::from(day_of_year) - 1
    }

    /// Ordinal date `(year, day_of_year)` for a day number.
    pub fn ordinal_from_day_number(self, day_number: i64) -> (i64, u32) {
        let mut year = match self {
            CalendarMode::Gregorian => (day_number * 400).div_euclid(DAYS_IN_GREGORIAN_CYCLE),
            fixed => day_number.div_euclid(i64::from(fixed.days_in_year(0))),
        };
        while self.days_before_year(year + 1) <= day_number {
            year += 1;
        }
        while self.days_before_year(year) > day_number {
            year -= 1;
        }
        let day_of_year = day_number - self.days_before_year(year) + 1;
        (year, day_of_year as u32)
    }

    /// Calendar date `(year, month, day)` for a day number.
    pub fn date_from_day_number(self, day_number: i64) -> (i64, u32, u32) {
        let (year, mut remaining) = self.ordinal_from_day_number(day_number);
        let mut month = 1;
        for &length in self.month_lengths(year) {
            if remaining <= length {
                break;
            }
            remaining -= length;
            month += 1;
        }
        (year, month, remaining)
    }

    /// Signed number of days from one ordinal date to another.
    pub fn days_between(self, from: (i64, u32), to: (i64, u32)) -> i64 {
        self.day_number(to.0, to.1) - self.day_number(from.0, from.1)
    }

    // ── Calendar and ordinal dates ──────────────────────────────────────

    /// Checks that `year-month-day` exists in this mode.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] naming the offending field.
    pub fn validate_calendar_date(self, year: i64, month: u32, day: u32) -> Result<(), CalendarError> {
        check_year(year)?;
        let max = self.days_in_month(year, month)?;
        if day == 0 || day > max {
            return Err(CalendarError::DayOfMonth {
                year,
                month,
                day: i64::from(day),
                max,
            });
        }
        Ok(())
    }

    /// Checks that `year-day_of_year` exists in this mode.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::DayOfYear`] when the day is out of range.
    pub fn validate_ordinal_date(self, year: i64, day_of_year: u32) -> Result<(), CalendarError> {
        check_year(year)?;
        let max = self.days_in_year(year);
        if day_of_year == 0 || day_of_year > max {
            return Err(CalendarError::DayOfYear {
                year,
                day: i64::from(day_of_year),
                max,
            });
        }
        Ok(())
    }

    /// Checks that `year-Wweek-day_of_week` exists in this mode.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Week`] or [`CalendarError::DayOfWeek`].
    pub fn validate_week_date(self, year: i64, week: u32, day_of_week: u32) -> Result<(), CalendarError> {
        check_year(year)?;
        let max = self.weeks_in_year(year);
        if week == 0 || week > max {
            return Err(CalendarError::Week {
                year,
                week: i64::from(week),
                max,
            });
        }
        if !(1..=DAYS_IN_WEEK).contains(&day_of_week) {
            return Err(CalendarError::DayOfWeek {
                day: i64::from(day_of_week),
            });
        }
        Ok(())
    }

    fn days_before_month(self, year: i64, month: u32) -> u32 {
        self.month_lengths(year)[..month as usize - 1].iter().sum()
    }

    /// Calendar date → day-of-year.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the calendar date does not exist.
    pub fn ordinal_from_calendar(self, year: i64, month: u32, day: u32) -> Result<u32, CalendarError> {
        self.validate_calendar_date(year, month, day)?;
        Ok(self.days_before_month(year, month) + day)
    }

    /// Day-of-year → `(month, day)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::DayOfYear`] if the ordinal date does not exist.
    pub fn calendar_from_ordinal(self, year: i64, day_of_year: u32) -> Result<(u32, u32), CalendarError> {
        self.validate_ordinal_date(year, day_of_year)?;
        let mut remaining = day_of_year;
        for (index, &length) in self.month_lengths(year).iter().enumerate() {
            if remaining <= length {
                return Ok((index as u32 + 1, remaining));
            }
            remaining -= length;
        }
        Err(CalendarError::DayOfYear {
            year,
            day: i64::from(day_of_year),
            max: self.days_in_year(year),
        })
    }

    // ── Week dates ──────────────────────────────────────────────────────

    /// ISO day of week (1 = Monday) of a day number.
    pub fn weekday(self, day_number: i64) -> u32 {
        let reference_monday = self.day_number(2000, 3);
        (day_number - reference_monday).rem_euclid(i64::from(DAYS_IN_WEEK)) as u32 + 1
    }

    /// Day number of the Monday that starts ISO week-year `year`.
    pub fn week_year_start(self, year: i64) -> i64 {
        let january_first = self.day_number(year, 1);
        let weekday = i64::from(self.weekday(january_first));
        if weekday <= 4 {
            january_first - (weekday - 1)
        } else {
            january_first + (8 - weekday)
        }
    }

    /// Number of ISO weeks in week-year `year` (52 or 53 in Gregorian mode).
    pub fn weeks_in_year(self, year: i64) -> u32 {
        ((self.week_year_start(year + 1) - self.week_year_start(year)) / i64::from(DAYS_IN_WEEK)) as u32
    }

    /// Week date `(week_year, week, day_of_week)` for a day number.
    pub fn week_from_day_number(self, day_number: i64) -> (i64, u32, u32) {
        let (mut week_year, _) = self.ordinal_from_day_number(day_number);
        if day_number >= self.week_year_start(week_year + 1) {
            week_year += 1;
        } else if day_number < self.week_year_start(week_year) {
            week_year -= 1;
        }
        let offset = day_number - self.week_year_start(week_year);
        let week = offset / i64::from(DAYS_IN_WEEK) + 1;
        let day_of_week = offset % i64::from(DAYS_IN_WEEK) + 1;
        (week_year, week as u32, day_of_week as u32)
    }

    /// Day number of a week date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the week date does not exist.
    pub fn day_number_from_week(self, year: i64, week: u32, day_of_week: u32) -> Result<i64, CalendarError> {
        self.validate_week_date(year, week, day_of_week)?;
        Ok(self.week_year_start(year)
            + i64::from(week - 1) * i64::from(DAYS_IN_WEEK)
            + i64::from(day_of_week - 1))
    }

    /// Calendar date → week date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the calendar date does not exist.
    pub fn week_from_calendar(self, year: i64, month: u32, day: u32) -> Result<(i64, u32, u32), CalendarError> {
        let day_of_year = self.ordinal_from_calendar(year, month, day)?;
        Ok(self.week_from_day_number(self.day_number(year, day_of_year)))
    }

    /// Week date → calendar date `(year, month, day)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the week date does not exist.
    pub fn calendar_from_week(self, year: i64, week: u32, day_of_week: u32) -> Result<(i64, u32, u32), CalendarError> {
        let (year, day_of_year) = self.ordinal_from_week(year, week, day_of_week)?;
        let (month, day) = self.calendar_from_ordinal(year, day_of_year)?;
        Ok((year, month, day))
    }

    /// Ordinal date → week date.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the ordinal date does not exist.
    pub fn week_from_ordinal(self, year: i64, day_of_year: u32) -> Result<(i64, u32, u32), CalendarError> {
        self.validate_ordinal_date(year, day_of_year)?;
        Ok(self.week_from_day_number(self.day_number(year, day_of_year)))
    }

    /// Week date → ordinal date `(year, day_of_year)`.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError`] if the week date does not exist.
    pub fn ordinal_from_week(self, year: i64, week: u32, day_of_week: u32) -> Result<(i64, u32), CalendarError> {
        let day_number = self.day_number_from_week(year, week, day_of_week)?;
        Ok(self.ordinal_from_day_number(day_number))
    }
}

pub(crate) fn check_year(year: i64) -> Result<(), CalendarError> {
    if year.unsigned_abs() > MAX_YEAR.unsigned_abs() {
        return Err(CalendarError::YearRange { year });
    }
    Ok(())
}

impl fmt::Display for CalendarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarMode {
    type Err = IsoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gregorian" => Ok(CalendarMode::Gregorian),
            "360day" | "360_day" => Ok(CalendarMode::Day360),
            "365day" | "365_day" => Ok(CalendarMode::Day365),
            "366day" | "366_day" => Ok(CalendarMode::Day366),
            other => Err(IsoError::TimePoint(format!(
                "unknown calendar mode '{other}': allowed: gregorian, 360day, 365day, 366day"
            ))),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    const G: CalendarMode = CalendarMode::Gregorian;

    // ── leap years and lengths ──────────────────────────────────────────

    #[test]
    fn test_gregorian_leap_years() {
        assert!(G.is_leap_year(2000));
        assert!(G.is_leap_year(2020));
        assert!(G.is_leap_year(0));
        assert!(G.is_leap_year(-4));
        assert!(!G.is_leap_year(1900));
        assert!(!G.is_leap_year(2021));
        assert!(!G.is_leap_year(-100));
    }

    #[test]
    fn test_fixed_modes_have_no_leap_years() {
        for mode in [CalendarMode::Day360, CalendarMode::Day365, CalendarMode::Day366] {
            assert!(!mode.is_leap_year(2000));
            assert!(!mode.is_leap_year(2004));
        }
        assert_eq!(CalendarMode::Day360.days_in_year(2000), 360);
        assert_eq!(CalendarMode::Day365.days_in_year(2000), 365);
        assert_eq!(CalendarMode::Day366.days_in_year(2001), 366);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(G.days_in_month(2020, 2).unwrap(), 29);
        assert_eq!(G.days_in_month(2021, 2).unwrap(), 28);
        assert_eq!(G.days_in_month(2021, 12).unwrap(), 31);
        assert_eq!(CalendarMode::Day360.days_in_month(2021, 2).unwrap(), 30);
        assert_eq!(CalendarMode::Day366.days_in_month(2021, 2).unwrap(), 29);
        assert!(matches!(G.days_in_month(2021, 13), Err(CalendarError::Month { month: 13 })));
        assert!(G.days_in_month(2021, 0).is_err());
    }

    #[test]
    fn test_days_in_year_range() {
        assert_eq!(G.days_in_year_range(2000, 2000), 366);
        assert_eq!(G.days_in_year_range(2001, 2004), 365 * 3 + 366);
        assert_eq!(G.days_in_year_range(1600, 1999), 146_097);
        assert_eq!(G.days_in_year_range(2004, 2001), 0);
        assert_eq!(CalendarMode::Day360.days_in_year_range(1, 10), 3600);
    }

    // ── day numbers ─────────────────────────────────────────────────────

    #[test]
    fn test_day_number_round_trip_across_modes() {
        for mode in [G, CalendarMode::Day360, CalendarMode::Day365, CalendarMode::Day366] {
            for n in (-800_000..800_000).step_by(997) {
                let (year, day) = mode.ordinal_from_day_number(n);
                assert_eq!(mode.day_number(year, day), n, "{mode} day {n}");
                assert!(day >= 1 && day <= mode.days_in_year(year));
            }
        }
    }

    #[test]
    fn test_date_from_day_number() {
        assert_eq!(G.date_from_day_number(0), (0, 1, 1));
        assert_eq!(G.date_from_day_number(-1), (-1, 12, 31));
        let n = G.day_number(2020, G.ordinal_from_calendar(2020, 2, 29).unwrap());
        assert_eq!(G.date_from_day_number(n), (2020, 2, 29));
        assert_eq!(CalendarMode::Day360.date_from_day_number(359), (0, 12, 30));
    }

    #[test]
    fn test_days_between_matches_chrono() {
        let a = NaiveDate::from_ymd_opt(1583, 10, 15).unwrap();
        let b = NaiveDate::from_ymd_opt(2400, 2, 29).unwrap();
        let ours = G.days_between((1583, a.ordinal()), (2400, b.ordinal()));
        assert_eq!(ours, (b - a).num_days());
        assert_eq!(G.days_between((2400, b.ordinal()), (1583, a.ordinal())), -ours);
    }

    // ── conversions ─────────────────────────────────────────────────────

    #[test]
    fn test_calendar_ordinal_conversions() {
        assert_eq!(G.ordinal_from_calendar(2020, 3, 1).unwrap(), 61);
        assert_eq!(G.ordinal_from_calendar(2021, 3, 1).unwrap(), 60);
        assert_eq!(G.calendar_from_ordinal(2020, 366).unwrap(), (12, 31));
        assert_eq!(CalendarMode::Day360.calendar_from_ordinal(2020, 360).unwrap(), (12, 30));
        assert!(G.calendar_from_ordinal(2021, 366).is_err());
    }

    #[test]
    fn test_week_dates_match_chrono() {
        let mut date = NaiveDate::from_ymd_opt(1890, 12, 20).unwrap();
        let end = NaiveDate::from_ymd_opt(2110, 1, 10).unwrap();
        while date < end {
            let iso = date.iso_week();
            let ours = G
                .week_from_calendar(i64::from(date.year()), date.month(), date.day())
                .unwrap();
            assert_eq!(
                ours,
                (
                    i64::from(iso.year()),
                    iso.week(),
                    date.weekday().number_from_monday()
                ),
                "{date}"
            );
            let back = G.calendar_from_week(ours.0, ours.1, ours.2).unwrap();
            assert_eq!(back, (i64::from(date.year()), date.month(), date.day()));
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_53_week_years() {
        // 53 weeks iff Jan 1 is a Thursday, or a Wednesday in a leap year.
        for year in 1900..2200 {
            let jan1 = G.weekday(G.day_number(year, 1));
            let expected = jan1 == 4 || (jan1 == 3 && G.is_leap_year(year));
            assert_eq!(G.weeks_in_year(year) == 53, expected, "year {year}");
        }
    }

    #[test]
    fn test_week_date_boundaries() {
        // 2021-01-03 belongs to 2020-W53.
        assert_eq!(G.week_from_calendar(2021, 1, 3).unwrap(), (2020, 53, 7));
        // 2008-12-29 belongs to 2009-W01.
        assert_eq!(G.week_from_calendar(2008, 12, 29).unwrap(), (2009, 1, 1));
        assert_eq!(G.calendar_from_week(1000, 1, 1).unwrap(), (999, 12, 30));
        assert!(matches!(
            G.validate_week_date(2021, 53, 1),
            Err(CalendarError::Week { max: 52, .. })
        ));
        assert!(G.validate_week_date(2021, 10, 8).is_err());
    }

    #[test]
    fn test_fixed_mode_week_structure_is_consistent() {
        let mode = CalendarMode::Day360;
        for year in 1990..2030 {
            let weeks = mode.weeks_in_year(year);
            assert!((51..=53).contains(&weeks), "{year}: {weeks}");
            let first = mode.day_number_from_week(year, 1, 1).unwrap();
            assert_eq!(mode.weekday(first), 1);
            assert_eq!(mode.week_from_day_number(first), (year, 1, 1));
        }
    }

    #[test]
    fn test_validate_calendar_date_errors() {
        assert!(G.validate_calendar_date(2020, 2, 29).is_ok());
        assert!(matches!(
            G.validate_calendar_date(2020, 2, 30),
            Err(CalendarError::DayOfMonth { max: 29, .. })
        ));
        assert!(G.validate_calendar_date(2020, 13, 1).is_err());
        assert!(G.validate_calendar_date(MAX_YEAR + 1, 1, 1).is_err());
        assert!(CalendarMode::Day360.validate_calendar_date(2021, 2, 30).is_ok());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("360_day".parse::<CalendarMode>().unwrap(), CalendarMode::Day360);
        assert_eq!("Gregorian".parse::<CalendarMode>().unwrap(), G);
        assert_eq!(CalendarMode::Day366.to_string(), "366day");
        assert!("julian".parse::<CalendarMode>().is_err());
    }
}
