//! Signed ISO 8601 durations.
//!
//! A duration keeps its nominal part (years, months) apart from its exact
//! part (days, hours, minutes, seconds). Nominal units only acquire a length
//! when applied to a [`TimePoint`], so they are never folded into seconds.
//! Weeks are an exclusive representation: `P2W` cannot carry other units.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Neg;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::{NANOS_IN_DAY, NANOS_IN_SECOND, SECONDS_IN_HOUR, SECONDS_IN_MINUTE};
use crate::decimal::Decimal;
use crate::error::{IsoError, Result};
use crate::point::TimePoint;

const NANOS_IN_WEEK: i128 = NANOS_IN_DAY * 7;
const NANOS_IN_HOUR: i128 = SECONDS_IN_HOUR as i128 * NANOS_IN_SECOND as i128;
const NANOS_IN_MINUTE: i128 = SECONDS_IN_MINUTE as i128 * NANOS_IN_SECOND as i128;

/// Exact units a duration can be totalled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    fn nanos(self) -> i128 {
        match self {
            TimeUnit::Weeks => NANOS_IN_WEEK,
            TimeUnit::Days => NANOS_IN_DAY,
            TimeUnit::Hours => NANOS_IN_HOUR,
            TimeUnit::Minutes => NANOS_IN_MINUTE,
            TimeUnit::Seconds => i128::from(NANOS_IN_SECOND),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Components {
    years: u64,
    months: u64,
    days: u64,
    hours: Decimal,
    minutes: Decimal,
    seconds: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Magnitude {
    Weeks(u64),
    Components(Components),
}

impl Magnitude {
    fn months(&self) -> i128 {
        match self {
            Magnitude::Weeks(_) => 0,
            Magnitude::Components(c) => i128::from(c.years) * 12 + i128::from(c.months),
        }
    }

    fn nanos(&self) -> i128 {
        match self {
            Magnitude::Weeks(weeks) => i128::from(*weeks) * NANOS_IN_WEEK,
            Magnitude::Components(c) => {
                i128::from(c.days) * NANOS_IN_DAY
                    + c.hours.scaled_nanos(NANOS_IN_HOUR)
                    + c.minutes.scaled_nanos(NANOS_IN_MINUTE)
                    + c.seconds.scaled_nanos(i128::from(NANOS_IN_SECOND))
            }
        }
    }

    fn components(&self) -> Option<Components> {
        match self {
            Magnitude::Weeks(weeks) => Some(Components {
                days: weeks.checked_mul(7)?,
                ..Components::default()
            }),
            Magnitude::Components(c) => Some(*c),
        }
    }
}

/// A signed span of time.
///
/// Equality and hashing use the total signed months and the total signed
/// nanoseconds, so `P1W == P7D`, `P1D == PT24H` and `P1Y == P12M`.
/// [`PartialOrd`] is the product order over those two totals: durations whose
/// nominal and exact parts disagree in direction are incomparable.
#[derive(Debug, Clone, Copy)]
pub struct Duration {
    negative: bool,
    magnitude: Magnitude,
}

impl Duration {
    pub fn zero() -> Self {
        Self {
            negative: false,
            magnitude: Magnitude::Components(Components::default()),
        }
    }

    /// Whole-unit duration. Every component shares one sign, so all
    /// arguments are magnitudes; use [`Duration::negate`] for negative spans.
    pub fn new(years: u64, months: u64, days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self::from_components(
            false,
            years,
            months,
            days,
            Decimal::from_whole(hours),
            Decimal::from_whole(minutes),
            Decimal::from_whole(seconds),
        )
    }

    pub(crate) fn from_components(
        negative: bool,
        years: u64,
        months: u64,
        days: u64,
        hours: Decimal,
        minutes: Decimal,
        seconds: Decimal,
    ) -> Self {
        Self {
            negative,
            magnitude: Magnitude::Components(Components {
                years,
                months,
                days,
                hours,
                minutes,
                seconds,
            }),
        }
        .normalise_zero()
    }

    pub(crate) fn from_week_count(negative: bool, weeks: u64) -> Self {
        Self {
            negative,
            magnitude: Magnitude::Weeks(weeks),
        }
        .normalise_zero()
    }

    pub fn from_weeks(weeks: u64) -> Self {
        Self::from_week_count(false, weeks)
    }

    pub fn from_years(years: u64) -> Self {
        Self::new(years, 0, 0, 0, 0, 0)
    }

    pub fn from_months(months: u64) -> Self {
        Self::new(0, months, 0, 0, 0, 0)
    }

    pub fn from_days(days: u64) -> Self {
        Self::new(0, 0, days, 0, 0, 0)
    }

    pub fn from_hours(hours: u64) -> Self {
        Self::new(0, 0, 0, hours, 0, 0)
    }

    pub fn from_minutes(minutes: u64) -> Self {
        Self::new(0, 0, 0, 0, minutes, 0)
    }

    pub fn from_seconds(seconds: u64) -> Self {
        Self::new(0, 0, 0, 0, 0, seconds)
    }

    /// Exact duration decomposed into days and (fractional) seconds.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Duration`] if the day count overflows.
    pub fn from_exact_nanos(nanos: i128) -> Result<Self> {
        let magnitude = nanos.unsigned_abs();
        let day_nanos = NANOS_IN_DAY as u128;
        let days = u64::try_from(magnitude / day_nanos)
            .map_err(|_| IsoError::Duration(format!("{nanos} nanoseconds is too long")))?;
        let remainder = magnitude % day_nanos;
        let seconds = Decimal::new(
            (remainder / NANOS_IN_SECOND as u128) as u64,
            (remainder % NANOS_IN_SECOND as u128) as u32,
        )
        .unwrap_or_default();
        Ok(Self::from_components(
            nanos < 0,
            0,
            0,
            days,
            Decimal::ZERO,
            Decimal::ZERO,
            seconds,
        ))
    }

    /// Nominal and exact totals recombined into one duration
    /// (years, months, days, seconds).
    fn from_totals(months: i128, nanos: i128) -> Result<Self> {
        if (months > 0 && nanos < 0) || (months < 0 && nanos > 0) {
            return Err(IsoError::Duration(format!(
                "result would mix signs ({months} months, {nanos} nanoseconds)"
            )));
        }
        let exact = Self::from_exact_nanos(nanos)?;
        let months_abs = u64::try_from(months.unsigned_abs())
            .map_err(|_| IsoError::Duration(format!("{months} months is too long")))?;
        let Magnitude::Components(mut components) = exact.magnitude else {
            return Err(IsoError::Duration("exact part decomposed into weeks".to_string()));
        };
        components.years = months_abs / 12;
        components.months = months_abs % 12;
        Ok(Self {
            negative: months < 0 || nanos < 0,
            magnitude: Magnitude::Components(components),
        }
        .normalise_zero())
    }

    fn normalise_zero(mut self) -> Self {
        if self.is_zero() {
            self.negative = false;
        }
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Week count, when this duration is in the week representation.
    pub fn weeks(&self) -> Option<u64> {
        match self.magnitude {
            Magnitude::Weeks(weeks) => Some(weeks),
            Magnitude::Components(_) => None,
        }
    }

    pub fn years(&self) -> u64 {
        self.components_or_default().years
    }

    pub fn months(&self) -> u64 {
        self.components_or_default().months
    }

    /// Days component (zero for a week duration; see [`Duration::to_days`]).
    pub fn days(&self) -> u64 {
        self.components_or_default().days
    }

    pub fn hours(&self) -> Decimal {
        self.components_or_default().hours
    }

    pub fn minutes(&self) -> Decimal {
        self.components_or_default().minutes
    }

    pub fn seconds(&self) -> Decimal {
        self.components_or_default().seconds
    }

    fn components_or_default(&self) -> Components {
        match self.magnitude {
            Magnitude::Components(c) => c,
            Magnitude::Weeks(_) => Components::default(),
        }
    }

    /// True when there are no year or month components.
    pub fn is_exact(&self) -> bool {
        self.magnitude.months() == 0
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.months() == 0 && self.magnitude.nanos() == 0
    }

    /// Total months, carrying the sign.
    pub(crate) fn signed_months(&self) -> i128 {
        self.apply_sign(self.magnitude.months())
    }

    /// Total exact nanoseconds, carrying the sign.
    pub(crate) fn signed_nanos(&self) -> i128 {
        self.apply_sign(self.magnitude.nanos())
    }

    fn apply_sign(&self, value: i128) -> i128 {
        if self.negative {
            -value
        } else {
            value
        }
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    pub fn negate(&self) -> Self {
        Self {
            negative: !self.negative,
            magnitude: self.magnitude,
        }
        .normalise_zero()
    }

    pub fn abs(&self) -> Self {
        Self {
            negative: false,
            magnitude: self.magnitude,
        }
    }

    /// Sum of two durations.
    ///
    /// Durations of the same sign add component by component (`P1Y + P2M`
    /// is `P1Y2M`). Otherwise the totals are recombined.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Duration`] if the result would need a positive
    /// nominal part and a negative exact part (or the reverse), e.g.
    /// `P1M - P1D`.
    pub fn add(&self, other: &Duration) -> Result<Duration> {
        if other.is_zero() {
            return Ok(*self);
        }
        if self.is_zero() {
            return Ok(*other);
        }
        if self.negative != other.negative {
            return Self::from_totals(
                self.signed_months() + other.signed_months(),
                self.signed_nanos() + other.signed_nanos(),
            );
        }
        let overflow = || IsoError::Duration(format!("{self} + {other} overflows"));
        if let (Magnitude::Weeks(a), Magnitude::Weeks(b)) = (self.magnitude, other.magnitude) {
            let weeks = a.checked_add(b).ok_or_else(overflow)?;
            return Ok(Self::from_week_count(self.negative, weeks));
        }
        let a = self.magnitude.components().ok_or_else(overflow)?;
        let b = other.magnitude.components().ok_or_else(overflow)?;
        Ok(Self::from_components(
            self.negative,
            a.years.checked_add(b.years).ok_or_else(overflow)?,
            a.months.checked_add(b.months).ok_or_else(overflow)?,
            a.days.checked_add(b.days).ok_or_else(overflow)?,
            a.hours.checked_add(b.hours).ok_or_else(overflow)?,
            a.minutes.checked_add(b.minutes).ok_or_else(overflow)?,
            a.seconds.checked_add(b.seconds).ok_or_else(overflow)?,
        ))
    }

    /// `self - other`.
    ///
    /// # Errors
    ///
    /// As for [`Duration::add`].
    pub fn subtract(&self, other: &Duration) -> Result<Duration> {
        self.add(&other.negate())
    }

    /// Every component multiplied by `factor`; `None` on overflow.
    pub fn checked_mul(&self, factor: i64) -> Option<Duration> {
        let n = factor.unsigned_abs();
        let negative = self.negative != (factor < 0);
        let scaled = match self.magnitude {
            Magnitude::Weeks(weeks) => Self::from_week_count(negative, weeks.checked_mul(n)?),
            Magnitude::Components(c) => Self::from_components(
                negative,
                c.years.checked_mul(n)?,
                c.months.checked_mul(n)?,
                c.days.checked_mul(n)?,
                c.hours.checked_mul(n)?,
                c.minutes.checked_mul(n)?,
                c.seconds.checked_mul(n)?,
            ),
        };
        Some(scaled)
    }

    /// Every component's magnitude divided by `divisor`, dropping the
    /// remainder; week durations stay in weeks. `None` for a zero divisor.
    pub fn checked_div(&self, divisor: u64) -> Option<Duration> {
        if divisor == 0 {
            return None;
        }
        let divided = match self.magnitude {
            Magnitude::Weeks(weeks) => Self::from_week_count(self.negative, weeks / divisor),
            Magnitude::Components(c) => Self::from_components(
                self.negative,
                c.years / divisor,
                c.months / divisor,
                c.days / divisor,
                Decimal::from_whole(c.hours.whole() / divisor),
                Decimal::from_whole(c.minutes.whole() / divisor),
                Decimal::from_whole(c.seconds.whole() / divisor),
            ),
        };
        Some(divided)
    }

    /// Applies this duration to a point; same as `point.add(self)`.
    ///
    /// # Errors
    ///
    /// As for [`TimePoint::add`].
    pub fn add_to(&self, point: &TimePoint) -> Result<TimePoint> {
        point.add(self)
    }

    // ── Conversions ─────────────────────────────────────────────────────

    fn require_exact(&self, what: &str) -> Result<()> {
        if self.is_exact() {
            Ok(())
        } else {
            Err(IsoError::Duration(format!(
                "{self} has nominal (year/month) components and no fixed {what}"
            )))
        }
    }

    /// Signed length in nanoseconds.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Duration`] for nominal durations.
    pub fn to_exact_nanos(&self) -> Result<i128> {
        self.require_exact("length")?;
        Ok(self.signed_nanos())
    }

    /// Signed length in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Duration`] for nominal durations.
    pub fn to_exact_seconds(&self) -> Result<f64> {
        self.total(TimeUnit::Seconds)
    }

    /// Signed length expressed in `unit` (`PT36H` is 1.5 days).
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Duration`] for nominal durations.
    pub fn total(&self, unit: TimeUnit) -> Result<f64> {
        let nanos = self.to_exact_nanos()?;
        let unit_nanos = unit.nanos();
        Ok((nanos / unit_nanos) as f64 + (nanos % unit_nanos) as f64 / unit_nanos as f64)
    }

    /// Whole days plus the remaining seconds (`0 <= |seconds| < 86400`),
    /// both carrying the duration's sign.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Duration`] for nominal durations.
    pub fn to_days_and_seconds(&self) -> Result<(i64, f64)> {
        let nanos = self.to_exact_nanos()?;
        let days = i64::try_from(nanos / NANOS_IN_DAY)
            .map_err(|_| IsoError::Duration(format!("{self} has too many days")))?;
        let seconds = (nanos % NANOS_IN_DAY) as f64 / NANOS_IN_SECOND as f64;
        Ok((days, seconds))
    }

    /// Week duration re-expressed in days; other durations are unchanged.
    pub fn to_days(&self) -> Self {
        match self.magnitude {
            Magnitude::Weeks(weeks) => Self::from_components(
                self.negative,
                0,
                0,
                weeks.saturating_mul(7),
                Decimal::ZERO,
                Decimal::ZERO,
                Decimal::ZERO,
            ),
            Magnitude::Components(_) => *self,
        }
    }

    /// Whole weeks contained in this duration; any remainder is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Duration`] for nominal durations.
    pub fn to_weeks(&self) -> Result<Self> {
        if self.weeks().is_some() {
            return Ok(*self);
        }
        let nanos = self.to_exact_nanos()?;
        let weeks = u64::try_from(nanos.unsigned_abs() / NANOS_IN_WEEK as u128)
            .map_err(|_| IsoError::Duration(format!("{self} has too many weeks")))?;
        Ok(Self::from_week_count(self.negative, weeks))
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::zero()
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.signed_months() == other.signed_months() && self.signed_nanos() == other.signed_nanos()
    }
}

impl Eq for Duration {}

impl Hash for Duration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.signed_months().hash(state);
        self.signed_nanos().hash(state);
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let months = self.signed_months().cmp(&other.signed_months());
        let nanos = self.signed_nanos().cmp(&other.signed_nanos());
        match (months, nanos) {
            (a, b) if a == b => Some(a),
            (Ordering::Equal, b) => Some(b),
            (a, Ordering::Equal) => Some(a),
            _ => None,
        }
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        self.negate()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0Y");
        }
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        let c = match self.magnitude {
            Magnitude::Weeks(weeks) => return write!(f, "{weeks}W"),
            Magnitude::Components(c) => c,
        };
        for (value, unit) in [(c.years, 'Y'), (c.months, 'M'), (c.days, 'D')] {
            if value != 0 {
                write!(f, "{value}{unit}")?;
            }
        }
        if !(c.hours.is_zero() && c.minutes.is_zero() && c.seconds.is_zero()) {
            f.write_str("T")?;
            for (value, unit) in [(c.hours, 'H'), (c.minutes, 'M'), (c.seconds, 'S')] {
                if !value.is_zero() {
                    write!(f, "{value}{unit}")?;
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Duration {
    type Err = IsoError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_duration(s)
    }
}

impl Serialize for Duration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str) -> Duration {
        text.parse().unwrap()
    }

    // ── equality ────────────────────────────────────────────────────────

    #[test]
    fn test_exact_unit_equivalences() {
        assert_eq!(d("P1W"), d("P7D"));
        assert_eq!(d("P1D"), d("PT24H"));
        assert_eq!(d("PT1H"), d("PT60M"));
        assert_eq!(d("PT1M"), d("PT60S"));
        assert_eq!(d("P1Y"), d("P12M"));
        assert_ne!(d("P1M"), d("P30D"));
    }

    #[test]
    fn test_equal_durations_hash_equal() {
        use std::collections::HashSet;
        let set: HashSet<Duration> = ["P1W", "P7D", "PT168H", "P1Y", "P12M"].iter().map(|s| d(s)).collect();
        assert_eq!(set.len(), 2);
    }

    // ── ordering ────────────────────────────────────────────────────────

    #[test]
    fn test_product_order() {
        assert!(d("PT1H") < d("P1D"));
        assert!(d("P1Y") > d("P11M"));
        assert!(d("P1Y1D") > d("P1Y"));
        assert_eq!(d("P1Y").partial_cmp(&d("P365D")), None);
        assert_eq!(d("P1M").partial_cmp(&d("P1M")), Some(Ordering::Equal));
        assert!(d("-P1D") < Duration::zero());
    }

    // ── arithmetic ──────────────────────────────────────────────────────

    #[test]
    fn test_add_same_sign_is_componentwise() {
        assert_eq!(d("P1Y").add(&d("P2M")).unwrap().to_string(), "P1Y2M");
        assert_eq!(d("P1W").add(&d("P2W")).unwrap().to_string(), "P3W");
        assert_eq!(d("P1W").add(&d("P1D")).unwrap().to_string(), "P8D");
        assert_eq!(d("PT0,5S").add(&d("PT0,7S")).unwrap().to_string(), "PT1,2S");
    }

    #[test]
    fn test_add_opposite_signs_recombines() {
        assert_eq!(d("P2D").add(&d("-PT12H")).unwrap(), d("PT36H"));
        assert_eq!(d("P1Y").subtract(&d("P13M")).unwrap(), d("-P1M"));
        assert!(d("P2D").subtract(&d("P2D")).unwrap().is_zero());
    }

    #[test]
    fn test_mixed_sign_result_fails() {
        let err = d("P1M").subtract(&d("P1D")).unwrap_err();
        assert!(matches!(err, IsoError::Duration(_)));
    }

    #[test]
    fn test_checked_mul() {
        assert_eq!(d("P1M").checked_mul(3).unwrap().to_string(), "P3M");
        assert_eq!(d("PT0,1S").checked_mul(3).unwrap(), d("PT0,3S"));
        assert_eq!(d("P1D").checked_mul(-2).unwrap(), d("-P2D"));
        assert!(Duration::from_years(u64::MAX).checked_mul(2).is_none());
    }

    #[test]
    fn test_checked_div() {
        let halved = d("P3Y5M10DT7H30M").checked_div(2).unwrap();
        assert_eq!((halved.years(), halved.months(), halved.days()), (1, 2, 5));
        assert_eq!((halved.hours(), halved.minutes()), (Decimal::from_whole(3), Decimal::from_whole(15)));
        let weeks = d("P5W").checked_div(2).unwrap();
        assert_eq!(weeks.weeks(), Some(2));
        assert_eq!(weeks.to_string(), "P2W");
        assert_eq!(d("PT7,9S").checked_div(2).unwrap().seconds(), Decimal::from_whole(3));
        assert!(d("-P4D").checked_div(2).unwrap().is_negative());
        assert!(d("P1D").checked_div(0).is_none());
    }

    #[test]
    fn test_negate_and_abs() {
        assert_eq!(d("P1Y").negate().to_string(), "-P1Y");
        assert_eq!((-d("-PT3H")).to_string(), "PT3H");
        assert_eq!(d("-P3YT4H2M").abs().to_string(), "P3YT4H2M");
        assert!(!Duration::zero().negate().is_negative());
    }

    // ── conversions ─────────────────────────────────────────────────────

    #[test]
    fn test_exact_conversions() {
        assert_eq!(d("PT1H30M").to_exact_seconds().unwrap(), 5400.0);
        assert_eq!(d("PT36H").total(TimeUnit::Days).unwrap(), 1.5);
        assert_eq!(d("P2W").total(TimeUnit::Hours).unwrap(), 336.0);
        assert!(d("P1Y").to_exact_seconds().is_err());
    }

    #[test]
    fn test_days_and_seconds_share_sign() {
        assert_eq!(d("P1DT1H").to_days_and_seconds().unwrap(), (1, 3600.0));
        assert_eq!(d("-P1DT1H").to_days_and_seconds().unwrap(), (-1, -3600.0));
        assert!(d("P1M").to_days_and_seconds().is_err());
    }

    #[test]
    fn test_weeks_and_days() {
        assert_eq!(d("P2W").to_days().to_string(), "P14D");
        assert_eq!(d("P15D").to_weeks().unwrap().to_string(), "P2W");
        assert_eq!(d("P2W").weeks(), Some(2));
        assert_eq!(d("P14D").weeks(), None);
    }

    #[test]
    fn test_from_exact_nanos_decomposes_days_and_seconds() {
        let span = Duration::from_exact_nanos(NANOS_IN_DAY + 90 * 1_000_000_000 + 5).unwrap();
        assert_eq!(span.days(), 1);
        assert_eq!(span.seconds(), Decimal::new(90, 5).unwrap());
        assert!(Duration::from_exact_nanos(-NANOS_IN_DAY).unwrap().is_negative());
    }

    // ── display ─────────────────────────────────────────────────────────

    #[test]
    fn test_display() {
        assert_eq!(Duration::zero().to_string(), "P0Y");
        assert_eq!(Duration::new(1, 2, 3, 4, 5, 6).to_string(), "P1Y2M3DT4H5M6S");
        assert_eq!(d("PT5.5023H").to_string(), "PT5,5023H");
        assert_eq!(d("-P3YT4H2M").to_string(), "-P3YT4H2M");
        assert_eq!(Duration::from_weeks(5).to_string(), "P5W");
    }

    #[test]
    fn test_serde_uses_iso_text() {
        let json = serde_json::to_string(&d("P1DT2H")).unwrap();
        assert_eq!(json, r#""P1DT2H""#);
        let back: Duration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d("P1DT2H"));
    }
}
