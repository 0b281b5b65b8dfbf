//! Fixed-point decimal used for fractional time components.
//!
//! ISO 8601 allows a decimal fraction on the lowest-order component
//! (`PT2,5S`, `12:01,4`). Floats would make `PT0.1S * 3 == PT0.3S` false, so
//! fractions are kept as whole units plus nanoths of a unit (nine digits).

use std::fmt;

use crate::calendar::NANOS_IN_SECOND;

const SCALE: u32 = 1_000_000_000;
const FRACTION_DIGITS: usize = 9;

/// A non-negative number with nine fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Decimal {
    whole: u64,
    nanos: u32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal { whole: 0, nanos: 0 };

    /// `nanos` are billionths of one unit and must be below 1e9.
    pub fn new(whole: u64, nanos: u32) -> Option<Self> {
        (nanos < SCALE).then_some(Self { whole, nanos })
    }

    pub const fn from_whole(whole: u64) -> Self {
        Self { whole, nanos: 0 }
    }

    pub fn whole(self) -> u64 {
        self.whole
    }

    /// Fractional part in billionths of one unit.
    pub fn nanos(self) -> u32 {
        self.nanos
    }

    pub fn is_zero(self) -> bool {
        self.whole == 0 && self.nanos == 0
    }

    pub fn has_fraction(self) -> bool {
        self.nanos != 0
    }

    /// Parses an integer part and optional fraction digits. Digits past the
    /// ninth are truncated.
    pub(crate) fn from_digits(whole: &str, fraction: Option<&str>) -> Option<Self> {
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let whole = whole.parse().ok()?;
        let nanos = match fraction {
            Some(digits) => fraction_nanos(digits)?,
            None => 0,
        };
        Some(Self { whole, nanos })
    }

    /// Value in nanoseconds, given the length of one unit in nanoseconds.
    /// Exact for every unit that is a whole number of seconds.
    pub fn scaled_nanos(self, unit_nanos: i128) -> i128 {
        i128::from(self.whole) * unit_nanos + i128::from(self.nanos) * unit_nanos / i128::from(SCALE)
    }

    pub fn checked_add(self, other: Decimal) -> Option<Decimal> {
        let nanos = self.nanos + other.nanos;
        let carry = u64::from(nanos / SCALE);
        Some(Self {
            whole: self.whole.checked_add(other.whole)?.checked_add(carry)?,
            nanos: nanos % SCALE,
        })
    }

    pub fn checked_mul(self, factor: u64) -> Option<Decimal> {
        let nanos = u128::from(self.nanos) * u128::from(factor);
        let carry = u64::try_from(nanos / u128::from(SCALE)).ok()?;
        Some(Self {
            whole: self.whole.checked_mul(factor)?.checked_add(carry)?,
            nanos: (nanos % u128::from(SCALE)) as u32,
        })
    }

    pub fn to_f64(self) -> f64 {
        self.whole as f64 + f64::from(self.nanos) / f64::from(SCALE)
    }

    /// Fraction digits with trailing zeros removed; empty when whole.
    pub fn fraction_digits(self) -> String {
        if self.nanos == 0 {
            return String::new();
        }
        let digits = format!("{:09}", self.nanos);
        digits.trim_end_matches('0').to_string()
    }

    /// Renders with the given decimal mark (`,` for ISO 8601 output).
    pub fn to_string_with_mark(self, mark: char) -> String {
        if self.nanos == 0 {
            self.whole.to_string()
        } else {
            format!("{}{}{}", self.whole, mark, self.fraction_digits())
        }
    }
}

/// Billionths represented by a string of fraction digits (`"4356"` → 435_600_000).
pub(crate) fn fraction_nanos(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kept = &digits[..digits.len().min(FRACTION_DIGITS)];
    let value: u32 = kept.parse().ok()?;
    Some(value * 10u32.pow((FRACTION_DIGITS - kept.len()) as u32))
}

/// Expresses `numerator / denominator` (with `numerator < denominator`) as
/// billionths, if that is exact.
pub(crate) fn exact_fraction_nanos(numerator: i128, denominator: i128) -> Option<u32> {
    let scaled = numerator * i128::from(NANOS_IN_SECOND);
    (scaled % denominator == 0).then(|| (scaled / denominator) as u32)
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_mark(','))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_digits() {
        let d = Decimal::from_digits("5", Some("5023")).unwrap();
        assert_eq!(d.whole(), 5);
        assert_eq!(d.nanos(), 502_300_000);
        assert_eq!(Decimal::from_digits("12", None).unwrap(), Decimal::from_whole(12));
        assert!(Decimal::from_digits("", None).is_none());
        assert!(Decimal::from_digits("1a", None).is_none());
    }

    #[test]
    fn test_fraction_truncates_past_nine_digits() {
        assert_eq!(fraction_nanos("1234567891"), Some(123_456_789));
        assert_eq!(fraction_nanos("0"), Some(0));
        assert_eq!(fraction_nanos(""), None);
    }

    #[test]
    fn test_scaled_nanos_is_exact() {
        let half_hour = Decimal::new(0, 500_000_000).unwrap();
        assert_eq!(half_hour.scaled_nanos(3_600_000_000_000), 1_800_000_000_000);
        let tenth = Decimal::new(0, 100_000_000).unwrap();
        assert_eq!(tenth.checked_mul(3).unwrap().scaled_nanos(1_000_000_000), 300_000_000);
    }

    #[test]
    fn test_checked_arithmetic_carries() {
        let a = Decimal::new(1, 700_000_000).unwrap();
        let b = Decimal::new(2, 600_000_000).unwrap();
        assert_eq!(a.checked_add(b).unwrap(), Decimal::new(4, 300_000_000).unwrap());
        assert_eq!(a.checked_mul(2).unwrap(), Decimal::new(3, 400_000_000).unwrap());
        assert!(Decimal::from_whole(u64::MAX).checked_add(Decimal::from_whole(1)).is_none());
    }

    #[test]
    fn test_display_uses_comma_and_trims() {
        assert_eq!(Decimal::new(2, 500_000_000).unwrap().to_string(), "2,5");
        assert_eq!(Decimal::from_whole(7).to_string(), "7");
        assert_eq!(Decimal::new(0, 345_000_000).unwrap().to_string_with_mark('.'), "0.345");
    }

    #[test]
    fn test_exact_fraction() {
        assert_eq!(exact_fraction_nanos(24, 60), Some(400_000_000));
        assert_eq!(exact_fraction_nanos(1, 3), None);
    }
}
