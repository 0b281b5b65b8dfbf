//! Text output for points, durations and recurrences.
//!
//! Dump patterns use the same words as the grammar rules (`CCYY-MM-DD`,
//! `+XCCYYWwwD`, `hh:mm:ss,tt`, `+hh:mm`); everything else in a pattern is
//! copied through. A literal offset at the end of a pattern (`Z`, `-0600`,
//! `+13`) converts the point to that offset before the fields are written.
//! Patterns containing `%` are handed to [`crate::strftime`].

use crate::calendar::NANOS_IN_SECOND;
use crate::decimal::exact_fraction_nanos;
use crate::duration::Duration;
use crate::error::{IsoError, Result};
use crate::parser::grammar::{tokenize, FractionOf, Token};
use crate::point::{
    DatePrecision, DateRepr, Layout, TimePoint, TimePrecision, TruncatedFields, TruncatedYear, ZoneStyle,
    NANOS_IN_HOUR, NANOS_IN_MINUTE,
};
use crate::recurrence::TimeRecurrence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Width {
    /// Years that do not fit the available digits are an error.
    Strict,
    /// Years widen to fit; used by `Display`, which cannot fail.
    Lenient,
}

// ── Field values ────────────────────────────────────────────────────────────

/// Everything a pattern can ask for, resolved once per dump.
#[derive(Debug, Default)]
struct Values {
    year: Option<i64>,
    year_of_century: Option<u32>,
    year_of_decade: Option<u32>,
    month: Option<u32>,
    day_of_month: Option<u32>,
    day_of_year: Option<u32>,
    week: Option<u32>,
    day_of_week: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    /// Billionths of the hour, minute and second.
    hour_fraction: Option<u32>,
    minute_fraction: Option<u32>,
    second_fraction: Option<u32>,
    offset: Option<i32>,
}

fn billionths(remainder: i64, unit: i64) -> u32 {
    (i128::from(remainder) * i128::from(NANOS_IN_SECOND) / i128::from(unit)) as u32
}

impl Values {
    /// Week tokens in the pattern make the year fields the ISO week-year.
    fn of(point: &TimePoint, week_based: bool) -> Self {
        let mut values = Values {
            offset: point.offset_minutes(),
            ..Values::default()
        };
        if let Some(fields) = point.truncated_fields() {
            values.fill_truncated(fields);
            return values;
        }
        let (Some((year, month, day)), Some((_, day_of_year)), Some((week_year, week, day_of_week)), Some(nanos)) = (
            point.calendar_date(),
            point.ordinal_date(),
            point.week_date(),
            point.nanos_of_day(),
        ) else {
            return values;
        };
        let year = if week_based { week_year } else { year };
        values.year = Some(year);
        values.year_of_century = Some((year.unsigned_abs() % 100) as u32);
        values.year_of_decade = Some((year.unsigned_abs() % 10) as u32);
        values.month = Some(month);
        values.day_of_month = Some(day);
        values.day_of_year = Some(day_of_year);
        values.week = Some(week);
        values.day_of_week = Some(day_of_week);
        values.hour = Some((nanos / NANOS_IN_HOUR) as u32);
        values.minute = Some((nanos % NANOS_IN_HOUR / NANOS_IN_MINUTE) as u32);
        values.second = Some((nanos % NANOS_IN_MINUTE / NANOS_IN_SECOND) as u32);
        values.hour_fraction = Some(billionths(nanos % NANOS_IN_HOUR, NANOS_IN_HOUR));
        values.minute_fraction = Some(billionths(nanos % NANOS_IN_MINUTE, NANOS_IN_MINUTE));
        values.second_fraction = Some((nanos % NANOS_IN_SECOND) as u32);
        values
    }

    fn fill_truncated(&mut self, fields: &TruncatedFields) {
        match fields.year {
            Some(TruncatedYear::YearOfCentury(y)) => {
                self.year_of_century = Some(u32::from(y));
                self.year_of_decade = Some(u32::from(y % 10));
            }
            Some(TruncatedYear::YearOfDecade(y)) => self.year_of_decade = Some(u32::from(y)),
            None => {}
        }
        self.month = fields.month;
        self.day_of_month = fields.day_of_month;
        self.day_of_year = fields.day_of_year;
        self.week = fields.week;
        self.day_of_week = fields.day_of_week;
        self.hour = fields.hour;
        self.minute = fields.minute;
        self.second = fields.second;
        // Only the lowest present unit carries a fraction.
        if fields.second.is_some() {
            self.second_fraction = Some(fields.fraction);
        } else if fields.minute.is_some() {
            self.minute_fraction = Some(fields.fraction);
        } else if fields.hour.is_some() {
            self.hour_fraction = Some(fields.fraction);
        }
    }
}

// ── Token rendering ─────────────────────────────────────────────────────────

fn missing(name: &str) -> IsoError {
    IsoError::Format(format!("point has no {name} to write"))
}

fn year_range(year: i64, digits: usize) -> IsoError {
    IsoError::Format(format!("year {year} does not fit in {digits} digits"))
}

fn signed(negative: bool, magnitude: u64, digits: usize) -> String {
    let sign = if negative { '-' } else { '+' };
    format!("{sign}{magnitude:0digits$}")
}

fn fraction_text(mark: char, nanos: u32) -> String {
    let digits = format!("{nanos:09}");
    let trimmed = digits.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{mark}0")
    } else {
        format!("{mark}{trimmed}")
    }
}

fn zone_text(token: Token, offset: i32) -> String {
    let sign = if offset < 0 { '-' } else { '+' };
    let hours = offset.unsigned_abs() / 60;
    let minutes = offset.unsigned_abs() % 60;
    match token {
        Token::ZoneExtended => format!("{sign}{hours:02}:{minutes:02}"),
        Token::ZoneBasic => format!("{sign}{hours:02}{minutes:02}"),
        _ => format!("{sign}{hours:02}"),
    }
}

fn render(point: &TimePoint, tokens: &[Token], width: Width) -> Result<String> {
    let week_based = tokens.iter().any(|t| matches!(t, Token::Week | Token::DayOfWeek));
    let values = Values::of(point, week_based);
    let expanded = usize::from(point.expanded_year_digits());
    let mut out = String::new();
    for &token in tokens {
        let two = |value: Option<u32>, name: &str| value.map(|v| format!("{v:02}")).ok_or_else(|| missing(name));
        let text = match token {
            Token::ExpandedYear | Token::ExpandedCentury => {
                let year = values.year.ok_or_else(|| missing("year"))?;
                let (magnitude, digits) = if token == Token::ExpandedYear {
                    (year.unsigned_abs(), 4 + expanded)
                } else {
                    (year.unsigned_abs() / 100, 2 + expanded)
                };
                let text = signed(year < 0, magnitude, digits);
                if width == Width::Strict && text.len() > digits + 1 {
                    return Err(year_range(year, 4 + expanded));
                }
                text
            }
            Token::Year | Token::Century => {
                let year = values.year.ok_or_else(|| missing("year"))?;
                if width == Width::Strict && !(0..=9999).contains(&year) {
                    return Err(year_range(year, 4));
                }
                if token == Token::Year {
                    format!("{year:04}")
                } else {
                    format!("{:02}", year / 100)
                }
            }
            Token::YearOfCentury => two(values.year_of_century, "year of century")?,
            Token::YearOfDecade => values
                .year_of_decade
                .map(|v| v.to_string())
                .ok_or_else(|| missing("year of decade"))?,
            Token::Month => two(values.month, "month")?,
            Token::DayOfMonth => two(values.day_of_month, "day of month")?,
            Token::DayOfYear => values
                .day_of_year
                .map(|v| format!("{v:03}"))
                .ok_or_else(|| missing("day of year"))?,
            Token::Week => two(values.week, "week")?,
            Token::DayOfWeek => values
                .day_of_week
                .map(|v| v.to_string())
                .ok_or_else(|| missing("day of week"))?,
            Token::Hour => two(values.hour, "hour")?,
            Token::Minute => two(values.minute, "minute")?,
            Token::Second => two(values.second, "second")?,
            Token::Fraction(unit, mark) => {
                let (nanos, name) = match unit {
                    FractionOf::Hour => (values.hour_fraction, "fraction of hour"),
                    FractionOf::Minute => (values.minute_fraction, "fraction of minute"),
                    FractionOf::Second => (values.second_fraction, "fraction of second"),
                };
                fraction_text(mark, nanos.ok_or_else(|| missing(name))?)
            }
            Token::ZoneExtended | Token::ZoneBasic | Token::ZoneHours => {
                zone_text(token, values.offset.ok_or_else(|| missing("UTC offset"))?)
            }
            Token::Literal(c) => c.to_string(),
        };
        out.push_str(&text);
    }
    Ok(out)
}

// ── Default patterns ────────────────────────────────────────────────────────

fn rank(precision: TimePrecision) -> u8 {
    match precision {
        TimePrecision::None => 0,
        TimePrecision::Hour => 1,
        TimePrecision::Minute => 2,
        TimePrecision::Second => 3,
    }
}

fn unit_nanos(precision: TimePrecision) -> i64 {
    match precision {
        TimePrecision::Hour => NANOS_IN_HOUR,
        TimePrecision::Minute => NANOS_IN_MINUTE,
        _ => NANOS_IN_SECOND,
    }
}

/// The coarsest time precision that still shows `nanos`, and whether the
/// lowest unit needs a decimal fraction.
fn time_precision(layout: Layout, nanos: i64) -> (TimePrecision, bool) {
    let hinted = layout.time;
    if layout.decimal && hinted != TimePrecision::None {
        let unit = unit_nanos(hinted);
        if exact_fraction_nanos(i128::from(nanos % unit), i128::from(unit)).is_some() {
            return (hinted, true);
        }
    }
    let needed = if nanos % NANOS_IN_MINUTE != 0 {
        TimePrecision::Second
    } else if nanos % NANOS_IN_HOUR != 0 {
        TimePrecision::Minute
    } else if nanos != 0 {
        TimePrecision::Hour
    } else {
        TimePrecision::None
    };
    let precision = if rank(needed) > rank(hinted) { needed } else { hinted };
    let decimal = precision == TimePrecision::Second && nanos % NANOS_IN_SECOND != 0;
    (precision, decimal)
}

fn time_words(precision: TimePrecision, extended: bool) -> &'static str {
    match (precision, extended) {
        (TimePrecision::None, _) => "",
        (TimePrecision::Hour, _) => "hh",
        (TimePrecision::Minute, true) => "hh:mm",
        (TimePrecision::Minute, false) => "hhmm",
        (TimePrecision::Second, true) => "hh:mm:ss",
        (TimePrecision::Second, false) => "hhmmss",
    }
}

fn fraction_word(precision: TimePrecision) -> &'static str {
    match precision {
        TimePrecision::Hour => ",ii",
        TimePrecision::Minute => ",nn",
        _ => ",tt",
    }
}

fn zone_words(layout: Layout, offset: Option<i32>) -> &'static str {
    let Some(offset) = offset else {
        return "";
    };
    let full = if layout.extended { "+hh:mm" } else { "+hhmm" };
    match layout.zone {
        ZoneStyle::Absent => "",
        ZoneStyle::Utc if offset == 0 => "Z",
        ZoneStyle::Hours if offset % 60 == 0 => "+hh",
        _ => full,
    }
}

fn complete_pattern(point: &TimePoint) -> Option<String> {
    let layout = point.layout();
    let year = point.year()?;
    let date = point.date_repr()?;
    let nanos = point.nanos_of_day()?;
    let (time, decimal) = time_precision(layout, nanos);
    let has_time = time != TimePrecision::None;
    let sep = if layout.extended { "-" } else { "" };
    let expanded = point.expanded_year_digits() > 0 || !(0..=9999).contains(&year);
    let year_word = if expanded { "+XCCYY" } else { "CCYY" };

    let mut pattern = match date {
        DateRepr::Calendar { month, day } => {
            let mut precision = if has_time { DatePrecision::Day } else { layout.date };
            if precision == DatePrecision::Century && (year % 100 != 0 || month != 1 || day != 1) {
                precision = DatePrecision::Year;
            }
            if precision == DatePrecision::Year && (month != 1 || day != 1) {
                precision = DatePrecision::Month;
            }
            if precision == DatePrecision::Month && day != 1 {
                precision = DatePrecision::Day;
            }
            match precision {
                DatePrecision::Century if expanded => "+XCC".to_string(),
                DatePrecision::Century => "CC".to_string(),
                DatePrecision::Year => year_word.to_string(),
                DatePrecision::Month => format!("{year_word}-MM"),
                _ => format!("{year_word}{sep}MM{sep}DD"),
            }
        }
        DateRepr::Week { day_of_week, .. } => {
            if layout.date == DatePrecision::Week && day_of_week == 1 && !has_time {
                format!("{year_word}{sep}Www")
            } else {
                format!("{year_word}{sep}Www{sep}D")
            }
        }
        DateRepr::Ordinal { .. } => format!("{year_word}{sep}DDD"),
    };
    if has_time {
        pattern.push('T');
        pattern.push_str(time_words(time, layout.extended));
        if decimal {
            pattern.push_str(fraction_word(time));
        }
        pattern.push_str(zone_words(layout, point.offset_minutes()));
    }
    Some(pattern)
}

/// The rule shape the fields were parsed from, so that the dump parses back
/// to the same truncated point.
fn truncated_pattern(point: &TimePoint, fields: &TruncatedFields) -> Option<String> {
    let layout = point.layout();
    let s = if layout.extended { "-" } else { "" };
    let yy = matches!(fields.year, Some(TruncatedYear::YearOfCentury(_)));
    let z = matches!(fields.year, Some(TruncatedYear::YearOfDecade(_)));
    let shape = (
        yy,
        z,
        fields.month.is_some(),
        fields.day_of_month.is_some(),
        fields.week.is_some(),
        fields.day_of_week.is_some(),
        fields.day_of_year.is_some(),
    );
    let date = match shape {
        (false, false, false, false, false, false, false) => String::new(),
        (true, false, true, true, false, false, false) => format!("YY{s}MM{s}DD"),
        (true, false, true, false, false, false, false) => "-YYMM".to_string(),
        (true, false, false, false, false, false, false) => "-YY".to_string(),
        (false, false, true, true, false, false, false) => format!("--MM{s}DD"),
        (false, false, true, false, false, false, false) => "--MM".to_string(),
        (false, false, false, true, false, false, false) => "---DD".to_string(),
        (true, false, false, false, false, false, true) => format!("YY{s}DDD"),
        (false, false, false, false, false, false, true) => "-DDD".to_string(),
        (true, false, false, false, true, true, false) => format!("YY{s}Www{s}D"),
        (true, false, false, false, true, false, false) => format!("YY{s}Www"),
        (false, true, false, false, true, true, false) => format!("-z{s}Www{s}D"),
        (false, true, false, false, true, false, false) => format!("-z{s}Www"),
        (false, false, false, false, true, true, false) => format!("-Www{s}D"),
        (false, false, false, false, true, false, false) => "-Www".to_string(),
        (false, false, false, false, false, true, false) => "-W-D".to_string(),
        _ => return None,
    };
    let (time, lowest) = match (fields.hour.is_some(), fields.minute.is_some(), fields.second.is_some()) {
        (false, false, false) => ("", TimePrecision::None),
        (true, true, true) => (time_words(TimePrecision::Second, layout.extended), TimePrecision::Second),
        (true, true, false) => (time_words(TimePrecision::Minute, layout.extended), TimePrecision::Minute),
        (true, false, false) => ("hh", TimePrecision::Hour),
        (false, true, true) if layout.extended => ("-mm:ss", TimePrecision::Second),
        (false, true, true) => ("-mmss", TimePrecision::Second),
        (false, true, false) => ("-mm", TimePrecision::Minute),
        (false, false, true) => ("--ss", TimePrecision::Second),
        (true, false, true) => return None,
    };
    let mut pattern = date;
    if !time.is_empty() {
        pattern.push('T');
        pattern.push_str(time);
        if fields.fraction != 0 || layout.decimal {
            pattern.push_str(fraction_word(lowest));
        }
        pattern.push_str(zone_words(layout, point.offset_minutes()));
    }
    Some(pattern)
}

fn default_pattern(point: &TimePoint) -> Option<String> {
    match point.truncated_fields() {
        Some(fields) => truncated_pattern(point, fields),
        None => complete_pattern(point),
    }
}

// ── Points ──────────────────────────────────────────────────────────────────

/// The `Display` text of a point: its layout hint, widened so no populated
/// field is lost.
pub(crate) fn display_point(point: &TimePoint) -> String {
    let rendered = default_pattern(point).map(|pattern| render(point, &tokenize(&pattern), Width::Lenient));
    match rendered {
        Some(Ok(text)) => text,
        _ => format!("{point:?}"),
    }
}

fn two_digits(bytes: &[u8]) -> i32 {
    bytes.iter().fold(0, |acc, b| acc * 10 + i32::from(b - b'0'))
}

/// Splits a trailing literal offset (`Z`, `±hh:mm`, `±hhmm`, `±hh`) off a
/// dump pattern, returning the offset in minutes.
fn split_zone(pattern: &str) -> (&str, Option<(&str, i32)>) {
    if let Some(body) = pattern.strip_suffix('Z') {
        return (body, Some(("Z", 0)));
    }
    for shape in ["+dd:dd", "+dddd", "+dd"] {
        let Some(start) = pattern.len().checked_sub(shape.len()) else {
            continue;
        };
        if !pattern.is_char_boundary(start) {
            continue;
        }
        let tail = &pattern[start..];
        let fits = tail.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'+' => c == b'+' || c == b'-',
            b'd' => c.is_ascii_digit(),
            other => c == other,
        });
        if !fits {
            continue;
        }
        let digits: Vec<u8> = tail.bytes().filter(u8::is_ascii_digit).collect();
        let hours = two_digits(&digits[..2]);
        let minutes = if digits.len() == 4 { two_digits(&digits[2..]) } else { 0 };
        let magnitude = hours * 60 + minutes;
        let offset = if tail.starts_with('-') { -magnitude } else { magnitude };
        return (&pattern[..start], Some((tail, offset)));
    }
    (pattern, None)
}

/// Writes `point` with a dump pattern, a strftime pattern, or (with `None`)
/// its own layout.
///
/// # Arguments
///
/// * `point` - The point to write.
/// * `pattern` - An ISO 8601 style dump pattern such as
///   `"+XCCYY-MM-DDThh:mm:ss-11:45"`, a pattern containing `%` directives,
///   or `None` for the default.
///
/// # Errors
///
/// Returns [`IsoError::Format`] when the pattern asks for fields a truncated
/// point does not have, when the year does not fit the digits available,
/// when a literal offset is applied to a naive or truncated point, or for an
/// unknown `%` directive.
///
/// # Examples
///
/// ```
/// use isodatetime::{format_point, parse_point, Config};
///
/// let config = Config::default().with_expanded_year_digits(2);
/// let point = parse_point("+000044-01-04T05:01:02Z", &config).unwrap();
/// let text = format_point(&point, Some("CCDDDThh*ss-0600")).unwrap();
/// assert_eq!(text, "00003T23*02-0600");
/// ```
pub fn format_point(point: &TimePoint, pattern: Option<&str>) -> Result<String> {
    let Some(pattern) = pattern else {
        let pattern = default_pattern(point)
            .ok_or_else(|| IsoError::Format(format!("no ISO 8601 form holds the fields of {point}")))?;
        return render(point, &tokenize(&pattern), Width::Strict);
    };
    if pattern.contains('%') {
        return crate::strftime::format(point, pattern);
    }
    let (body, zone) = split_zone(pattern);
    let Some((zone, offset)) = zone else {
        return render(point, &tokenize(body), Width::Strict);
    };
    if point.is_truncated() || point.offset_minutes().is_none() {
        return Err(IsoError::Format(format!(
            "{point} has no instant to express at UTC offset {zone}"
        )));
    }
    let converted = point.with_time_zone(offset)?;
    let mut text = render(&converted, &tokenize(body), Width::Strict)?;
    text.push_str(zone);
    Ok(text)
}

// ── Durations and recurrences ───────────────────────────────────────────────

/// Writes a duration. With a pattern, the letters `y m d h M s` are replaced
/// by the years, months, days, hours, minutes and seconds components (weeks
/// count as days, decimals use a period); other characters are copied.
///
/// # Errors
///
/// Never fails today; the `Result` matches the other formatters.
///
/// # Examples
///
/// ```
/// use isodatetime::{format_duration, parse_duration};
///
/// let duration = parse_duration("P57DT12H").unwrap();
/// assert_eq!(format_duration(&duration, Some("y,m,d,h")).unwrap(), "0,0,57,12");
/// ```
pub fn format_duration(duration: &Duration, pattern: Option<&str>) -> Result<String> {
    let Some(pattern) = pattern else {
        return Ok(duration.to_string());
    };
    let duration = duration.to_days();
    let sign = if duration.is_negative() { "-" } else { "" };
    let whole = |value: u64| if value == 0 { "0".to_string() } else { format!("{sign}{value}") };
    let decimal = |value: crate::decimal::Decimal| {
        if value.is_zero() {
            "0".to_string()
        } else {
            format!("{sign}{}", value.to_string_with_mark('.'))
        }
    };
    let mut out = String::new();
    for c in pattern.chars() {
        match c {
            'y' => out.push_str(&whole(duration.years())),
            'm' => out.push_str(&whole(duration.months())),
            'd' => out.push_str(&whole(duration.days())),
            'h' => out.push_str(&decimal(duration.hours())),
            'M' => out.push_str(&decimal(duration.minutes())),
            's' => out.push_str(&decimal(duration.seconds())),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn recurrence_text(recurrence: &TimeRecurrence, point: impl Fn(&TimePoint) -> Result<String>) -> Result<String> {
    let count = recurrence.repetitions().map(|n| n.to_string()).unwrap_or_default();
    let duration = recurrence.duration();
    let slots = match (recurrence.form(), recurrence.start(), recurrence.end()) {
        (crate::recurrence::RecurrenceForm::StartEnd, Some(start), Some(end)) => {
            format!("{}/{}", point(start)?, point(end)?)
        }
        (crate::recurrence::RecurrenceForm::StartDuration, Some(start), _) => {
            format!("{}/{duration}", point(start)?)
        }
        (crate::recurrence::RecurrenceForm::DurationEnd, _, Some(end)) => format!("{duration}/{}", point(end)?),
        _ => duration.to_string(),
    };
    Ok(format!("R{count}/{slots}"))
}

pub(crate) fn display_recurrence(recurrence: &TimeRecurrence) -> String {
    recurrence_text(recurrence, |point| Ok(display_point(point))).unwrap_or_default()
}

/// Writes a recurrence as `R[n]/<slot>[/<slot>]`, with its points written
/// through [`format_point`] using `pattern`.
///
/// # Errors
///
/// As for [`format_point`].
pub fn format_recurrence(recurrence: &TimeRecurrence, pattern: Option<&str>) -> Result<String> {
    recurrence_text(recurrence, |point| format_point(point, pattern))
}

// ── Tests ───────────────────────────────────────────────────────────────────
