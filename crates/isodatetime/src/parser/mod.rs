//! ISO 8601 text → values.
//!
//! Points are matched against the rule tables in [`grammar`]: every date
//! rule, optionally followed by `T` and a time rule, optionally followed by a
//! zone, tried in table order until one consumes the whole input. Basic rules
//! are tried before extended ones and a single input never mixes the two.
//! Field values are only checked once a rule has matched, by the
//! [`TimePoint`] constructors, so a bounds failure is reported as such rather
//! than as "no rule matched".

pub(crate) mod grammar;

use crate::calendar::NANOS_IN_SECOND;
use crate::config::Config;
use crate::decimal::{fraction_nanos, Decimal};
use crate::duration::Duration;
use crate::error::{IsoError, ParseError, Result};
use crate::point::{
    DatePrecision, Layout, TimePoint, TimePrecision, TruncatedFields, TruncatedYear, ZoneStyle,
    NANOS_IN_HOUR, NANOS_IN_MINUTE,
};
use crate::recurrence::TimeRecurrence;

use grammar::{tokenize, Class, Rule, Style, Token, BASIC, EXTENDED, TIME_DESIGNATOR};

// ── Matching ────────────────────────────────────────────────────────────────

/// Raw field values captured by a matched rule.
#[derive(Debug, Clone, Copy, Default)]
struct Fields {
    year: Option<i64>,
    year_of_century: Option<u8>,
    year_of_decade: Option<u8>,
    month: Option<u32>,
    day_of_month: Option<u32>,
    day_of_year: Option<u32>,
    week: Option<u32>,
    day_of_week: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    /// Billionths of the lowest time unit present.
    fraction: Option<u32>,
    offset: Option<(i32, ZoneStyle)>,
}

/// Furthest point any rule reached, for error reporting.
#[derive(Debug, Default)]
struct Failure {
    position: usize,
    expected: Vec<String>,
}

impl Failure {
    fn reached(&mut self, position: usize, pattern: impl FnOnce() -> String) {
        if position < self.position {
            return;
        }
        if position > self.position {
            self.position = position;
            self.expected.clear();
        }
        let pattern = pattern();
        if !self.expected.contains(&pattern) {
            self.expected.push(pattern);
        }
    }

    fn into_error(self, kind: &'static str, input: &str) -> IsoError {
        ParseError::new(kind, input, self.position, self.expected).into()
    }
}

fn take_digits(text: &str, position: usize, count: usize) -> Option<&str> {
    let slice = text.get(position..position.checked_add(count)?)?;
    slice.bytes().all(|b| b.is_ascii_digit()).then_some(slice)
}

fn take_number<T: std::str::FromStr>(text: &str, position: usize, count: usize) -> Option<T> {
    take_digits(text, position, count)?.parse().ok()
}

fn take_sign(text: &str, position: usize) -> Option<i64> {
    match text.as_bytes().get(position)? {
        b'+' => Some(1),
        b'-' => Some(-1),
        _ => None,
    }
}

/// Matches `tokens` at `position`, returning the end position or, on
/// failure, the position of the token that did not match.
fn match_tokens(
    tokens: &[Token],
    text: &str,
    mut position: usize,
    expanded_digits: usize,
    fields: &mut Fields,
) -> std::result::Result<usize, usize> {
    for token in tokens {
        let start = position;
        let advanced = match *token {
            Token::ExpandedYear | Token::ExpandedCentury => {
                let width = (if *token == Token::ExpandedYear { 4 } else { 2 }) + expanded_digits;
                let sign = take_sign(text, position).ok_or(start)?;
                let value: i64 = take_number(text, position + 1, width).ok_or(start)?;
                let scale = if *token == Token::ExpandedYear { 1 } else { 100 };
                fields.year = Some(sign * value * scale);
                position + 1 + width
            }
            Token::Year => {
                fields.year = Some(take_number(text, position, 4).ok_or(start)?);
                position + 4
            }
            Token::Century => {
                let century: i64 = take_number(text, position, 2).ok_or(start)?;
                fields.year = Some(century * 100);
                position + 2
            }
            Token::YearOfCentury => {
                fields.year_of_century = Some(take_number(text, position, 2).ok_or(start)?);
                position + 2
            }
            Token::YearOfDecade => {
                fields.year_of_decade = Some(take_number(text, position, 1).ok_or(start)?);
                position + 1
            }
            Token::Month => {
                fields.month = Some(take_number(text, position, 2).ok_or(start)?);
                position + 2
            }
            Token::DayOfMonth => {
                fields.day_of_month = Some(take_number(text, position, 2).ok_or(start)?);
                position + 2
            }
            Token::DayOfYear => {
                fields.day_of_year = Some(take_number(text, position, 3).ok_or(start)?);
                position + 3
            }
            Token::Week => {
                fields.week = Some(take_number(text, position, 2).ok_or(start)?);
                position + 2
            }
            Token::DayOfWeek => {
                fields.day_of_week = Some(take_number(text, position, 1).ok_or(start)?);
                position + 1
            }
            Token::Hour => {
                fields.hour = Some(take_number(text, position, 2).ok_or(start)?);
                position + 2
            }
            Token::Minute => {
                fields.minute = Some(take_number(text, position, 2).ok_or(start)?);
                position + 2
            }
            Token::Second => {
                fields.second = Some(take_number(text, position, 2).ok_or(start)?);
                position + 2
            }
            Token::ZoneHours | Token::ZoneBasic | Token::ZoneExtended => {
                let sign = take_sign(text, position).ok_or(start)? as i32;
                let hours: i32 = take_number(text, position + 1, 2).ok_or(start)?;
                let (minutes, end, style): (i32, usize, ZoneStyle) = match token {
                    Token::ZoneHours => (0, position + 3, ZoneStyle::Hours),
                    Token::ZoneBasic => (
                        take_number(text, position + 3, 2).ok_or(position + 3)?,
                        position + 5,
                        ZoneStyle::Basic,
                    ),
                    _ => {
                        if text.as_bytes().get(position + 3) != Some(&b':') {
                            return Err(position + 3);
                        }
                        (
                            take_number(text, position + 4, 2).ok_or(position + 4)?,
                            position + 6,
                            ZoneStyle::Extended,
                        )
                    }
                };
                if minutes > 59 {
                    return Err(start);
                }
                fields.offset = Some((sign * (hours * 60 + minutes), style));
                end
            }
            Token::Literal('Z') if tokens.len() == 1 => {
                if text.as_bytes().get(position) != Some(&b'Z') {
                    return Err(start);
                }
                fields.offset = Some((0, ZoneStyle::Utc));
                position + 1
            }
            Token::Literal(c) => {
                if !text[position..].starts_with(c) {
                    return Err(start);
                }
                position + c.len_utf8()
            }
            Token::Fraction(..) => return Err(start),
        };
        position = advanced;
    }
    Ok(position)
}

/// `[,.]digits` after a time rule.
fn match_fraction(text: &str, position: usize, fields: &mut Fields) -> std::result::Result<usize, usize> {
    match text.as_bytes().get(position) {
        Some(b',' | b'.') => {}
        _ => return Ok(position),
    }
    let digits_start = position + 1;
    let digits_len = text[digits_start..].bytes().take_while(u8::is_ascii_digit).count();
    let nanos = fraction_nanos(&text[digits_start..digits_start + digits_len]).ok_or(digits_start)?;
    fields.fraction = Some(nanos);
    Ok(digits_start + digits_len)
}

/// What a successful point match was made of.
#[derive(Debug, Clone, Copy)]
struct Matched {
    style: Style,
    date: Option<Rule>,
    time: Option<Rule>,
    fields: Fields,
}

fn rule_enabled(rule: &Rule, tokens: &[Token], config: &Config) -> bool {
    if rule.class == Class::Truncated && !config.allow_truncated {
        return false;
    }
    config.expanded_year_digits > 0 || !grammar::uses_expanded_year(tokens)
}

/// Time rule, fraction, optional zone, end of input.
fn match_time_tail(
    text: &str,
    position: usize,
    style: &Style,
    allow_truncated_time: bool,
    fields: &Fields,
    failure: &mut Failure,
    label: &str,
) -> Option<(Rule, Fields)> {
    for time in style.times {
        if time.class == Class::Truncated && !allow_truncated_time {
            continue;
        }
        let mut time_fields = *fields;
        let end = match match_tokens(&tokenize(time.pattern), text, position, 0, &mut time_fields)
            .and_then(|end| match_fraction(text, end, &mut time_fields))
        {
            Ok(end) => end,
            Err(at) => {
                failure.reached(at, || format!("{label}{}", time.pattern));
                continue;
            }
        };
        tracing::trace!(rule = time.pattern, end, "time rule matched prefix");
        if end == text.len() {
            return Some((*time, time_fields));
        }
        for zone in style.zones {
            let mut zoned = time_fields;
            match match_tokens(&tokenize(zone), text, end, 0, &mut zoned) {
                Ok(zone_end) if zone_end == text.len() => return Some((*time, zoned)),
                Ok(zone_end) => failure.reached(zone_end, || format!("{label}{}{zone}", time.pattern)),
                Err(at) => failure.reached(at, || format!("{label}{}{zone}", time.pattern)),
            }
        }
    }
    None
}

fn match_point(text: &str, style: Style, config: &Config, failure: &mut Failure) -> Option<Matched> {
    let expanded_digits = usize::from(config.expanded_year_digits);
    if text.starts_with(TIME_DESIGNATOR) && config.allow_truncated {
        let (time, fields) = match_time_tail(
            text,
            TIME_DESIGNATOR.len_utf8(),
            &style,
            true,
            &Fields::default(),
            failure,
            "T",
        )?;
        return Some(Matched {
            style,
            date: None,
            time: Some(time),
            fields,
        });
    }
    for date in style.dates {
        let tokens = tokenize(date.pattern);
        if !rule_enabled(date, &tokens, config) {
            continue;
        }
        tracing::trace!(rule = date.pattern, "trying date rule");
        let mut fields = Fields::default();
        let end = match match_tokens(&tokens, text, 0, expanded_digits, &mut fields) {
            Ok(end) => end,
            Err(at) => {
                failure.reached(at, || date.pattern.to_string());
                continue;
            }
        };
        if end == text.len() {
            return Some(Matched {
                style,
                date: Some(*date),
                time: None,
                fields,
            });
        }
        if date.class == Class::Reduced || !text[end..].starts_with(TIME_DESIGNATOR) {
            failure.reached(end, || date.pattern.to_string());
            continue;
        }
        let label = format!("{}T", date.pattern);
        if let Some((time, fields)) = match_time_tail(text, end + 1, &style, false, &fields, failure, &label) {
            return Some(Matched {
                style,
                date: Some(*date),
                time: Some(time),
                fields,
            });
        }
    }
    None
}

// ── Points ──────────────────────────────────────────────────────────────────

/// Parses an ISO 8601 date, date-time or (with a leading `T`) time.
///
/// Points without a zone designator take `config.assumed_offset_minutes`.
/// Truncated forms (`--05-01`, `T-30`) produce truncated points; see
/// [`TimePoint::complete_with`].
///
/// # Errors
///
/// Returns [`IsoError::Parse`] if no rule matches the whole input, and
/// [`IsoError::Calendar`] or [`IsoError::TimePoint`] if a rule matched but a
/// field is out of bounds (`2020-13-01`, `24:30`).
///
/// # Examples
///
/// ```
/// use isodatetime::{parse_point, Config};
///
/// let config = Config::default().with_expanded_year_digits(2);
/// let error = parse_point("+0020200101T12:00-05", &config).unwrap_err();
/// assert!(error.to_string().contains("position"));
///
/// let point = parse_point("+002020-03-01T12:00-05:00", &config).unwrap();
/// assert_eq!(point.calendar_date(), Some((2020, 3, 1)));
/// assert_eq!(point.offset_minutes(), Some(-300));
/// ```
#[tracing::instrument(skip(text, config), fields(input_len = text.len()))]
pub fn parse_point(text: &str, config: &Config) -> Result<TimePoint> {
    let styles: &[Style] = if config.allow_only_basic {
        &[BASIC]
    } else {
        &[BASIC, EXTENDED]
    };
    let mut failure = Failure::default();
    for style in styles {
        if let Some(matched) = match_point(text, *style, config, &mut failure) {
            tracing::debug!(
                date = matched.date.map(|r| r.pattern),
                time = matched.time.map(|r| r.pattern),
                extended = matched.style.extended,
                "matched point rule"
            );
            return build_point(&matched, config);
        }
    }
    Err(failure.into_error("date-time", text))
}

fn layout_of(matched: &Matched) -> Layout {
    let fields = &matched.fields;
    let date = if fields.day_of_month.is_some() || fields.day_of_year.is_some() || fields.day_of_week.is_some() {
        DatePrecision::Day
    } else if fields.week.is_some() {
        DatePrecision::Week
    } else if fields.month.is_some() {
        DatePrecision::Month
    } else if matched
        .date
        .is_some_and(|rule| matches!(tokenize(rule.pattern).first(), Some(Token::Century | Token::ExpandedCentury)))
    {
        DatePrecision::Century
    } else {
        DatePrecision::Year
    };
    let time = if fields.second.is_some() {
        TimePrecision::Second
    } else if fields.minute.is_some() {
        TimePrecision::Minute
    } else if fields.hour.is_some() {
        TimePrecision::Hour
    } else {
        TimePrecision::None
    };
    Layout {
        extended: matched.style.extended,
        date,
        time,
        decimal: fields.fraction.is_some(),
        zone: fields.offset.map_or(ZoneStyle::Absent, |(_, style)| style),
    }
}

fn build_point(matched: &Matched, config: &Config) -> Result<TimePoint> {
    let fields = &matched.fields;
    let offset = match fields.offset {
        Some((minutes, _)) => Some(minutes),
        None => config.assumed_offset_minutes,
    };
    let config = config.with_assumed_offset(offset);
    let layout = layout_of(matched);
    let truncated = matched.date.is_none_or(|rule| rule.class == Class::Truncated);

    if truncated {
        let year = match (fields.year_of_century, fields.year_of_decade) {
            (Some(year), _) => Some(TruncatedYear::YearOfCentury(year)),
            (None, Some(year)) => Some(TruncatedYear::YearOfDecade(year)),
            (None, None) => None,
        };
        let truncated = TruncatedFields {
            year,
            month: fields.month,
            day_of_month: fields.day_of_month,
            week: fields.week,
            day_of_week: fields.day_of_week,
            day_of_year: fields.day_of_year,
            hour: fields.hour,
            minute: fields.minute,
            second: fields.second,
            fraction: fields.fraction.unwrap_or(0),
        };
        return Ok(TimePoint::truncated(truncated, &config)?.with_layout(layout));
    }

    let year = fields
        .year
        .ok_or_else(|| IsoError::TimePoint("matched date rule captured no year".to_string()))?;
    let point = match (fields.week, fields.day_of_year) {
        (Some(week), _) => TimePoint::from_week_date(year, week, fields.day_of_week.unwrap_or(1), &config)?,
        (None, Some(day_of_year)) => TimePoint::from_ordinal_date(year, day_of_year, &config)?,
        (None, None) => TimePoint::from_calendar_date(
            year,
            fields.month.unwrap_or(1),
            fields.day_of_month.unwrap_or(1),
            &config,
        )?,
    };
    let point = match fields.hour {
        Some(hour) => {
            let (hour, minute, second, nanosecond) = time_of_day(hour, fields)?;
            point.with_time(hour, minute, second, nanosecond)?
        }
        None => point,
    };
    Ok(point.with_layout(layout))
}

/// Folds a decimal fraction on the lowest unit into hour/minute/second/nanos.
fn time_of_day(hour: u32, fields: &Fields) -> Result<(u32, u32, u32, u32)> {
    let minute = fields.minute.unwrap_or(0);
    let second = fields.second.unwrap_or(0);
    if minute > 59 || second > 59 {
        return Err(IsoError::TimePoint(format!(
            "time {hour:02}:{minute:02}:{second:02} out of bounds"
        )));
    }
    let unit_seconds = if fields.second.is_some() {
        1
    } else if fields.minute.is_some() {
        60
    } else {
        3600
    };
    let extra = i64::from(fields.fraction.unwrap_or(0)) * unit_seconds;
    let total = i64::from(hour) * NANOS_IN_HOUR
        + i64::from(minute) * NANOS_IN_MINUTE
        + i64::from(second) * NANOS_IN_SECOND
        + extra;
    Ok((
        (total / NANOS_IN_HOUR) as u32,
        (total % NANOS_IN_HOUR / NANOS_IN_MINUTE) as u32,
        (total % NANOS_IN_MINUTE / NANOS_IN_SECOND) as u32,
        (total % NANOS_IN_SECOND) as u32,
    ))
}

// ── Durations ───────────────────────────────────────────────────────────────

const DURATION_FORMS: &[&str] = &["PnW", "PnYnMnDTnHnMnS", "PCCYYMMDDThhmmss", "PCCYY-MM-DDThh:mm:ss"];

fn duration_error(text: &str, position: usize) -> IsoError {
    ParseError::new(
        "duration",
        text,
        position,
        DURATION_FORMS.iter().map(|s| s.to_string()).collect(),
    )
    .into()
}

/// Parses `PnW`, `PnYnMnDTnHnMnS` or the alternative `P<date>T<time>` form,
/// with an optional leading `-`.
///
/// Only the last component may carry a decimal fraction, and only if it is
/// hours, minutes or seconds.
///
/// # Errors
///
/// Returns [`IsoError::Parse`] for malformed text.
///
/// # Examples
///
/// ```
/// use isodatetime::parse_duration;
///
/// assert_eq!(parse_duration("P1W").unwrap(), parse_duration("P7D").unwrap());
/// assert_eq!(parse_duration("PT2,5S").unwrap().to_string(), "PT2,5S");
/// assert_eq!(parse_duration("P0004-078T10,5").unwrap().to_string(), "P4Y78DT10,5H");
/// ```
#[tracing::instrument(skip(text), fields(input_len = text.len()))]
pub fn parse_duration(text: &str) -> Result<Duration> {
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let sign_len = text.len() - body.len();
    if !body.starts_with('P') {
        return Err(duration_error(text, sign_len));
    }
    let start = sign_len + 1;
    match parse_designators(text, start, negative) {
        Ok(duration) => {
            tracing::debug!(form = "designators", "matched duration");
            Ok(duration)
        }
        Err(designator_failure) => match parse_alternative(text, start, negative) {
            Ok(duration) => {
                tracing::debug!(form = "alternative", "matched duration");
                Ok(duration)
            }
            Err(alternative_failure) => Err(duration_error(text, designator_failure.max(alternative_failure))),
        },
    }
}

/// `nYnMnDTnHnMnS` or `nW` starting at `start`; on failure returns the
/// offending byte position.
fn parse_designators(text: &str, start: usize, negative: bool) -> std::result::Result<Duration, usize> {
    const DATE_UNITS: &[u8] = b"YMD";
    const TIME_UNITS: &[u8] = b"HMS";
    let bytes = text.as_bytes();
    let mut position = start;
    let mut values = [Decimal::ZERO; 6];
    let mut next_unit = 0;
    let mut in_time = false;
    let mut time_components = 0;
    let mut components = 0;
    let mut fraction_seen = false;

    while position < bytes.len() {
        if bytes[position] == b'T' {
            if in_time {
                return Err(position);
            }
            in_time = true;
            next_unit = 3;
            position += 1;
            continue;
        }
        if fraction_seen {
            return Err(position);
        }
        let digits = bytes[position..].iter().take_while(|b| b.is_ascii_digit()).count();
        if digits == 0 {
            return Err(position);
        }
        let whole = &text[position..position + digits];
        position += digits;
        let mut fraction = None;
        if let Some(b',' | b'.') = bytes.get(position) {
            let fraction_digits = bytes[position + 1..].iter().take_while(|b| b.is_ascii_digit()).count();
            if fraction_digits == 0 {
                return Err(position + 1);
            }
            fraction = Some(&text[position + 1..position + 1 + fraction_digits]);
            position += 1 + fraction_digits;
        }
        let Some(&designator) = bytes.get(position) else {
            return Err(position);
        };
        if designator == b'W' && !in_time && components == 0 && fraction.is_none() {
            if position + 1 != bytes.len() {
                return Err(position + 1);
            }
            let weeks = whole.parse().map_err(|_| start)?;
            return Ok(Duration::from_week_count(negative, weeks));
        }
        let units = if in_time { TIME_UNITS } else { DATE_UNITS };
        let offset = if in_time { 3 } else { 0 };
        let Some(unit) = units.iter().position(|&u| u == designator).map(|i| i + offset) else {
            return Err(position);
        };
        if unit < next_unit || (fraction.is_some() && unit < 3) {
            return Err(position);
        }
        values[unit] = Decimal::from_digits(whole, fraction).ok_or(position)?;
        fraction_seen = fraction.is_some();
        next_unit = unit + 1;
        components += 1;
        if in_time {
            time_components += 1;
        }
        position += 1;
    }
    if components == 0 || (in_time && time_components == 0) {
        return Err(position);
    }
    Ok(Duration::from_components(
        negative,
        values[0].whole(),
        values[1].whole(),
        values[2].whole(),
        values[3],
        values[4],
        values[5],
    ))
}

const ALTERNATIVE_DATES: &[&str] = &["CCYYMMDD", "CCYYDDD", "CCYY-MM-DD", "CCYY-DDD"];
const ALTERNATIVE_BASIC_TIMES: &[&str] = &["hhmmss", "hhmm", "hh"];
const ALTERNATIVE_EXTENDED_TIMES: &[&str] = &["hh:mm:ss", "hh:mm", "hh"];

/// `P<date>[T<time>]` with every field read as a count rather than a
/// calendar position, so no bounds apply.
fn parse_alternative(text: &str, start: usize, negative: bool) -> std::result::Result<Duration, usize> {
    let mut furthest = start;
    for (index, date) in ALTERNATIVE_DATES.iter().enumerate() {
        let mut fields = Fields::default();
        let end = match match_tokens(&tokenize(date), text, start, 0, &mut fields) {
            Ok(end) => end,
            Err(at) => {
                furthest = furthest.max(at);
                continue;
            }
        };
        let mut complete = (end == text.len()).then_some(fields);
        if complete.is_none() && text[end..].starts_with(TIME_DESIGNATOR) {
            let times = if index < 2 {
                ALTERNATIVE_BASIC_TIMES
            } else {
                ALTERNATIVE_EXTENDED_TIMES
            };
            for time in times {
                let mut time_fields = fields;
                match match_tokens(&tokenize(time), text, end + 1, 0, &mut time_fields)
                    .and_then(|time_end| match_fraction(text, time_end, &mut time_fields))
                {
                    Ok(time_end) if time_end == text.len() => {
                        complete = Some(time_fields);
                        break;
                    }
                    Ok(time_end) => furthest = furthest.max(time_end),
                    Err(at) => furthest = furthest.max(at),
                }
            }
        } else if complete.is_none() {
            furthest = furthest.max(end);
        }
        if let Some(fields) = complete {
            return Ok(alternative_duration(&fields, negative));
        }
    }
    Err(furthest)
}

fn alternative_duration(fields: &Fields, negative: bool) -> Duration {
    let fraction = fields.fraction.unwrap_or(0);
    let unit = |value: Option<u32>, lowest: bool| {
        let whole = u64::from(value.unwrap_or(0));
        if lowest {
            Decimal::new(whole, fraction).unwrap_or(Decimal::from_whole(whole))
        } else {
            Decimal::from_whole(whole)
        }
    };
    let lowest_is_second = fields.second.is_some();
    let lowest_is_minute = !lowest_is_second && fields.minute.is_some();
    let lowest_is_hour = !lowest_is_second && !lowest_is_minute;
    Duration::from_components(
        negative,
        fields.year.map_or(0, i64::unsigned_abs),
        u64::from(fields.month.unwrap_or(0)),
        u64::from(fields.day_of_month.or(fields.day_of_year).unwrap_or(0)),
        unit(fields.hour, lowest_is_hour),
        unit(fields.minute, lowest_is_minute),
        unit(fields.second, lowest_is_second),
    )
}

// ── Recurrences ─────────────────────────────────────────────────────────────

enum Slot {
    Point(TimePoint),
    Duration(Duration),
}

/// Re-anchors a slot's parse error on the whole recurrence text.
fn in_recurrence(error: IsoError, text: &str, offset: usize) -> IsoError {
    match error {
        IsoError::Parse(mut parse) => {
            parse.input = text.to_string();
            parse.position += offset;
            IsoError::Parse(parse)
        }
        other => other,
    }
}

fn parse_slot(slot: &str, text: &str, offset: usize, config: &Config) -> Result<Slot> {
    let parsed = if slot.starts_with('P') || slot.starts_with("-P") {
        parse_duration(slot).map(Slot::Duration)
    } else {
        parse_point(slot, config).map(Slot::Point)
    };
    parsed.map_err(|e| in_recurrence(e, text, offset))
}

/// Parses `R[n]/start/end`, `Rn/duration`, `R[n]/start/duration` or
/// `R[n]/duration/end`.
///
/// A bare `R` is unbounded. Without any `R` prefix the text is a single
/// interval (`start/end`, `start/duration`, `duration/end`) and recurs once.
/// The duration-only form starts from `context_start`, which is also used to
/// complete truncated points in the other forms.
///
/// # Errors
///
/// Returns [`IsoError::Parse`] for malformed text and
/// [`IsoError::Recurrence`] for a well-formed recurrence that cannot be
/// built (two durations, missing context, `R0`, negative duration).
///
/// # Examples
///
/// ```
/// use isodatetime::{parse_recurrence, Config};
///
/// let recurrence = parse_recurrence("R3/P1Y/2000-01-01T00Z", None, &Config::default()).unwrap();
/// let years: Vec<_> = recurrence.iter().map(|p| p.calendar_date().unwrap().0).collect();
/// assert_eq!(years, vec![1998, 1999, 2000]);
/// ```
#[tracing::instrument(skip(text, context_start, config), fields(input_len = text.len()))]
pub fn parse_recurrence(text: &str, context_start: Option<&TimePoint>, config: &Config) -> Result<TimeRecurrence> {
    let mut parts = text.split('/');
    let first = parts.next().unwrap_or_default();
    let (repetitions, slots_offset) = match first.strip_prefix('R') {
        Some("") => (None, first.len() + 1),
        Some(count) => {
            let repetitions: u64 = (count.bytes().all(|b| b.is_ascii_digit()))
                .then(|| count.parse().ok())
                .flatten()
                .ok_or_else(|| IsoError::from(ParseError::new("recurrence", text, 1, vec!["Rn".to_string()])))?;
            (Some(repetitions), first.len() + 1)
        }
        None => (Some(1), 0),
    };
    let slot_texts: Vec<&str> = if slots_offset == 0 {
        text.split('/').collect()
    } else {
        parts.collect()
    };
    let has_prefix = slots_offset != 0;
    if slot_texts.is_empty() || slot_texts.len() > 2 || (!has_prefix && slot_texts.len() != 2) {
        return Err(ParseError::new(
            "recurrence",
            text,
            slots_offset.min(text.len()),
            vec!["R[n]/<slot>/<slot>".to_string(), "Rn/<duration>".to_string()],
        )
        .into());
    }

    let mut offset = slots_offset;
    let mut slots = Vec::with_capacity(slot_texts.len());
    for slot in &slot_texts {
        slots.push(parse_slot(slot, text, offset, config)?);
        offset += slot.len() + 1;
    }

    let complete = |point: TimePoint, reference: Option<&TimePoint>| -> Result<TimePoint> {
        if !point.is_truncated() {
            return Ok(point);
        }
        let reference = reference.ok_or_else(|| {
            IsoError::Recurrence(format!("truncated point {point} needs a context start point"))
        })?;
        point.complete_with(reference)
    };

    let recurrence = match (slots.pop(), slots.pop()) {
        (Some(Slot::Duration(duration)), None) => {
            let start = context_start.ok_or_else(|| {
                IsoError::Recurrence(format!("{text} has no start point and no context start was given"))
            })?;
            TimeRecurrence::from_context(repetitions, start.clone(), duration)?
        }
        (Some(Slot::Point(end)), Some(Slot::Point(start))) => {
            let start = complete(start, context_start)?;
            let end = complete(end, Some(&start))?;
            TimeRecurrence::from_start_end(repetitions, start, end)?
        }
        (Some(Slot::Duration(duration)), Some(Slot::Point(start))) => {
            TimeRecurrence::from_start_duration(repetitions, complete(start, context_start)?, duration)?
        }
        (Some(Slot::Point(end)), Some(Slot::Duration(duration))) => {
            TimeRecurrence::from_duration_end(repetitions, duration, complete(end, context_start)?)?
        }
        _ => {
            return Err(IsoError::Recurrence(format!(
                "{text} needs a time point and a duration, two time points, or a lone duration"
            )));
        }
    };
    tracing::debug!(form = ?recurrence.form(), repetitions = ?recurrence.repetitions(), "parsed recurrence");
    Ok(recurrence)
}

// ── Tests ───────────────────────────────────────────────────────────────────
