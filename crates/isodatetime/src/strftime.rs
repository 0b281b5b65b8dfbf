//! POSIX `strftime`/`strptime` subset.
//!
//! Formatting understands `%Y %y %m %d %H %M %S %j %W %V %G %u %F %T %s %z
//! %%`. `%W` and `%V` both give the ISO 8601 week number (not the C
//! Monday-based week), `%G` the ISO week-year and `%u` the ISO weekday.
//! Parsing understands `%F %H %M %S %Y %d %j %m %s %z %%`.

use crate::config::Config;
use crate::error::{IsoError, ParseError, Result};
use crate::point::TimePoint;

// ── Formatting ──────────────────────────────────────────────────────────────

fn year_text(year: i64) -> String {
    if year < 0 {
        format!("-{:04}", year.unsigned_abs())
    } else {
        format!("{year:04}")
    }
}

fn offset_text(point: &TimePoint) -> Result<String> {
    let offset = point
        .offset_minutes()
        .ok_or_else(|| IsoError::Format(format!("%z needs a UTC offset, {point} is naive")))?;
    let sign = if offset < 0 { '-' } else { '+' };
    let magnitude = offset.unsigned_abs();
    Ok(format!("{sign}{:02}{:02}", magnitude / 60, magnitude % 60))
}

/// Writes a complete point with a `%` pattern.
pub(crate) fn format(point: &TimePoint, pattern: &str) -> Result<String> {
    let truncated = || IsoError::Format(format!("strftime patterns need a complete point, got {point}"));
    let (year, month, day) = point.calendar_date().ok_or_else(truncated)?;
    let (_, day_of_year) = point.ordinal_date().ok_or_else(truncated)?;
    let (week_year, week, day_of_week) = point.week_date().ok_or_else(truncated)?;
    let hour = point.hour().unwrap_or_default();
    let minute = point.minute().unwrap_or_default();
    let second = point.second().unwrap_or_default();

    let mut out = String::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let directive = chars
            .next()
            .ok_or_else(|| IsoError::Format(format!("{pattern} ends with a lone %")))?;
        let text = match directive {
            'Y' => year_text(year),
            'y' => format!("{:02}", year.rem_euclid(100)),
            'm' => format!("{month:02}"),
            'd' => format!("{day:02}"),
            'H' => format!("{hour:02}"),
            'M' => format!("{minute:02}"),
            'S' => format!("{second:02}"),
            'j' => format!("{day_of_year:03}"),
            'W' | 'V' => format!("{week:02}"),
            'G' => year_text(week_year),
            'u' => day_of_week.to_string(),
            'F' => format!("{}-{month:02}-{day:02}", year_text(year)),
            'T' => format!("{hour:02}:{minute:02}:{second:02}"),
            's' => point.seconds_since_unix_epoch()?.to_string(),
            'z' => offset_text(point)?,
            '%' => "%".to_string(),
            other => {
                return Err(IsoError::Format(format!("unknown strftime directive %{other}")));
            }
        };
        out.push_str(&text);
    }
    Ok(out)
}

// ── Parsing ─────────────────────────────────────────────────────────────────

/// Fields collected while walking a `%` pattern.
#[derive(Debug, Default)]
struct Broken {
    year: Option<i64>,
    month: Option<u32>,
    day: Option<u32>,
    day_of_year: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    timestamp: Option<i64>,
    offset: Option<i32>,
}

struct Parser<'f, 'i> {
    fmt: &'f str,
    inp: &'i str,
    pos: usize,
    tm: Broken,
}

impl Parser<'_, '_> {
    fn fail(&self, expected: String) -> IsoError {
        ParseError::new("strptime", self.inp, self.pos, vec![expected]).into()
    }

    fn rest(&self) -> &[u8] {
        &self.inp.as_bytes()[self.pos..]
    }

    fn literal(&mut self, c: char) -> Result<()> {
        let mut buffer = [0u8; 4];
        let expected = c.encode_utf8(&mut buffer);
        if !self.inp[self.pos..].starts_with(&*expected) {
            return Err(self.fail(format!("'{c}'")));
        }
        self.pos += expected.len();
        Ok(())
    }

    /// Exactly `width` ASCII digits.
    fn digits(&mut self, width: usize, directive: char) -> Result<u32> {
        let rest = self.rest();
        if rest.len() < width || !rest[..width].iter().all(u8::is_ascii_digit) {
            return Err(self.fail(format!("{width} digits for %{directive}")));
        }
        let value = rest[..width].iter().fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'));
        self.pos += width;
        Ok(value)
    }

    fn signed_number(&mut self, directive: char) -> Result<i64> {
        let start = self.pos;
        let negative = self.rest().first() == Some(&b'-');
        if negative || self.rest().first() == Some(&b'+') {
            self.pos += 1;
        }
        let count = self.rest().iter().take_while(|b| b.is_ascii_digit()).count();
        if count == 0 {
            self.pos = start;
            return Err(self.fail(format!("a number for %{directive}")));
        }
        let digits = &self.inp[self.pos..self.pos + count];
        let magnitude: i64 = digits.parse().map_err(|_| self.fail(format!("a smaller number for %{directive}")))?;
        self.pos += count;
        Ok(if negative { -magnitude } else { magnitude })
    }

    fn offset(&mut self) -> Result<i32> {
        if self.rest().first() == Some(&b'Z') {
            self.pos += 1;
            return Ok(0);
        }
        let negative = match self.rest().first() {
            Some(b'+') => false,
            Some(b'-') => true,
            _ => return Err(self.fail("an offset (Z, ±hhmm or ±hh:mm) for %z".to_string())),
        };
        self.pos += 1;
        let hours = self.digits(2, 'z')?;
        if self.rest().first() == Some(&b':') {
            self.pos += 1;
        }
        let minutes = self.digits(2, 'z')?;
        let magnitude = (hours * 60 + minutes) as i32;
        Ok(if negative { -magnitude } else { magnitude })
    }

    fn parse(&mut self) -> Result<()> {
        let pattern = self.fmt;
        let mut fmt = pattern.chars();
        while let Some(c) = fmt.next() {
            if c != '%' {
                self.literal(c)?;
                continue;
            }
            let directive = fmt.next().ok_or_else(|| self.fail("a directive after %".to_string()))?;
            match directive {
                'Y' => self.tm.year = Some(i64::from(self.digits(4, 'Y')?)),
                'm' => self.tm.month = Some(self.digits(2, 'm')?),
                'd' => self.tm.day = Some(self.digits(2, 'd')?),
                'j' => self.tm.day_of_year = Some(self.digits(3, 'j')?),
                'H' => self.tm.hour = Some(self.digits(2, 'H')?),
                'M' => self.tm.minute = Some(self.digits(2, 'M')?),
                'S' => self.tm.second = Some(self.digits(2, 'S')?),
                'F' => {
                    self.tm.year = Some(i64::from(self.digits(4, 'F')?));
                    self.literal('-')?;
                    self.tm.month = Some(self.digits(2, 'F')?);
                    self.literal('-')?;
                    self.tm.day = Some(self.digits(2, 'F')?);
                }
                's' => self.tm.timestamp = Some(self.signed_number('s')?),
                'z' => self.tm.offset = Some(self.offset()?),
                '%' => self.literal('%')?,
                other => {
                    return Err(IsoError::Format(format!("unsupported strptime directive %{other}")));
                }
            }
        }
        if self.pos != self.inp.len() {
            return Err(self.fail("end of input".to_string()));
        }
        Ok(())
    }
}

impl Broken {
    fn build(self, config: &Config) -> Result<TimePoint> {
        if let Some(seconds) = self.timestamp {
            let point = TimePoint::from_unix_seconds(seconds, config)?;
            return match self.offset {
                Some(offset) => point.with_time_zone(offset),
                None => Ok(point),
            };
        }
        let config = match self.offset {
            Some(offset) => config.with_assumed_offset(Some(offset)),
            None => *config,
        };
        let year = self
            .year
            .ok_or_else(|| IsoError::TimePoint("strptime pattern gave no year".to_string()))?;
        let point = match self.day_of_year {
            Some(day_of_year) => TimePoint::from_ordinal_date(year, day_of_year, &config)?,
            None => TimePoint::from_calendar_date(year, self.month.unwrap_or(1), self.day.unwrap_or(1), &config)?,
        };
        point.with_time(
            self.hour.unwrap_or(0),
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
            0,
        )
    }
}

/// Reads a point written with a strptime pattern.
///
/// Missing month and day default to 1 and missing time fields to 0; the
/// year is required unless `%s` is used. Without `%z` the config's assumed
/// offset applies.
///
/// # Errors
///
/// Returns [`IsoError::Parse`] where the text does not follow the pattern,
/// [`IsoError::Format`] for unsupported directives, and the usual
/// construction errors for impossible dates.
///
/// # Examples
///
/// ```
/// use isodatetime::{parse_with_format, Config};
///
/// let point = parse_with_format("2020-02-29 13:45 +0100", "%F %H:%M %z", &Config::default()).unwrap();
/// assert_eq!(point.calendar_date(), Some((2020, 2, 29)));
/// assert_eq!(point.offset_minutes(), Some(60));
/// ```
#[tracing::instrument(skip(text, pattern, config), fields(input_len = text.len()))]
pub fn parse_with_format(text: &str, pattern: &str, config: &Config) -> Result<TimePoint> {
    let mut parser = Parser {
        fmt: pattern,
        inp: text,
        pos: 0,
        tm: Broken::default(),
    };
    parser.parse()?;
    tracing::debug!(fields = ?parser.tm, "strptime pattern matched");
    parser.tm.build(config)
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dumper::format_point;
    use crate::parser::parse_point;

    fn p(text: &str) -> TimePoint {
        parse_point(text, &Config::default()).unwrap()
    }

    // ── formatting ──────────────────────────────────────────────────────

    #[test]
    fn test_format_directives() {
        let point = p("2021-01-03T04:05:06+01:30");
        let cases = [
            ("%Y-%m-%dT%H:%M:%S", "2021-01-03T04:05:06"),
            ("%y", "21"),
            ("%j", "003"),
            ("%G-W%V-%u", "2020-W53-7"),
            ("%W", "53"),
            ("%F %T", "2021-01-03 04:05:06"),
            ("%z", "+0130"),
            ("100%%", "100%"),
        ];
        for (pattern, expected) in cases {
            assert_eq!(format(&point, pattern).unwrap(), expected, "{pattern}");
        }
    }

    #[test]
    fn test_format_epoch_seconds() {
        assert_eq!(format(&p("1970-01-02T00Z"), "%s").unwrap(), "86400");
        assert_eq!(format(&p("1969-12-31T23:59:59Z"), "%s").unwrap(), "-1");
    }

    #[test]
    fn test_format_through_format_point() {
        let config = Config::default().with_expanded_year_digits(2);
        let point = parse_point("+000044-01-04T05:01:02Z", &config).unwrap();
        assert_eq!(format_point(&point, Some("%Y-%m-%dT%H:%M")).unwrap(), "0044-01-04T05:01");
        let point = parse_point("+500200-07-28T00,4356-08:30", &config).unwrap();
        assert_eq!(format_point(&point, Some("%m-%dT%H:%M")).unwrap(), "07-28T00:26");
    }

    #[test]
    fn test_format_errors() {
        assert!(matches!(format(&p("2020-01-01T00Z"), "%Q"), Err(IsoError::Format(_))));
        assert!(matches!(format(&p("--0229"), "%m"), Err(IsoError::Format(_))));
        let naive = parse_point("2020-01-01T00", &Config::default().with_assumed_offset(None)).unwrap();
        assert!(matches!(format(&naive, "%z"), Err(IsoError::Format(_))));
    }

    // ── parsing ─────────────────────────────────────────────────────────

    #[test]
    fn test_parse_calendar_and_ordinal() {
        let config = Config::default();
        let point = parse_with_format("2020/12/31 23:59:58", "%Y/%m/%d %H:%M:%S", &config).unwrap();
        assert_eq!(point, p("2020-12-31T23:59:58Z"));
        let ordinal = parse_with_format("2020-366", "%Y-%j", &config).unwrap();
        assert_eq!(ordinal.calendar_date(), Some((2020, 12, 31)));
    }

    #[test]
    fn test_parse_offsets() {
        let config = Config::default();
        let point = parse_with_format("2020-01-01T10:00-05:30", "%FT%H:%M%z", &config).unwrap();
        assert_eq!(point.offset_minutes(), Some(-330));
        let utc = parse_with_format("2020-01-01T10Z", "%FT%H%z", &config).unwrap();
        assert_eq!(utc.offset_minutes(), Some(0));
    }

    #[test]
    fn test_parse_timestamp() {
        let point = parse_with_format("86400", "%s", &Config::default()).unwrap();
        assert_eq!(point, p("1970-01-02T00Z"));
    }

    #[test]
    fn test_parse_failures() {
        let config = Config::default();
        match parse_with_format("2020-1-01", "%F", &config) {
            Err(IsoError::Parse(error)) => assert_eq!(error.position, 5),
            other => panic!("expected a parse error, got {other:?}"),
        }
        assert!(parse_with_format("2020-02-30", "%F", &config).is_err());
        assert!(parse_with_format("2020-01-01x", "%F", &config).is_err());
        assert!(matches!(parse_with_format("Mon", "%a", &config), Err(IsoError::Format(_))));
        assert!(parse_with_format("01-01", "%m-%d", &config).is_err());
    }
}
