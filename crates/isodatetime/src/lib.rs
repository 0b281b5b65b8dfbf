//! # isodatetime
//!
//! ISO 8601 date/time values with exact calendar arithmetic.
//!
//! Time points (complete or truncated, calendar, week or ordinal dates),
//! durations, and recurrences are parsed from ISO 8601 text, combined with
//! calendar-aware arithmetic in one of four calendar modes, and written back
//! out in any ISO 8601 layout or a strftime-style pattern.
//!
//! ```
//! use isodatetime::{format_point, parse_duration, parse_point, Config};
//!
//! let config = Config::default();
//! let point = parse_point("2020-01-31T12:00Z", &config).unwrap();
//! let later = point.add(&parse_duration("P1M").unwrap()).unwrap();
//! assert_eq!(later.to_string(), "2020-02-29T12:00Z");
//! assert_eq!(format_point(&later, Some("CCYY-DDD")).unwrap(), "2020-060");
//! ```
//!
//! ## Modules
//!
//! - [`calendar`] - Leap rules, day counting and date-representation conversions per calendar mode
//! - [`config`] - Calendar mode, expanded-year digits, assumed offset and parser options
//! - [`decimal`] - Fixed-point decimals for fractional duration components
//! - [`duration`] - Nominal and exact durations, their arithmetic and totals
//! - [`point`] - Complete and truncated time points, time zones and point arithmetic
//! - [`recurrence`] - The four ISO 8601 recurrence forms and their occurrences
//! - [`parser`] - Table-driven ISO 8601 grammar for points, durations and recurrences
//! - [`dumper`] - Default layouts and dump patterns
//! - [`strftime`] - `%`-directive formatting and parsing
//! - [`error`] - Error types

pub mod calendar;
pub mod config;
pub mod decimal;
pub mod dumper;
pub mod duration;
pub mod error;
pub mod parser;
pub mod point;
pub mod recurrence;
pub mod strftime;

pub use calendar::CalendarMode;
pub use config::Config;
pub use decimal::Decimal;
pub use dumper::{format_duration, format_point, format_recurrence};
pub use duration::{Duration, TimeUnit};
pub use error::{CalendarError, IsoError, ParseError, Result};
pub use parser::{parse_duration, parse_point, parse_recurrence};
pub use point::{DatePrecision, DateRepr, Layout, TimePoint, TimePrecision, TruncatedFields, TruncatedYear, ZoneStyle};
pub use recurrence::{Occurrences, RecurrenceForm, TimeRecurrence};
pub use strftime::parse_with_format;
