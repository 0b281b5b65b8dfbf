//! End-to-end checks through the public API.

use isodatetime::{
    format_duration, format_point, format_recurrence, parse_duration, parse_point, parse_recurrence,
    parse_with_format, CalendarMode, Config, IsoError, RecurrenceForm, TimePoint, TimeRecurrence,
};

fn p(text: &str) -> TimePoint {
    parse_point(text, &Config::default()).unwrap()
}

// ── Points ──────────────────────────────────────────────────────────────────

#[test_log::test]
fn test_month_end_clamp() {
    let later = p("2020-01-31").add(&parse_duration("P1M").unwrap()).unwrap();
    assert_eq!(later.calendar_date(), Some((2020, 2, 29)));
    assert_eq!(later.to_string(), "2020-02-29");
}

#[test_log::test]
fn test_invalid_dates_fail() {
    for text in ["2020-13-32", "2020-02-30", "2019-02-29", "2020-W54-1", "2021-366"] {
        assert!(parse_point(text, &Config::default()).is_err(), "{text}");
    }
}

#[test_log::test]
fn test_parse_error_reports_position() {
    match parse_point("2020-01-0x", &Config::default()) {
        Err(IsoError::Parse(error)) => {
            assert_eq!(error.input, "2020-01-0x");
            assert!(error.position >= 8, "{error}");
            assert!(!error.expected.is_empty());
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test_log::test]
fn test_truncated_versus_complete_comparison_fails() {
    let truncated = p("--0229");
    let complete = p("2020-02-29");
    assert!(matches!(truncated.compare(&complete), Err(IsoError::Comparison(_))));
    assert_eq!(truncated.partial_cmp(&complete), None);
}

#[test_log::test]
fn test_truncated_point_completion() {
    let reference = p("2021-06-01T00Z");
    let completed = p("--0229").complete_with(&reference).unwrap();
    assert_eq!(completed.calendar_date(), Some((2024, 2, 29)));
}

#[test_log::test]
fn test_calendar_modes() {
    let config = Config::default().with_calendar(CalendarMode::Day360);
    let point = parse_point("2020-02-30", &config).unwrap();
    let next = point.add(&parse_duration("P1D").unwrap()).unwrap();
    assert_eq!(next.calendar_date(), Some((2020, 3, 1)));
    assert!(parse_point("2020-01-31", &config).is_err());
}

#[test_log::test]
fn test_time_zone_round_trip() {
    let point = p("2020-12-31T23:30-01:00");
    let utc = point.to_utc().unwrap();
    assert_eq!(utc.to_string(), "2021-01-01T00:30Z");
    assert_eq!(utc, point);
}

#[test_log::test]
fn test_strftime_round_trip() {
    let point = p("2020-02-29T13:45:00+01:00");
    let text = format_point(&point, Some("%F %T %z")).unwrap();
    assert_eq!(text, "2020-02-29 13:45:00 +0100");
    let parsed = parse_with_format(&text, "%F %H:%M:%S %z", &Config::default()).unwrap();
    assert_eq!(parsed, point);
}

// ── Durations ───────────────────────────────────────────────────────────────

#[test_log::test]
fn test_duration_equalities() {
    assert_eq!(parse_duration("P1W").unwrap(), parse_duration("P7D").unwrap());
    assert_eq!(parse_duration("P1D").unwrap(), parse_duration("PT24H").unwrap());
    assert_ne!(parse_duration("P1M").unwrap(), parse_duration("P30D").unwrap());
}

#[test_log::test]
fn test_duration_alternative_form() {
    let duration = parse_duration("P0001-02-03T04:05:06").unwrap();
    assert_eq!(duration, parse_duration("P1Y2M3DT4H5M6S").unwrap());
    assert_eq!(format_duration(&duration, Some("y m d h M s")).unwrap(), "1 2 3 4 5 6");
}

// ── Recurrences ─────────────────────────────────────────────────────────────

#[test_log::test]
fn test_duration_end_recurrence_yields_three_years() {
    let recurrence = parse_recurrence("R3/P1Y/2000-01-01T00Z", None, &Config::default()).unwrap();
    assert_eq!(recurrence.form(), RecurrenceForm::DurationEnd);
    let years: Vec<_> = recurrence.iter().map(|point| point.calendar_date().unwrap().0).collect();
    assert_eq!(years, vec![1998, 1999, 2000]);
    assert_eq!(recurrence.get_next(&p("2000-01-01T00Z")).unwrap(), None);
    assert_eq!(recurrence.get_previous(&p("1998-01-01T00Z")).unwrap(), None);
}

#[test_log::test]
fn test_recurrence_walk_with_get_next() {
    let recurrence: TimeRecurrence = "R/2020-01-01T00Z/PT8H".parse().unwrap();
    let mut cursor = p("2020-01-01T00Z");
    let mut seen = Vec::new();
    for _ in 0..4 {
        cursor = recurrence.get_next(&cursor).unwrap().unwrap();
        seen.push(cursor.hour().unwrap());
    }
    assert_eq!(seen, vec![8, 16, 0, 8]);
}

#[test_log::test]
fn test_recurrence_output() {
    let recurrence = parse_recurrence("R2/20200101T00Z/P1D", None, &Config::default()).unwrap();
    assert_eq!(recurrence.to_string(), "R2/20200101T00Z/P1D");
    assert_eq!(
        format_recurrence(&recurrence, Some("CCYY-MM-DDThh:mmZ")).unwrap(),
        "R2/2020-01-01T00:00Z/P1D"
    );
}

// ── Serialization ───────────────────────────────────────────────────────────

#[test_log::test]
fn test_serde_text_forms() {
    let duration = parse_duration("P1DT12H").unwrap();
    assert_eq!(serde_json::to_string(&duration).unwrap(), "\"P1DT12H\"");
    let back: isodatetime::Duration = serde_json::from_str("\"PT36H\"").unwrap();
    assert_eq!(back, duration);
    assert_eq!(serde_json::to_string(&p("2020-01-01T00Z")).unwrap(), "\"2020-01-01T00Z\"");
}

#[test_log::test]
fn test_config_from_json() {
    let config: Config = serde_json::from_str(r#"{"calendar": "360day", "expanded_year_digits": 2}"#).unwrap();
    assert_eq!(config.calendar, CalendarMode::Day360);
    assert_eq!(config.expanded_year_digits, 2);
    assert_eq!(config.assumed_offset_minutes, Some(0));
}
