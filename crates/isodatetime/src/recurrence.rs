//! Repeating series of time points (ISO 8601 §4.5).
//!
//! Every form reduces to an anchor point, a non-negative step and a range of
//! step indices: occurrence `k` is `anchor + step·k`. Multiplying rather than
//! repeatedly adding keeps month-end clamping from drifting (`2020-01-31 +
//! P1M·2` is `2020-03-31`, not `2020-03-29`). A recurrence holds no cursor;
//! [`Occurrences`] carries the iteration state.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::config::Config;
use crate::duration::Duration;
use crate::error::{CalendarError, IsoError, Result};
use crate::point::TimePoint;

/// Which operands the recurrence was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecurrenceForm {
    /// `R[n]/start/end`: the step is the elapsed time from start to end.
    StartEnd,
    /// `Rn/duration`, started from a caller-supplied context point.
    ContextStart,
    /// `R[n]/start/duration`
    StartDuration,
    /// `R[n]/duration/end`
    DurationEnd,
}

/// A recurrence of one of the four ISO 8601 forms.
///
/// # Examples
///
/// ```
/// use isodatetime::{parse_point, parse_recurrence, Config};
///
/// let config = Config::default();
/// let recurrence = parse_recurrence("R/2020-01-31T00Z/P1M", None, &config).unwrap();
/// let reference = parse_point("2020-03-15T00Z", &config).unwrap();
/// let next = recurrence.get_next(&reference).unwrap().unwrap();
/// assert_eq!(next.calendar_date(), Some((2020, 3, 31)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeRecurrence {
    form: RecurrenceForm,
    repetitions: Option<u64>,
    start: Option<TimePoint>,
    end: Option<TimePoint>,
    duration: Duration,
    min: Option<TimePoint>,
    max: Option<TimePoint>,
    /// `start` for forward forms, `end` for [`RecurrenceForm::DurationEnd`].
    anchor: TimePoint,
    lowest: Option<i64>,
    highest: Option<i64>,
}

fn index_limit(repetitions: u64) -> i64 {
    i64::try_from(repetitions - 1).unwrap_or(i64::MAX)
}

impl TimeRecurrence {
    fn validate(repetitions: Option<u64>, duration: &Duration) -> Result<()> {
        if repetitions == Some(0) {
            return Err(IsoError::Recurrence("repetitions must be at least 1".to_string()));
        }
        if duration.is_negative() {
            return Err(IsoError::Recurrence(format!("duration {duration} is negative")));
        }
        Ok(())
    }

    /// Forward index range `[0, n)`, or `[0, 0]` for `R1` and zero steps.
    fn forward(
        form: RecurrenceForm,
        repetitions: Option<u64>,
        start: TimePoint,
        end: Option<TimePoint>,
        duration: Duration,
    ) -> Self {
        let highest = if duration.is_zero() {
            Some(0)
        } else {
            repetitions.map(index_limit)
        };
        Self {
            form,
            repetitions,
            start: Some(start.clone()),
            end,
            duration,
            min: None,
            max: None,
            anchor: start,
            lowest: Some(0),
            highest,
        }
    }

    /// `R[n]/start/end`. The step is the exact time from `start` to `end`
    /// and the series never passes `end`, so `n` can only shorten it to a
    /// single occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Recurrence`] if `end` is before `start` or `n` is
    /// zero, and [`IsoError::Comparison`] if the points cannot be compared.
    pub fn from_start_end(repetitions: Option<u64>, start: TimePoint, end: TimePoint) -> Result<Self> {
        let duration = end.difference(&start)?;
        if duration.is_negative() {
            return Err(IsoError::Recurrence(format!("end {end} is before start {start}")));
        }
        Self::validate(repetitions, &duration)?;
        let mut recurrence = Self::forward(RecurrenceForm::StartEnd, repetitions, start, Some(end), duration);
        if !duration.is_zero() {
            recurrence.highest = Some(recurrence.highest.map_or(1, |highest| highest.min(1)));
        }
        Ok(recurrence)
    }

    /// `Rn/duration` started from `context_start`.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Recurrence`] if `repetitions` is absent or zero,
    /// the duration is negative, or the context point is truncated.
    pub fn from_context(repetitions: Option<u64>, context_start: TimePoint, duration: Duration) -> Result<Self> {
        if repetitions.is_none() {
            return Err(IsoError::Recurrence(format!(
                "R/{duration} has no end; a duration-only recurrence needs a repetition count"
            )));
        }
        if context_start.is_truncated() {
            return Err(IsoError::Recurrence(format!("context start {context_start} is truncated")));
        }
        Self::validate(repetitions, &duration)?;
        Ok(Self::forward(RecurrenceForm::ContextStart, repetitions, context_start, None, duration))
    }

    /// `R[n]/start/duration`; unbounded without `n`.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Recurrence`] for `R0`, a negative duration or a
    /// truncated start.
    pub fn from_start_duration(repetitions: Option<u64>, start: TimePoint, duration: Duration) -> Result<Self> {
        Self::validate(repetitions, &duration)?;
        if start.is_truncated() {
            return Err(IsoError::Recurrence(format!("start {start} is truncated")));
        }
        Ok(Self::forward(RecurrenceForm::StartDuration, repetitions, start, None, duration))
    }

    /// `R[n]/duration/end`. With `n` the first occurrence is
    /// `end - duration·(n-1)`; without it the series runs backwards from
    /// `end` forever.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Recurrence`] for `R0`, a negative duration or a
    /// truncated end, and [`IsoError::Calendar`] if the derived start is
    /// outside the supported year range.
    pub fn from_duration_end(repetitions: Option<u64>, duration: Duration, end: TimePoint) -> Result<Self> {
        Self::validate(repetitions, &duration)?;
        if end.is_truncated() {
            return Err(IsoError::Recurrence(format!("end {end} is truncated")));
        }
        let lowest = if duration.is_zero() {
            Some(0)
        } else {
            repetitions.map(|n| -index_limit(n))
        };
        let mut recurrence = Self {
            form: RecurrenceForm::DurationEnd,
            repetitions,
            start: None,
            end: Some(end.clone()),
            duration,
            min: None,
            max: None,
            anchor: end,
            lowest,
            highest: Some(0),
        };
        if let Some(lowest) = lowest {
            recurrence.start = Some(recurrence.occurrence(lowest)?);
        }
        Ok(recurrence)
    }

    /// Restricts the series to `[min, max]`; occurrences outside are skipped.
    pub fn with_bounds(&self, min: Option<TimePoint>, max: Option<TimePoint>) -> Self {
        Self {
            min,
            max,
            ..self.clone()
        }
    }

    /// The same series moved by `offset`. Bounds stay where they are.
    ///
    /// # Errors
    ///
    /// Propagates [`TimePoint::add`] failures.
    pub fn shifted(&self, offset: &Duration) -> Result<Self> {
        let shift = |point: &Option<TimePoint>| point.as_ref().map(|p| p.add(offset)).transpose();
        Ok(Self {
            start: shift(&self.start)?,
            end: shift(&self.end)?,
            anchor: self.anchor.add(offset)?,
            ..self.clone()
        })
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn form(&self) -> RecurrenceForm {
        self.form
    }

    /// `None` for an unbounded series.
    pub fn repetitions(&self) -> Option<u64> {
        self.repetitions
    }

    /// First occurrence; `None` for an unbounded backwards series.
    pub fn start(&self) -> Option<&TimePoint> {
        self.start.as_ref()
    }

    pub fn end(&self) -> Option<&TimePoint> {
        self.end.as_ref()
    }

    pub fn duration(&self) -> &Duration {
        &self.duration
    }

    pub fn min(&self) -> Option<&TimePoint> {
        self.min.as_ref()
    }

    pub fn max(&self) -> Option<&TimePoint> {
        self.max.as_ref()
    }

    // ── Generation ──────────────────────────────────────────────────────

    fn occurrence(&self, index: i64) -> Result<TimePoint> {
        let step = self
            .duration
            .checked_mul(index)
            .ok_or_else(|| IsoError::Recurrence(format!("{} × {index} overflows", self.duration)))?;
        self.anchor.add(&step)
    }

    /// Like [`Self::occurrence`], but an occurrence past the supported year
    /// range is `None`.
    fn occurrence_in_range(&self, index: i64) -> Result<Option<TimePoint>> {
        if self.duration.checked_mul(index).is_none() {
            return Ok(None);
        }
        match self.occurrence(index) {
            Ok(point) => Ok(Some(point)),
            Err(IsoError::Calendar(CalendarError::YearRange { .. })) => Ok(None),
            Err(other) => Err(other),
        }
    }

    fn in_index_range(&self, index: i64) -> bool {
        self.lowest.is_none_or(|lowest| index >= lowest) && self.highest.is_none_or(|highest| index <= highest)
    }

    fn within_bounds(&self, point: &TimePoint) -> Result<bool> {
        if let Some(min) = &self.min {
            if point.compare(min)? == Ordering::Less {
                return Ok(false);
            }
        }
        if let Some(max) = &self.max {
            if point.compare(max)? == Ordering::Greater {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Smallest index whose occurrence satisfies `predicate`, which must be
    /// monotone (false then true) along the series. Occurrences beyond the
    /// year range count as satisfying it above the anchor and as failing it
    /// below.
    fn first_index(&self, predicate: impl Fn(&TimePoint) -> Result<bool>) -> Result<Option<i64>> {
        let lowest = self.lowest.unwrap_or(i64::MIN);
        let highest = self.highest.unwrap_or(i64::MAX);
        let holds = |index: i64| -> Result<bool> {
            match self.occurrence_in_range(index)? {
                Some(point) => predicate(&point),
                None => Ok(index > 0),
            }
        };

        let (mut below, mut above);
        let mut step: i64 = 1;
        if holds(0)? {
            above = 0;
            loop {
                if above == lowest {
                    return Ok(Some(lowest));
                }
                let index = above.saturating_sub(step).max(lowest);
                if holds(index)? {
                    above = index;
                    step = step.saturating_mul(2);
                } else {
                    below = index;
                    break;
                }
            }
        } else {
            below = 0;
            loop {
                if below == highest {
                    return Ok(None);
                }
                let index = below.saturating_add(step).min(highest);
                if holds(index)? {
                    above = index;
                    break;
                }
                below = index;
                step = step.saturating_mul(2);
            }
        }
        while i128::from(above) - i128::from(below) > 1 {
            let middle = ((i128::from(above) + i128::from(below)) / 2) as i64;
            if holds(middle)? {
                above = middle;
            } else {
                below = middle;
            }
        }
        Ok(Some(above))
    }

    /// The first occurrence strictly after `reference`, or `None` once the
    /// series (or its `[min, max]` window) is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`IsoError::Comparison`] if `reference` cannot be compared
    /// with the occurrences (truncated, or naive against zoned).
    pub fn get_next(&self, reference: &TimePoint) -> Result<Option<TimePoint>> {
        let index = self.first_index(|point| {
            if point.compare(reference)? != Ordering::Greater {
                return Ok(false);
            }
            match &self.min {
                Some(min) => Ok(point.compare(min)? != Ordering::Less),
                None => Ok(true),
            }
        })?;
        let Some(index) = index else {
            return Ok(None);
        };
        let Some(point) = self.occurrence_in_range(index)? else {
            return Ok(None);
        };
        if !self.within_bounds(&point)? {
            return Ok(None);
        }
        Ok(Some(point))
    }

    /// The last occurrence strictly before `reference`, or `None`.
    ///
    /// # Errors
    ///
    /// As for [`TimeRecurrence::get_next`].
    pub fn get_previous(&self, reference: &TimePoint) -> Result<Option<TimePoint>> {
        let index = self.first_index(|point| {
            if point.compare(reference)? != Ordering::Less {
                return Ok(true);
            }
            match &self.max {
                Some(max) => Ok(point.compare(max)? == Ordering::Greater),
                None => Ok(false),
            }
        })?;
        let candidate = match (index, self.highest) {
            (Some(index), _) => index.saturating_sub(1),
            (None, Some(highest)) => highest,
            (None, None) => return Ok(None),
        };
        if !self.in_index_range(candidate) {
            return Ok(None);
        }
        let Some(point) = self.occurrence_in_range(candidate)? else {
            return Ok(None);
        };
        if !self.within_bounds(&point)? {
            return Ok(None);
        }
        Ok(Some(point))
    }

    /// Whether `point` is one of the occurrences inside the window.
    ///
    /// # Errors
    ///
    /// As for [`TimeRecurrence::get_next`].
    pub fn is_valid(&self, point: &TimePoint) -> Result<bool> {
        let Some(index) = self.first_index(|candidate| Ok(candidate.compare(point)? != Ordering::Less))? else {
            return Ok(false);
        };
        match self.occurrence_in_range(index)? {
            Some(candidate) => Ok(candidate.compare(point)? == Ordering::Equal && self.within_bounds(&candidate)?),
            None => Ok(false),
        }
    }

    /// The `n`th occurrence in iteration order (0-based), ignoring the
    /// `[min, max]` window.
    ///
    /// # Errors
    ///
    /// Propagates [`TimePoint::add`] failures.
    pub fn nth(&self, n: u64) -> Result<Option<TimePoint>> {
        let Ok(n) = i64::try_from(n) else {
            return Ok(None);
        };
        let index = match self.lowest {
            Some(lowest) => lowest.checked_add(n),
            None => self.highest.and_then(|highest| highest.checked_sub(n)),
        };
        match index {
            Some(index) if self.in_index_range(index) => self.occurrence_in_range(index),
            _ => Ok(None),
        }
    }

    /// Lazily yields the occurrences inside the window: forward from the
    /// first, or backwards from the end for an unbounded `R/duration/end`.
    pub fn iter(&self) -> Occurrences<'_> {
        let (next, backwards) = match self.lowest {
            Some(lowest) => (Some(lowest), false),
            None => (self.highest, true),
        };
        Occurrences {
            recurrence: self,
            next,
            backwards,
            seeked: false,
        }
    }
}

// ── Iteration ───────────────────────────────────────────────────────────────

/// Iterator over a [`TimeRecurrence`]. Stops (after logging) if an
/// occurrence cannot be computed.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    recurrence: &'a TimeRecurrence,
    next: Option<i64>,
    backwards: bool,
    seeked: bool,
}

impl Occurrences<'_> {
    /// Jumps over occurrences before the window instead of walking them.
    fn seek(&mut self) -> Result<()> {
        self.seeked = true;
        let recurrence = self.recurrence;
        let target = if self.backwards { &recurrence.max } else { &recurrence.min };
        let Some(target) = target else {
            return Ok(());
        };
        if self.backwards {
            let first_after = recurrence.first_index(|p| Ok(p.compare(target)? == Ordering::Greater))?;
            self.next = match first_after {
                Some(index) => index.checked_sub(1),
                None => recurrence.highest,
            };
        } else {
            self.next = recurrence.first_index(|p| Ok(p.compare(target)? != Ordering::Less))?;
        }
        Ok(())
    }

    fn step(&mut self) -> Result<Option<TimePoint>> {
        if !self.seeked {
            self.seek()?;
        }
        let Some(index) = self.next else {
            return Ok(None);
        };
        if !self.recurrence.in_index_range(index) {
            self.next = None;
            return Ok(None);
        }
        let Some(point) = self.recurrence.occurrence_in_range(index)? else {
            self.next = None;
            return Ok(None);
        };
        if !self.recurrence.within_bounds(&point)? {
            self.next = None;
            return Ok(None);
        }
        self.next = if self.backwards {
            index.checked_sub(1)
        } else {
            index.checked_add(1)
        };
        Ok(Some(point))
    }
}

impl Iterator for Occurrences<'_> {
    type Item = TimePoint;

    fn next(&mut self) -> Option<TimePoint> {
        match self.step() {
            Ok(point) => point,
            Err(error) => {
                tracing::warn!(recurrence = %self.recurrence, %error, "stopping recurrence iteration");
                self.next = None;
                None
            }
        }
    }
}

impl<'a> IntoIterator for &'a TimeRecurrence {
    type Item = TimePoint;
    type IntoIter = Occurrences<'a>;

    fn into_iter(self) -> Occurrences<'a> {
        self.iter()
    }
}

// ── Trait impls ─────────────────────────────────────────────────────────────

impl fmt::Display for TimeRecurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::dumper::display_recurrence(self))
    }
}

impl FromStr for TimeRecurrence {
    type Err = IsoError;

    fn from_str(s: &str) -> Result<Self> {
        crate::parser::parse_recurrence(s, None, &Config::default())
    }
}

impl Serialize for TimeRecurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_duration, parse_point, parse_recurrence};

    fn p(text: &str) -> TimePoint {
        parse_point(text, &Config::default()).unwrap()
    }

    fn r(text: &str) -> TimeRecurrence {
        parse_recurrence(text, None, &Config::default()).unwrap()
    }

    fn dates(recurrence: &TimeRecurrence) -> Vec<(i64, u32, u32)> {
        recurrence.iter().map(|p| p.calendar_date().unwrap()).collect()
    }

    // ── forms ───────────────────────────────────────────────────────────

    #[test]
    fn test_start_end_form() {
        let recurrence = r("R3/2020-01-01T00Z/2020-01-03T00Z");
        assert_eq!(recurrence.duration(), &parse_duration("P2D").unwrap());
        assert_eq!(dates(&recurrence), vec![(2020, 1, 1), (2020, 1, 3)]);
        assert_eq!(dates(&r("R1/2020-01-01T00Z/2020-01-03T00Z")), vec![(2020, 1, 1)]);
        let unbounded = r("R/2020-01-01T00Z/2020-01-03T00Z");
        assert_eq!(dates(&unbounded), vec![(2020, 1, 1), (2020, 1, 3)]);
        let same = r("R5/2020-01-01T00Z/2020-01-01T00Z");
        assert_eq!(same.iter().count(), 1);
        assert!(parse_recurrence("R2/2020-01-03T00Z/2020-01-01T00Z", None, &Config::default()).is_err());
    }

    #[test]
    fn test_start_end_form_stops_at_end() {
        let recurrence = r("R5/2020-01-01T00Z/2020-01-02T00Z");
        assert_eq!(recurrence.iter().count(), 2);
        assert_eq!(recurrence.get_next(&p("2020-01-01T00Z")).unwrap(), Some(p("2020-01-02T00Z")));
        assert_eq!(recurrence.get_next(&p("2020-01-02T00Z")).unwrap(), None);
        assert!(!recurrence.is_valid(&p("2020-01-03T00Z")).unwrap());
    }

    #[test]
    fn test_context_form() {
        let context = p("2020-02-28T00Z");
        let recurrence = parse_recurrence("R3/P1D", Some(&context), &Config::default()).unwrap();
        assert_eq!(dates(&recurrence), vec![(2020, 2, 28), (2020, 2, 29), (2020, 3, 1)]);
        assert!(TimeRecurrence::from_context(None, context, parse_duration("P1D").unwrap()).is_err());
    }

    #[test]
    fn test_start_duration_form_does_not_drift() {
        let recurrence = r("R4/2020-01-31T00Z/P1M");
        assert_eq!(
            dates(&recurrence),
            vec![(2020, 1, 31), (2020, 2, 29), (2020, 3, 31), (2020, 4, 30)]
        );
    }

    #[test]
    fn test_duration_end_form() {
        let recurrence = r("R3/P1Y/2000-01-01T00Z");
        assert_eq!(recurrence.start(), Some(&p("1998-01-01T00Z")));
        assert_eq!(dates(&recurrence), vec![(1998, 1, 1), (1999, 1, 1), (2000, 1, 1)]);
        assert_eq!(recurrence.get_next(&p("2000-01-01T00Z")).unwrap(), None);
    }

    #[test]
    fn test_unbounded_duration_end_runs_backwards() {
        let recurrence = r("R/P1D/2020-01-10T00Z");
        assert_eq!(recurrence.start(), None);
        let first: Vec<_> = recurrence.iter().take(3).map(|p| p.calendar_date().unwrap()).collect();
        assert_eq!(first, vec![(2020, 1, 10), (2020, 1, 9), (2020, 1, 8)]);
        assert_eq!(recurrence.get_previous(&p("2020-01-05T12Z")).unwrap(), Some(p("2020-01-05T00Z")));
    }

    #[test]
    fn test_single_occurrence_cases() {
        assert_eq!(r("R1/2020-01-01T00Z/P1D").iter().count(), 1);
        assert_eq!(r("R/2020-01-01T00Z/PT0S").iter().count(), 1);
    }

    #[test]
    fn test_invalid_construction() {
        let start = p("2020-01-01T00Z");
        let day = parse_duration("P1D").unwrap();
        assert!(TimeRecurrence::from_start_duration(Some(0), start.clone(), day).is_err());
        assert!(TimeRecurrence::from_start_duration(None, start, day.negate()).is_err());
    }

    // ── next and previous ───────────────────────────────────────────────

    #[test]
    fn test_get_next_is_strictly_after() {
        let recurrence = r("R/2020-01-01T00Z/PT6H");
        assert_eq!(recurrence.get_next(&p("2020-01-01T00Z")).unwrap(), Some(p("2020-01-01T06Z")));
        assert_eq!(recurrence.get_next(&p("2019-06-01T00Z")).unwrap(), Some(p("2020-01-01T00Z")));
        assert_eq!(recurrence.get_next(&p("2031-03-04T05:30Z")).unwrap(), Some(p("2031-03-04T06Z")));
    }

    #[test]
    fn test_get_previous_is_strictly_before() {
        let recurrence = r("R5/2020-01-01T00Z/P1D");
        assert_eq!(recurrence.get_previous(&p("2020-01-03T00Z")).unwrap(), Some(p("2020-01-02T00Z")));
        assert_eq!(recurrence.get_previous(&p("2020-01-01T00Z")).unwrap(), None);
        assert_eq!(recurrence.get_previous(&p("2021-01-01T00Z")).unwrap(), Some(p("2020-01-05T00Z")));
    }

    #[test]
    fn test_exhaustion_is_none() {
        let recurrence = r("R2/2020-01-01T00Z/P1D");
        assert_eq!(recurrence.get_next(&p("2020-01-02T00Z")).unwrap(), None);
    }

    #[test]
    fn test_far_future_overflow_is_exhaustion() {
        let recurrence = r("R/2020-01-01T00Z/P500000000Y");
        let second = recurrence.nth(1).unwrap().unwrap();
        assert_eq!(second.year(), Some(500_002_020));
        assert_eq!(recurrence.nth(2).unwrap(), None);
        assert_eq!(recurrence.get_next(&second).unwrap(), None);
        assert_eq!(recurrence.iter().count(), 2);
    }

    #[test]
    fn test_truncated_reference_fails() {
        let recurrence = r("R/2020-01-01T00Z/P1D");
        assert!(matches!(recurrence.get_next(&p("T12")), Err(IsoError::Comparison(_))));
    }

    // ── bounds, shifting, validity ──────────────────────────────────────

    #[test]
    fn test_bounds_window() {
        let recurrence = r("R/2020-01-01T00Z/P1D").with_bounds(Some(p("2020-01-05T00Z")), Some(p("2020-01-07T00Z")));
        assert_eq!(dates(&recurrence), vec![(2020, 1, 5), (2020, 1, 6), (2020, 1, 7)]);
        assert_eq!(recurrence.get_next(&p("2020-01-01T00Z")).unwrap(), Some(p("2020-01-05T00Z")));
        assert_eq!(recurrence.get_next(&p("2020-01-07T00Z")).unwrap(), None);
        assert_eq!(recurrence.get_previous(&p("2020-02-01T00Z")).unwrap(), Some(p("2020-01-07T00Z")));
    }

    #[test]
    fn test_shifted_moves_occurrences_not_bounds() {
        let recurrence = r("R3/2020-01-01T00Z/P1D").with_bounds(None, Some(p("2020-01-03T00Z")));
        let shifted = recurrence.shifted(&parse_duration("P1D").unwrap()).unwrap();
        assert_eq!(dates(&shifted), vec![(2020, 1, 2), (2020, 1, 3)]);
        assert_eq!(shifted.max(), Some(&p("2020-01-03T00Z")));
    }

    #[test]
    fn test_is_valid_and_nth() {
        let recurrence = r("R/2020-01-01T00Z/PT12H");
        assert!(recurrence.is_valid(&p("2020-01-05T12Z")).unwrap());
        assert!(!recurrence.is_valid(&p("2020-01-05T13Z")).unwrap());
        assert!(!recurrence.is_valid(&p("2019-12-31T12Z")).unwrap());
        assert_eq!(recurrence.nth(3).unwrap(), Some(p("2020-01-02T12Z")));
        assert_eq!(r("R2/2020-01-01T00Z/P1D").nth(2).unwrap(), None);
    }

    #[test]
    fn test_equal_recurrences_hash_equal() {
        use std::collections::HashSet;
        let set: HashSet<TimeRecurrence> = [
            "R3/2020-01-01T00Z/P1D",
            "R3/2020-01-01T01+01/PT24H",
            "R3/2020-01-01T00Z/P2D",
            "R/2020-01-01T00Z/P1D",
        ]
        .iter()
        .map(|text| r(text))
        .collect();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&r("R3/20200101T00Z/P1D")));
    }

    #[test]
    fn test_iteration_is_restartable() {
        let recurrence = r("R3/2020-01-01T00Z/P1D");
        assert_eq!(recurrence.iter().count(), 3);
        assert_eq!((&recurrence).into_iter().count(), 3);
    }
}
