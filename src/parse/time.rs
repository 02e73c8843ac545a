//! Time-key parsing
//!
//! Source datasets key their time series with heterogeneous strings: ISO
//! weeks ("2020W14"), year ranges ("2010-2015"), months ("04-2020",
//! "04/2020"), bare years ("2020") and plain dates. Everything here
//! normalizes those keys into a uniform point-or-interval representation.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

/// A calendar interval with per-bound open/closed flags.
///
/// `start` and `end` are the written bounds; membership is evaluated through
/// the half-open day range `[lo, hi)` where an open bound excludes its
/// written day. Parsed period keys (weeks, months, years) are closed on both
/// ends with `end` being the last covered day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimeInterval {
    pub(crate) start: NaiveDate,
    pub(crate) end: NaiveDate,
    pub(crate) open_start: bool,
    pub(crate) open_end: bool,
}

impl TimeInterval {
    pub(crate) fn closed(start: NaiveDate, end: NaiveDate) -> Self {
        TimeInterval {
            start,
            end,
            open_start: false,
            open_end: false,
        }
    }

    /// First covered day.
    pub(crate) fn lo(&self) -> NaiveDate {
        if self.open_start {
            self.start + Duration::days(1)
        } else {
            self.start
        }
    }

    /// First day past the covered range.
    pub(crate) fn hi(&self) -> NaiveDate {
        if self.open_end {
            self.end
        } else {
            self.end + Duration::days(1)
        }
    }

    pub(crate) fn contains(&self, date: NaiveDate) -> bool {
        self.lo() <= date && date < self.hi()
    }

    pub(crate) fn overlaps(&self, other: &TimeInterval) -> bool {
        self.lo() < other.hi() && other.lo() < self.hi()
    }
}

/// A parsed time key: either a single day or a calendar interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeKey {
    Point(NaiveDate),
    Span(TimeInterval),
}

impl TimeKey {
    /// First covered day (interval start for spans).
    pub(crate) fn lo(&self) -> NaiveDate {
        match self {
            TimeKey::Point(d) => *d,
            TimeKey::Span(i) => i.lo(),
        }
    }

    /// First day past the covered range.
    pub(crate) fn hi(&self) -> NaiveDate {
        match self {
            TimeKey::Point(d) => *d + Duration::days(1),
            TimeKey::Span(i) => i.hi(),
        }
    }

    /// True when this key falls within (point) or overlaps (span) `interval`.
    pub(crate) fn matches(&self, interval: &TimeInterval) -> bool {
        match self {
            TimeKey::Point(d) => interval.contains(*d),
            TimeKey::Span(i) => interval.overlaps(i),
        }
    }
}

static WEEK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})W(\d{1,2})$").unwrap());
static YEAR_RANGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{4})$").unwrap());
static MONTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{2})[-/](\d{4})$").unwrap());
static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}$").unwrap());

/// Date formats accepted for plain-date keys, tried in order. The day-first
/// form is listed before any other ambiguous layout because it is the
/// canonical daily key format emitted by the resampler.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%d/%m/%Y"];

/// Parses a time key, trying each recognized format in priority order.
/// Unparseable input yields `None`; this never fails hard since unknown
/// keys are a data-quality issue, not a programming error.
pub(crate) fn parse_time_key(key: &str) -> Option<TimeKey> {
    if let Some(caps) = WEEK_RE.captures(key) {
        let year: i32 = caps[1].parse().ok()?;
        let week: u32 = caps[2].parse().ok()?;
        let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
        return Some(TimeKey::Span(TimeInterval::closed(
            start,
            start + Duration::days(6),
        )));
    }

    if let Some(caps) = YEAR_RANGE_RE.captures(key) {
        let first: i32 = caps[1].parse().ok()?;
        let second: i32 = caps[2].parse().ok()?;
        let start = NaiveDate::from_ymd_opt(first, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(second, 12, 31)?;
        return Some(TimeKey::Span(TimeInterval::closed(start, end)));
    }

    if let Some(caps) = MONTH_RE.captures(key) {
        let month: u32 = caps[1].parse().ok()?;
        let year: i32 = caps[2].parse().ok()?;
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        return Some(TimeKey::Span(TimeInterval::closed(
            start,
            end_of_month(start),
        )));
    }

    if YEAR_RE.is_match(key) {
        let year: i32 = key.parse().ok()?;
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
        return Some(TimeKey::Span(TimeInterval::closed(start, end)));
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(key, format) {
            return Some(TimeKey::Point(date));
        }
    }

    None
}

/// Single orderable point for a key: the interval start for spans, the day
/// itself for points. Monotonic with calendar order; used for sorting
/// exported time series.
pub(crate) fn parse_sortable(key: &str) -> Option<NaiveDate> {
    match parse_time_key(key)? {
        TimeKey::Point(d) => Some(d),
        TimeKey::Span(i) => Some(i.start),
    }
}

/// Normalizes a pair of raw bound keys into an interval. The start key
/// contributes its start bound, the end key its end bound, so
/// `("2020", "2021")` covers both full years.
pub(crate) fn parse_interval(start_key: &str, end_key: &str) -> Option<TimeInterval> {
    let (start, open_start) = match parse_time_key(start_key)? {
        TimeKey::Point(d) => (d, false),
        TimeKey::Span(i) => (i.start, i.open_start),
    };
    let (end, open_end) = match parse_time_key(end_key)? {
        TimeKey::Point(d) => (d, false),
        TimeKey::Span(i) => (i.end, i.open_end),
    };
    Some(normalize_interval(TimeInterval {
        start,
        end,
        open_start,
        open_end,
    }))
}

/// Degenerate-interval handling: a zero-length interval is widened to one
/// day, half-open; reversed bounds are swapped rather than rejected, with
/// each open/closed flag following its bound.
pub(crate) fn normalize_interval(interval: TimeInterval) -> TimeInterval {
    if interval.end > interval.start {
        interval
    } else if interval.end == interval.start {
        TimeInterval {
            start: interval.start,
            end: interval.start + Duration::days(1),
            open_start: false,
            open_end: true,
        }
    } else {
        TimeInterval {
            start: interval.end,
            end: interval.start,
            open_start: interval.open_end,
            open_end: interval.open_start,
        }
    }
}

fn end_of_month(date: NaiveDate) -> NaiveDate {
    let (next_year, next_month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // Constructed from a valid month, so the first of the next month exists.
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|d| d - Duration::days(1))
        .unwrap_or(date)
}
