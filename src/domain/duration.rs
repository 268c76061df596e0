//! Duration values: compound unit strings (`1h30m`) or dates relative to now.

use std::fmt;
use std::sync::LazyLock;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;
use tracing::instrument;

use crate::domain::error::ValueError;

pub const MILLISECOND: f64 = 1.0;
pub const SECOND: f64 = 1_000.0;
pub const MINUTE: f64 = 60.0 * SECOND;
pub const HOUR: f64 = 60.0 * MINUTE;
pub const DAY: f64 = 24.0 * HOUR;
pub const WEEK: f64 = 7.0 * DAY;
pub const MONTH: f64 = 30.0 * DAY;
pub const YEAR: f64 = 365.0 * DAY;

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    // `ms` and `mo` must be tried before `m`
    Regex::new(r"(\d+(?:\.\d+)?)\s*(ms|mo|s|m|h|d|w|y)").expect("valid segment regex")
});

/// `Display` form of a negative span, e.g. `-86400000ms`
static NEGATIVE_MILLIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^-(\d+(?:\.\d+)?)ms$").expect("valid negative millis regex"));

static DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}|\d{2})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?$",
    )
    .expect("valid date regex")
});

/// A span of time in milliseconds.
///
/// Negative values arise from dates in the past; they display as `-<n>ms`,
/// which parses back to the same span.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Duration {
    millis: f64,
}

impl Duration {
    pub fn from_millis(millis: f64) -> Self {
        Self { millis }
    }

    pub fn millis(&self) -> f64 {
        self.millis
    }

    /// Convert to a std duration; `None` for negative spans.
    pub fn to_std(&self) -> Option<std::time::Duration> {
        if self.millis.is_sign_negative() || !self.millis.is_finite() {
            return None;
        }
        Some(std::time::Duration::from_secs_f64(self.millis / SECOND))
    }

    /// Parse relative to the current local time.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        Self::parse_at(raw, Local::now())
    }

    /// Parse relative to `now`. Dates are tried first, then the `-<n>ms`
    /// form of a negative span, then unit segments.
    #[instrument(level = "trace")]
    pub fn parse_at(raw: &str, now: DateTime<Local>) -> Result<Self, ValueError> {
        let input = raw.trim();
        if input.is_empty() {
            return Err(ValueError::Empty);
        }
        if let Some(target) = parse_date(input) {
            let delta = target.timestamp_millis() - now.timestamp_millis();
            return Ok(Self::from_millis(delta as f64));
        }
        if let Some(caps) = NEGATIVE_MILLIS.captures(input) {
            let magnitude: f64 = caps[1].parse().map_err(|_| ValueError::Format)?;
            return Ok(Self::from_millis(-magnitude));
        }
        parse_segments(input).map(Self::from_millis)
    }

    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

fn unit_factor(unit: &str) -> Option<f64> {
    match unit {
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        "d" => Some(DAY),
        "w" => Some(WEEK),
        "mo" => Some(MONTH),
        "y" => Some(YEAR),
        _ => None,
    }
}

/// Sum `<number><unit>` segments. The segments must cover the whole input.
fn parse_segments(input: &str) -> Result<f64, ValueError> {
    let lowered = input.to_lowercase();
    let mut total = 0.0;
    let mut cursor = 0;
    let mut segments = 0;

    for caps in SEGMENT.captures_iter(&lowered) {
        let whole = caps.get(0).ok_or(ValueError::Format)?;
        if !lowered[cursor..whole.start()].trim().is_empty() {
            return Err(ValueError::Format);
        }
        let amount: f64 = caps[1].parse().map_err(|_| ValueError::Format)?;
        let factor = unit_factor(&caps[2]).ok_or_else(|| ValueError::UnknownUnit(caps[2].to_string()))?;
        total += amount * factor;
        cursor = whole.end();
        segments += 1;
    }

    let rest = lowered[cursor..].trim();
    if !rest.is_empty() {
        if segments > 0 && rest.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(ValueError::MissingUnit);
        }
        return Err(ValueError::Format);
    }
    if segments == 0 {
        return Err(ValueError::Format);
    }
    if !total.is_finite() {
        return Err(ValueError::OutOfRange);
    }
    Ok(total)
}

/// Interpret a date-like string as local wall-clock time.
fn parse_date(input: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Local));
    }

    let normalized = normalize_date_delimiters(input);
    let caps = DATE.captures(&normalized)?;

    let mut year: i32 = caps[1].parse().ok()?;
    if caps[1].len() == 2 {
        year += 2000;
    }
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let time = match caps.get(4) {
        Some(hour) => {
            let hour: u32 = hour.as_str().parse().ok()?;
            let minute: u32 = caps.get(5)?.as_str().parse().ok()?;
            let second: u32 = match caps.get(6) {
                Some(s) => s.as_str().parse().ok()?,
                None => 0,
            };
            NaiveTime::from_hms_opt(hour, minute, second)?
        }
        None => NaiveTime::MIN,
    };

    Local
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .earliest()
}

/// `2030/01/02` and `2030.01.02` become `2030-01-02`; the time part is kept.
fn normalize_date_delimiters(input: &str) -> String {
    let (date, time) = match input.find(['T', ' ']) {
        Some(idx) => input.split_at(idx),
        None => (input, ""),
    };
    format!("{}{}", date.replace(['/', '.'], "-"), time)
}
