//! Byte sizes with base-1024 units.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::ValueError;

static SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?)\s*([a-z]*)$").expect("valid size regex"));

/// Units in ascending order; the index is the power of 1024.
pub const UNITS: [&str; 6] = ["b", "kb", "mb", "gb", "tb", "pb"];

/// A number of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteSize(u64);

impl ByteSize {
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> u64 {
        self.0
    }

    /// Parse a single `<number><unit>` pair, e.g. `10kb` or `1.5 GB`.
    pub fn parse(raw: &str) -> Result<Self, ValueError> {
        let input = raw.trim().to_lowercase();
        if input.is_empty() {
            return Err(ValueError::Empty);
        }
        let caps = SIZE.captures(&input).ok_or(ValueError::Format)?;
        let amount: f64 = caps[1].parse().map_err(|_| ValueError::Format)?;
        let unit = &caps[2];
        if unit.is_empty() {
            return Err(ValueError::MissingUnit);
        }
        let power = UNITS
            .iter()
            .position(|u| *u == unit)
            .ok_or_else(|| ValueError::UnknownUnit(unit.to_string()))?;

        let bytes = amount * 1024f64.powi(power as i32);
        if !bytes.is_finite() || bytes >= u64::MAX as f64 {
            return Err(ValueError::OutOfRange);
        }
        Ok(Self(bytes.round() as u64))
    }

    pub fn is_valid(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }
}

impl From<u64> for ByteSize {
    fn from(bytes: u64) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}b", self.0)
    }
}
