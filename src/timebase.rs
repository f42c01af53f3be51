use std::fmt::{self, Display};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TimestampParseError;

/// Denominator of the chapter timebase written to the metadata file.
pub const TIMEBASE_DENOMINATOR: u64 = 1000;

static TIMESTAMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2})").expect("static regex"));

/// A wall clock style `HH:MM:SS` string, kept exactly as it was read.
///
/// Anything after the seconds field (`.000`, `,500`) is carried along but
/// ignored by [`Timestamp::to_millis`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    pub const ORIGIN: &'static str = "00:00:00";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn origin() -> Self {
        Self(Self::ORIGIN.to_string())
    }

    /// Formats a probed duration as `HH:MM:SS.mmm`. Hours are padded to two
    /// digits but not capped, so long recordings stay parseable.
    pub fn from_duration(duration: Duration) -> Self {
        let total = duration.as_secs();
        let hours = total / 3600;
        let minutes = (total / 60) % 60;
        let seconds = total % 60;
        Self(format!(
            "{:02}:{:02}:{:02}.{:03}",
            hours,
            minutes,
            seconds,
            duration.subsec_millis()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Milliseconds since `00:00:00`, truncated to whole seconds.
    pub fn to_millis(&self) -> Result<u64, TimestampParseError> {
        timestamp_to_timebase(&self.0)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn timestamp_to_timebase(timestamp: &str) -> Result<u64, TimestampParseError> {
    if timestamp == Timestamp::ORIGIN {
        return Ok(0);
    }

    let err = || TimestampParseError {
        input: timestamp.to_string(),
    };
    let caps = TIMESTAMP_RE.captures(timestamp).ok_or_else(err)?;
    let field = |i: usize| caps[i].parse::<u64>().map_err(|_| err());

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;

    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .and_then(|m| m.checked_mul(60))
        .and_then(|s| s.checked_add(seconds))
        .and_then(|s| s.checked_mul(TIMEBASE_DENOMINATOR))
        .ok_or_else(err)
}
