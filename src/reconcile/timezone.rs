//! Target timezone for human-facing timestamps

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// `+07:00`, `+0700`, `+7`, optionally prefixed with `UTC` or `GMT`
static OFFSET_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:UTC|GMT)?\s*([+-])(\d{1,2})(?::?(\d{2}))?$").unwrap()
});

/// Output pattern, `DD/MM/YYYY HH:MM:SS`
pub const DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Fixed UTC offset that stored instants are converted into before formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetTimeZone(FixedOffset);

impl TargetTimeZone {
    /// UTC+07:00 (Asia/Bangkok, no DST)
    pub fn bangkok() -> Self {
        Self::from_offset_secs(7 * 3600).unwrap_or_else(Self::utc)
    }

    /// UTC itself
    pub fn utc() -> Self {
        Self(Utc.fix())
    }

    /// Build from an offset east of UTC in seconds
    pub fn from_offset_secs(secs: i32) -> Option<Self> {
        FixedOffset::east_opt(secs).map(Self)
    }

    /// The underlying offset
    pub fn offset(&self) -> FixedOffset {
        self.0
    }

    /// Format an instant in this zone
    ///
    /// An unset instant formats as the empty string.
    pub fn format(&self, instant: Option<DateTime<Utc>>) -> String {
        instant
            .map(|dt| dt.with_timezone(&self.0).format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

impl Default for TargetTimeZone {
    fn default() -> Self {
        Self::bangkok()
    }
}

impl FromStr for TargetTimeZone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if ["utc", "gmt", "z"].contains(&s.to_ascii_lowercase().as_str()) {
            return Ok(Self::utc());
        }

        let caps = OFFSET_REGEX.captures(s).ok_or_else(|| {
            Error::invalid_value("timezone", format!("'{s}' is not a UTC offset like +07:00"))
        })?;

        let sign = if &caps[1] == "-" { -1 } else { 1 };
        let hours: i32 = caps[2]
            .parse()
            .map_err(|e| Error::invalid_value("timezone", format!("bad hours in '{s}': {e}")))?;
        let minutes: i32 = match caps.get(3) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|e| Error::invalid_value("timezone", format!("bad minutes in '{s}': {e}")))?,
            None => 0,
        };

        if hours > 14 || minutes > 59 {
            return Err(Error::invalid_value(
                "timezone",
                format!("'{s}' is out of range"),
            ));
        }

        Self::from_offset_secs(sign * (hours * 3600 + minutes * 60))
            .ok_or_else(|| Error::invalid_value("timezone", format!("'{s}' is out of range")))
    }
}

impl TryFrom<String> for TargetTimeZone {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TargetTimeZone> for String {
    fn from(tz: TargetTimeZone) -> Self {
        tz.to_string()
    }
}

impl fmt::Display for TargetTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
