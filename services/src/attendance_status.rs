//! Attendance status derivation.
//!
//! Status is never stored; it is computed from the record's scan timestamps
//! and, when known, the end of the session's time-in window.
//!
//! Vocabulary: `present`, `late`, `checked-in-only`, `absent`. The older
//! labels `checked-in` and `checked-out` are still accepted when parsing and
//! map to `checked-in-only` and `absent` respectively.

use chrono::{DateTime, NaiveDateTime, Utc};
use db::models::{attendance_record, session};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttendanceStatus {
    Present,
    Late,
    CheckedInOnly,
    Absent,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Late,
        AttendanceStatus::CheckedInOnly,
        AttendanceStatus::Absent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::CheckedInOnly => "checked-in-only",
            AttendanceStatus::Absent => "absent",
        }
    }

    /// Sort rank used by listings: most complete attendance first.
    pub fn rank(&self) -> u8 {
        match self {
            AttendanceStatus::Present => 0,
            AttendanceStatus::Late => 1,
            AttendanceStatus::CheckedInOnly => 2,
            AttendanceStatus::Absent => 3,
        }
    }

    /// Whether the student showed up at all (counts toward the attendance rate).
    pub fn attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown attendance status: {0:?}")]
pub struct ParseStatusError(pub String);

impl FromStr for AttendanceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "checked-in-only" | "checked-in" => Ok(AttendanceStatus::CheckedInOnly),
            "absent" | "checked-out" => Ok(AttendanceStatus::Absent),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

/// Parses a comma-separated status filter. Unknown labels are dropped.
pub fn parse_status_list(raw: &str) -> Vec<AttendanceStatus> {
    let mut out = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<AttendanceStatus>() {
            Ok(status) if !out.contains(&status) => out.push(status),
            Ok(_) => {}
            Err(err) => tracing::debug!(%err, "ignoring status filter"),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusInputs {
    pub time_in: Option<DateTime<Utc>>,
    pub time_out: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
}

impl StatusInputs {
    pub fn new(time_in: Option<DateTime<Utc>>, time_out: Option<DateTime<Utc>>) -> Self {
        Self {
            time_in,
            time_out,
            window_end: None,
        }
    }

    pub fn with_window_end(mut self, window_end: Option<DateTime<Utc>>) -> Self {
        self.window_end = window_end;
        self
    }

    /// Builds inputs from raw strings. Anything unparseable becomes `None`.
    pub fn from_raw(time_in: Option<&str>, time_out: Option<&str>, window_end: Option<&str>) -> Self {
        Self {
            time_in: time_in.and_then(parse_timestamp),
            time_out: time_out.and_then(parse_timestamp),
            window_end: window_end.and_then(parse_timestamp),
        }
    }

    /// Inputs for a stored record, using the session's time-in end as the late cutoff.
    pub fn for_record(record: &attendance_record::Model, session: Option<&session::Model>) -> Self {
        Self::new(record.time_in, record.time_out).with_window_end(session.map(|s| s.time_in_end))
    }
}

/// Accepts RFC 3339 or a naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` (read as UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Maps scan timestamps to a status label. Total over its inputs.
pub fn derive_status(inputs: &StatusInputs) -> AttendanceStatus {
    let late = |time_in: DateTime<Utc>| inputs.window_end.is_some_and(|end| time_in > end);

    match (inputs.time_in, inputs.time_out) {
        (Some(time_in), _) if late(time_in) => AttendanceStatus::Late,
        (Some(_), Some(_)) => AttendanceStatus::Present,
        (Some(_), None) => AttendanceStatus::CheckedInOnly,
        // A time-out with no time-in is an incomplete record, not partial presence.
        (None, Some(_)) => AttendanceStatus::Absent,
        (None, None) => AttendanceStatus::Absent,
    }
}
