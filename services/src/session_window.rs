//! Session time windows and their validation rules.
//!
//! Windows are half-open: `[start, end)`. Two windows that only share a
//! boundary instant do not overlap.

use chrono::{DateTime, Duration, Utc};
use db::models::session;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const MIN_WINDOW_MINUTES: i64 = 15;
pub const MAX_WINDOW_MINUTES: i64 = 8 * 60;
/// Minimum distance between time-in end and time-out start.
pub const MIN_GAP_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `[a,b)` and `[c,d)` overlap iff `a < d && c < b`.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    TimeIn,
    TimeOut,
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowKind::TimeIn => f.write_str("Time-in"),
            WindowKind::TimeOut => f.write_str("Time-out"),
        }
    }
}

/// A malformed window set. Never to be confused with a conflict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("{kind} window end must be after its start")]
    NotOrdered { kind: WindowKind },

    #[error("{kind} window must be between 15 minutes and 8 hours (got {minutes} minutes)")]
    DurationOutOfRange { kind: WindowKind, minutes: i64 },

    #[error("There must be at least 5 minutes between time-in and time-out windows (got {gap_minutes} minutes)")]
    GapTooShort { gap_minutes: i64 },
}

/// The scan windows of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindows {
    pub time_in: TimeWindow,
    pub time_out: Option<TimeWindow>,
}

impl SessionWindows {
    pub fn new(time_in: TimeWindow, time_out: Option<TimeWindow>) -> Self {
        Self { time_in, time_out }
    }

    pub fn from_session(model: &session::Model) -> Self {
        Self {
            time_in: TimeWindow::new(model.time_in_start, model.time_in_end),
            time_out: model
                .time_out()
                .map(|(start, end)| TimeWindow::new(start, end)),
        }
    }

    /// The time-in window followed by the time-out window, if any.
    pub fn iter(&self) -> impl Iterator<Item = &TimeWindow> {
        std::iter::once(&self.time_in).chain(self.time_out.as_ref())
    }

    /// Whether any window of `self` overlaps any window of `other`.
    pub fn overlaps(&self, other: &SessionWindows) -> bool {
        self.iter().any(|a| other.iter().any(|b| a.overlaps(b)))
    }

    /// End of the last window.
    pub fn last_end(&self) -> DateTime<Utc> {
        self.time_out.map_or(self.time_in.end, |w| w.end)
    }

    /// Every rule violation, in a stable order.
    pub fn issues(&self) -> Vec<WindowError> {
        let mut issues = Vec::new();

        check_window(WindowKind::TimeIn, &self.time_in, &mut issues);

        if let Some(out) = &self.time_out {
            check_window(WindowKind::TimeOut, out, &mut issues);

            let gap = out.start - self.time_in.end;
            if gap < Duration::minutes(MIN_GAP_MINUTES) {
                issues.push(WindowError::GapTooShort {
                    gap_minutes: gap.num_minutes(),
                });
            }
        }

        issues
    }

    pub fn validate(&self) -> Result<(), WindowError> {
        match self.issues().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn check_window(kind: WindowKind, window: &TimeWindow, issues: &mut Vec<WindowError>) {
    if window.end <= window.start {
        issues.push(WindowError::NotOrdered { kind });
        return;
    }

    let length = window.duration();
    if length < Duration::minutes(MIN_WINDOW_MINUTES) || length > Duration::minutes(MAX_WINDOW_MINUTES) {
        issues.push(WindowError::DurationOutOfRange {
            kind,
            minutes: length.num_minutes(),
        });
    }
}
