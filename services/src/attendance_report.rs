//! Event attendance listing: filtered rows, KPIs, per-session aggregates.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use db::models::attendance_record::{self, ScanType};
use db::models::{event, session};
use sea_orm::{DatabaseConnection, DbErr};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attendance_status::{derive_status, parse_status_list, AttendanceStatus, StatusInputs};

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Event not found")]
    EventNotFound,

    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    Status,
    #[serde(alias = "checkInAt")]
    CheckInAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Listing query as it arrives on the URL. List-valued filters are comma separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceQuery {
    #[serde(alias = "sessions")]
    pub session_ids: Option<String>,
    pub status: Option<String>,
    pub statuses: Option<String>,
    pub q: Option<String>,
    pub years: Option<String>,
    pub scan_types: Option<String>,
    #[serde(default)]
    pub sort: SortField,
    #[serde(default)]
    pub order: SortOrder,
    pub page: Option<u64>,
    #[serde(alias = "pageSize")]
    pub page_size: Option<u64>,
}

fn id_list(raw: Option<&str>) -> Vec<i64> {
    raw.unwrap_or_default()
        .split(',')
        .filter_map(|p| p.trim().parse().ok())
        .collect()
}

impl AttendanceQuery {
    pub fn session_filter(&self) -> Vec<i64> {
        id_list(self.session_ids.as_deref())
    }

    /// `status` and `statuses` merged, legacy labels mapped.
    pub fn status_filter(&self) -> Vec<AttendanceStatus> {
        let merged = [self.status.as_deref(), self.statuses.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(",");
        parse_status_list(&merged)
    }

    pub fn year_filter(&self) -> Vec<i32> {
        id_list(self.years.as_deref())
            .into_iter()
            .filter_map(|y| i32::try_from(y).ok())
            .collect()
    }

    pub fn scan_type_filter(&self) -> Vec<ScanType> {
        self.scan_types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|p| p.trim().parse().ok())
            .collect()
    }

    pub fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRow {
    pub record_id: i64,
    pub student_id: i64,
    pub student_id_number: String,
    pub name: String,
    pub email: Option<String>,
    pub program: Option<String>,
    pub year: Option<i32>,
    pub session_id: i64,
    pub session_name: String,
    pub scan_type: ScanType,
    pub status: AttendanceStatus,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
}

impl AttendanceRow {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.student_id_number.to_lowercase().contains(needle)
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(needle))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceKpis {
    pub registered: u64,
    pub present: u64,
    pub checked_in_only: u64,
    pub late: u64,
    pub absent: u64,
    pub attendance_rate_percent: f64,
}

impl AttendanceKpis {
    pub fn from_statuses<'a>(statuses: impl IntoIterator<Item = &'a AttendanceStatus>) -> Self {
        let mut kpis = Self::default();
        for status in statuses {
            kpis.registered += 1;
            match status {
                AttendanceStatus::Present => kpis.present += 1,
                AttendanceStatus::Late => kpis.late += 1,
                AttendanceStatus::CheckedInOnly => kpis.checked_in_only += 1,
                AttendanceStatus::Absent => kpis.absent += 1,
            }
        }
        kpis.attendance_rate_percent = attendance_rate(kpis.present + kpis.late, kpis.registered);
        kpis
    }
}

/// Percentage rounded to one decimal; zero when nobody is registered.
pub fn attendance_rate(attended: u64, registered: u64) -> f64 {
    if registered == 0 {
        return 0.0;
    }
    (attended as f64 * 1000.0 / registered as f64).round() / 10.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionAggregate {
    pub session_id: i64,
    pub session_name: String,
    pub total: u64,
    pub present: u64,
    pub late: u64,
    pub checked_in_only: u64,
    pub absent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceReport {
    pub event_id: i64,
    pub event_name: String,
    pub rows: Vec<AttendanceRow>,
    pub kpis: AttendanceKpis,
    pub sessions: Vec<SessionAggregate>,
    pub pagination: Pagination,
}

fn compare(a: &AttendanceRow, b: &AttendanceRow, sort: SortField) -> Ordering {
    let primary = match sort {
        SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortField::Status => a.status.rank().cmp(&b.status.rank()),
        SortField::CheckInAt => a.check_in_at.cmp(&b.check_in_at),
    };
    primary.then(a.record_id.cmp(&b.record_id))
}

/// Every row of the event, before any filtering.
async fn event_rows(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<(event::Model, Vec<session::Model>, Vec<AttendanceRow>), ReportError> {
    let event = event::Model::find_by_id(db, event_id)
        .await?
        .ok_or(ReportError::EventNotFound)?;
    let sessions = session::Model::list_for_event(db, event_id).await?;
    let by_id: HashMap<i64, &session::Model> = sessions.iter().map(|s| (s.id, s)).collect();

    let rows = attendance_record::Model::for_event_with_students(db, event_id)
        .await?
        .into_iter()
        .filter_map(|(record, student)| {
            let student = student?;
            let session = by_id.get(&record.session_id).copied();
            Some(AttendanceRow {
                record_id: record.id,
                student_id: student.id,
                name: student.full_name(),
                student_id_number: student.student_id_number,
                email: student.email,
                program: student.program,
                year: student.year,
                session_id: record.session_id,
                session_name: session.map(|s| s.name.clone()).unwrap_or_default(),
                scan_type: record.scan_type,
                status: derive_status(&StatusInputs::for_record(&record, session)),
                check_in_at: record.time_in,
                check_out_at: record.time_out,
            })
        })
        .collect();

    Ok((event, sessions, rows))
}

fn apply_filters(rows: Vec<AttendanceRow>, query: &AttendanceQuery) -> Vec<AttendanceRow> {
    let sessions = query.session_filter();
    let statuses = query.status_filter();
    let years = query.year_filter();
    let scan_types = query.scan_type_filter();
    let needle = query.search();

    let mut rows: Vec<AttendanceRow> = rows
        .into_iter()
        .filter(|r| sessions.is_empty() || sessions.contains(&r.session_id))
        .filter(|r| statuses.is_empty() || statuses.contains(&r.status))
        .filter(|r| years.is_empty() || r.year.is_some_and(|y| years.contains(&y)))
        .filter(|r| scan_types.is_empty() || scan_types.contains(&r.scan_type))
        .filter(|r| needle.as_deref().is_none_or(|n| r.matches(n)))
        .collect();

    rows.sort_by(|a, b| {
        let ord = compare(a, b, query.sort);
        match query.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    rows
}

impl AttendanceReport {
    pub async fn build(
        db: &DatabaseConnection,
        event_id: i64,
        query: &AttendanceQuery,
    ) -> Result<Self, ReportError> {
        let (event, sessions, all_rows) = event_rows(db, event_id).await?;
        let kpis = AttendanceKpis::from_statuses(all_rows.iter().map(|r| &r.status));

        let filtered = apply_filters(all_rows, query);
        let session_filter = query.session_filter();

        let aggregates = sessions
            .iter()
            .filter(|s| session_filter.is_empty() || session_filter.contains(&s.id))
            .map(|s| {
                let counts = AttendanceKpis::from_statuses(
                    filtered.iter().filter(|r| r.session_id == s.id).map(|r| &r.status),
                );
                SessionAggregate {
                    session_id: s.id,
                    session_name: s.name.clone(),
                    total: counts.registered,
                    present: counts.present,
                    late: counts.late,
                    checked_in_only: counts.checked_in_only,
                    absent: counts.absent,
                }
            })
            .collect();

        let page = query.page();
        let page_size = query.page_size();
        let total = filtered.len() as u64;
        let offset = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
        let rows = filtered
            .into_iter()
            .skip(offset)
            .take(page_size as usize)
            .collect();

        Ok(Self {
            event_id: event.id,
            event_name: event.name,
            rows,
            kpis,
            sessions: aggregates,
            pagination: Pagination {
                page,
                page_size,
                total,
                total_pages: total.div_ceil(page_size),
            },
        })
    }

    /// The event and every row matching `query`, unpaginated. Used by exports.
    pub async fn export_rows(
        db: &DatabaseConnection,
        event_id: i64,
        query: &AttendanceQuery,
    ) -> Result<(event::Model, Vec<AttendanceRow>), ReportError> {
        let (event, _, rows) = event_rows(db, event_id).await?;
        Ok((event, apply_filters(rows, query)))
    }
}
