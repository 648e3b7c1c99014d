//! QR scan processing.
//!
//! A scan's kind is decided by the clock: inside the time-in window it is an
//! arrival, inside the time-out window a departure, anywhere else it is
//! refused. Arrivals create the attendance record and departures complete it.

use chrono::{DateTime, Utc};
use db::models::attendance_record::{self, ScanMetadata, ScanType};
use db::models::{session, student};
use sea_orm::{DatabaseConnection, DbErr, SqlErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attendance_status::{derive_status, AttendanceStatus, StatusInputs};
use crate::session_window::SessionWindows;

pub const QR_PREFIX: &str = "ST:";
pub const MAX_STUDENT_ID_LEN: usize = 64;
pub const DEFAULT_RECENT_LIMIT: u64 = 10;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{0}")]
    InvalidQr(String),

    #[error("Session not found")]
    SessionNotFound,

    #[error("{0}")]
    ScanNotAllowed(String),

    #[error("Student not found")]
    StudentNotFound,

    #[error("Cannot record time-out before time-in")]
    InvalidSequence,

    #[error("Student has already checked in for this session")]
    AlreadyCheckedIn,

    #[error("Student has already checked out of this session")]
    AlreadyCheckedOut,

    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Extracts the student id number from a scanned QR payload.
///
/// Accepts `ST:<id>` or a bare `<id>`; the id is 1-64 characters of ASCII
/// letters, digits and `-`.
pub fn parse_student_qr(raw: &str) -> Result<String, ScanError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ScanError::InvalidQr("QR code is empty".into()));
    }

    let id = trimmed.strip_prefix(QR_PREFIX).unwrap_or(trimmed);
    let valid = !id.is_empty()
        && id.len() <= MAX_STUDENT_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !valid {
        return Err(ScanError::InvalidQr("Invalid QR code format".into()));
    }
    Ok(id.to_owned())
}

/// Which scan `now` falls into for `session`.
pub fn scan_kind_at(session: &session::Model, now: DateTime<Utc>) -> Result<ScanType, ScanError> {
    let windows = SessionWindows::from_session(session);
    if windows.time_in.contains(now) {
        return Ok(ScanType::TimeIn);
    }
    if let Some(out) = windows.time_out {
        if out.contains(now) {
            return Ok(ScanType::TimeOut);
        }
        if now >= windows.time_in.end && now < out.start {
            return Err(ScanError::ScanNotAllowed(
                "Time-in window has closed and time-out window has not opened yet".into(),
            ));
        }
    }
    if now < windows.time_in.start {
        return Err(ScanError::ScanNotAllowed(
            "Time-in window has not opened yet".into(),
        ));
    }
    Err(ScanError::ScanNotAllowed(
        "Scanning windows for this session have closed".into(),
    ))
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanRequest {
    pub session_id: i64,
    pub qr_data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub id: i64,
    pub student_id_number: String,
    pub name: String,
    pub program: Option<String>,
}

impl From<&student::Model> for StudentSummary {
    fn from(s: &student::Model) -> Self {
        Self {
            id: s.id,
            student_id_number: s.student_id_number.clone(),
            name: s.full_name(),
            program: s.program.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub scan_type: ScanType,
    pub session_name: String,
    pub student: StudentSummary,
    pub status: AttendanceStatus,
    pub record: attendance_record::Model,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentScan {
    pub record_id: i64,
    pub student_id_number: Option<String>,
    pub student_name: Option<String>,
    pub scan_type: ScanType,
    pub time_in: Option<DateTime<Utc>>,
    pub time_out: Option<DateTime<Utc>>,
    pub status: AttendanceStatus,
    pub scanned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentScans {
    pub scans: Vec<RecentScan>,
    pub total: u64,
}

pub struct ScanService;

impl ScanService {
    pub async fn process(
        db: &DatabaseConnection,
        request: &ScanRequest,
        meta: ScanMetadata,
        now: DateTime<Utc>,
    ) -> Result<ScanOutcome, ScanError> {
        let number = parse_student_qr(&request.qr_data)?;

        let txn = db.begin().await?;
        let session = session::Model::find_by_id(&txn, request.session_id)
            .await?
            .ok_or(ScanError::SessionNotFound)?;
        if !session.is_active {
            return Err(ScanError::ScanNotAllowed("Session is not active".into()));
        }

        let kind = scan_kind_at(&session, now)?;

        let student = student::Model::find_by_number(&txn, &number)
            .await?
            .ok_or(ScanError::StudentNotFound)?;
        let existing = attendance_record::Model::find_for(&txn, student.id, session.id).await?;

        let record = match (kind, existing) {
            (ScanType::TimeIn, Some(_)) => return Err(ScanError::AlreadyCheckedIn),
            (ScanType::TimeIn, None) => attendance_record::Model::record_time_in(
                &txn,
                student.id,
                session.id,
                session.event_id,
                now,
                &meta,
            )
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => ScanError::AlreadyCheckedIn,
                _ => ScanError::Db(err),
            })?,
            (ScanType::TimeOut, None) => return Err(ScanError::InvalidSequence),
            (ScanType::TimeOut, Some(r)) if r.time_in.is_none() => {
                return Err(ScanError::InvalidSequence);
            }
            (ScanType::TimeOut, Some(r)) if r.time_out.is_some() => {
                return Err(ScanError::AlreadyCheckedOut);
            }
            (ScanType::TimeOut, Some(r)) => r.record_time_out(&txn, now, &meta).await?,
        };
        txn.commit().await?;

        let status = derive_status(&StatusInputs::for_record(&record, Some(&session)));
        tracing::info!(
            session_id = session.id,
            student = %student.student_id_number,
            scan_type = %kind,
            %status,
            "Scan recorded"
        );

        Ok(ScanOutcome {
            scan_type: kind,
            session_name: session.name,
            student: StudentSummary::from(&student),
            status,
            record,
        })
    }

    /// Latest scans of a session, newest first, plus the session's record count.
    pub async fn recent(
        db: &DatabaseConnection,
        session_id: i64,
        limit: Option<u64>,
    ) -> Result<RecentScans, ScanError> {
        let session = session::Model::find_by_id(db, session_id)
            .await?
            .ok_or(ScanError::SessionNotFound)?;
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, 100);

        let rows = attendance_record::Model::recent_for_session(db, session_id, limit).await?;
        let total = attendance_record::Model::count_for_session(db, session_id).await?;

        let scans = rows
            .into_iter()
            .map(|(record, student)| RecentScan {
                record_id: record.id,
                student_id_number: student.as_ref().map(|s| s.student_id_number.clone()),
                student_name: student.as_ref().map(student::Model::full_name),
                scan_type: record.scan_type,
                time_in: record.time_in,
                time_out: record.time_out,
                status: derive_status(&StatusInputs::for_record(&record, Some(&session))),
                scanned_at: record.updated_at,
            })
            .collect();

        Ok(RecentScans { scans, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use db::models::event;
    use db::test_utils::setup_test_db;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, h, m, 0).unwrap()
    }

    struct Fixture {
        db: DatabaseConnection,
        session: session::Model,
    }

    async fn fixture(active: bool) -> Fixture {
        let db = setup_test_db().await;
        let ev = event::Model::create(&db, "Tech Summit", None, at(0, 0), at(23, 0), true)
            .await
            .unwrap();
        let session = session::Model::create(
            &db,
            ev.id,
            "Keynote",
            None,
            (at(9, 0), at(10, 0)),
            Some((at(11, 0), at(12, 0))),
            active,
        )
        .await
        .unwrap();
        student::Model::create(&db, "2023-0100", "Rin", "Ocampo", None, Some("BSEE"), Some(1))
            .await
            .unwrap();
        Fixture { db, session }
    }

    fn scan(session_id: i64, qr: &str) -> ScanRequest {
        ScanRequest {
            session_id,
            qr_data: qr.into(),
        }
    }

    #[test]
    fn parse_student_qr_accepts_prefixed_and_bare_ids() {
        assert_eq!(parse_student_qr("ST:2023-0100").unwrap(), "2023-0100");
        assert_eq!(parse_student_qr("  abc123 ").unwrap(), "abc123");
        assert!(matches!(parse_student_qr("   "), Err(ScanError::InvalidQr(_))));
        assert!(matches!(parse_student_qr("ST:"), Err(ScanError::InvalidQr(_))));
        assert!(matches!(parse_student_qr("id with space"), Err(ScanError::InvalidQr(_))));
        assert!(matches!(parse_student_qr(&"x".repeat(65)), Err(ScanError::InvalidQr(_))));
        assert!(parse_student_qr(&"x".repeat(64)).is_ok());
    }

    #[tokio::test]
    async fn scan_kind_follows_the_windows() {
        let f = fixture(true).await;
        let s = &f.session;

        assert!(matches!(scan_kind_at(s, at(9, 0)), Ok(ScanType::TimeIn)));
        assert!(matches!(scan_kind_at(s, at(9, 59)), Ok(ScanType::TimeIn)));
        assert!(matches!(scan_kind_at(s, at(11, 0)), Ok(ScanType::TimeOut)));

        for (now, fragment) in [
            (at(8, 59), "not opened"),
            (at(10, 0), "time-out window has not opened"),
            (at(12, 0), "closed"),
        ] {
            match scan_kind_at(s, now) {
                Err(ScanError::ScanNotAllowed(reason)) => assert!(reason.contains(fragment), "{reason}"),
                other => panic!("expected refusal at {now}, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn time_in_then_time_out_completes_the_record() {
        let f = fixture(true).await;
        let sid = f.session.id;

        let first = ScanService::process(&f.db, &scan(sid, "ST:2023-0100"), ScanMetadata::default(), at(9, 5))
            .await
            .unwrap();
        assert_eq!(first.scan_type, ScanType::TimeIn);
        assert_eq!(first.status, AttendanceStatus::CheckedInOnly);
        assert_eq!(first.student.name, "Rin Ocampo");

        let again = ScanService::process(&f.db, &scan(sid, "2023-0100"), ScanMetadata::default(), at(9, 6)).await;
        assert!(matches!(again, Err(ScanError::AlreadyCheckedIn)));

        let meta = ScanMetadata {
            scanned_by: Some("organizer-1".into()),
            ..Default::default()
        };
        let out = ScanService::process(&f.db, &scan(sid, "2023-0100"), meta, at(11, 30))
            .await
            .unwrap();
        assert_eq!(out.scan_type, ScanType::TimeOut);
        assert_eq!(out.status, AttendanceStatus::Present);
        assert_eq!(out.record.time_in, Some(at(9, 5)));
        assert_eq!(out.record.scanned_by.as_deref(), Some("organizer-1"));

        let twice = ScanService::process(&f.db, &scan(sid, "2023-0100"), ScanMetadata::default(), at(11, 31)).await;
        assert!(matches!(twice, Err(ScanError::AlreadyCheckedOut)));

        let recent = ScanService::recent(&f.db, sid, None).await.unwrap();
        assert_eq!(recent.total, 1);
        assert_eq!(recent.scans[0].status, AttendanceStatus::Present);
        assert_eq!(recent.scans[0].student_name.as_deref(), Some("Rin Ocampo"));
    }

    #[tokio::test]
    async fn sequence_and_lookup_errors() {
        let f = fixture(true).await;
        let sid = f.session.id;

        let early_out = ScanService::process(&f.db, &scan(sid, "2023-0100"), ScanMetadata::default(), at(11, 5)).await;
        assert!(matches!(early_out, Err(ScanError::InvalidSequence)));

        let unknown = ScanService::process(&f.db, &scan(sid, "9999"), ScanMetadata::default(), at(9, 5)).await;
        assert!(matches!(unknown, Err(ScanError::StudentNotFound)));

        let missing = ScanService::process(&f.db, &scan(sid + 50, "2023-0100"), ScanMetadata::default(), at(9, 5)).await;
        assert!(matches!(missing, Err(ScanError::SessionNotFound)));

        let bad = ScanService::process(&f.db, &scan(sid, ""), ScanMetadata::default(), at(9, 5)).await;
        assert!(matches!(bad, Err(ScanError::InvalidQr(_))));

        assert!(matches!(
            ScanService::recent(&f.db, sid + 50, None).await,
            Err(ScanError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn inactive_session_refuses_scans() {
        let f = fixture(false).await;
        let res = ScanService::process(
            &f.db,
            &scan(f.session.id, "2023-0100"),
            ScanMetadata::default(),
            at(9, 0) + Duration::minutes(1),
        )
        .await;
        assert!(matches!(res, Err(ScanError::ScanNotAllowed(_))));
    }
}
