//! Session lifecycle: create, dry-run check, edit, delete, detail.
//!
//! Creation and edits re-run the window validation and the conflict check
//! inside the same transaction as the write.

use chrono::{DateTime, Utc};
use db::models::{attendance_record, event, session};
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, TransactionTrait};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::session_conflict::{check_conflicts, ConflictOutcome};
use crate::session_window::{SessionWindows, TimeWindow, WindowError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Window(#[from] WindowError),

    #[error("Time windows conflict with existing sessions")]
    Conflict(Vec<String>),

    #[error("Event not found")]
    EventNotFound,

    #[error("Session not found")]
    NotFound,

    #[error(transparent)]
    Db(#[from] DbErr),
}

fn default_true() -> bool {
    true
}

/// Input for creating (or dry-run checking) a session.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SessionDraft {
    #[validate(length(min = 1, max = 120, message = "Session name must be 1-120 characters"))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    pub time_in_start: DateTime<Utc>,
    pub time_in_end: DateTime<Utc>,
    pub time_out_start: Option<DateTime<Utc>>,
    pub time_out_end: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl SessionDraft {
    pub fn windows(&self) -> Result<SessionWindows, SessionError> {
        windows_from_parts(
            self.time_in_start,
            self.time_in_end,
            self.time_out_start,
            self.time_out_end,
        )
    }

    fn checked(&self) -> Result<SessionWindows, SessionError> {
        self.validate()
            .map_err(|e| SessionError::Invalid(first_validation_message(&e)))?;
        if self.name.trim().is_empty() {
            return Err(SessionError::Invalid("Session name is required".into()));
        }
        let windows = self.windows()?;
        windows.validate()?;
        Ok(windows)
    }
}

/// Partial edit of a session. `clear_time_out` drops the time-out window.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SessionPatch {
    #[validate(length(min = 1, max = 120, message = "Session name must be 1-120 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000, message = "Description must be at most 1000 characters"))]
    pub description: Option<String>,
    pub time_in_start: Option<DateTime<Utc>>,
    pub time_in_end: Option<DateTime<Utc>>,
    pub time_out_start: Option<DateTime<Utc>>,
    pub time_out_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub clear_time_out: bool,
    pub is_active: Option<bool>,
}

impl SessionPatch {
    fn checked_name(&self) -> Result<Option<String>, SessionError> {
        self.validate()
            .map_err(|e| SessionError::Invalid(first_validation_message(&e)))?;
        match self.name.as_deref().map(str::trim) {
            Some("") => Err(SessionError::Invalid("Session name is required".into())),
            other => Ok(other.map(str::to_owned)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionLifecycle {
    Upcoming,
    Active,
    Completed,
}

impl SessionLifecycle {
    pub fn at(windows: &SessionWindows, now: DateTime<Utc>) -> Self {
        if now < windows.time_in.start {
            SessionLifecycle::Upcoming
        } else if now <= windows.last_end() {
            SessionLifecycle::Active
        } else {
            SessionLifecycle::Completed
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    pub session: session::Model,
    pub event_name: String,
    pub lifecycle: SessionLifecycle,
    pub attendance_count: u64,
}

fn windows_from_parts(
    time_in_start: DateTime<Utc>,
    time_in_end: DateTime<Utc>,
    time_out_start: Option<DateTime<Utc>>,
    time_out_end: Option<DateTime<Utc>>,
) -> Result<SessionWindows, SessionError> {
    let time_out = match (time_out_start, time_out_end) {
        (Some(start), Some(end)) => Some(TimeWindow::new(start, end)),
        (None, None) => None,
        _ => {
            return Err(SessionError::Invalid(
                "Time-out window requires both a start and an end".into(),
            ));
        }
    };
    Ok(SessionWindows::new(
        TimeWindow::new(time_in_start, time_in_end),
        time_out,
    ))
}

fn first_validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {field}"))
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid session".to_owned())
}

pub struct SessionService;

impl SessionService {
    /// Dry run of [`SessionService::create`]: validation plus the advisory conflict check.
    pub async fn check(
        db: &DatabaseConnection,
        event_id: i64,
        draft: &SessionDraft,
    ) -> Result<ConflictOutcome, SessionError> {
        let windows = draft.checked()?;
        if event::Model::find_by_id(db, event_id).await?.is_none() {
            return Err(SessionError::EventNotFound);
        }
        Ok(check_conflicts(db, event_id, &windows, None).await?)
    }

    pub async fn create(
        db: &DatabaseConnection,
        event_id: i64,
        draft: SessionDraft,
    ) -> Result<session::Model, SessionError> {
        let windows = draft.checked()?;

        let txn = db.begin().await?;
        if event::Model::find_by_id(&txn, event_id).await?.is_none() {
            return Err(SessionError::EventNotFound);
        }

        if draft.is_active {
            if let ConflictOutcome::Conflict(names) =
                check_conflicts(&txn, event_id, &windows, None).await?
            {
                return Err(SessionError::Conflict(names));
            }
        }

        let created = session::Model::create(
            &txn,
            event_id,
            draft.name.trim(),
            draft.description.as_deref(),
            (windows.time_in.start, windows.time_in.end),
            windows.time_out.map(|w| (w.start, w.end)),
            draft.is_active,
        )
        .await?;
        txn.commit().await?;

        tracing::info!(session_id = created.id, event_id, name = %created.name, "Session created");
        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i64,
        patch: SessionPatch,
    ) -> Result<session::Model, SessionError> {
        let renamed = patch.checked_name()?;

        let txn = db.begin().await?;
        let current = session::Model::find_by_id(&txn, id)
            .await?
            .ok_or(SessionError::NotFound)?;

        let name = renamed.unwrap_or_else(|| current.name.clone());

        let (out_start, out_end) = if patch.clear_time_out {
            (None, None)
        } else {
            (
                patch.time_out_start.or(current.time_out_start),
                patch.time_out_end.or(current.time_out_end),
            )
        };
        let windows = windows_from_parts(
            patch.time_in_start.unwrap_or(current.time_in_start),
            patch.time_in_end.unwrap_or(current.time_in_end),
            out_start,
            out_end,
        )?;
        windows.validate()?;

        let is_active = patch.is_active.unwrap_or(current.is_active);
        if is_active {
            if let ConflictOutcome::Conflict(names) =
                check_conflicts(&txn, current.event_id, &windows, Some(id)).await?
            {
                return Err(SessionError::Conflict(names));
            }
        }

        let mut active: session::ActiveModel = current.into();
        active.name = Set(name);
        if let Some(description) = patch.description {
            active.description = Set(Some(description));
        }
        active.time_in_start = Set(windows.time_in.start);
        active.time_in_end = Set(windows.time_in.end);
        active.time_out_start = Set(windows.time_out.map(|w| w.start));
        active.time_out_end = Set(windows.time_out.map(|w| w.end));
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await?;
        txn.commit().await?;

        tracing::info!(session_id = id, "Session updated");
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<(), SessionError> {
        if session::Model::delete(db, id).await? {
            tracing::info!(session_id = id, "Session deleted");
            Ok(())
        } else {
            Err(SessionError::NotFound)
        }
    }

    pub async fn list_for_event(
        db: &DatabaseConnection,
        event_id: i64,
    ) -> Result<Vec<session::Model>, SessionError> {
        if event::Model::find_by_id(db, event_id).await?.is_none() {
            return Err(SessionError::EventNotFound);
        }
        Ok(session::Model::list_for_event(db, event_id).await?)
    }

    pub async fn detail(
        db: &DatabaseConnection,
        id: i64,
        now: DateTime<Utc>,
    ) -> Result<SessionDetail, SessionError> {
        let session = session::Model::find_by_id(db, id)
            .await?
            .ok_or(SessionError::NotFound)?;
        let event_name = event::Model::find_by_id(db, session.event_id)
            .await?
            .map(|e| e.name)
            .unwrap_or_default();
        let attendance_count = attendance_record::Model::count_for_session(db, id).await?;
        let lifecycle = SessionLifecycle::at(&SessionWindows::from_session(&session), now);

        Ok(SessionDetail {
            session,
            event_name,
            lifecycle,
            attendance_count,
        })
    }
}
