//! Session conflict detection.
//!
//! A candidate session conflicts with an existing active session of the same
//! event when any of its windows overlaps any of the existing session's
//! windows. The check is advisory: storage failures are logged and reported
//! as "no conflict".

use async_trait::async_trait;
use db::models::session;
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr};
use serde::Serialize;

use crate::session_window::{SessionWindows, WindowError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingSession {
    pub id: i64,
    pub name: String,
    pub windows: SessionWindows,
}

impl From<&session::Model> for ExistingSession {
    fn from(model: &session::Model) -> Self {
        Self {
            id: model.id,
            name: model.name.clone(),
            windows: SessionWindows::from_session(model),
        }
    }
}

/// Read-only access to the sessions a candidate is checked against.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Active sessions of `event_id`, without `exclude_id` when given.
    async fn active_sessions(
        &self,
        event_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<Vec<ExistingSession>, DbErr>;
}

#[async_trait]
impl SessionSource for DatabaseConnection {
    async fn active_sessions(
        &self,
        event_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<Vec<ExistingSession>, DbErr> {
        let rows = session::Model::active_for_event(self, event_id, exclude_id).await?;
        Ok(rows.iter().map(ExistingSession::from).collect())
    }
}

#[async_trait]
impl SessionSource for DatabaseTransaction {
    async fn active_sessions(
        &self,
        event_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<Vec<ExistingSession>, DbErr> {
        let rows = session::Model::active_for_event(self, event_id, exclude_id).await?;
        Ok(rows.iter().map(ExistingSession::from).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "sessions", rename_all = "snake_case")]
pub enum ConflictOutcome {
    Clear,
    /// Distinct names of the overlapping sessions, in schedule order.
    Conflict(Vec<String>),
}

impl ConflictOutcome {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ConflictOutcome::Conflict(_))
    }

    pub fn conflicting_sessions(&self) -> &[String] {
        match self {
            ConflictOutcome::Clear => &[],
            ConflictOutcome::Conflict(names) => names,
        }
    }
}

/// Names of the sessions in `existing` that overlap `candidate`.
pub fn find_conflicts(candidate: &SessionWindows, existing: &[ExistingSession]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for other in existing {
        if candidate.overlaps(&other.windows) && !names.contains(&other.name) {
            names.push(other.name.clone());
        }
    }
    names
}

/// Validates `candidate` and checks it against the event's other active sessions.
///
/// Validation failures are returned as errors; they are never reported as
/// conflicts. A failed storage read yields [`ConflictOutcome::Clear`].
pub async fn check_conflicts(
    source: &dyn SessionSource,
    event_id: i64,
    candidate: &SessionWindows,
    exclude_id: Option<i64>,
) -> Result<ConflictOutcome, WindowError> {
    candidate.validate()?;

    let existing = match source.active_sessions(event_id, exclude_id).await {
        Ok(rows) => rows,
        Err(err) => {
            tracing::warn!(
                error = %err,
                event_id,
                "Conflict check could not read sessions; treating as no conflict"
            );
            return Ok(ConflictOutcome::Clear);
        }
    };

    let names = find_conflicts(candidate, &existing);
    if names.is_empty() {
        Ok(ConflictOutcome::Clear)
    } else {
        tracing::debug!(event_id, conflicts = ?names, "Session windows conflict");
        Ok(ConflictOutcome::Conflict(names))
    }
}
