use std::collections::HashSet;

use chrono::{DateTime, Utc};
use db::models::{attendance_record, event, session};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QuerySelect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("{0}")]
    Invalid(String),

    #[error("Event not found")]
    NotFound,

    #[error(transparent)]
    Db(#[from] DbErr),
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EventDraft {
    #[validate(length(min = 1, max = 200, message = "Event name must be 1-200 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Dashboard counters over all events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EventStats {
    pub total_events: u64,
    pub active_events: u64,
    pub inactive_events: u64,
    pub total_sessions: u64,
    pub events_with_sessions: u64,
    pub events_without_sessions: u64,
    pub events_with_attendance: u64,
    pub events_without_attendance: u64,
}

impl EventStats {
    pub async fn collect(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let events = event::Entity::find().all(db).await?;

        let session_events: Vec<i64> = session::Entity::find()
            .select_only()
            .column(session::Column::EventId)
            .into_tuple()
            .all(db)
            .await?;

        let attended: HashSet<i64> = attendance_record::Entity::find()
            .select_only()
            .column(attendance_record::Column::EventId)
            .distinct()
            .into_tuple::<i64>()
            .all(db)
            .await?
            .into_iter()
            .collect();

        let total_sessions = session_events.len() as u64;
        let with_sessions: HashSet<i64> = session_events.into_iter().collect();

        let total_events = events.len() as u64;
        let active_events = events.iter().filter(|e| e.is_active).count() as u64;
        let events_with_sessions = events
            .iter()
            .filter(|e| with_sessions.contains(&e.id))
            .count() as u64;
        let events_with_attendance = events
            .iter()
            .filter(|e| attended.contains(&e.id))
            .count() as u64;

        Ok(Self {
            total_events,
            active_events,
            inactive_events: total_events - active_events,
            total_sessions,
            events_with_sessions,
            events_without_sessions: total_events - events_with_sessions,
            events_with_attendance,
            events_without_attendance: total_events - events_with_attendance,
        })
    }
}

pub struct EventService;

impl EventService {
    pub async fn create(db: &DatabaseConnection, draft: EventDraft) -> Result<event::Model, EventError> {
        if let Err(e) = draft.validate() {
            let message = e
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid event".to_owned());
            return Err(EventError::Invalid(message));
        }
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(EventError::Invalid("Event name is required".into()));
        }
        if draft.end_date < draft.start_date {
            return Err(EventError::Invalid("End date must not be before start date".into()));
        }

        let created = event::Model::create(
            db,
            name,
            draft.description.as_deref(),
            draft.start_date,
            draft.end_date,
            draft.is_active,
        )
        .await?;

        tracing::info!(event_id = created.id, name = %created.name, "Event created");
        Ok(created)
    }

    pub async fn find(db: &DatabaseConnection, id: i64) -> Result<event::Model, EventError> {
        event::Model::find_by_id(db, id)
            .await?
            .ok_or(EventError::NotFound)
    }

    pub async fn list(db: &DatabaseConnection) -> Result<Vec<event::Model>, EventError> {
        Ok(event::Model::list(db).await?)
    }
}
