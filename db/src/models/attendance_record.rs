use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// One student's attendance in one session.
///
/// Created by the time-in scan and completed by the time-out scan. The
/// `(student_id, session_id)` pair is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub student_id: i64,
    pub session_id: i64,
    pub event_id: i64,

    pub time_in: Option<DateTime<Utc>>,
    pub time_out: Option<DateTime<Utc>>,

    /// Kind of the most recent scan applied to this record.
    pub scan_type: ScanType,
    pub scanned_by: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "snake_case")]
pub enum ScanType {
    #[sea_orm(string_value = "time_in")]
    TimeIn,

    #[sea_orm(string_value = "time_out")]
    TimeOut,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id",
        on_delete = "Cascade"
    )]
    Session,
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Request metadata stored alongside a scan.
#[derive(Debug, Clone, Default)]
pub struct ScanMetadata {
    pub scanned_by: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Model {
    pub async fn find_for<C>(db: &C, student_id: i64, session_id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SessionId.eq(session_id))
            .one(db)
            .await
    }

    /// Inserts the record for a first (time-in) scan.
    pub async fn record_time_in<C>(
        db: &C,
        student_id: i64,
        session_id: i64,
        event_id: i64,
        at: DateTime<Utc>,
        meta: &ScanMetadata,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let record = ActiveModel {
            student_id: Set(student_id),
            session_id: Set(session_id),
            event_id: Set(event_id),
            time_in: Set(Some(at)),
            time_out: Set(None),
            scan_type: Set(ScanType::TimeIn),
            scanned_by: Set(meta.scanned_by.clone()),
            ip_address: Set(meta.ip_address.clone()),
            user_agent: Set(meta.user_agent.clone()),
            created_at: Set(at),
            updated_at: Set(at),
            ..Default::default()
        };

        record.insert(db).await
    }

    /// Completes an existing record with a time-out scan.
    pub async fn record_time_out<C>(
        self,
        db: &C,
        at: DateTime<Utc>,
        meta: &ScanMetadata,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut record: ActiveModel = self.into();
        record.time_out = Set(Some(at));
        record.scan_type = Set(ScanType::TimeOut);
        record.scanned_by = Set(meta.scanned_by.clone());
        record.ip_address = Set(meta.ip_address.clone());
        record.user_agent = Set(meta.user_agent.clone());
        record.updated_at = Set(at);

        record.update(db).await
    }

    pub async fn count_for_session<C>(db: &C, session_id: i64) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .count(db)
            .await
    }

    /// Most recently touched records of a session with their students.
    pub async fn recent_for_session<C>(
        db: &C,
        session_id: i64,
        limit: u64,
    ) -> Result<Vec<(Model, Option<super::student::Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::SessionId.eq(session_id))
            .find_also_related(super::student::Entity)
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    /// Every record of an event with its student.
    pub async fn for_event_with_students<C>(
        db: &C,
        event_id: i64,
    ) -> Result<Vec<(Model, Option<super::student::Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::EventId.eq(event_id))
            .find_also_related(super::student::Entity)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }
}
