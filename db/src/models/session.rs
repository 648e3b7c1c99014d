use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;
use serde::{Deserialize, Serialize};

/// A scheduled block of an event with its own scan windows.
///
/// The time-in window is required; the time-out window is optional and is
/// stored as two nullable columns that are either both set or both null.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,

    pub name: String,
    pub description: Option<String>,

    pub time_in_start: DateTime<Utc>,
    pub time_in_end: DateTime<Utc>,
    pub time_out_start: Option<DateTime<Utc>>,
    pub time_out_end: Option<DateTime<Utc>>,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id",
        on_delete = "Cascade"
    )]
    Event,
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    Records,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// The time-out window, when both ends are present.
    pub fn time_out(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.time_out_start.zip(self.time_out_end)
    }

    pub async fn create<C>(
        db: &C,
        event_id: i64,
        name: &str,
        description: Option<&str>,
        time_in: (DateTime<Utc>, DateTime<Utc>),
        time_out: Option<(DateTime<Utc>, DateTime<Utc>)>,
        is_active: bool,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = Utc::now();
        let session = ActiveModel {
            event_id: Set(event_id),
            name: Set(name.to_owned()),
            description: Set(description.map(str::to_owned)),
            time_in_start: Set(time_in.0),
            time_in_end: Set(time_in.1),
            time_out_start: Set(time_out.map(|w| w.0)),
            time_out_end: Set(time_out.map(|w| w.1)),
            is_active: Set(is_active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        session.insert(db).await
    }

    pub async fn find_by_id<C>(db: &C, id: i64) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find_by_id(id).one(db).await
    }

    /// Sessions of an event ordered by time-in start.
    pub async fn list_for_event<C>(db: &C, event_id: i64) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::EventId.eq(event_id))
            .order_by_asc(Column::TimeInStart)
            .all(db)
            .await
    }

    /// Active sessions of an event other than `exclude_id`.
    pub async fn active_for_event<C>(
        db: &C,
        event_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut query = Entity::find()
            .filter(Column::EventId.eq(event_id))
            .filter(Column::IsActive.eq(true));
        if let Some(id) = exclude_id {
            query = query.filter(Column::Id.ne(id));
        }
        query.order_by_asc(Column::TimeInStart).all(db).await
    }

    pub async fn delete<C>(db: &C, id: i64) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }
}
