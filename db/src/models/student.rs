use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Institutional id printed on the student's QR code.
    #[sea_orm(unique)]
    pub student_id_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub program: Option<String>,
    pub year: Option<i32>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_record::Entity")]
    AttendanceRecords,
}

impl Related<super::attendance_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AttendanceRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub async fn create(
        db: &DbConn,
        student_id_number: &str,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        program: Option<&str>,
        year: Option<i32>,
    ) -> Result<Model, DbErr> {
        let student = ActiveModel {
            student_id_number: Set(student_id_number.to_owned()),
            first_name: Set(first_name.to_owned()),
            last_name: Set(last_name.to_owned()),
            email: Set(email.map(str::to_owned)),
            program: Set(program.map(str::to_owned)),
            year: Set(year),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        student.insert(db).await
    }

    pub async fn find_by_number<C>(db: &C, student_id_number: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::StudentIdNumber.eq(student_id_number))
            .one(db)
            .await
    }
}
