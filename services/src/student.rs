use db::models::student;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::scan::parse_student_qr;

#[derive(Debug, Error)]
pub enum StudentError {
    #[error("{0}")]
    Invalid(String),

    #[error("A student with id number {0} already exists")]
    Duplicate(String),

    #[error("Student not found")]
    NotFound,

    #[error(transparent)]
    Db(#[from] DbErr),
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentDraft {
    pub student_id_number: String,
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub program: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub year: Option<i32>,
}

pub struct StudentService;

impl StudentService {
    /// Registers a student. The id number must be a valid QR payload.
    pub async fn create(db: &DatabaseConnection, draft: StudentDraft) -> Result<student::Model, StudentError> {
        if let Err(e) = draft.validate() {
            let message = e
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Invalid student".to_owned());
            return Err(StudentError::Invalid(message));
        }
        let number = parse_student_qr(&draft.student_id_number)
            .map_err(|e| StudentError::Invalid(e.to_string()))?;

        if student::Model::find_by_number(db, &number).await?.is_some() {
            return Err(StudentError::Duplicate(number));
        }

        let created = student::Model::create(
            db,
            &number,
            draft.first_name.trim(),
            draft.last_name.trim(),
            draft.email.as_deref(),
            draft.program.as_deref(),
            draft.year,
        )
        .await?;

        tracing::info!(student_id = created.id, number = %created.student_id_number, "Student registered");
        Ok(created)
    }

    pub async fn find_by_number(db: &DatabaseConnection, number: &str) -> Result<student::Model, StudentError> {
        student::Model::find_by_number(db, number.trim())
            .await?
            .ok_or(StudentError::NotFound)
    }
}
