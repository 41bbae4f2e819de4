use models::errors::ModelError;
use sea_orm::DbErr;
use thiserror::Error;

pub const STUDENT_NOT_FOUND: &str = "Student not found";
pub const COURSE_NOT_FOUND: &str = "Course not found";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(m) => Self::Validation(m),
            ModelError::Conflict(m) => Self::Conflict(m),
            ModelError::Db(e) => Self::Db(e),
        }
    }
}
