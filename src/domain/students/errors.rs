//! Students service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudentsServiceError {
    #[error("username already exists")]
    UsernameTaken,

    #[error("student code already exists")]
    StudentCodeTaken,

    #[error("student already exists")]
    AlreadyExists,

    #[error("student not found")]
    NotFound,

    #[error("student has existing orders")]
    HasOrders,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for StudentsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            _ => Self::Sql(error),
        }
    }
}
