//! Student Models

use crate::{domain::users::models::UserId, ids::TypedId};

/// Student profile id
pub type StudentProfileId = TypedId<StudentProfile>;

/// Admin-managed details attached one-to-one to a student account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentProfile {
    pub id: StudentProfileId,
    pub user_id: UserId,
    pub student_code: String,
    pub full_name: String,
    pub major: String,
    pub email: String,
    pub phone: String,
}

/// New Student Model: the account and its profile, created together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub username: String,
    pub password: String,
    pub student_code: String,
    pub full_name: String,
    pub major: String,
    pub email: String,
    pub phone: String,
}

/// Student Update Model. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentUpdate {
    pub student_code: Option<String>,
    pub full_name: Option<String>,
    pub major: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
