//! User Models

use jiff::Timestamp;

use crate::{
    access::{Actor, Role},
    ids::TypedId,
};

/// User id
pub type UserId = TypedId<User>;

/// User Account Model
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: Timestamp,
}

impl User {
    /// The principal acting as this account.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// New User Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}
