//! Users service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::users::{
        errors::UsersServiceError,
        models::{NewUser, User, UserId},
        password,
        repository::SqliteUsersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct SqliteUsersService {
    db: Db,
    repository: SqliteUsersRepository,
}

impl SqliteUsersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: SqliteUsersRepository::new(),
        }
    }
}

#[async_trait]
impl UsersService for SqliteUsersService {
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError> {
        let password_hash = password::hash_password(&user.password);

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_user(
                &mut tx,
                &user.username,
                &password_hash,
                user.role,
                Timestamp::now(),
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_user(&self, user: UserId) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self.repository.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<User, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .get_user_by_username(&mut tx, username)
            .await?;

        tx.commit().await?;

        Ok(user)
    }

    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, UsersServiceError> {
        let user = self.find_by_username(username).await?;

        if !password::verify_password(password, &user.password_hash) {
            return Err(UsersServiceError::InvalidCredentials);
        }

        Ok(user)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Creates a new account with a salted password hash.
    async fn create_user(&self, user: NewUser) -> Result<User, UsersServiceError>;

    /// Retrieve an account by id.
    async fn get_user(&self, user: UserId) -> Result<User, UsersServiceError>;

    /// Retrieve an account by its unique username.
    async fn find_by_username(&self, username: &str) -> Result<User, UsersServiceError>;

    /// Look up an account and check its password.
    async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, UsersServiceError>;
}
