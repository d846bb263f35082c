//! Users Repository

use jiff::Timestamp;
use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, sqlite::SqliteRow};

use crate::{
    access::Role,
    domain::users::models::{User, UserId},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const GET_USER_BY_USERNAME_SQL: &str = include_str!("sql/get_user_by_username.sql");
const DELETE_USER_SQL: &str = include_str!("sql/delete_user.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteUsersRepository;

impl SqliteUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        username: &str,
        password_hash: &str,
        role: Role,
        created_at: Timestamp,
    ) -> Result<User, sqlx::Error> {
        query_as::<Sqlite, User>(CREATE_USER_SQL)
            .bind(username)
            .bind(password_hash)
            .bind(role.as_str())
            .bind(created_at.to_string())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
    ) -> Result<User, sqlx::Error> {
        query_as::<Sqlite, User>(GET_USER_SQL)
            .bind(user.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_user_by_username(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        username: &str,
    ) -> Result<User, sqlx::Error> {
        query_as::<Sqlite, User>(GET_USER_BY_USERNAME_SQL)
            .bind(username)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_user(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_USER_SQL)
            .bind(user.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, SqliteRow> for User {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: UserId::from_i64(row.try_get("id")?),
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            role: parse_column(row, "role")?,
            created_at: parse_column(row, "created_at")?,
        })
    }
}

pub(crate) fn parse_column<T>(row: &SqliteRow, col: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(col)?;

    raw.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
