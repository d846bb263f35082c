//! Students Repository

use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, query_scalar, sqlite::SqliteRow};

use crate::domain::{
    students::models::{StudentProfile, StudentProfileId},
    users::models::UserId,
};

const CREATE_STUDENT_PROFILE_SQL: &str = include_str!("sql/create_student_profile.sql");
const GET_STUDENT_PROFILE_SQL: &str = include_str!("sql/get_student_profile.sql");
const LIST_STUDENT_PROFILES_SQL: &str = include_str!("sql/list_student_profiles.sql");
const UPDATE_STUDENT_PROFILE_SQL: &str = include_str!("sql/update_student_profile.sql");
const DELETE_STUDENT_PROFILE_SQL: &str = include_str!("sql/delete_student_profile.sql");
const STUDENT_CODE_EXISTS_SQL: &str = include_str!("sql/student_code_exists.sql");
const USERNAME_EXISTS_SQL: &str = include_str!("sql/username_exists.sql");
const COUNT_ORDERS_FOR_USER_SQL: &str = include_str!("sql/count_orders_for_user.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteStudentsRepository;

impl SqliteStudentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_profile(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
        profile: &StudentProfileFields<'_>,
    ) -> Result<StudentProfile, sqlx::Error> {
        query_as::<Sqlite, StudentProfile>(CREATE_STUDENT_PROFILE_SQL)
            .bind(user.into_i64())
            .bind(profile.student_code)
            .bind(profile.full_name)
            .bind(profile.major)
            .bind(profile.email)
            .bind(profile.phone)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_profile(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
    ) -> Result<StudentProfile, sqlx::Error> {
        query_as::<Sqlite, StudentProfile>(GET_STUDENT_PROFILE_SQL)
            .bind(user.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_profiles(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<StudentProfile>, sqlx::Error> {
        query_as::<Sqlite, StudentProfile>(LIST_STUDENT_PROFILES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_profile(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
        profile: &StudentProfileFields<'_>,
    ) -> Result<StudentProfile, sqlx::Error> {
        query_as::<Sqlite, StudentProfile>(UPDATE_STUDENT_PROFILE_SQL)
            .bind(user.into_i64())
            .bind(profile.student_code)
            .bind(profile.full_name)
            .bind(profile.major)
            .bind(profile.email)
            .bind(profile.phone)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_profile(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_STUDENT_PROFILE_SQL)
            .bind(user.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn student_code_exists(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        student_code: &str,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Sqlite, bool>(STUDENT_CODE_EXISTS_SQL)
            .bind(student_code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn username_exists(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        username: &str,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Sqlite, bool>(USERNAME_EXISTS_SQL)
            .bind(username)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_orders_for_user(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Sqlite, i64>(COUNT_ORDERS_FOR_USER_SQL)
            .bind(user.into_i64())
            .fetch_one(&mut **tx)
            .await
    }
}

/// Borrowed column values shared by the insert and update statements.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StudentProfileFields<'a> {
    pub student_code: &'a str,
    pub full_name: &'a str,
    pub major: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
}

impl<'r> FromRow<'r, SqliteRow> for StudentProfile {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: StudentProfileId::from_i64(row.try_get("id")?),
            user_id: UserId::from_i64(row.try_get("user_id")?),
            student_code: row.try_get("student_code")?,
            full_name: row.try_get("full_name")?,
            major: row.try_get("major")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
        })
    }
}
