//! Students service.
//!
//! Creates and maintains student accounts together with their profiles.
//! The admin surface is gated by the surrounding layer before calling in.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    access::Role,
    database::Db,
    domain::{
        students::{
            errors::StudentsServiceError,
            models::{NewStudent, StudentProfile, StudentUpdate},
            repository::{SqliteStudentsRepository, StudentProfileFields},
        },
        users::{models::UserId, password, repository::SqliteUsersRepository},
    },
};

#[derive(Debug, Clone)]
pub struct SqliteStudentsService {
    db: Db,
    students_repository: SqliteStudentsRepository,
    users_repository: SqliteUsersRepository,
}

impl SqliteStudentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            students_repository: SqliteStudentsRepository::new(),
            users_repository: SqliteUsersRepository::new(),
        }
    }
}

#[async_trait]
impl StudentsService for SqliteStudentsService {
    async fn create_student(
        &self,
        student: NewStudent,
    ) -> Result<StudentProfile, StudentsServiceError> {
        let mut tx = self.db.begin().await?;

        if self
            .students_repository
            .username_exists(&mut tx, &student.username)
            .await?
        {
            return Err(StudentsServiceError::UsernameTaken);
        }

        if self
            .students_repository
            .student_code_exists(&mut tx, &student.student_code)
            .await?
        {
            return Err(StudentsServiceError::StudentCodeTaken);
        }

        let user = self
            .users_repository
            .create_user(
                &mut tx,
                &student.username,
                &password::hash_password(&student.password),
                Role::Student,
                Timestamp::now(),
            )
            .await?;

        let profile = self
            .students_repository
            .create_profile(
                &mut tx,
                user.id,
                &StudentProfileFields {
                    student_code: &student.student_code,
                    full_name: &student.full_name,
                    major: &student.major,
                    email: &student.email,
                    phone: &student.phone,
                },
            )
            .await?;

        tx.commit().await?;

        info!(user = %user.id, code = %profile.student_code, "student created");

        Ok(profile)
    }

    async fn get_student(&self, user: UserId) -> Result<StudentProfile, StudentsServiceError> {
        let mut tx = self.db.begin().await?;

        let profile = self.students_repository.get_profile(&mut tx, user).await?;

        tx.commit().await?;

        Ok(profile)
    }

    async fn list_students(&self) -> Result<Vec<StudentProfile>, StudentsServiceError> {
        let mut tx = self.db.begin().await?;

        let profiles = self.students_repository.list_profiles(&mut tx).await?;

        tx.commit().await?;

        Ok(profiles)
    }

    async fn update_student(
        &self,
        user: UserId,
        update: StudentUpdate,
    ) -> Result<StudentProfile, StudentsServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.students_repository.get_profile(&mut tx, user).await?;

        if let Some(code) = &update.student_code
            && code != &current.student_code
            && self
                .students_repository
                .student_code_exists(&mut tx, code)
                .await?
        {
            return Err(StudentsServiceError::StudentCodeTaken);
        }

        let updated = self
            .students_repository
            .update_profile(
                &mut tx,
                user,
                &StudentProfileFields {
                    student_code: update.student_code.as_deref().unwrap_or(&current.student_code),
                    full_name: update.full_name.as_deref().unwrap_or(&current.full_name),
                    major: update.major.as_deref().unwrap_or(&current.major),
                    email: update.email.as_deref().unwrap_or(&current.email),
                    phone: update.phone.as_deref().unwrap_or(&current.phone),
                },
            )
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_student(&self, user: UserId) -> Result<(), StudentsServiceError> {
        let mut tx = self.db.begin().await?;

        // Students with order history stay on record.
        let orders = self
            .students_repository
            .count_orders_for_user(&mut tx, user)
            .await?;

        if orders > 0 {
            return Err(StudentsServiceError::HasOrders);
        }

        let rows_affected = self
            .students_repository
            .delete_profile(&mut tx, user)
            .await?;

        if rows_affected == 0 {
            return Err(StudentsServiceError::NotFound);
        }

        self.users_repository.delete_user(&mut tx, user).await?;

        tx.commit().await?;

        info!(user = %user, "student deleted");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait StudentsService: Send + Sync {
    /// Creates a student account and its profile in one unit.
    async fn create_student(
        &self,
        student: NewStudent,
    ) -> Result<StudentProfile, StudentsServiceError>;

    /// Retrieve the profile attached to a user account.
    async fn get_student(&self, user: UserId) -> Result<StudentProfile, StudentsServiceError>;

    /// Retrieves all profiles, ordered by student code.
    async fn list_students(&self) -> Result<Vec<StudentProfile>, StudentsServiceError>;

    /// Applies the given fields, keeping stored values for `None`.
    async fn update_student(
        &self,
        user: UserId,
        update: StudentUpdate,
    ) -> Result<StudentProfile, StudentsServiceError>;

    /// Deletes a student and their account unless orders exist.
    async fn delete_student(&self, user: UserId) -> Result<(), StudentsServiceError>;
}
