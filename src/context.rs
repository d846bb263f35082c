//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{CartsService, SqliteCartsService},
        menu::{MenuService, SqliteMenuService},
        orders::{OrdersService, SqliteOrdersService},
        students::{SqliteStudentsService, StudentsService},
        users::{SqliteUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to run migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub menu: Arc<dyn MenuService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub students: Arc<dyn StudentsService>,
    pub users: Arc<dyn UsersService>,
}

impl AppContext {
    /// Build application context from a database URL, applying pending
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or
    /// migrating the schema fails.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::MIGRATOR
            .run(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        let db = Db::new(pool);

        Ok(Self {
            menu: Arc::new(SqliteMenuService::new(db.clone())),
            carts: Arc::new(SqliteCartsService::new(db.clone())),
            orders: Arc::new(SqliteOrdersService::new(db.clone())),
            students: Arc::new(SqliteStudentsService::new(db.clone())),
            users: Arc::new(SqliteUsersService::new(db)),
        })
    }
}
