//! Database test utilities
//!
//! Isolation is **database-level**: every test gets its own in-memory
//! SQLite database with migrations applied, so service methods commit
//! their own transactions normally and clean state comes for free.

use std::str::FromStr;

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::database::MIGRATOR;

#[derive(Debug, Clone)]
pub(crate) struct TestDb {
    pool: SqlitePool,
}

impl TestDb {
    /// Create an isolated in-memory database with migrations applied.
    pub(crate) async fn new() -> Self {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .expect("Failed to parse in-memory database URL")
            .foreign_keys(true);

        // A single connection keeps every query on the same in-memory
        // database; a second pooled connection would see an empty one.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .expect("Failed to open in-memory database");

        MIGRATOR
            .run(&pool)
            .await
            .expect("Failed to run migrations on test database");

        Self { pool }
    }

    /// Returns the connection pool for this test database.
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_produce_a_usable_schema() {
        let test_db = TestDb::new().await;

        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items")
            .fetch_one(test_db.pool())
            .await
            .expect("Failed to query migrated schema");

        assert_eq!(result, 0);
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let test_db = TestDb::new().await;

        let result = sqlx::query(
            "INSERT INTO order_lines (order_id, menu_item_id, quantity, price) \
             VALUES (1, 1, 1, 1000)",
        )
        .execute(test_db.pool())
        .await;

        assert!(result.is_err(), "dangling order line should be rejected");
    }
}
