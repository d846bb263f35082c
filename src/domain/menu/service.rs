//! Menu service.
//!
//! Catalog reads are shared by every surface; catalog writes come from the
//! admin surface, which the surrounding layer gates by role before calling
//! in.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::menu::{
        errors::MenuServiceError,
        models::{MenuItem, MenuItemId, MenuItemUpdate, NewMenuItem},
        repository::SqliteMenuRepository,
        views::MenuItemView,
    },
};

#[derive(Debug, Clone)]
pub struct SqliteMenuService {
    db: Db,
    repository: SqliteMenuRepository,
}

impl SqliteMenuService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: SqliteMenuRepository::new(),
        }
    }
}

#[async_trait]
impl MenuService for SqliteMenuService {
    async fn list_items(&self) -> Result<Vec<MenuItem>, MenuServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.repository.list_items(&mut tx).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn list_available_items(&self) -> Result<Vec<MenuItem>, MenuServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.repository.list_available_items(&mut tx).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn list_views(&self) -> Result<Vec<MenuItemView>, MenuServiceError> {
        let mut tx = self.db.begin().await?;

        let views = self.repository.list_views(&mut tx).await?;

        tx.commit().await?;

        Ok(views)
    }

    async fn get_item(&self, item: MenuItemId) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin().await?;

        let item = self.repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn create_item(&self, item: NewMenuItem) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_item(&mut tx, &item.name, item.price, &item.category)
            .await?;

        tx.commit().await?;

        tracing::info!(item = %created.id, name = %created.name, "menu item created");

        Ok(created)
    }

    async fn update_item(
        &self,
        item: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_item(&mut tx, item, &update.name, update.price, &update.category)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn set_availability(
        &self,
        item: MenuItemId,
        is_available: bool,
    ) -> Result<MenuItem, MenuServiceError> {
        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .set_availability(&mut tx, item, is_available)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_item(&self, item: MenuItemId) -> Result<(), MenuServiceError> {
        let mut tx = self.db.begin().await?;

        // Items referenced by historical order lines may only be
        // deactivated, never deleted.
        let references = self
            .repository
            .count_order_lines_for_item(&mut tx, item)
            .await?;

        if references > 0 {
            return Err(MenuServiceError::InUse);
        }

        let rows_affected = self.repository.delete_item(&mut tx, item).await?;

        if rows_affected == 0 {
            return Err(MenuServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn set_item_meta(
        &self,
        item: MenuItemId,
        description: &str,
        icon: &str,
    ) -> Result<(), MenuServiceError> {
        let mut tx = self.db.begin().await?;

        // Confirm the item exists so the FK error does not leak through.
        self.repository.get_item(&mut tx, item).await?;

        self.repository
            .upsert_meta(&mut tx, item, description, icon)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait MenuService: Send + Sync {
    /// Retrieves the whole catalog, ordered by category then name.
    async fn list_items(&self) -> Result<Vec<MenuItem>, MenuServiceError>;

    /// Retrieves the orderable subset of the catalog.
    async fn list_available_items(&self) -> Result<Vec<MenuItem>, MenuServiceError>;

    /// Retrieves the catalog joined with presentation metadata.
    async fn list_views(&self) -> Result<Vec<MenuItemView>, MenuServiceError>;

    /// Retrieve a single menu item.
    async fn get_item(&self, item: MenuItemId) -> Result<MenuItem, MenuServiceError>;

    /// Creates a new, immediately available menu item.
    async fn create_item(&self, item: NewMenuItem) -> Result<MenuItem, MenuServiceError>;

    /// Updates name, price, and category of a menu item.
    async fn update_item(
        &self,
        item: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, MenuServiceError>;

    /// Flips the availability flag.
    async fn set_availability(
        &self,
        item: MenuItemId,
        is_available: bool,
    ) -> Result<MenuItem, MenuServiceError>;

    /// Deletes a menu item that no order line references.
    async fn delete_item(&self, item: MenuItemId) -> Result<(), MenuServiceError>;

    /// Creates or replaces the presentation metadata for a menu item.
    async fn set_item_meta(
        &self,
        item: MenuItemId,
        description: &str,
        icon: &str,
    ) -> Result<(), MenuServiceError>;
}
