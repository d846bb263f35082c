//! Menu Repository

use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, query_scalar, sqlite::SqliteRow};

use crate::domain::menu::{
    models::{MenuItem, MenuItemId},
    views::MenuItemView,
};

const LIST_MENU_ITEMS_SQL: &str = include_str!("sql/list_menu_items.sql");
const LIST_AVAILABLE_MENU_ITEMS_SQL: &str = include_str!("sql/list_available_menu_items.sql");
const GET_MENU_ITEM_SQL: &str = include_str!("sql/get_menu_item.sql");
const CREATE_MENU_ITEM_SQL: &str = include_str!("sql/create_menu_item.sql");
const UPDATE_MENU_ITEM_SQL: &str = include_str!("sql/update_menu_item.sql");
const SET_MENU_ITEM_AVAILABILITY_SQL: &str = include_str!("sql/set_menu_item_availability.sql");
const DELETE_MENU_ITEM_SQL: &str = include_str!("sql/delete_menu_item.sql");
const COUNT_ORDER_LINES_FOR_ITEM_SQL: &str = include_str!("sql/count_order_lines_for_item.sql");
const LIST_MENU_VIEWS_SQL: &str = include_str!("sql/list_menu_views.sql");
const UPSERT_MENU_ITEM_META_SQL: &str = include_str!("sql/upsert_menu_item_meta.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteMenuRepository;

impl SqliteMenuRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        query_as::<Sqlite, MenuItem>(LIST_MENU_ITEMS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_available_items(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<MenuItem>, sqlx::Error> {
        query_as::<Sqlite, MenuItem>(LIST_AVAILABLE_MENU_ITEMS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        item: MenuItemId,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Sqlite, MenuItem>(GET_MENU_ITEM_SQL)
            .bind(item.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        name: &str,
        price: u64,
        category: &str,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Sqlite, MenuItem>(CREATE_MENU_ITEM_SQL)
            .bind(name)
            .bind(try_into_stored_amount(price, "price")?)
            .bind(category)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_item(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        item: MenuItemId,
        name: &str,
        price: u64,
        category: &str,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Sqlite, MenuItem>(UPDATE_MENU_ITEM_SQL)
            .bind(item.into_i64())
            .bind(name)
            .bind(try_into_stored_amount(price, "price")?)
            .bind(category)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_availability(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        item: MenuItemId,
        is_available: bool,
    ) -> Result<MenuItem, sqlx::Error> {
        query_as::<Sqlite, MenuItem>(SET_MENU_ITEM_AVAILABILITY_SQL)
            .bind(item.into_i64())
            .bind(is_available)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        item: MenuItemId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_MENU_ITEM_SQL)
            .bind(item.into_i64())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn count_order_lines_for_item(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        item: MenuItemId,
    ) -> Result<i64, sqlx::Error> {
        query_scalar::<Sqlite, i64>(COUNT_ORDER_LINES_FOR_ITEM_SQL)
            .bind(item.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_views(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<MenuItemView>, sqlx::Error> {
        query_as::<Sqlite, MenuItemView>(LIST_MENU_VIEWS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_meta(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        item: MenuItemId,
        description: &str,
        icon: &str,
    ) -> Result<(), sqlx::Error> {
        query(UPSERT_MENU_ITEM_META_SQL)
            .bind(item.into_i64())
            .bind(description)
            .bind(icon)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, SqliteRow> for MenuItem {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: MenuItemId::from_i64(row.try_get("id")?),
            name: row.try_get("name")?,
            price: try_get_amount(row, "price")?,
            category: row.try_get("category")?,
            is_available: row.try_get("is_available")?,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for MenuItemView {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let item = MenuItem::from_row(row)?;

        // LEFT JOIN: both meta columns are NULL when no row exists.
        let description: Option<String> = row.try_get("description")?;
        let icon: Option<String> = row.try_get("icon")?;

        let meta = description.zip(icon).map(|(description, icon)| {
            crate::domain::menu::views::MenuItemMeta {
                menu_item_id: item.id,
                description,
                icon,
            }
        });

        Ok(Self::new(item, meta))
    }
}

pub(crate) fn try_get_amount(row: &SqliteRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

pub(crate) fn try_into_stored_amount(amount: u64, col: &str) -> Result<i64, sqlx::Error> {
    i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
