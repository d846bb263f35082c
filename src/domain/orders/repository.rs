//! Orders Repository

use jiff::Timestamp;
use sqlx::{FromRow, Row, Sqlite, Transaction, query, query_as, sqlite::SqliteRow};

use crate::domain::{
    carts::models::CartLine,
    menu::{
        models::MenuItemId,
        repository::{try_get_amount, try_into_stored_amount},
    },
    orders::models::{Order, OrderId, OrderLine, OrderLineId, OrderStatus},
    users::{models::UserId, repository::parse_column},
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_LINE_SQL: &str = include_str!("sql/create_order_line.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const GET_ORDER_LINES_SQL: &str = include_str!("sql/get_order_lines.sql");
const LIST_ORDERS_FOR_USER_SQL: &str = include_str!("sql/list_orders_for_user.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const SET_ORDER_STATUS_IF_SQL: &str = include_str!("sql/set_order_status_if.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteOrdersRepository;

impl SqliteOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
        total_amount: u64,
        created_at: Timestamp,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Sqlite, Order>(CREATE_ORDER_SQL)
            .bind(user.into_i64())
            .bind(try_into_stored_amount(total_amount, "total_amount")?)
            .bind(OrderStatus::Pending.as_str())
            .bind(created_at.to_string())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order_line(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderId,
        line: &CartLine,
    ) -> Result<OrderLine, sqlx::Error> {
        query_as::<Sqlite, OrderLine>(CREATE_ORDER_LINE_SQL)
            .bind(order.into_i64())
            .bind(line.id.into_i64())
            .bind(i64::from(line.quantity))
            .bind(try_into_stored_amount(line.price, "price")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderId,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Sqlite, Order>(GET_ORDER_SQL)
            .bind(order.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order_lines(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderId,
    ) -> Result<Vec<OrderLine>, sqlx::Error> {
        query_as::<Sqlite, OrderLine>(GET_ORDER_LINES_SQL)
            .bind(order.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders_for_user(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user: UserId,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Sqlite, Order>(LIST_ORDERS_FOR_USER_SQL)
            .bind(user.into_i64())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Sqlite, Order>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Write `next` only when the stored status still equals `expected`.
    /// Returns the affected row count; zero means the optimistic check
    /// lost to a concurrent transition.
    pub(crate) async fn set_status_if(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        order: OrderId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(SET_ORDER_STATUS_IF_SQL)
            .bind(order.into_i64())
            .bind(expected.as_str())
            .bind(next.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Order {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: OrderId::from_i64(row.try_get("id")?),
            user_id: UserId::from_i64(row.try_get("user_id")?),
            total_amount: try_get_amount(row, "total_amount")?,
            status: parse_column(row, "status")?,
            lines: Vec::new(),
            created_at: parse_column(row, "created_at")?,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for OrderLine {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let quantity_i64: i64 = row.try_get("quantity")?;

        let quantity = u32::try_from(quantity_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            id: OrderLineId::from_i64(row.try_get("id")?),
            order_id: OrderId::from_i64(row.try_get("order_id")?),
            menu_item_id: MenuItemId::from_i64(row.try_get("menu_item_id")?),
            quantity,
            price: try_get_amount(row, "price")?,
        })
    }
}
