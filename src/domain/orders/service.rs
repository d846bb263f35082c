//! Orders service.
//!
//! Owns the conversion of a cart into a durable order and the order
//! status state machine. Checkout writes the order row and every line in
//! one transaction; a failure anywhere rolls the whole unit back.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    access::{self, Actor, Decision, Role},
    database::Db,
    domain::{
        carts::models::Cart,
        orders::{
            errors::OrdersServiceError,
            models::{Order, OrderId, OrderStatus, StatusAdvance},
            repository::SqliteOrdersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct SqliteOrdersService {
    db: Db,
    repository: SqliteOrdersRepository,
}

impl SqliteOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: SqliteOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for SqliteOrdersService {
    async fn checkout(
        &self,
        actor: &Actor,
        mut cart: Cart,
    ) -> Result<(Cart, Order), OrdersServiceError> {
        if let Decision::Denied(reason) = access::can_place_order(actor.role) {
            return Err(OrdersServiceError::Forbidden(reason));
        }

        if cart.is_empty() {
            return Err(OrdersServiceError::EmptyCart);
        }

        let mut tx = self.db.begin().await?;

        let mut order = self
            .repository
            .create_order(&mut tx, actor.user_id, cart.total(), Timestamp::now())
            .await?;

        for line in cart.lines() {
            let created = self
                .repository
                .create_order_line(&mut tx, order.id, line)
                .await?;

            order.lines.push(created);
        }

        tx.commit().await?;

        cart.clear();

        info!(
            order = %order.id,
            user = %order.user_id,
            total = order.total_amount,
            "order placed"
        );

        Ok((cart, order))
    }

    async fn advance_status(
        &self,
        actor: &Actor,
        order: OrderId,
    ) -> Result<StatusAdvance, OrdersServiceError> {
        if let Decision::Denied(reason) = access::can_advance_order(actor.role) {
            return Err(OrdersServiceError::Forbidden(reason));
        }

        let mut tx = self.db.begin().await?;

        let current = self.repository.get_order(&mut tx, order).await?;

        let Some(next) = current.status.next() else {
            tx.commit().await?;

            return Ok(StatusAdvance::NoOp(current.status));
        };

        let rows_affected = self
            .repository
            .set_status_if(&mut tx, order, current.status, next)
            .await?;

        tx.commit().await?;

        // Zero rows means another transition won between read and write;
        // the order was not advanced by this call.
        if rows_affected == 0 {
            return Ok(StatusAdvance::NoOp(current.status));
        }

        info!(order = %order, from = %current.status, to = %next, "order status advanced");

        Ok(StatusAdvance::Advanced(next))
    }

    async fn cancel(&self, actor: &Actor, order: OrderId) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut current = self.repository.get_order(&mut tx, order).await?;
        let is_owner = current.user_id == actor.user_id;

        match access::can_cancel_order(actor.role, is_owner, current.status) {
            Decision::Allowed => {}
            Decision::Denied(reason) => {
                // A denial for the owning student can only be about the
                // status rule; everything else is a permission failure.
                return Err(if actor.role == Role::Admin || !is_owner {
                    OrdersServiceError::Forbidden(reason)
                } else {
                    OrdersServiceError::InvalidTransition
                });
            }
        }

        let rows_affected = self
            .repository
            .set_status_if(&mut tx, order, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::InvalidTransition);
        }

        current.status = OrderStatus::Cancelled;
        current.lines = self.repository.get_order_lines(&mut tx, order).await?;

        tx.commit().await?;

        info!(order = %order, user = %actor.user_id, "order cancelled");

        Ok(current)
    }

    async fn get_order(&self, actor: &Actor, order: OrderId) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut found = self.repository.get_order(&mut tx, order).await?;

        let is_owner = found.user_id == actor.user_id;

        if let Decision::Denied(reason) = access::can_view_order(actor.role, is_owner) {
            return Err(OrdersServiceError::Forbidden(reason));
        }

        found.lines = self.repository.get_order_lines(&mut tx, order).await?;

        tx.commit().await?;

        Ok(found)
    }

    async fn list_orders(&self, actor: &Actor) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self
            .repository
            .list_orders_for_user(&mut tx, actor.user_id)
            .await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn list_all_orders(&self, actor: &Actor) -> Result<Vec<Order>, OrdersServiceError> {
        if actor.role != Role::Admin {
            return Err(OrdersServiceError::Forbidden(
                "only administrators can list all orders",
            ));
        }

        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(orders)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Convert the cart into a pending order, atomically writing the
    /// order and one line per cart line with the cart-snapshotted prices.
    /// Returns the emptied cart together with the created order.
    async fn checkout(
        &self,
        actor: &Actor,
        cart: Cart,
    ) -> Result<(Cart, Order), OrdersServiceError>;

    /// Advance the order one step (`pending → confirmed`,
    /// `confirmed → completed`). Any other current status is a `NoOp`.
    async fn advance_status(
        &self,
        actor: &Actor,
        order: OrderId,
    ) -> Result<StatusAdvance, OrdersServiceError>;

    /// Cancel a pending order on behalf of its owner.
    async fn cancel(&self, actor: &Actor, order: OrderId) -> Result<Order, OrdersServiceError>;

    /// Retrieve one order with its lines; students only see their own.
    async fn get_order(&self, actor: &Actor, order: OrderId) -> Result<Order, OrdersServiceError>;

    /// The acting user's orders, newest first (lines not populated).
    async fn list_orders(&self, actor: &Actor) -> Result<Vec<Order>, OrdersServiceError>;

    /// Every order in the ledger, newest first (lines not populated).
    async fn list_all_orders(&self, actor: &Actor) -> Result<Vec<Order>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{carts::CartsService, menu::MenuService},
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn checkout_snapshots_cart_into_order_and_clears_it() -> TestResult {
        let ctx = TestContext::new().await;

        let com = helpers::create_menu_item(&ctx, "Cơm gà xối mỡ", 35_000).await?;
        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, _) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), com.id, 2)
            .await?;
        let (cart, _) = ctx.carts.add_item(&ctx.student, cart, pho.id, 1).await?;

        let (cart, order) = ctx.orders.checkout(&ctx.student, cart).await?;

        assert!(cart.is_empty());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, 110_000);
        assert_eq!(order.user_id, ctx.student.user_id);
        assert_eq!(order.lines.len(), 2);

        let com_line = order
            .lines
            .iter()
            .find(|l| l.menu_item_id == com.id)
            .expect("order should have a line for the first item");
        assert_eq!(com_line.quantity, 2);
        assert_eq!(com_line.price, 35_000);

        let pho_line = order
            .lines
            .iter()
            .find(|l| l.menu_item_id == pho.id)
            .expect("order should have a line for the second item");
        assert_eq!(pho_line.quantity, 1);
        assert_eq!(pho_line.price, 40_000);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_total_matches_line_subtotals() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, _) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 3)
            .await?;

        let (_, order) = ctx.orders.checkout(&ctx.student, cart).await?;

        let line_total: u64 = order
            .lines
            .iter()
            .map(|l| l.price * u64::from(l.quantity))
            .sum();
        assert_eq!(order.total_amount, line_total);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_empty_cart_fails_and_creates_nothing() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.orders.checkout(&ctx.student, Cart::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );

        let orders = ctx.orders.list_orders(&ctx.student).await?;
        assert!(orders.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_as_admin_is_forbidden() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, _) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 1)
            .await?;

        let result = ctx.orders.checkout(&ctx.admin, cart).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn checkout_uses_cart_prices_not_current_catalog_prices() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, _) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 1)
            .await?;

        // The catalog price changes between add and checkout; the order
        // keeps what the student saw.
        ctx.menu
            .update_item(
                pho.id,
                crate::domain::menu::models::MenuItemUpdate {
                    name: pho.name.clone(),
                    price: 45_000,
                    category: pho.category.clone(),
                },
            )
            .await?;

        let (_, order) = ctx.orders.checkout(&ctx.student, cart).await?;

        assert_eq!(order.total_amount, 40_000);
        assert_eq!(order.lines[0].price, 40_000);

        Ok(())
    }

    #[tokio::test]
    async fn advance_status_walks_pending_confirmed_completed() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        let advance = ctx.orders.advance_status(&ctx.admin, order.id).await?;
        assert_eq!(advance, StatusAdvance::Advanced(OrderStatus::Confirmed));

        let advance = ctx.orders.advance_status(&ctx.admin, order.id).await?;
        assert_eq!(advance, StatusAdvance::Advanced(OrderStatus::Completed));

        let advance = ctx.orders.advance_status(&ctx.admin, order.id).await?;
        assert_eq!(advance, StatusAdvance::NoOp(OrderStatus::Completed));

        let fetched = ctx.orders.get_order(&ctx.admin, order.id).await?;
        assert_eq!(fetched.status, OrderStatus::Completed);

        Ok(())
    }

    #[tokio::test]
    async fn advance_status_on_cancelled_order_is_a_noop() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        ctx.orders.cancel(&ctx.student, order.id).await?;

        let advance = ctx.orders.advance_status(&ctx.admin, order.id).await?;
        assert_eq!(advance, StatusAdvance::NoOp(OrderStatus::Cancelled));

        let fetched = ctx.orders.get_order(&ctx.admin, order.id).await?;
        assert_eq!(fetched.status, OrderStatus::Cancelled);

        Ok(())
    }

    #[tokio::test]
    async fn advance_status_as_student_is_forbidden() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        let result = ctx.orders.advance_status(&ctx.student, order.id).await;

        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn advance_status_unknown_order_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .advance_status(&ctx.admin, OrderId::from_i64(404))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn owner_cancels_pending_order() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        let cancelled = ctx.orders.cancel(&ctx.student, order.id).await?;

        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.lines.len(), 1);

        let fetched = ctx.orders.get_order(&ctx.student, order.id).await?;
        assert_eq!(fetched.status, OrderStatus::Cancelled);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_confirmed_order_is_an_invalid_transition() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        ctx.orders.advance_status(&ctx.admin, order.id).await?;

        let result = ctx.orders.cancel(&ctx.student, order.id).await;
        assert!(
            matches!(result, Err(OrdersServiceError::InvalidTransition)),
            "expected InvalidTransition, got {result:?}"
        );

        let fetched = ctx.orders.get_order(&ctx.student, order.id).await?;
        assert_eq!(fetched.status, OrderStatus::Confirmed);

        Ok(())
    }

    #[tokio::test]
    async fn cancel_by_non_owner_is_forbidden() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        let other = ctx.create_student_actor("sv002").await?;

        let result = ctx.orders.cancel(&other, order.id).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cancel_by_admin_is_forbidden() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        let result = ctx.orders.cancel(&ctx.admin, order.id).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        let fetched = ctx.orders.get_order(&ctx.admin, order.id).await?;
        assert_eq!(fetched.status, OrderStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn students_cannot_read_each_others_orders() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        let order = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        let other = ctx.create_student_actor("sv003").await?;

        let result = ctx.orders.get_order(&other, order.id).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        let as_admin = ctx.orders.get_order(&ctx.admin, order.id).await?;
        assert_eq!(as_admin.id, order.id);

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_returns_own_orders_newest_first() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let first = helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;
        let second = helpers::place_order(&ctx, &ctx.student, &pho, 2).await?;

        let other = ctx.create_student_actor("sv004").await?;
        helpers::place_order(&ctx, &other, &pho, 1).await?;

        let orders = ctx.orders.list_orders(&ctx.student).await?;
        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();

        assert_eq!(ids, [second.id, first.id]);

        Ok(())
    }

    #[tokio::test]
    async fn list_all_orders_is_admin_only() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        helpers::place_order(&ctx, &ctx.student, &pho, 1).await?;

        let other = ctx.create_student_actor("sv005").await?;
        helpers::place_order(&ctx, &other, &pho, 1).await?;

        let all = ctx.orders.list_all_orders(&ctx.admin).await?;
        assert_eq!(all.len(), 2);

        let result = ctx.orders.list_all_orders(&ctx.student).await;
        assert!(
            matches!(result, Err(OrdersServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }
}
