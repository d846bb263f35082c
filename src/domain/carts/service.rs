//! Carts service.
//!
//! Resolves catalog lookups and access checks around the pure cart value.
//! Every operation returns the updated cart for the caller to re-persist
//! into its session store.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    access::{self, Actor, Decision},
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Adjustment, Cart, CartLine, Direction, Removal},
        },
        menu::{models::MenuItemId, repository::SqliteMenuRepository},
    },
};

#[derive(Debug, Clone)]
pub struct SqliteCartsService {
    db: Db,
    menu_repository: SqliteMenuRepository,
}

impl SqliteCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            menu_repository: SqliteMenuRepository::new(),
        }
    }
}

fn check_cart_access(actor: &Actor) -> Result<(), CartsServiceError> {
    match access::can_mutate_cart(actor.role) {
        Decision::Allowed => Ok(()),
        Decision::Denied(reason) => Err(CartsServiceError::Forbidden(reason)),
    }
}

#[async_trait]
impl CartsService for SqliteCartsService {
    async fn add_item(
        &self,
        actor: &Actor,
        mut cart: Cart,
        item: MenuItemId,
        quantity: u32,
    ) -> Result<(Cart, CartLine), CartsServiceError> {
        check_cart_access(actor)?;

        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let mut tx = self.db.begin().await?;

        let menu_item = self.menu_repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        if !menu_item.is_available {
            return Err(CartsServiceError::ItemNotFound);
        }

        let line = cart.add_line(&menu_item, quantity).clone();

        Ok((cart, line))
    }

    async fn adjust_quantity(
        &self,
        actor: &Actor,
        mut cart: Cart,
        item: MenuItemId,
        direction: Direction,
    ) -> Result<(Cart, Adjustment), CartsServiceError> {
        check_cart_access(actor)?;

        match cart.adjust(item, direction) {
            Adjustment::NotFound => Err(CartsServiceError::ItemNotFound),
            adjustment => Ok((cart, adjustment)),
        }
    }

    async fn remove_item(
        &self,
        actor: &Actor,
        mut cart: Cart,
        item: MenuItemId,
    ) -> Result<(Cart, Removal), CartsServiceError> {
        check_cart_access(actor)?;

        let removal = cart.remove(item);

        Ok((cart, removal))
    }

    async fn clear(&self, actor: &Actor, mut cart: Cart) -> Result<Cart, CartsServiceError> {
        check_cart_access(actor)?;

        cart.clear();

        Ok(cart)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add `quantity` of a catalog item to the cart, snapshotting price and
    /// category on first add. Unknown and unavailable items are rejected
    /// alike.
    async fn add_item(
        &self,
        actor: &Actor,
        cart: Cart,
        item: MenuItemId,
        quantity: u32,
    ) -> Result<(Cart, CartLine), CartsServiceError>;

    /// Raise or lower a line's quantity by one; lowering past one removes
    /// the line.
    async fn adjust_quantity(
        &self,
        actor: &Actor,
        cart: Cart,
        item: MenuItemId,
        direction: Direction,
    ) -> Result<(Cart, Adjustment), CartsServiceError>;

    /// Remove a line; reports `Removal::NotFound` for an absent line.
    async fn remove_item(
        &self,
        actor: &Actor,
        cart: Cart,
        item: MenuItemId,
    ) -> Result<(Cart, Removal), CartsServiceError>;

    /// Empty the cart unconditionally.
    async fn clear(&self, actor: &Actor, cart: Cart) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::menu::MenuService,
        test::{TestContext, helpers},
    };

    use super::*;

    #[tokio::test]
    async fn add_item_snapshots_price_and_category() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, line) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 2)
            .await?;

        assert_eq!(line.id, pho.id);
        assert_eq!(line.name, "Phở bò");
        assert_eq!(line.price, 40_000);
        assert_eq!(line.quantity, 2);
        assert_eq!(line.category, "Món chính");
        assert_eq!(cart.total(), 80_000);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_twice_increments_the_same_line() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, _) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 1)
            .await?;
        let (cart, line) = ctx.carts.add_item(&ctx.student, cart, pho.id, 2).await?;

        assert_eq!(cart.len(), 1);
        assert_eq!(line.quantity, 3);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_unknown_id_returns_item_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), MenuItemId::from_i64(99), 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn add_item_unavailable_item_returns_item_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;
        ctx.menu.set_availability(pho.id, false).await?;

        let result = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 1)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_zero_quantity_returns_invalid_quantity() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let result = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 0)
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidQuantity)),
            "expected InvalidQuantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn admin_cannot_mutate_a_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let result = ctx.carts.add_item(&ctx.admin, Cart::new(), pho.id, 1).await;
        assert!(
            matches!(result, Err(CartsServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        let result = ctx
            .carts
            .adjust_quantity(&ctx.admin, Cart::new(), pho.id, Direction::Increase)
            .await;
        assert!(
            matches!(result, Err(CartsServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        let result = ctx.carts.remove_item(&ctx.admin, Cart::new(), pho.id).await;
        assert!(
            matches!(result, Err(CartsServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        let result = ctx.carts.clear(&ctx.admin, Cart::new()).await;
        assert!(
            matches!(result, Err(CartsServiceError::Forbidden(_))),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn adjust_quantity_walks_up_and_down() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, _) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 1)
            .await?;

        let (cart, adjustment) = ctx
            .carts
            .adjust_quantity(&ctx.student, cart, pho.id, Direction::Increase)
            .await?;
        assert_eq!(adjustment, Adjustment::Updated(2));

        let (cart, adjustment) = ctx
            .carts
            .adjust_quantity(&ctx.student, cart, pho.id, Direction::Decrease)
            .await?;
        assert_eq!(adjustment, Adjustment::Updated(1));

        let (cart, adjustment) = ctx
            .carts
            .adjust_quantity(&ctx.student, cart, pho.id, Direction::Decrease)
            .await?;
        assert_eq!(adjustment, Adjustment::Removed);
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn adjust_quantity_absent_line_returns_item_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .carts
            .adjust_quantity(
                &ctx.student,
                Cart::new(),
                MenuItemId::from_i64(3),
                Direction::Increase,
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn remove_item_reports_not_found_without_erroring() -> TestResult {
        let ctx = TestContext::new().await;

        let (cart, removal) = ctx
            .carts
            .remove_item(&ctx.student, Cart::new(), MenuItemId::from_i64(3))
            .await?;

        assert_eq!(removal, Removal::NotFound);
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn clear_empties_a_populated_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let pho = helpers::create_menu_item(&ctx, "Phở bò", 40_000).await?;

        let (cart, _) = ctx
            .carts
            .add_item(&ctx.student, Cart::new(), pho.id, 2)
            .await?;
        let cart = ctx.carts.clear(&ctx.student, cart).await?;

        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0);

        Ok(())
    }
}
