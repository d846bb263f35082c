//! Test Helpers

use crate::{
    access::Actor,
    domain::{
        carts::{CartsService, CartsServiceError, models::Cart},
        menu::{
            MenuService, MenuServiceError,
            models::{MenuItem, NewMenuItem},
        },
        orders::{OrdersService, OrdersServiceError, models::Order},
    },
    test::TestContext,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum HelperError {
    #[error(transparent)]
    Menu(#[from] MenuServiceError),

    #[error(transparent)]
    Carts(#[from] CartsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),
}

pub(crate) async fn create_menu_item(
    ctx: &TestContext,
    name: &str,
    price: u64,
) -> Result<MenuItem, MenuServiceError> {
    ctx.menu
        .create_item(NewMenuItem {
            name: name.to_string(),
            price,
            category: "Món chính".to_string(),
        })
        .await
}

/// Add `quantity` of `item` to a fresh cart and check it out as `actor`.
pub(crate) async fn place_order(
    ctx: &TestContext,
    actor: &Actor,
    item: &MenuItem,
    quantity: u32,
) -> Result<Order, HelperError> {
    let (cart, _) = ctx
        .carts
        .add_item(actor, Cart::new(), item.id, quantity)
        .await?;

    let (_, order) = ctx.orders.checkout(actor, cart).await?;

    Ok(order)
}
