//! Menu Models

use serde::Serialize;

use crate::ids::TypedId;

/// Menu item id
pub type MenuItemId = TypedId<MenuItem>;

/// Orderable item in the catalog. Referenced, never mutated, by carts and
/// orders; historical order lines keep their own price snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: u64,
    pub category: String,
    pub is_available: bool,
}

/// New Menu Item Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMenuItem {
    pub name: String,
    pub price: u64,
    pub category: String,
}

/// Menu Item Update Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemUpdate {
    pub name: String,
    pub price: u64,
    pub category: String,
}
