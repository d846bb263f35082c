//! Menu presentation views.
//!
//! Presentation metadata (description, icon) lives in its own table and is
//! joined onto catalog fields here; domain entities are never mutated at
//! render time.

use serde::Serialize;

use crate::domain::menu::models::{MenuItem, MenuItemId};

/// Presentation metadata for one menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItemMeta {
    pub menu_item_id: MenuItemId,
    pub description: String,
    pub icon: String,
}

/// Catalog fields plus presentation metadata, ready for rendering or
/// serialization by the surrounding layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItemView {
    pub id: MenuItemId,
    pub name: String,
    pub price: u64,
    pub category: String,
    pub is_available: bool,
    pub description: String,
    pub icon: String,
}

impl MenuItemView {
    #[must_use]
    pub fn new(item: MenuItem, meta: Option<MenuItemMeta>) -> Self {
        let (description, icon) = match meta {
            Some(meta) => (meta.description, meta.icon),
            None => (format!("{} ({})", item.name, item.category), "🍽️".to_string()),
        };

        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            category: item.category,
            is_available: item.is_available,
            description,
            icon,
        }
    }
}
