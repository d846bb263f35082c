//! Cart value model.
//!
//! The cart is an explicit value: every operation takes the current cart
//! and hands back the updated one, and the surrounding layer persists it
//! into session storage. Serialized form is the session shape
//! `{ "<item id>": {id, name, price, quantity, category} }`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::menu::models::{MenuItem, MenuItemId};

/// One selected menu item. Price and category are snapshotted from the
/// catalog when the line is first added and stay fixed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: MenuItemId,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub category: String,
}

impl CartLine {
    #[must_use]
    pub const fn subtotal(&self) -> u64 {
        self.price * self.quantity as u64
    }
}

/// Per-user selection prior to checkout; at most one line per item id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: BTreeMap<MenuItemId, CartLine>,
}

/// Quantity adjustment direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Increase,
    Decrease,
}

/// Outcome of a quantity adjustment. Decreasing a quantity-1 line removes
/// it; that is a designed outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Updated(u32),
    Removed,
    NotFound,
}

/// Outcome of removing a line. Removing an absent line reports
/// `NotFound` instead of failing the caller flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    Removed(CartLine),
    NotFound,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a line for `item`, or raise the existing line's quantity.
    /// The catalog snapshot of an existing line is left untouched.
    pub fn add_line(&mut self, item: &MenuItem, quantity: u32) -> &CartLine {
        self.lines
            .entry(item.id)
            .and_modify(|line| line.quantity += quantity)
            .or_insert_with(|| CartLine {
                id: item.id,
                name: item.name.clone(),
                price: item.price,
                quantity,
                category: item.category.clone(),
            })
    }

    pub fn adjust(&mut self, item: MenuItemId, direction: Direction) -> Adjustment {
        let Some(line) = self.lines.get_mut(&item) else {
            return Adjustment::NotFound;
        };

        match direction {
            Direction::Increase => {
                line.quantity += 1;
                Adjustment::Updated(line.quantity)
            }
            Direction::Decrease if line.quantity > 1 => {
                line.quantity -= 1;
                Adjustment::Updated(line.quantity)
            }
            Direction::Decrease => {
                self.lines.remove(&item);
                Adjustment::Removed
            }
        }
    }

    pub fn remove(&mut self, item: MenuItemId) -> Removal {
        match self.lines.remove(&item) {
            Some(line) => Removal::Removed(line),
            None => Removal::NotFound,
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Σ(line price × quantity).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.lines.values().map(CartLine::subtotal).sum()
    }

    /// Total number of selected units across all lines.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    #[must_use]
    pub fn line(&self, item: MenuItemId) -> Option<&CartLine> {
        self.lines.get(&item)
    }
}
