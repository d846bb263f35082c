//! Order Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{menu::models::MenuItemId, users::models::UserId},
    ids::TypedId,
};

/// Order id
pub type OrderId = TypedId<Order>;

/// Order line id
pub type OrderLineId = TypedId<OrderLine>;

/// Order lifecycle: `pending → confirmed → completed`, or
/// `pending → cancelled`. `completed` and `cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// The single forward step from this status, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Completed),
            Self::Completed | Self::Cancelled => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown order status")]
pub struct ParseOrderStatusError;

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseOrderStatusError),
        }
    }
}

/// A placed order. `total_amount` is snapshotted at checkout and never
/// recomputed; `status` is the only field that changes afterwards.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_amount: u64,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    pub created_at: Timestamp,
}

/// Immutable record of one menu item within an order. `price` is the
/// cart snapshot, independent of later catalog changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub id: OrderLineId,
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub price: u64,
}

/// Outcome of an `advance_status` call. An order already at a terminal
/// status stays put and reports `NoOp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAdvance {
    Advanced(OrderStatus),
    NoOp(OrderStatus),
}
