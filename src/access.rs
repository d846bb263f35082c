//! Role-gated operation eligibility.
//!
//! Single source of truth for which roles may perform which operations.
//! Every predicate is pure; callers translate a denial into their own
//! error variant.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{orders::models::OrderStatus, users::models::UserId};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown role")]
pub struct ParseRoleError;

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError),
        }
    }
}

/// The authenticated principal an operation runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

/// Outcome of an eligibility check: allowed, or denied with a reason
/// suitable for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(&'static str),
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Carts are a student-only concept.
#[must_use]
pub const fn can_mutate_cart(role: Role) -> Decision {
    match role {
        Role::Student => Decision::Allowed,
        Role::Admin => Decision::Denied("administrators cannot use a cart"),
    }
}

/// Only students place orders.
#[must_use]
pub const fn can_place_order(role: Role) -> Decision {
    match role {
        Role::Student => Decision::Allowed,
        Role::Admin => Decision::Denied("administrators cannot place orders"),
    }
}

/// Advancing the order status is an administrative operation.
#[must_use]
pub const fn can_advance_order(role: Role) -> Decision {
    match role {
        Role::Admin => Decision::Allowed,
        Role::Student => Decision::Denied("only administrators can update order status"),
    }
}

/// Cancellation is reserved for the owning student while the order is
/// still pending. Administrators cannot cancel through this path.
#[must_use]
pub fn can_cancel_order(role: Role, is_owner: bool, status: OrderStatus) -> Decision {
    match (role, is_owner) {
        (Role::Admin, _) => Decision::Denied("administrators cannot cancel student orders"),
        (Role::Student, false) => Decision::Denied("only the order owner may cancel it"),
        (Role::Student, true) if status != OrderStatus::Pending => {
            Decision::Denied("only pending orders can be cancelled")
        }
        (Role::Student, true) => Decision::Allowed,
    }
}

/// Students see their own orders; administrators see all of them.
#[must_use]
pub const fn can_view_order(role: Role, is_owner: bool) -> Decision {
    match (role, is_owner) {
        (Role::Admin, _) | (Role::Student, true) => Decision::Allowed,
        (Role::Student, false) => Decision::Denied("you cannot view this order"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cart_mutation_is_student_only() {
        assert!(can_mutate_cart(Role::Student).is_allowed());
        assert!(!can_mutate_cart(Role::Admin).is_allowed());
    }

    #[test]
    fn order_placement_is_student_only() {
        assert!(can_place_order(Role::Student).is_allowed());
        assert!(!can_place_order(Role::Admin).is_allowed());
    }

    #[test]
    fn status_advance_is_admin_only() {
        assert!(can_advance_order(Role::Admin).is_allowed());
        assert!(!can_advance_order(Role::Student).is_allowed());
    }

    #[test]
    fn cancel_requires_owning_student_and_pending_status() {
        assert!(can_cancel_order(Role::Student, true, OrderStatus::Pending).is_allowed());
        assert!(!can_cancel_order(Role::Student, false, OrderStatus::Pending).is_allowed());
        assert!(!can_cancel_order(Role::Admin, true, OrderStatus::Pending).is_allowed());
        assert!(!can_cancel_order(Role::Student, true, OrderStatus::Confirmed).is_allowed());
        assert!(!can_cancel_order(Role::Student, true, OrderStatus::Completed).is_allowed());
        assert!(!can_cancel_order(Role::Student, true, OrderStatus::Cancelled).is_allowed());
    }

    #[test]
    fn order_visibility() {
        assert!(can_view_order(Role::Admin, false).is_allowed());
        assert!(can_view_order(Role::Student, true).is_allowed());
        assert!(!can_view_order(Role::Student, false).is_allowed());
    }

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::Student, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>().ok(), Some(role), "{role}");
        }
        assert!("staff".parse::<Role>().is_err());
    }
}
