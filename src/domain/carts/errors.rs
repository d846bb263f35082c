//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("menu item not found or unavailable")]
    ItemNotFound,

    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::ItemNotFound;
        }

        Self::Sql(error)
    }
}
