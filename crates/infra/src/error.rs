//! Store and service error types.

use thiserror::Error;

use ecom_core::{DomainError, ProductId};

/// Failure reported by a store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The conditional stock decrement at write time could not be satisfied.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u64,
    },

    /// A product referenced by an order write no longer exists.
    #[error("product {0} disappeared before the order was written")]
    ProductMissing(ProductId),

    /// Underlying I/O or engine failure.
    #[error("storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },
}

impl StoreError {
    pub fn storage(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            message: message.into(),
        }
    }
}

/// Error returned by the catalog and checkout services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Deterministic, caller-visible failure.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Store failure; surfaced as-is and never retried.
    #[error("storage failure: {0}")]
    Storage(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::InsufficientStock {
                product_id,
                requested,
                available,
            } => ServiceError::Domain(DomainError::InsufficientStock {
                product_id,
                requested,
                available,
            }),
            StoreError::ProductMissing(id) => ServiceError::Domain(DomainError::ProductNotFound(id)),
            other => ServiceError::Storage(other),
        }
    }
}
