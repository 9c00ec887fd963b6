//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, lookups). Storage concerns belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing request data (cart or catalog payloads).
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// An identifier token could not be parsed.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// An identifier list resolved to nothing.
    #[error("no identifiers provided")]
    NoIdentifiersProvided,

    /// A cart references a product that does not exist.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// A cart asks for more units than are on hand.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: u64,
        available: u64,
    },

    /// A single requested resource was not found.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    pub fn invalid_identifier(token: impl Into<String>) -> Self {
        Self::InvalidIdentifier(token.into())
    }
}
