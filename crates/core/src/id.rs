//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are positive integers assigned by storage. Zero and negative
//! values never name a record, so they are rejected at construction.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a catalog product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ProductId(i64);

/// Identifier of a persisted order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct OrderId(i64);

/// Identifier of an authenticated user (actor identity).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i64);

macro_rules! impl_int_newtype {
    ($t:ty) => {
        impl $t {
            /// Wrap a raw identifier, rejecting non-positive values.
            pub fn new(value: i64) -> Result<Self, DomainError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(DomainError::invalid_identifier(value.to_string()))
                }
            }

            pub fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl TryFrom<i64> for $t {
            type Error = DomainError;

            fn try_from(value: i64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = i64::from_str(s).map_err(|_| DomainError::invalid_identifier(s))?;
                Self::new(raw).map_err(|_| DomainError::invalid_identifier(s))
            }
        }
    };
}

impl_int_newtype!(ProductId);
impl_int_newtype!(OrderId);
impl_int_newtype!(UserId);
