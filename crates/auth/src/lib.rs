//! `ecom-auth` — authentication boundary.
//!
//! Resolves the authenticated user's identifier from a bearer token. This crate
//! is intentionally decoupled from HTTP and storage.

pub mod claims;
pub mod validator;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use validator::{AuthError, Hs256JwtValidator, JwtValidator};
