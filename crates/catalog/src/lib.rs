//! Catalog domain module.
//!
//! Product records, validation of catalog mutations, and parsing of the
//! comma-separated identifier lists used by bulk lookups. Pure logic only
//! (no IO, no HTTP, no storage).

pub mod ids;
pub mod product;

pub use ids::parse_id_list;
pub use product::{Product, ProductFields};
