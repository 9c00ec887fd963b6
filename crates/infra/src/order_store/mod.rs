//! Order storage boundary.
//!
//! An order write is one atomic unit: header, every line item, and the stock
//! decrement for every product it consumes. Either all of it becomes visible
//! or none of it does.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use r#trait::OrderStore;
