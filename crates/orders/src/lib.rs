//! Orders domain module.
//!
//! Cart validation, order assembly (pricing + stock checks) and the order
//! record shapes, implemented purely as deterministic domain logic (no IO, no
//! HTTP, no storage).

pub mod assembler;
pub mod cart;
pub mod order;

pub use assembler::{AssembledOrder, ResolvedLine, assemble_order};
pub use cart::{CartItemPayload, CartLineItem, CheckoutPayload, distinct_product_ids};
pub use order::{Order, OrderLine};
