use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use ecom_core::{DomainError, DomainResult, ProductId};

/// Raw cart line as submitted by the client.
///
/// Fields are signed so that zero/negative input is reported as an invalid
/// payload rather than a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItemPayload {
    pub product_id: i64,
    pub quantity: i64,
}

/// Checkout request body: `{ "items": [ { "product_id": .., "quantity": .. } ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutPayload {
    #[serde(default)]
    pub items: Vec<CartItemPayload>,
}

/// A validated cart line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub quantity: u64,
}

impl CartLineItem {
    pub fn new(product_id: ProductId, quantity: u64) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

impl CheckoutPayload {
    /// Validate the payload into cart lines, keeping input order and duplicates.
    pub fn validate(&self) -> DomainResult<Vec<CartLineItem>> {
        if self.items.is_empty() {
            return Err(DomainError::invalid_payload("cart must contain at least one item"));
        }

        self.items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let product_id = ProductId::new(item.product_id).map_err(|_| {
                    DomainError::invalid_payload(format!(
                        "items[{idx}].product_id must be a positive integer"
                    ))
                })?;
                let quantity = u64::try_from(item.quantity)
                    .ok()
                    .filter(|q| *q > 0)
                    .ok_or_else(|| {
                        DomainError::invalid_payload(format!(
                            "items[{idx}].quantity must be a positive integer"
                        ))
                    })?;
                Ok(CartLineItem::new(product_id, quantity))
            })
            .collect()
    }
}

/// Distinct product ids referenced by the cart, in order of first appearance.
pub fn distinct_product_ids(lines: &[CartLineItem]) -> Vec<ProductId> {
    let mut seen = HashSet::with_capacity(lines.len());
    lines
        .iter()
        .map(|l| l.product_id)
        .filter(|id| seen.insert(*id))
        .collect()
}
