use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecom_core::{Money, OrderId, ProductId, UserId};

/// Persisted order line: product, quantity, unit price at time of order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// 1-based position of the line within its order.
    pub line_no: u32,
    pub product_id: ProductId,
    pub quantity: u64,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: Money,
}

/// A persisted order. Created once per successful checkout and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}
