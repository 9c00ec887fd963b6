use serde::Deserialize;

use ecom_catalog::{Product, ProductFields};
use ecom_core::DomainResult;
use ecom_orders::Order;

// -------------------------
// Request DTOs
// -------------------------

/// Body of product create/update requests.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    /// Only meaningful on update, where it must match the path id if present.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub price: i64,
    pub quantity: i64,
}

impl ProductRequest {
    pub fn into_fields(self) -> DomainResult<ProductFields> {
        ProductFields::new(self.name, self.description, self.image, self.price, self.quantity)
    }
}

// -------------------------
// Response mapping
// -------------------------

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id.get(),
        "name": p.name,
        "description": p.description,
        "image": p.image,
        "price": p.price.minor_units(),
        "quantity": p.quantity,
        "created_at": p.created_at.to_rfc3339(),
    })
}

pub fn order_to_json(o: &Order) -> serde_json::Value {
    serde_json::json!({
        "id": o.id.get(),
        "user_id": o.user_id.get(),
        "total_price": o.total_price.minor_units(),
        "created_at": o.created_at.to_rfc3339(),
        "items": o.lines.iter().map(|l| serde_json::json!({
            "line_no": l.line_no,
            "product_id": l.product_id.get(),
            "quantity": l.quantity,
            "unit_price": l.unit_price.minor_units(),
        })).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_product_fields_default_to_empty() {
        let req: ProductRequest =
            serde_json::from_str(r#"{"name":"Mug","price":1200,"quantity":4}"#).unwrap();
        assert_eq!(req.id, None);
        let fields = req.into_fields().unwrap();
        assert_eq!(fields.description, "");
        assert_eq!(fields.quantity, 4);
    }

    #[test]
    fn negative_price_is_a_validation_error_not_a_decode_error() {
        let req: ProductRequest =
            serde_json::from_str(r#"{"name":"Mug","price":-1,"quantity":4}"#).unwrap();
        assert!(req.into_fields().is_err());
    }
}
