use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecom_core::{DomainError, DomainResult, Money, ProductId};

/// A catalog product as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub image: String,
    /// Price in smallest currency unit (e.g., cents).
    pub price: Money,
    /// Units on hand.
    pub quantity: u64,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Build the stored record for freshly created fields.
    pub fn from_fields(id: ProductId, fields: ProductFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: fields.name,
            description: fields.description,
            image: fields.image,
            price: fields.price,
            quantity: fields.quantity,
            created_at,
        }
    }

    /// Overwrite the mutable fields. `id` and `created_at` are never touched.
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.image = fields.image;
        self.price = fields.price;
        self.quantity = fields.quantity;
    }

    pub fn has_stock_for(&self, requested: u64) -> bool {
        requested <= self.quantity
    }
}

/// Validated, mutable product fields (create and full update share one shape).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: Money,
    pub quantity: u64,
}

impl ProductFields {
    /// Validate raw client input.
    ///
    /// `price` and `quantity` arrive signed so that negative input is reported as
    /// an invalid payload rather than a decoding failure.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
        price: i64,
        quantity: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_payload("name is required"));
        }
        let price = u64::try_from(price)
            .map_err(|_| DomainError::invalid_payload("price must not be negative"))?;
        let quantity = u64::try_from(quantity)
            .map_err(|_| DomainError::invalid_payload("quantity must not be negative"))?;

        Ok(Self {
            name: name.trim().to_string(),
            description: description.into(),
            image: image.into(),
            price: Money::from_minor(price),
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ProductFields {
        ProductFields::new("Lamp", "desk lamp", "lamp.png", 2500, 4).unwrap()
    }

    #[test]
    fn rejects_blank_name() {
        let err = ProductFields::new("   ", "", "", 1, 1).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPayload(_)));
    }

    #[test]
    fn rejects_negative_price_and_quantity() {
        assert!(matches!(
            ProductFields::new("x", "", "", -1, 1).unwrap_err(),
            DomainError::InvalidPayload(_)
        ));
        assert!(matches!(
            ProductFields::new("x", "", "", 1, -1).unwrap_err(),
            DomainError::InvalidPayload(_)
        ));
    }

    #[test]
    fn zero_price_and_stock_are_allowed() {
        let f = ProductFields::new("Freebie", "", "", 0, 0).unwrap();
        assert_eq!(f.price, Money::ZERO);
        assert_eq!(f.quantity, 0);
    }

    #[test]
    fn apply_keeps_identity_and_creation_time() {
        let id = ProductId::new(9).unwrap();
        let created = Utc::now();
        let mut p = Product::from_fields(id, fields(), created);

        let update = ProductFields::new("Lamp v2", "brighter", "lamp2.png", 3000, 1).unwrap();
        p.apply(update);

        assert_eq!(p.id, id);
        assert_eq!(p.created_at, created);
        assert_eq!(p.name, "Lamp v2");
        assert_eq!(p.price, Money::from_minor(3000));
        assert!(p.has_stock_for(1));
        assert!(!p.has_stock_for(2));
    }
}
