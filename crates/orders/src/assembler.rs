//! Order assembly: price a validated cart against resolved catalog records.
//!
//! Assembly is a pure function of its inputs. It fails on the first violation
//! and never yields a partial order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use ecom_catalog::Product;
use ecom_core::{DomainError, DomainResult, Money, ProductId, UserId};

use crate::cart::CartLineItem;
use crate::order::OrderLine;

/// A cart line after price/stock resolution against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLine {
    pub product_id: ProductId,
    /// Unit price snapshot taken at resolution time.
    pub unit_price: Money,
    pub quantity: u64,
}

impl ResolvedLine {
    pub fn subtotal(&self) -> Option<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Order-creation request handed to the order store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledOrder {
    pub user_id: UserId,
    pub lines: Vec<ResolvedLine>,
    pub total_price: Money,
}

impl AssembledOrder {
    /// Total units requested per product, in order of first appearance.
    pub fn demand(&self) -> Vec<(ProductId, u64)> {
        let mut out: Vec<(ProductId, u64)> = Vec::new();
        for line in &self.lines {
            match out.iter_mut().find(|(id, _)| *id == line.product_id) {
                Some((_, qty)) => *qty = qty.saturating_add(line.quantity),
                None => out.push((line.product_id, line.quantity)),
            }
        }
        out
    }

    /// Numbered order lines as they are persisted.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.lines
            .iter()
            .zip(1u32..)
            .map(|(line, line_no)| OrderLine {
                line_no,
                product_id: line.product_id,
                quantity: line.quantity,
                unit_price: line.unit_price,
            })
            .collect()
    }
}

/// Price `lines` against `products` for `user_id`.
///
/// `products` only needs to contain the records for the distinct ids the cart
/// references; any id missing from it fails with `ProductNotFound`. Stock is
/// checked against the cumulative quantity requested for a product across all
/// lines that reference it.
pub fn assemble_order(
    user_id: UserId,
    lines: &[CartLineItem],
    products: &[Product],
) -> DomainResult<AssembledOrder> {
    if lines.is_empty() {
        return Err(DomainError::invalid_payload("cart must contain at least one item"));
    }

    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();
    let mut requested: HashMap<ProductId, u64> = HashMap::with_capacity(by_id.len());

    let mut resolved = Vec::with_capacity(lines.len());
    let mut total = Money::ZERO;

    for line in lines {
        let product = by_id
            .get(&line.product_id)
            .ok_or(DomainError::ProductNotFound(line.product_id))?;

        let wanted = requested.entry(line.product_id).or_insert(0);
        *wanted = wanted
            .checked_add(line.quantity)
            .ok_or_else(|| DomainError::invalid_payload("requested quantity is too large"))?;
        if !product.has_stock_for(*wanted) {
            return Err(DomainError::InsufficientStock {
                product_id: line.product_id,
                requested: *wanted,
                available: product.quantity,
            });
        }

        let resolved_line = ResolvedLine {
            product_id: line.product_id,
            unit_price: product.price,
            quantity: line.quantity,
        };
        total = resolved_line
            .subtotal()
            .and_then(|subtotal| total.checked_add(subtotal))
            .ok_or_else(|| DomainError::invalid_payload("order total is too large"))?;
        resolved.push(resolved_line);
    }

    Ok(AssembledOrder {
        user_id,
        lines: resolved,
        total_price: total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pid(v: i64) -> ProductId {
        ProductId::new(v).unwrap()
    }

    fn user() -> UserId {
        UserId::new(1).unwrap()
    }

    fn product(id: i64, price: u64, quantity: u64) -> Product {
        Product {
            id: pid(id),
            name: format!("product-{id}"),
            description: String::new(),
            image: String::new(),
            price: Money::from_minor(price),
            quantity,
            created_at: Utc::now(),
        }
    }

    fn line(id: i64, quantity: u64) -> CartLineItem {
        CartLineItem::new(pid(id), quantity)
    }

    #[test]
    fn prices_two_line_cart() {
        let products = vec![product(5, 1000, 10), product(7, 2500, 10)];
        let order = assemble_order(user(), &[line(5, 2), line(7, 1)], &products).unwrap();

        assert_eq!(order.total_price, Money::from_minor(4500));
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].unit_price, Money::from_minor(1000));
        assert_eq!(order.user_id, user());
    }

    #[test]
    fn unknown_product_aborts() {
        let products = vec![product(5, 1000, 10)];
        let err = assemble_order(user(), &[line(5, 1), line(6, 1)], &products).unwrap_err();
        assert_eq!(err, DomainError::ProductNotFound(pid(6)));
    }

    #[test]
    fn stock_exceeded_aborts() {
        let products = vec![product(5, 1000, 3)];
        let err = assemble_order(user(), &[line(5, 4)], &products).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                product_id: pid(5),
                requested: 4,
                available: 3
            }
        );
    }

    #[test]
    fn repeated_product_lines_count_against_the_same_stock() {
        let products = vec![product(5, 100, 5)];
        let err = assemble_order(user(), &[line(5, 3), line(5, 3)], &products).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InsufficientStock { requested: 6, available: 5, .. }
        ));

        let ok = assemble_order(user(), &[line(5, 3), line(5, 2)], &products).unwrap();
        assert_eq!(ok.lines.len(), 2);
        assert_eq!(ok.demand(), vec![(pid(5), 5)]);
    }

    #[test]
    fn exact_stock_is_enough() {
        let products = vec![product(5, 100, 2)];
        assert!(assemble_order(user(), &[line(5, 2)], &products).is_ok());
    }

    #[test]
    fn overflowing_total_is_rejected() {
        let products = vec![product(5, u64::MAX, u64::MAX)];
        let err = assemble_order(user(), &[line(5, 2)], &products).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPayload(_)));
    }

    #[test]
    fn order_lines_are_numbered_from_one() {
        let products = vec![product(5, 1000, 10), product(7, 2500, 10)];
        let order = assemble_order(user(), &[line(7, 1), line(5, 2)], &products).unwrap();
        let numbered = order.order_lines();
        assert_eq!(numbered[0].line_no, 1);
        assert_eq!(numbered[0].product_id, pid(7));
        assert_eq!(numbered[1].line_no, 2);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: total equals the exact sum of price × quantity over all lines.
            #[test]
            fn total_is_exact_sum(
                cart in prop::collection::vec((1i64..30, 1u64..50, 0u64..100_000), 1..60)
            ) {
                // One price per product id: the first one generated wins.
                let mut products: Vec<Product> = Vec::new();
                for (id, _, price) in &cart {
                    if !products.iter().any(|p| p.id.get() == *id) {
                        products.push(product(*id, *price, u64::MAX / 2));
                    }
                }
                let lines: Vec<CartLineItem> = cart.iter().map(|(id, qty, _)| line(*id, *qty)).collect();

                let expected: u128 = lines
                    .iter()
                    .map(|l| {
                        let p = products.iter().find(|p| p.id == l.product_id).unwrap();
                        p.price.minor_units() as u128 * l.quantity as u128
                    })
                    .sum();

                let order = assemble_order(user(), &lines, &products).unwrap();
                prop_assert_eq!(order.total_price.minor_units() as u128, expected);
                prop_assert_eq!(order.lines.len(), lines.len());
            }

            /// Property: assembly is deterministic.
            #[test]
            fn assembly_is_deterministic(qtys in prop::collection::vec(1u64..5, 1..10)) {
                let products = vec![product(1, 250, 1_000)];
                let lines: Vec<CartLineItem> = qtys.iter().map(|q| line(1, *q)).collect();
                prop_assert_eq!(
                    assemble_order(user(), &lines, &products),
                    assemble_order(user(), &lines, &products)
                );
            }
        }
    }
}
