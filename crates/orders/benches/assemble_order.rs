use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::Utc;
use ecom_catalog::Product;
use ecom_core::{Money, ProductId, UserId};
use ecom_orders::{CartLineItem, assemble_order};

fn catalog(size: i64) -> Vec<Product> {
    (1..=size)
        .map(|id| Product {
            id: ProductId::new(id).unwrap(),
            name: format!("product-{id}"),
            description: String::new(),
            image: String::new(),
            price: Money::from_minor(100 + id as u64),
            quantity: 1_000_000,
            created_at: Utc::now(),
        })
        .collect()
}

fn bench_assemble_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble_order");
    let user = UserId::new(1).unwrap();

    for lines in [10usize, 100, 1_000] {
        let products = catalog(lines as i64 / 2 + 1);
        let cart: Vec<CartLineItem> = (0..lines)
            .map(|i| {
                let id = (i as i64 % products.len() as i64) + 1;
                CartLineItem::new(ProductId::new(id).unwrap(), 1 + (i as u64 % 3))
            })
            .collect();

        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::from_parameter(lines), &cart, |b, cart| {
            b.iter(|| assemble_order(black_box(user), black_box(cart), black_box(&products)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assemble_order);
criterion_main!(benches);
