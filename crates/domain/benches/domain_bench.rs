use common::PaymentId;
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Address, Money, Order, OrderCode, OrderDelivery, OrderItem};

fn make_delivery() -> OrderDelivery {
    OrderDelivery::new(
        "express",
        Money::from_cents(1500),
        3,
        Address {
            street: "Baker Street".to_string(),
            number: "221B".to_string(),
            complement: None,
            district: "Marylebone".to_string(),
            city: "London".to_string(),
            state: "LDN".to_string(),
            zip_code: "NW1 6XE".to_string(),
        },
    )
}

fn bench_build_and_total(c: &mut Criterion) {
    let delivery = make_delivery();

    c.bench_function("domain/build_order_and_total", |b| {
        b.iter(|| {
            let mut order = Order::new(
                OrderCode::with_year(0, 2024),
                "customer-1",
                Some("TENOFF".to_string()),
                10.0,
                Some(&delivery),
                Some(PaymentId::new()),
            )
            .unwrap();
            let order_id = order.id();
            for i in 0..20u32 {
                let item = OrderItem::new(
                    order_id,
                    format!("prod-{i}"),
                    format!("SKU-{i:03}"),
                    1 + i % 5,
                    Money::from_cents(100 + i as i64),
                )
                .unwrap();
                order.add_item(item).unwrap();
            }
            order.calculate_total_amount(&delivery);
            order.total_amount()
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let delivery = make_delivery();
    let mut order = Order::new(
        OrderCode::with_year(0, 2024),
        "customer-1",
        None,
        0.0,
        Some(&delivery),
        Some(PaymentId::new()),
    )
    .unwrap();
    let order_id = order.id();
    for i in 0..20u32 {
        let item = OrderItem::new(
            order_id,
            format!("prod-{i}"),
            format!("SKU-{i:03}"),
            1,
            Money::from_cents(100),
        )
        .unwrap();
        order.add_item(item).unwrap();
    }
    order.calculate_total_amount(&delivery);

    c.bench_function("domain/validate", |b| b.iter(|| order.validate()));
}

criterion_group!(benches, bench_build_and_total, bench_validate);
criterion_main!(benches);
