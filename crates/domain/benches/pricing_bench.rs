use criterion::{Criterion, criterion_group, criterion_main};
use domain::money::{line_totals, order_totals};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn bench_line_totals(c: &mut Criterion) {
    c.bench_function("pricing/line_totals", |b| {
        b.iter(|| line_totals(dec!(350.00), 10, dec!(5.0), dec!(19.0)).unwrap());
    });
}

fn bench_order_totals(c: &mut Criterion) {
    let lines: Vec<_> = (1..=50)
        .map(|i| line_totals(dec!(12.34), i, dec!(2.5), dec!(19.0)).unwrap())
        .collect();

    c.bench_function("pricing/order_totals_50_lines", |b| {
        b.iter(|| order_totals(lines.iter()));
    });
}

fn bench_worst_case_precision(c: &mut Criterion) {
    c.bench_function("pricing/line_totals_high_precision", |b| {
        b.iter(|| line_totals(dec!(0.0001), 999_999, dec!(33.33), dec!(19.0)).unwrap());
    });
}

fn bench_zero_percentages(c: &mut Criterion) {
    c.bench_function("pricing/line_totals_no_discount_no_tax", |b| {
        b.iter(|| line_totals(dec!(100.00), 7, Decimal::ZERO, Decimal::ZERO).unwrap());
    });
}

criterion_group!(
    benches,
    bench_line_totals,
    bench_order_totals,
    bench_worst_case_precision,
    bench_zero_percentages
);
criterion_main!(benches);
