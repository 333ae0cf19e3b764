//! Throughput of identity number validation over a mixed batch of valid and
//! invalid inputs.

#![allow(missing_docs)]

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use said::{DoublingParity, Validator, domain::checksum};

/// Generates a batch where every third number has a wrong check digit.
fn batch() -> Vec<String> {
    (0..1_000u32)
        .map(|i| {
            let prefix = format!(
                "{:02}{:02}{:02}{:04}08",
                i % 100,
                i % 12 + 1,
                i % 28 + 1,
                i * 7 % 10_000
            );
            let number = checksum::complete(&prefix, DoublingParity::Even).unwrap();
            if i % 3 == 0 {
                format!("{}{}", &number[..12], (u32::from(number.as_bytes()[12] - b'0') + 1) % 10)
            } else {
                number
            }
        })
        .collect()
}

fn validate(c: &mut Criterion) {
    let validator =
        Validator::default().with_reference_date(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
    let inputs = batch();

    c.bench_function("validate batch", |b| {
        b.iter(|| {
            inputs
                .iter()
                .filter(|input| validator.is_valid(std::hint::black_box(input)))
                .count()
        });
    });

    c.bench_function("date of birth", |b| {
        b.iter(|| validator.date_of_birth(std::hint::black_box("8909185800088")));
    });
}

criterion_group!(benches, validate);
criterion_main!(benches);
