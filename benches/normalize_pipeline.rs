use std::fmt::Write as _;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use csv_normalize::config::FillConfig;
use csv_normalize::io_utils::parse_table;
use csv_normalize::process::normalize_table;
use csv_normalize::report::ProcessingLog;

fn generate_orders(rows: usize) -> String {
    let mut text = String::from("Order ID,Order Date,Unit Price,Status,Notes\n");
    for i in 0..rows {
        let status = match i % 3 {
            0 => "shipped",
            1 => "pending",
            _ => "processing",
        };
        let month = (i % 12) + 1;
        let day = (i % 28) + 1;
        let price = if i % 17 == 0 {
            String::new()
        } else {
            format!("\"${},{:03}.{:02}\"", i % 9 + 1, i % 1000, i % 100)
        };
        let notes = if i % 5 == 0 { "N/A" } else { "ok" };
        let _ = writeln!(
            text,
            "{},{month:02}/{day:02}/2024,{price},{status},{notes}",
            i % (rows / 2).max(1)
        );
    }
    text
}

fn bench_normalize_pipeline(c: &mut Criterion) {
    let text = generate_orders(20_000);
    let config = FillConfig::default();

    c.bench_function("parse_table_20k", |b| {
        b.iter(|| parse_table(&text, b',').expect("parse orders"))
    });

    c.bench_function("normalize_table_20k", |b| {
        b.iter_batched(
            || parse_table(&text, b',').expect("parse orders"),
            |mut table| {
                let mut log = ProcessingLog::default();
                normalize_table(&mut table, &config, &mut log)
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_normalize_pipeline);
criterion_main!(benches);
