use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use scout_terminal::catalog::AttributeCatalog;
use scout_terminal::dataset::parse_csv_table;
use scout_terminal::demo::demo_table;
use scout_terminal::derive::derive_dataset;
use scout_terminal::export::export_csv;
use scout_terminal::filter::{AgeRange, AttributeRanges, IdentificationCriteria, search};
use scout_terminal::ranking::rank;
use scout_terminal::table::WorkingTable;

const PLAYERS: usize = 5_000;

fn sample_table() -> WorkingTable {
    derive_dataset(&demo_table(PLAYERS, 7)).expect("demo table derives")
}

fn bench_derive(c: &mut Criterion) {
    let raw = demo_table(PLAYERS, 7);
    c.bench_function("derive_dataset", |b| {
        b.iter(|| {
            let table = derive_dataset(black_box(&raw)).unwrap();
            black_box(table.len());
        })
    });
}

fn bench_csv_parse(c: &mut Criterion) {
    let raw = demo_table(PLAYERS, 7);
    let mut text = raw.columns.join(",");
    text.push('\n');
    for row in &raw.rows {
        let quoted: Vec<String> = row.iter().map(|c| format!("\"{c}\"")).collect();
        text.push_str(&quoted.join(","));
        text.push('\n');
    }
    c.bench_function("parse_csv_table", |b| {
        b.iter(|| {
            let table = parse_csv_table(black_box(text.as_bytes()), b',').unwrap();
            black_box(table.rows.len());
        })
    });
}

fn bench_search(c: &mut Criterion) {
    let table = sample_table();
    let catalog = AttributeCatalog::build(&table);
    let ident = IdentificationCriteria {
        age: Some(AgeRange::new(20, 28)),
        nationalities: vec!["Brazil".to_string(), "France".to_string(), "Niger".to_string()],
        ..Default::default()
    };
    let mut ranges = AttributeRanges::unrestricted(&catalog);
    ranges.set("Shooting_goals", 2.0, 30.0).unwrap();
    ranges.set("Passing_pct", 70.0, 100.0).unwrap();

    c.bench_function("search", |b| {
        b.iter(|| {
            let results = search(black_box(&table), &ident, &ranges).unwrap();
            black_box(results.len());
        })
    });
}

fn bench_rank(c: &mut Criterion) {
    let table = sample_table();
    c.bench_function("rank", |b| {
        b.iter(|| {
            let ranking = rank(black_box(&table), "Shooting_xg", 900.0, 20).unwrap();
            black_box(ranking.top.len());
        })
    });
}

fn bench_export_csv(c: &mut Criterion) {
    let table = sample_table();
    let catalog = AttributeCatalog::build(&table);
    let results = search(
        &table,
        &IdentificationCriteria::default(),
        &AttributeRanges::unrestricted(&catalog),
    )
    .unwrap();
    c.bench_function("export_csv", |b| {
        b.iter(|| {
            let bytes = export_csv(black_box(&table), &results).unwrap();
            black_box(bytes.len());
        })
    });
}

criterion_group!(
    perf,
    bench_derive,
    bench_csv_parse,
    bench_search,
    bench_rank,
    bench_export_csv
);
criterion_main!(perf);
