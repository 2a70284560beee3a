use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use data_forensics::selection::{Scope, SelectionKey};
use data_forensics::statistics::NGramOptions;
use data_forensics::table::Table;
use data_forensics::types::RawValue;

fn amounts(rows: usize) -> Vec<RawValue> {
    // Deterministic pseudo-ledger amounts between 1.00 and 997.99.
    (0..rows)
        .map(|i| {
            let cents = (i * 7919) % 99_700 + 100;
            RawValue::from(cents as f64 / 100.0)
        })
        .collect()
}

fn ledger(rows: usize) -> Table {
    Table::with_row_index(vec![("amount", amounts(rows))])
}

fn bench_full_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_scan");
    for rows in [10_000usize, 100_000] {
        let mut table = ledger(rows);
        table.ignore(&Scope::Global, SelectionKey::leading_digit('9')).unwrap();
        table.ignore(&Scope::local("amount"), SelectionKey::ngram(".5")).unwrap();

        group.bench_with_input(BenchmarkId::new("duplicate_counts", rows), &table, |b, t| {
            b.iter(|| black_box(t.numeric("amount").unwrap().duplicate_counts()))
        });
        group.bench_with_input(BenchmarkId::new("leading_digits", rows), &table, |b, t| {
            b.iter(|| black_box(t.numeric("amount").unwrap().leading_digits()))
        });
        group.bench_with_input(BenchmarkId::new("ngrams_lsd", rows), &table, |b, t| {
            let opts = NGramOptions { n: 2, lsd: true };
            b.iter(|| black_box(t.numeric("amount").unwrap().ngram_frequencies(opts)))
        });
    }
    group.finish();
}

fn bench_recompute_after_toggle(c: &mut Criterion) {
    let mut table = ledger(50_000);
    c.bench_function("toggle_then_recompute_50k", |b| {
        b.iter(|| {
            table.ignore(&Scope::Global, SelectionKey::leading_digit('1')).unwrap();
            let counts = table.numeric("amount").unwrap().duplicate_counts();
            table.unignore(&Scope::Global, SelectionKey::leading_digit('1')).unwrap();
            black_box(counts)
        })
    });
}

criterion_group!(benches, bench_full_scan, bench_recompute_after_toggle);
criterion_main!(benches);
