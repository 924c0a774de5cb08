//! Scan and encode benchmarks.
//!
//! Run with: `cargo bench --bench scan`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use dblp_delta::{CatalogBuilder, InMemoryCatalog, ModDate, ModificationScanner, ScanConfig, SnapshotWriter};

/// Catalog with `authors` persons of 8 publications each, mdates spread over ten years.
fn make_catalog(authors: usize) -> InMemoryCatalog {
    let mut builder = CatalogBuilder::new();
    for a in 0..authors {
        let mut ids = Vec::with_capacity(8);
        let mut latest = String::new();
        for p in 0..8 {
            let year = 2014 + (a + p) % 10;
            let mdate = format!("{year}-{:02}-{:02}", p % 12 + 1, a % 28 + 1);
            let xml = format!("<article key=\"journals/bench/{a}-{p}\"><title>Record {a}/{p}</title></article>");
            ids.push(builder.add_publication(format!("journals/bench/{a}-{p}"), mdate.clone(), xml).unwrap());
            if mdate > latest {
                latest = mdate;
            }
        }
        builder.add_author(format!("{a}/bench"), latest, ids).unwrap();
    }
    builder.build()
}

fn bench_scan(c: &mut Criterion) {
    let cutoff = ModDate::parse("2021-01-01").unwrap();
    let mut group = c.benchmark_group("scan");

    for authors in [1_000usize, 20_000] {
        let catalog = make_catalog(authors);
        group.throughput(Throughput::Elements(authors as u64));

        group.bench_with_input(BenchmarkId::new("sequential", authors), &catalog, |b, catalog| {
            let scanner = ModificationScanner::default();
            b.iter(|| black_box(scanner.scan(catalog, cutoff).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("parallel", authors), &catalog, |b, catalog| {
            let scanner = ModificationScanner::new(ScanConfig { parallel: true, parallel_threshold: 0 });
            b.iter(|| black_box(scanner.scan(catalog, cutoff).unwrap()));
        });
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let catalog = make_catalog(20_000);
    let result = ModificationScanner::default()
        .scan(&catalog, ModDate::parse("2021-01-01").unwrap())
        .unwrap();
    let writer = SnapshotWriter::default();

    c.bench_function("encode/20000", |b| {
        b.iter(|| black_box(writer.encode(&result).unwrap()));
    });
}

criterion_group!(benches, bench_scan, bench_encode);
criterion_main!(benches);
