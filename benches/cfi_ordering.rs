//! CFI Ordering Benchmarks
//!
//! Tokenizing and sorting a book's worth of highlight locations.
//!
//! Run with: `cargo bench --bench cfi_ordering`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use bookbits::annotations::{AnnotationGroup, RawAnnotationRecord};
use bookbits::cfi::position_vector;

/// Range locations shaped like the ones Apple Books writes, spread over chapters
fn locations(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let spine = 6 + 2 * (i % 20);
            let element = 2 * ((i * 7919) % 400);
            format!(
                "epubcfi(/6/{}[chapter{}]!/4/{}/1,:{},:{})",
                spine,
                i % 20,
                element,
                i % 50,
                i % 50 + 40
            )
        })
        .collect()
}

fn records(count: usize) -> Vec<RawAnnotationRecord> {
    locations(count)
        .into_iter()
        .map(|location| RawAnnotationRecord {
            book_id: Some("BENCH".to_string()),
            location,
            selected_text: Some("Some highlighted passage".to_string()),
            ..Default::default()
        })
        .collect()
}

fn bench_position_vector(c: &mut Criterion) {
    let cfi = "epubcfi(/6/20[chapter3]!/4,/742/3:71,/744[ch3.6]/2/1:0)";

    c.bench_function("position_vector_range", |b| {
        b.iter(|| position_vector(black_box(cfi)))
    });
}

fn bench_group_and_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_and_sort");

    for size in [50usize, 500, 5000] {
        let batch = records(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &batch, |b, batch| {
            b.iter(|| AnnotationGroup::from_records(black_box(batch)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_position_vector, bench_group_and_sort);
criterion_main!(benches);
