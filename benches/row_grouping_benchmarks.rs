use bookpack::layout::{baseline_tolerance, group_rows, sort_order_by_baseline_left};
use bookpack::model::Fragment;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn synthetic_page(rows: usize, cols_per_row: usize) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(rows * cols_per_row);
    for row in 0..rows {
        let top = 72.0 + row as f32 * 14.0;
        for col in 0..cols_per_row {
            let left = 72.0 + col as f32 * 60.0;
            fragments.push(Fragment::new(
                format!("word{}", col),
                1,
                left,
                top,
                50.0,
                12.0,
                0,
            ));
        }
    }
    fragments
}

fn benchmark_baseline_tolerance(c: &mut Criterion) {
    let fragments = synthetic_page(80, 10);
    c.bench_function("baseline_tolerance_800_fragments", |b| {
        b.iter(|| black_box(baseline_tolerance(black_box(&fragments))));
    });
}

fn benchmark_group_rows(c: &mut Criterion) {
    let fragments = synthetic_page(80, 10);
    let order = sort_order_by_baseline_left(&fragments);
    c.bench_function("group_rows_800_fragments", |b| {
        b.iter(|| black_box(group_rows(black_box(&fragments), black_box(&order))));
    });
}

fn benchmark_sort_order(c: &mut Criterion) {
    let fragments = synthetic_page(80, 10);
    c.bench_function("sort_order_by_baseline_left_800_fragments", |b| {
        b.iter(|| black_box(sort_order_by_baseline_left(black_box(&fragments))));
    });
}

criterion_group!(
    benches,
    benchmark_baseline_tolerance,
    benchmark_sort_order,
    benchmark_group_rows
);
criterion_main!(benches);
