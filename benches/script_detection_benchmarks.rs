use bookpack::layout::{detect_scripts, ScriptDetectorConfig};
use bookpack::model::Fragment;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A line of normal-size words interspersed with small, tight-adjacency
/// fragments that qualify as superscript/subscript candidates (footnote
/// markers, exponents), the worst case for the eligibility scan.
fn synthetic_line_with_scripts(words: usize) -> Vec<Fragment> {
    let mut fragments = Vec::with_capacity(words * 2);
    let mut left = 72.0;
    for i in 0..words {
        fragments.push(Fragment::new(format!("word{}", i), 1, left, 100.0, 40.0, 12.0, 0));
        left += 42.0;
        if i % 3 == 0 {
            fragments.push(Fragment::new((i % 10).to_string(), 1, left, 97.0, 6.0, 8.0, 0));
            left += 8.0;
        }
    }
    fragments
}

fn benchmark_detect_scripts(c: &mut Criterion) {
    let cfg = ScriptDetectorConfig::default();
    c.bench_function("detect_scripts_200_words", |b| {
        b.iter_batched(
            || synthetic_line_with_scripts(200),
            |mut fragments| {
                detect_scripts(black_box(&mut fragments), black_box(&cfg));
                fragments
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, benchmark_detect_scripts);
criterion_main!(benches);
