use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lintrain::{Estimator, LinearSvc, LogisticRegression, SplitDataset};

/// Deterministic clusters, one per class, centred on a diagonal
fn synthetic_split(n_samples: usize, dim: usize, n_classes: usize) -> SplitDataset {
    let mut rows = Vec::with_capacity(n_samples);
    let mut labels = Vec::with_capacity(n_samples);

    for i in 0..n_samples {
        let class = i % n_classes;
        let row = (0..dim)
            .map(|j| {
                let centre = if j % n_classes == class { 2.0 } else { 0.0 };
                centre + ((i * 31 + j * 17) as f64).sin()
            })
            .collect();
        rows.push(row);
        labels.push(format!("class_{class}"));
    }

    SplitDataset::from_rows(rows, labels).expect("Failed to build synthetic split")
}

fn bench_logistic_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("logistic_fit");
    for &(n, dim, k) in &[(200, 16, 2), (200, 16, 4), (1000, 64, 4)] {
        let split = synthetic_split(n, dim, k);
        let estimator = LogisticRegression::new().with_max_iterations(1000);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n}x{dim}_{k}c")),
            &split,
            |b, split| b.iter(|| estimator.fit(black_box(split))),
        );
    }
    group.finish();
}

fn bench_linear_svc_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_svc_fit");
    for &(n, dim, k) in &[(200, 16, 2), (200, 16, 4), (1000, 64, 4)] {
        let split = synthetic_split(n, dim, k);
        let estimator = LinearSvc::new().with_tolerance(1e-5).with_seed(0);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n}x{dim}_{k}c")),
            &split,
            |b, split| b.iter(|| estimator.fit(black_box(split))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_logistic_fit, bench_linear_svc_fit);
criterion_main!(benches);
