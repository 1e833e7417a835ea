use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use refblas::{level1, level2, level3, GemmConfig, Transpose};
use refblas_core::SplitMix64;

fn bench_ddot(c: &mut Criterion) {
    let mut group = c.benchmark_group("ddot");
    let mut rng = SplitMix64::new(1);
    for &n in &[64, 256, 1024, 4096, 16384] {
        let x = rng.vec(n);
        let y = rng.vec(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| level1::ddot(n, &x, 1, &y, 1));
        });
    }
    group.finish();
}

fn bench_dnrm2(c: &mut Criterion) {
    let mut group = c.benchmark_group("dnrm2");
    let mut rng = SplitMix64::new(2);
    for &n in &[64, 1024, 16384] {
        let x = rng.vec(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| level1::dnrm2(n, &x, 1));
        });
    }
    group.finish();
}

fn bench_daxpy(c: &mut Criterion) {
    let mut group = c.benchmark_group("daxpy");
    let mut rng = SplitMix64::new(3);
    for &n in &[64, 256, 1024, 4096, 16384] {
        let x = rng.vec(n);
        let mut y = rng.vec(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| level1::daxpy(n, 1e-3, &x, 1, &mut y, 1));
        });
    }
    group.finish();
}

fn bench_dgemv(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgemv");
    let mut rng = SplitMix64::new(4);
    for &n in &[64, 256, 1024] {
        let a = rng.vec(n * n);
        let x = rng.vec(n);
        let mut y = vec![0.0; n];
        for trans in [Transpose::NoTrans, Transpose::Trans] {
            let id = BenchmarkId::new(format!("{trans:?}"), n);
            group.bench_with_input(id, &n, |b, &n| {
                b.iter(|| level2::dgemv(trans, n, n, 1.0, &a, n, &x, 1, 0.0, &mut y, 1));
            });
        }
    }
    group.finish();
}

fn bench_dgemm(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgemm");
    let mut rng = SplitMix64::new(5);
    for &n in &[32, 64, 128, 256, 512] {
        let a = rng.vec(n * n);
        let b = rng.vec(n * n);
        let mut c_mat = vec![0.0; n * n];
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                level3::dgemm(
                    Transpose::NoTrans,
                    Transpose::NoTrans,
                    n,
                    n,
                    n,
                    1.0,
                    &a,
                    n,
                    &b,
                    n,
                    0.0,
                    &mut c_mat,
                    n,
                );
            });
        });
    }
    group.finish();
}

/// Serial kernel against the tiled pool at a fixed size, varying workers.
fn bench_dgemm_workers(c: &mut Criterion) {
    let mut group = c.benchmark_group("dgemm_workers");
    let n = 384;
    let mut rng = SplitMix64::new(6);
    let a = rng.vec(n * n);
    let b = rng.vec(n * n);
    let mut c_mat = vec![0.0; n * n];

    group.bench_function("serial", |bench| {
        bench.iter(|| {
            level3::dgemm_serial(
                Transpose::NoTrans,
                Transpose::NoTrans,
                n,
                n,
                n,
                &a,
                n,
                &b,
                n,
                &mut c_mat,
                n,
                1.0,
            );
        });
    });
    for workers in [1, 2, 4, 8] {
        let cfg = GemmConfig::default().with_workers(workers);
        group.bench_with_input(BenchmarkId::new("parallel", workers), &cfg, |bench, cfg| {
            bench.iter(|| {
                level3::dgemm_parallel(
                    Transpose::NoTrans,
                    Transpose::NoTrans,
                    n,
                    n,
                    n,
                    &a,
                    n,
                    &b,
                    n,
                    &mut c_mat,
                    n,
                    1.0,
                    cfg,
                );
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_ddot,
    bench_dnrm2,
    bench_daxpy,
    bench_dgemv,
    bench_dgemm,
    bench_dgemm_workers
);
criterion_main!(benches);
