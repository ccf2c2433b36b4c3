//! Matrix Multiplication Kernel Comparison
//!
//! Times every kernel and the ndarray reference on square matrices.
//!
//! # Usage:
//! ```bash
//! # Run all kernel benchmarks
//! cargo bench --bench kernels
//!
//! # Run a single size
//! cargo bench --bench kernels -- kernels_256
//! ```

use std::{hint::black_box, time::Duration};

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use matmult::{
    generate::{random_matrix, session_rng},
    reference::reference_multiply,
    Kernel, KernelConfig, KernelContext, Matrix,
};

fn configure_criterion() -> Criterion {
    Criterion::default()
        .warm_up_time(Duration::from_secs(1))
        .measurement_time(Duration::from_secs(3))
        .sample_size(10)
}

fn bench_kernels_by_size(c: &mut Criterion) {
    let context = KernelContext::new(KernelConfig::default()).expect("kernel context");

    for size in [64, 128, 256] {
        let mut group = c.benchmark_group(format!("kernels_{size}"));
        group.throughput(Throughput::Elements((2 * size * size * size) as u64));

        let (mut rng, _) = session_rng(Some(42));
        let left: Matrix<f64> = random_matrix(size, size, &mut rng, -1.0..1.0).unwrap();
        let right: Matrix<f64> = random_matrix(size, size, &mut rng, -1.0..1.0).unwrap();
        let mut result = Matrix::zeros(size, size);

        for kernel in Kernel::ALL {
            group.bench_function(kernel.name(), |bench| {
                bench.iter(|| {
                    result.reset();
                    kernel
                        .run(&context, black_box(&left), black_box(&right), &mut result)
                        .unwrap();
                    black_box(&result);
                });
            });
        }

        group.bench_function("ndarray_reference", |bench| {
            bench.iter(|| {
                result.reset();
                reference_multiply(black_box(&left), black_box(&right), &mut result).unwrap();
                black_box(&result);
            });
        });

        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = configure_criterion();
    targets = bench_kernels_by_size
}
criterion_main!(benches);
