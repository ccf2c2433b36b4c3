//! Benchmark runner: generates two random matrices, times every kernel over
//! them, cross-checks the outputs and optionally exports the product.

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use matmult::{
    export, generate, Element, Harness, HarnessConfig, Kernel, KernelConfig, KernelContext,
    Matrix, Result, UnrollFactor, REPETITIONS, TILE_SIZE, WORKERS,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ElementType {
    F32,
    F64,
}

#[derive(Debug, Parser)]
#[command(name = "matmult", version, about = "Time and cross-check matrix multiplication kernels")]
struct Args {
    /// Rows of the left matrix.
    #[arg(long, default_value_t = 512)]
    rows: usize,

    /// Columns of the left matrix (= rows of the right matrix).
    #[arg(long, default_value_t = 512)]
    inners: usize,

    /// Columns of the right matrix.
    #[arg(long, default_value_t = 512)]
    columns: usize,

    #[arg(long, value_enum, default_value_t = ElementType::F64)]
    element: ElementType,

    #[arg(long, default_value_t = TILE_SIZE)]
    tile_size: usize,

    /// 4 or 8.
    #[arg(long, default_value_t = 8)]
    unroll_factor: usize,

    #[arg(long, default_value_t = WORKERS)]
    workers: usize,

    #[arg(long, default_value_t = REPETITIONS)]
    repetitions: usize,

    /// Kernels to run (naive always runs first as the baseline).
    #[arg(long = "kernel", value_enum)]
    kernels: Vec<Kernel>,

    /// RNG seed; defaults to the current time in milliseconds.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the ndarray reference multiply.
    #[arg(long)]
    no_reference: bool,

    /// Skip output verification.
    #[arg(long)]
    no_verify: bool,

    /// Write the final product as CSV; without a path, `result_<timestamp>.csv`.
    #[arg(long, num_args = 0..=1)]
    export: Option<Option<PathBuf>>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let outcome = match args.element {
        ElementType::F32 => run::<f32>(&args),
        ElementType::F64 => run::<f64>(&args),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            error!("at least one kernel disagreed with the naive kernel");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run<T: Element>(args: &Args) -> Result<bool> {
    let context = KernelContext::new(KernelConfig {
        tile_size: args.tile_size,
        unroll: UnrollFactor::try_from(args.unroll_factor)?,
        workers: args.workers,
    })?;
    let harness = Harness::new(
        HarnessConfig {
            repetitions: args.repetitions,
            verify: !args.no_verify,
            reference: !args.no_reference,
        },
        &context,
    )?;

    let (mut rng, seed) = generate::session_rng(args.seed);
    info!(seed, "generating inputs");
    let left: Matrix<T> =
        generate::random_matrix(args.rows, args.inners, &mut rng, generate::DEFAULT_RANGE)?;
    let right: Matrix<T> =
        generate::random_matrix(args.inners, args.columns, &mut rng, generate::DEFAULT_RANGE)?;
    let mut result = Matrix::zeros(args.rows, args.columns);

    let all_kernels = Kernel::ALL;
    let kernels: &[Kernel] = if args.kernels.is_empty() {
        &all_kernels
    } else {
        args.kernels.as_slice()
    };
    let report = harness.run_session(kernels, &left, &right, &mut result)?;
    println!("{report}");

    if let Some(path) = &args.export {
        let path = path.clone().unwrap_or_else(export::session_file_name);
        export::export_csv(&result, &path)?;
        info!(path = %path.display(), "result exported");
    }

    Ok(report.all_verified())
}
