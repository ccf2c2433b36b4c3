//! Dense matrix multiplication kernels, from the textbook triple loop to a
//! tiled, parallel, vectorized kernel, plus the oracle and harness that keep
//! them honest.
//!
//! All kernels compute `result += left · right` over row-major buffers of
//! `f32` or `f64` and share one contract: the caller resets `result` before
//! the call. Operands are validated before anything runs.
//!
//! ```
//! use matmult::{Kernel, KernelConfig, KernelContext, Matrix};
//!
//! let context = KernelContext::new(KernelConfig::default()).unwrap();
//! let left = Matrix::from_rows(&[[1.0f64, 2.0], [3.0, 4.0]]).unwrap();
//! let right = Matrix::from_rows(&[[5.0f64, 6.0], [7.0, 8.0]]).unwrap();
//! let mut result = Matrix::zeros(2, 2);
//!
//! Kernel::HighPerformance
//!     .run(&context, &left, &right, &mut result)
//!     .unwrap();
//! assert_eq!(result.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
//! ```
//!
//! To time and cross-check every kernel at once, use [`Harness`].

pub mod element;
pub mod error;
pub mod export;
pub mod generate;
pub mod harness;
pub mod kernels;
pub mod matrix;
pub mod oracle;
pub mod reference;

pub use element::Element;
pub use error::{MatmulError, Result};
pub use harness::{Harness, HarnessConfig, KernelReport, SessionReport, TimingStats};
pub use kernels::{Kernel, KernelConfig, KernelContext, UnrollFactor};
pub use matrix::{Matrix, Shape};
pub use oracle::Verdict;

/// Default tile extent for the blocked kernels.
pub const TILE_SIZE: usize = 64;
/// Default worker count for the parallel kernels.
pub const WORKERS: usize = 8;
/// Default timed repetitions per kernel.
pub const REPETITIONS: usize = 3;
