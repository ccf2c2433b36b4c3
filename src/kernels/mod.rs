//! Matrix multiplication kernels.
//!
//! Every kernel computes `result += left · right` for row-major operands and
//! shares the same contract: the caller resets `result` beforehand and
//! guarantees conformant dimensions (see [`Shape::of`]). They differ only in
//! how they walk the iteration space:
//!
//! | Kernel              | Loop order / strategy                                  |
//! |---------------------|--------------------------------------------------------|
//! | `Naive`             | row → column → inner, accumulating in memory           |
//! | `NaiveAccumulated`  | row → column → inner, accumulating in a register       |
//! | `CacheFriendly`     | row → inner → column                                   |
//! | `LoopUnrolling`     | as `Naive`, inner loop unrolled by 4 or 8              |
//! | `Tiling`            | inner dimension blocked by `tile_size`                 |
//! | `Parallel`          | `Naive` over contiguous row ranges, one per worker     |
//! | `HighPerformance`   | all dimensions blocked, tiles in parallel, vectorized  |
//!
//! The low-level functions in the submodules take raw slices plus a
//! [`Shape`]; [`Kernel::run`] is the checked entry point over [`Matrix`].

use std::{cmp::min, fmt, ops::Range};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::{
    element::Element,
    error::{config_error, thread_pool_error, Result},
    matrix::{Matrix, Shape},
    TILE_SIZE, WORKERS,
};

pub mod cache_friendly;
pub mod high_performance;
pub mod naive;
pub mod parallel;
pub mod tiling;
pub mod unroll;

/// Number of `inner` steps the unrolled kernel performs per loop body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnrollFactor {
    Four,
    Eight,
}

impl UnrollFactor {
    pub fn get(self) -> usize {
        match self {
            UnrollFactor::Four => 4,
            UnrollFactor::Eight => 8,
        }
    }
}

impl TryFrom<usize> for UnrollFactor {
    type Error = crate::error::MatmulError;

    fn try_from(factor: usize) -> Result<Self> {
        match factor {
            4 => Ok(UnrollFactor::Four),
            8 => Ok(UnrollFactor::Eight),
            other => Err(config_error(format!(
                "unroll factor must be 4 or 8, got {}",
                other
            ))),
        }
    }
}

/// Tunables shared by the kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Maximum extent of one tile, in elements, along every blocked dimension.
    pub tile_size: usize,
    pub unroll: UnrollFactor,
    /// Worker threads used by the parallel kernels.
    pub workers: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig {
            tile_size: TILE_SIZE,
            unroll: UnrollFactor::Eight,
            workers: WORKERS,
        }
    }
}

impl KernelConfig {
    /// # Errors
    ///
    /// Returns [`crate::MatmulError::InvalidConfig`] when `tile_size` or
    /// `workers` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(config_error("tile size must be at least 1"));
        }
        if self.workers == 0 {
            return Err(config_error("worker count must be at least 1"));
        }
        Ok(())
    }
}

/// A validated [`KernelConfig`] together with the worker pool it sizes.
///
/// Building the pool once per session keeps thread start-up out of the
/// timed region; each parallel call still forks onto it and joins before
/// returning.
pub struct KernelContext {
    config: KernelConfig,
    pool: ThreadPool,
}

impl KernelContext {
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the pool cannot be built.
    pub fn new(config: KernelConfig) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|index| format!("matmult-worker-{index}"))
            .build()
            .map_err(|e| thread_pool_error(e.to_string()))?;
        Ok(KernelContext { config, pool })
    }

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    #[inline]
    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }
}

impl fmt::Debug for KernelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelContext")
            .field("config", &self.config)
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

/// One multiplication strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum Kernel {
    Naive,
    NaiveAccumulated,
    CacheFriendly,
    LoopUnrolling,
    Tiling,
    Parallel,
    HighPerformance,
}

impl Kernel {
    /// Every kernel, reference first.
    pub const ALL: [Kernel; 7] = [
        Kernel::Naive,
        Kernel::NaiveAccumulated,
        Kernel::CacheFriendly,
        Kernel::LoopUnrolling,
        Kernel::Tiling,
        Kernel::Parallel,
        Kernel::HighPerformance,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Naive => "naive",
            Kernel::NaiveAccumulated => "naive_accumulated",
            Kernel::CacheFriendly => "cache_friendly",
            Kernel::LoopUnrolling => "loop_unrolling",
            Kernel::Tiling => "tiling",
            Kernel::Parallel => "parallel",
            Kernel::HighPerformance => "high_performance",
        }
    }

    /// Whether the kernel adds the terms of every output cell in the same
    /// order as [`Kernel::Naive`], so its result must match bit for bit.
    pub fn preserves_summation_order(&self) -> bool {
        matches!(
            self,
            Kernel::Naive | Kernel::NaiveAccumulated | Kernel::LoopUnrolling
        )
    }

    /// Computes `result += left · right`.
    ///
    /// Operands are validated with [`Shape::of`] before any loop runs.
    /// `result` is not reset here.
    ///
    /// # Errors
    ///
    /// Any error from [`Shape::of`].
    pub fn run<T: Element>(
        &self,
        context: &KernelContext,
        left: &Matrix<T>,
        right: &Matrix<T>,
        result: &mut Matrix<T>,
    ) -> Result<Shape> {
        let shape = Shape::of(left, right, result)?;
        self.run_slices(
            context,
            left.as_slice(),
            right.as_slice(),
            result.as_mut_slice(),
            shape,
        );
        Ok(shape)
    }

    /// Dispatches on already validated buffers.
    pub(crate) fn run_slices<T: Element>(
        &self,
        context: &KernelContext,
        left: &[T],
        right: &[T],
        result: &mut [T],
        shape: Shape,
    ) {
        let config = context.config();
        match self {
            Kernel::Naive => naive::naive(left, right, result, shape),
            Kernel::NaiveAccumulated => naive::naive_accumulated(left, right, result, shape),
            Kernel::CacheFriendly => cache_friendly::cache_friendly(left, right, result, shape),
            Kernel::LoopUnrolling => unroll::unrolled(left, right, result, shape, config.unroll),
            Kernel::Tiling => tiling::tiled(left, right, result, shape, config.tile_size),
            Kernel::Parallel => parallel::parallel(context.pool(), left, right, result, shape),
            Kernel::HighPerformance => high_performance::high_performance(
                context.pool(),
                left,
                right,
                result,
                shape,
                config.tile_size,
            ),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Splits `0..bound` into consecutive tiles of at most `tile_size` elements.
///
/// The last tile is clamped to `bound`, so any `tile_size >= 1` is valid.
#[inline]
pub fn tile_ranges(bound: usize, tile_size: usize) -> impl Iterator<Item = Range<usize>> {
    debug_assert!(tile_size > 0, "tile_size must be at least 1");
    (0..bound)
        .step_by(tile_size)
        .map(move |start| start..min(start.saturating_add(tile_size), bound))
}
