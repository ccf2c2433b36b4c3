//! Benchmark harness.
//!
//! Every kernel is timed as an independent unit of work over the same input
//! pair. The result buffer is reset before every timed invocation: kernels
//! accumulate with `+=`, so a stale buffer silently corrupts the next run.
//! Exactly one kernel call is in flight at any time.

use std::{
    fmt,
    time::{Duration, Instant},
};

use statrs::statistics::Statistics;
use tracing::{debug, info, info_span, warn};

use crate::{
    element::Element,
    error::{config_error, Result},
    kernels::{Kernel, KernelContext},
    matrix::{Matrix, Shape},
    oracle::{self, Verdict},
    reference::{reference_multiply, REFERENCE_NAME},
    REPETITIONS,
};

/// Harness settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Timed invocations per kernel; the buffer is reset before each one.
    pub repetitions: usize,
    /// Check every output against the naive kernel's output.
    pub verify: bool,
    /// Also time and check the ndarray reference multiply.
    pub reference: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            repetitions: REPETITIONS,
            verify: true,
            reference: true,
        }
    }
}

/// Timing summary of one unit of work, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    pub mean_ms: f64,
    /// Sample standard deviation; zero for a single repetition.
    pub std_dev_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub total_ms: f64,
}

impl TimingStats {
    /// # Panics
    ///
    /// Panics if `samples` is empty.
    pub fn from_samples(samples: &[Duration]) -> Self {
        assert!(!samples.is_empty(), "at least one sample is required");
        let ms: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1e3).collect();

        TimingStats {
            mean_ms: ms.iter().mean(),
            std_dev_ms: if ms.len() > 1 { ms.iter().std_dev() } else { 0.0 },
            min_ms: Statistics::min(ms.iter()),
            max_ms: Statistics::max(ms.iter()),
            total_ms: ms.iter().sum(),
        }
    }
}

/// Outcome of timing one kernel.
#[derive(Debug, Clone)]
pub struct KernelReport {
    pub name: &'static str,
    pub samples: Vec<Duration>,
    pub stats: TimingStats,
    /// Throughput at the mean time.
    pub gflops: f64,
    /// `None` when verification is disabled.
    pub verdict: Option<Verdict>,
}

/// Outcome of a whole session, in execution order (naive first).
#[derive(Debug, Clone)]
pub struct SessionReport {
    pub element: &'static str,
    pub shape: Shape,
    pub reports: Vec<KernelReport>,
}

impl SessionReport {
    /// `true` unless some verified output mismatched the reference.
    pub fn all_verified(&self) -> bool {
        self.reports
            .iter()
            .all(|report| report.verdict.map_or(true, |verdict| verdict.is_ok()))
    }

    pub fn get(&self, name: &str) -> Option<&KernelReport> {
        self.reports.iter().find(|report| report.name == name)
    }
}

/// Runs kernels against caller-owned buffers and collects timings.
pub struct Harness<'c> {
    config: HarnessConfig,
    context: &'c KernelContext,
}

impl<'c> Harness<'c> {
    /// # Errors
    ///
    /// [`crate::MatmulError::InvalidConfig`] if `repetitions` is zero.
    pub fn new(config: HarnessConfig, context: &'c KernelContext) -> Result<Self> {
        if config.repetitions == 0 {
            return Err(config_error("repetitions must be at least 1"));
        }
        Ok(Harness { config, context })
    }

    /// Times `kernel` over `left · right`, resetting `result` before each
    /// repetition. On return `result` holds one product.
    ///
    /// The report carries no verdict; [`Harness::run_session`] fills it in.
    ///
    /// # Errors
    ///
    /// Any error from [`Shape::of`]; nothing runs in that case.
    pub fn run_kernel<T: Element>(
        &self,
        kernel: Kernel,
        left: &Matrix<T>,
        right: &Matrix<T>,
        result: &mut Matrix<T>,
    ) -> Result<KernelReport> {
        let shape = Shape::of(left, right, result)?;
        self.time(kernel.name(), shape, result, |result| {
            kernel.run_slices(
                self.context,
                left.as_slice(),
                right.as_slice(),
                result.as_mut_slice(),
                shape,
            );
            Ok(())
        })
    }

    /// Times the ndarray reference multiply under the same reset-and-time
    /// contract as the kernels.
    ///
    /// # Errors
    ///
    /// Any error from [`reference_multiply`].
    pub fn run_reference<T: Element>(
        &self,
        left: &Matrix<T>,
        right: &Matrix<T>,
        result: &mut Matrix<T>,
    ) -> Result<KernelReport> {
        let shape = Shape::of(left, right, result)?;
        self.time(REFERENCE_NAME, shape, result, |result| {
            reference_multiply(left, right, result).map(|_| ())
        })
    }

    /// Runs the naive kernel, then every other kernel of `kernels` in order,
    /// then the reference multiply if enabled, verifying each output against
    /// the naive one.
    ///
    /// # Errors
    ///
    /// Operand validation errors are reported before any kernel runs.
    pub fn run_session<T: Element>(
        &self,
        kernels: &[Kernel],
        left: &Matrix<T>,
        right: &Matrix<T>,
        result: &mut Matrix<T>,
    ) -> Result<SessionReport> {
        let shape = Shape::of(left, right, result)?;
        let _span = info_span!(
            "session",
            element = T::NAME,
            rows = shape.rows,
            inners = shape.inners,
            columns = shape.columns
        )
        .entered();

        let mut reports = Vec::with_capacity(kernels.len() + 2);

        let mut baseline = self.run_kernel(Kernel::Naive, left, right, result)?;
        let expected = result.clone();
        if self.config.verify {
            baseline.verdict = Some(Verdict::Exact);
        }
        reports.push(baseline);

        for &kernel in kernels.iter().filter(|&&k| k != Kernel::Naive) {
            let mut report = self.run_kernel(kernel, left, right, result)?;
            report.verdict = self.check(
                kernel.name(),
                result,
                &expected,
                kernel.preserves_summation_order(),
            )?;
            reports.push(report);
        }

        if self.config.reference {
            let mut report = self.run_reference(left, right, result)?;
            report.verdict = self.check(REFERENCE_NAME, result, &expected, false)?;
            reports.push(report);
        }

        Ok(SessionReport {
            element: T::NAME,
            shape,
            reports,
        })
    }

    fn check<T: Element>(
        &self,
        name: &str,
        candidate: &Matrix<T>,
        expected: &Matrix<T>,
        exact_required: bool,
    ) -> Result<Option<Verdict>> {
        if !self.config.verify {
            return Ok(None);
        }
        let verdict = oracle::verify(candidate, expected, exact_required)?;
        if verdict.is_ok() {
            debug!(kernel = name, %verdict, "output verified");
        } else {
            warn!(kernel = name, exact_required, "output differs from the naive kernel");
        }
        Ok(Some(verdict))
    }

    fn time<T, F>(
        &self,
        name: &'static str,
        shape: Shape,
        result: &mut Matrix<T>,
        mut run: F,
    ) -> Result<KernelReport>
    where
        T: Element,
        F: FnMut(&mut Matrix<T>) -> Result<()>,
    {
        let mut samples = Vec::with_capacity(self.config.repetitions);
        for repetition in 0..self.config.repetitions {
            result.reset();
            let start = Instant::now();
            run(result)?;
            let elapsed = start.elapsed();
            debug!(kernel = name, repetition, elapsed_ms = elapsed.as_secs_f64() * 1e3);
            samples.push(elapsed);
        }

        let stats = TimingStats::from_samples(&samples);
        let gflops = shape.flops() / (stats.mean_ms / 1e3) / 1e9;
        info!(
            kernel = name,
            mean_ms = stats.mean_ms,
            std_dev_ms = stats.std_dev_ms,
            gflops,
            "kernel timed"
        );

        Ok(KernelReport {
            name,
            samples,
            stats,
            gflops,
            verdict: None,
        })
    }
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Shape {
            rows,
            inners,
            columns,
        } = self.shape;
        writeln!(
            f,
            "{}: ({}×{}) · ({}×{})",
            self.element, rows, inners, inners, columns
        )?;
        writeln!(f, "{}", "-".repeat(96))?;
        writeln!(
            f,
            "{:<20} {:>12} {:>10} {:>12} {:>12} {:>8} {:>8}  {}",
            "Kernel", "Mean (ms)", "StdDev", "Min (ms)", "Max (ms)", "GFLOPS", "Speedup", "Check"
        )?;
        writeln!(f, "{}", "-".repeat(96))?;

        let baseline = self.reports.first().map(|r| r.stats.mean_ms);
        for report in &self.reports {
            let speedup = baseline.map_or(1.0, |base| base / report.stats.mean_ms);
            let check = report
                .verdict
                .map_or_else(|| "-".to_string(), |verdict| verdict.to_string());
            writeln!(
                f,
                "{:<20} {:>12.3} {:>10.3} {:>12.3} {:>12.3} {:>8.2} {:>7.1}×  {}",
                report.name,
                report.stats.mean_ms,
                report.stats.std_dev_ms,
                report.stats.min_ms,
                report.stats.max_ms,
                report.gflops,
                speedup,
                check
            )?;
        }
        write!(f, "{}", "-".repeat(96))
    }
}
