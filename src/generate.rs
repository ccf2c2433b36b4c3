//! Random input matrices.

use std::ops::Range;

use num::NumCast;
use rand::{distr::Uniform, rngs::StdRng, Rng, SeedableRng};

use crate::{
    element::Element,
    error::{config_error, Result},
    matrix::Matrix,
};

/// Default element range, `[0, 100000)`.
pub const DEFAULT_RANGE: Range<f64> = 0.0..100_000.0;

/// Seeded generator for one session.
///
/// Without an explicit seed the current time in milliseconds is used, so
/// two sessions started at different instants see different matrices.
pub fn session_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| chrono::Utc::now().timestamp_millis() as u64);
    (StdRng::seed_from_u64(seed), seed)
}

/// Fills a `rows × columns` matrix with independent draws from
/// `Uniform[range.start, range.end)`.
///
/// # Errors
///
/// [`crate::MatmulError::InvalidConfig`] if the range is empty, not finite
/// or not representable in `T`.
pub fn random_matrix<T: Element, R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    rng: &mut R,
    range: Range<f64>,
) -> Result<Matrix<T>> {
    let bound = |value: f64| {
        <T as NumCast>::from(value)
            .filter(|v| v.is_finite())
            .ok_or_else(|| config_error(format!("{} is not a finite {}", value, T::NAME)))
    };
    let distribution = Uniform::new(bound(range.start)?, bound(range.end)?)
        .map_err(|e| config_error(format!("invalid range {:?}: {}", range, e)))?;

    let data: Vec<T> = (0..rows * columns)
        .map(|_| rng.sample(&distribution))
        .collect();
    Matrix::from_vec(rows, columns, data)
}
