//! Correctness oracle.
//!
//! Compares a kernel's output with the reference output. Exact comparison is
//! only meaningful between kernels that add the terms of every cell in the
//! same order; everything else is compared with a relative tolerance.

use std::fmt;

use crate::{
    element::Element,
    error::{MatmulError, Result},
    matrix::Matrix,
};

/// Outcome of checking one result against the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every element is exactly equal.
    Exact,
    /// Not bit-identical, but every element is within tolerance.
    WithinTolerance,
    Mismatch,
}

impl Verdict {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Verdict::Mismatch)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Exact => "exact",
            Verdict::WithinTolerance => "within tolerance",
            Verdict::Mismatch => "MISMATCH",
        })
    }
}

fn check_same_shape<T>(a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
    if a.dims() != b.dims() {
        return Err(MatmulError::ShapeMismatch {
            left: a.dims(),
            right: b.dims(),
        });
    }
    Ok(())
}

/// `true` iff every pair of corresponding elements compares equal.
///
/// Stops at the first mismatch.
///
/// # Errors
///
/// [`MatmulError::ShapeMismatch`] if the matrices differ in shape.
pub fn exactly_equal<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<bool> {
    check_same_shape(a, b)?;
    Ok(a.as_slice().iter().zip(b.as_slice()).all(|(x, y)| x == y))
}

/// `true` iff `|x - y| <= tolerance * max(1, |x|, |y|)` for every pair.
///
/// # Errors
///
/// [`MatmulError::ShapeMismatch`] if the matrices differ in shape.
pub fn approximately_equal<T: Element>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    tolerance: T,
) -> Result<bool> {
    check_same_shape(a, b)?;
    Ok(a.as_slice().iter().zip(b.as_slice()).all(|(&x, &y)| {
        let scale = T::one().max(x.abs()).max(y.abs());
        (x - y).abs() <= tolerance * scale
    }))
}

/// Checks `candidate` against `expected`.
///
/// When `exact_required` is set, anything short of bit equality is a
/// [`Verdict::Mismatch`]. Otherwise elements must agree within
/// [`Element::RELATIVE_TOLERANCE`].
///
/// # Errors
///
/// [`MatmulError::ShapeMismatch`] if the matrices differ in shape.
pub fn verify<T: Element>(
    candidate: &Matrix<T>,
    expected: &Matrix<T>,
    exact_required: bool,
) -> Result<Verdict> {
    if exactly_equal(candidate, expected)? {
        return Ok(Verdict::Exact);
    }
    if !exact_required && approximately_equal(candidate, expected, T::RELATIVE_TOLERANCE)? {
        return Ok(Verdict::WithinTolerance);
    }
    Ok(Verdict::Mismatch)
}
