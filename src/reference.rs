//! External reference multiply backed by ndarray.
//!
//! ndarray's `general_mat_mul` (itself driven by a packed, vectorized GEMM)
//! stands in for a vendor BLAS routine. It is only ever used to cross-check
//! the kernels, never by them.

use ndarray::{linalg::general_mat_mul, ArrayView2, ArrayViewMut2};

use crate::{
    element::Element,
    error::{reference_error, Result},
    matrix::{Matrix, Shape},
};

/// Name under which the reference multiply appears in reports.
pub const REFERENCE_NAME: &str = "ndarray_reference";

/// Computes `result += left · right` with ndarray.
///
/// Same accumulate contract as the in-crate kernels: `result` must be reset
/// by the caller.
///
/// # Errors
///
/// Any error from [`Shape::of`], or [`crate::MatmulError::Reference`] if
/// ndarray refuses the buffer layout.
pub fn reference_multiply<T: Element>(
    left: &Matrix<T>,
    right: &Matrix<T>,
    result: &mut Matrix<T>,
) -> Result<Shape> {
    let shape = Shape::of(left, right, result)?;

    let a = ArrayView2::from_shape((shape.rows, shape.inners), left.as_slice())
        .map_err(|e| reference_error(e.to_string()))?;
    let b = ArrayView2::from_shape((shape.inners, shape.columns), right.as_slice())
        .map_err(|e| reference_error(e.to_string()))?;
    let mut c = ArrayViewMut2::from_shape((shape.rows, shape.columns), result.as_mut_slice())
        .map_err(|e| reference_error(e.to_string()))?;

    general_mat_mul(T::one(), &a, &b, T::one(), &mut c);
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_2x2() {
        let left = Matrix::from_rows(&[[1.0f64, 2.0], [3.0, 4.0]]).unwrap();
        let right = Matrix::from_rows(&[[5.0f64, 6.0], [7.0, 8.0]]).unwrap();
        let mut result = Matrix::zeros(2, 2);
        reference_multiply(&left, &right, &mut result).unwrap();
        assert_eq!(result.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_reference_accumulates() {
        let left = Matrix::from_rows(&[[1.0f32, 2.0, 3.0]]).unwrap();
        let right = Matrix::from_rows(&[[4.0f32], [5.0], [6.0]]).unwrap();
        let mut result = Matrix::from_vec(1, 1, vec![1.0]).unwrap();
        reference_multiply(&left, &right, &mut result).unwrap();
        assert_eq!(result.as_slice(), &[33.0]);
    }

    #[test]
    fn test_reference_rejects_mismatch() {
        let left = Matrix::<f64>::zeros(2, 3);
        let right = Matrix::<f64>::zeros(2, 3);
        let mut result = Matrix::<f64>::zeros(2, 3);
        assert!(reference_multiply(&left, &right, &mut result).is_err());
    }
}
