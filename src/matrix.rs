//! Dense row-major matrices and the shape of one multiplication.

use crate::{
    element::Element,
    error::{MatmulError, Result},
};

/// A dense, row-major matrix.
///
/// The buffer always holds exactly `rows * columns` elements; every
/// constructor enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    columns: usize,
}

impl<T: Element> Matrix<T> {
    /// Allocates a `rows × columns` matrix filled with zeros.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Matrix {
            data: vec![T::zero(); rows * columns],
            rows,
            columns,
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MatmulError::BufferLength`] if `data.len() != rows * columns`.
    pub fn from_vec(rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        let expected = rows * columns;
        if data.len() != expected {
            return Err(MatmulError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Matrix {
            data,
            rows,
            columns,
        })
    }

    /// Builds a matrix from nested rows, mostly useful for small literals.
    ///
    /// ```
    /// use matmult::Matrix;
    ///
    /// let m = Matrix::from_rows(&[[1.0f64, 2.0], [3.0, 4.0]]).unwrap();
    /// assert_eq!(m.get(1, 0), 3.0);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`MatmulError::BufferLength`] if the rows are ragged.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |row| row.as_ref().len());
        let data: Vec<T> = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::from_vec(rows.len(), columns, data)
    }

    /// Sets every element to the additive identity.
    ///
    /// Every kernel accumulates into its result with `+=`, so this must run
    /// before each invocation that is expected to produce `A·B` alone.
    pub fn reset(&mut self) {
        self.data.fill(T::zero());
    }

    /// Element at `(row, column)`.
    ///
    /// # Panics
    ///
    /// Panics if the position lies outside the matrix.
    #[inline]
    pub fn get(&self, row: usize, column: usize) -> T {
        assert!(
            row < self.rows && column < self.columns,
            "({}, {}) out of bounds for a {}x{} matrix",
            row,
            column,
            self.rows,
            self.columns
        );
        self.data[self.offset(row, column)]
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over the rows as contiguous slices.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[T]> {
        // chunks(0) panics; an empty matrix has no rows to yield anyway
        self.data.chunks(self.columns.max(1)).take(self.rows)
    }
}

impl<T> Matrix<T> {
    /// Linear offset of `(row, column)` in the row-major buffer.
    #[inline(always)]
    pub fn offset(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(rows, columns)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }
}

/// Validated dimensions of
/// `result (rows × columns) += left (rows × inners) · right (inners × columns)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub inners: usize,
    pub columns: usize,
}

impl Shape {
    /// Checks the three operands of a multiplication and returns their shape.
    ///
    /// Checks, in order: no operand is empty, `left.columns == right.rows`,
    /// and `result` is `left.rows × right.columns`.
    ///
    /// # Errors
    ///
    /// [`MatmulError::EmptyMatrix`], [`MatmulError::DimensionMismatch`] or
    /// [`MatmulError::ResultShapeMismatch`].
    pub fn of<T>(left: &Matrix<T>, right: &Matrix<T>, result: &Matrix<T>) -> Result<Self> {
        for operand in [left, right, result] {
            if operand.is_empty() {
                return Err(MatmulError::EmptyMatrix {
                    rows: operand.rows(),
                    columns: operand.columns(),
                });
            }
        }

        if left.columns() != right.rows() {
            return Err(MatmulError::DimensionMismatch {
                left_columns: left.columns(),
                right_rows: right.rows(),
            });
        }

        if result.dims() != (left.rows(), right.columns()) {
            return Err(MatmulError::ResultShapeMismatch {
                expected_rows: left.rows(),
                expected_columns: right.columns(),
                rows: result.rows(),
                columns: result.columns(),
            });
        }

        Ok(Shape {
            rows: left.rows(),
            inners: left.columns(),
            columns: right.columns(),
        })
    }

    /// Floating-point operations of one multiplication (one multiply and one add per term).
    pub fn flops(&self) -> f64 {
        2.0 * self.rows as f64 * self.inners as f64 * self.columns as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        // 2x3
        // 0 1 2
        // 3 4 5
        let m = Matrix::<f64>::zeros(2, 3);
        assert_eq!(m.offset(0, 0), 0);
        assert_eq!(m.offset(0, 2), 2);
        assert_eq!(m.offset(1, 0), 3);
        assert_eq!(m.offset(1, 2), 5);
    }

    #[test]
    fn test_from_vec_length_checked() {
        let err = Matrix::from_vec(2, 3, vec![0.0f32; 5]).unwrap_err();
        assert_eq!(
            err,
            MatmulError::BufferLength {
                expected: 6,
                actual: 5
            }
        );
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(Matrix::from_rows(&rows).is_err());
    }

    #[test]
    fn test_reset() {
        let mut m = Matrix::from_rows(&[[1.0f32, 2.0], [3.0, 4.0]]).unwrap();
        m.reset();
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
        assert_eq!(m.dims(), (2, 2));
    }

    #[test]
    fn test_rows_iter() {
        let m = Matrix::from_rows(&[[1.0f64, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let rows: Vec<&[f64]> = m.rows_iter().collect();
        assert_eq!(rows, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
    }

    #[test]
    fn test_shape_of_valid() {
        let left = Matrix::<f64>::zeros(2, 3);
        let right = Matrix::<f64>::zeros(3, 4);
        let result = Matrix::<f64>::zeros(2, 4);
        let shape = Shape::of(&left, &right, &result).unwrap();
        assert_eq!(
            shape,
            Shape {
                rows: 2,
                inners: 3,
                columns: 4
            }
        );
        assert_eq!(shape.flops(), 48.0);
    }

    #[test]
    fn test_shape_of_dimension_mismatch() {
        let left = Matrix::<f64>::zeros(2, 3);
        let right = Matrix::<f64>::zeros(4, 2);
        let result = Matrix::<f64>::zeros(2, 2);
        assert_eq!(
            Shape::of(&left, &right, &result),
            Err(MatmulError::DimensionMismatch {
                left_columns: 3,
                right_rows: 4
            })
        );
    }

    #[test]
    fn test_shape_of_result_mismatch() {
        let left = Matrix::<f32>::zeros(2, 3);
        let right = Matrix::<f32>::zeros(3, 4);
        let result = Matrix::<f32>::zeros(4, 2);
        assert!(matches!(
            Shape::of(&left, &right, &result),
            Err(MatmulError::ResultShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_shape_of_empty() {
        let left = Matrix::<f32>::zeros(0, 3);
        let right = Matrix::<f32>::zeros(3, 4);
        let result = Matrix::<f32>::zeros(0, 4);
        assert_eq!(
            Shape::of(&left, &right, &result),
            Err(MatmulError::EmptyMatrix { rows: 0, columns: 3 })
        );
    }
}
