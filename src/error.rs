//! Error types for matmult operations.
//!
//! Every precondition a kernel relies on (conformant dimensions, non-empty
//! operands, a sane configuration) is checked up front and reported through
//! [`MatmulError`] instead of being computed silently or panicking mid-loop.

use std::fmt;

/// Errors that can occur while preparing or running a multiplication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatmulError {
    /// The left operand's column count differs from the right operand's row count.
    DimensionMismatch {
        /// Columns of the left matrix.
        left_columns: usize,
        /// Rows of the right matrix.
        right_rows: usize,
    },
    /// The result buffer does not have the `rows × columns` shape of the product.
    ResultShapeMismatch {
        /// Rows the product requires.
        expected_rows: usize,
        /// Columns the product requires.
        expected_columns: usize,
        /// Rows of the supplied result buffer.
        rows: usize,
        /// Columns of the supplied result buffer.
        columns: usize,
    },
    /// Two matrices handed to the oracle do not have the same shape.
    ShapeMismatch {
        /// Shape of the first matrix as `(rows, columns)`.
        left: (usize, usize),
        /// Shape of the second matrix as `(rows, columns)`.
        right: (usize, usize),
    },
    /// A multiplication operand has no elements.
    EmptyMatrix {
        /// Rows of the offending matrix.
        rows: usize,
        /// Columns of the offending matrix.
        columns: usize,
    },
    /// A buffer's length disagrees with the dimensions it was paired with.
    BufferLength {
        /// `rows * columns`.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },
    /// A kernel, harness or generator setting is out of range.
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },
    /// The worker pool could not be created.
    ThreadPool {
        /// Human-readable error message.
        message: String,
    },
    /// The external reference multiply rejected its operands.
    Reference {
        /// Human-readable error message.
        message: String,
    },
    /// Writing a matrix out failed.
    Export {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for MatmulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatmulError::DimensionMismatch {
                left_columns,
                right_rows,
            } => write!(
                f,
                "Dimension mismatch: left matrix has {} columns but right matrix has {} rows",
                left_columns, right_rows
            ),
            MatmulError::ResultShapeMismatch {
                expected_rows,
                expected_columns,
                rows,
                columns,
            } => write!(
                f,
                "Result buffer is {}x{}, expected {}x{}",
                rows, columns, expected_rows, expected_columns
            ),
            MatmulError::ShapeMismatch { left, right } => write!(
                f,
                "Cannot compare a {}x{} matrix with a {}x{} matrix",
                left.0, left.1, right.0, right.1
            ),
            MatmulError::EmptyMatrix { rows, columns } => {
                write!(f, "Empty matrix: {}x{} has no elements", rows, columns)
            }
            MatmulError::BufferLength { expected, actual } => write!(
                f,
                "Buffer length mismatch: expected {} elements, got {}",
                expected, actual
            ),
            MatmulError::InvalidConfig { message } => {
                write!(f, "Invalid configuration: {}", message)
            }
            MatmulError::ThreadPool { message } => {
                write!(f, "Worker pool error: {}", message)
            }
            MatmulError::Reference { message } => {
                write!(f, "Reference multiply error: {}", message)
            }
            MatmulError::Export { message } => write!(f, "Export error: {}", message),
        }
    }
}

impl std::error::Error for MatmulError {}

/// Result type alias for matmult operations.
pub type Result<T> = std::result::Result<T, MatmulError>;

/// Creates a configuration error.
pub fn config_error(message: impl Into<String>) -> MatmulError {
    MatmulError::InvalidConfig {
        message: message.into(),
    }
}

/// Creates a worker pool error.
pub fn thread_pool_error(message: impl Into<String>) -> MatmulError {
    MatmulError::ThreadPool {
        message: message.into(),
    }
}

/// Creates a reference multiply error.
pub fn reference_error(message: impl Into<String>) -> MatmulError {
    MatmulError::Reference {
        message: message.into(),
    }
}

/// Creates an export error.
pub fn export_error(message: impl Into<String>) -> MatmulError {
    MatmulError::Export {
        message: message.into(),
    }
}

impl From<std::io::Error> for MatmulError {
    fn from(error: std::io::Error) -> Self {
        export_error(error.to_string())
    }
}

impl From<csv::Error> for MatmulError {
    fn from(error: csv::Error) -> Self {
        export_error(error.to_string())
    }
}
