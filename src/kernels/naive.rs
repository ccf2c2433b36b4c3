use crate::{element::Element, matrix::Shape};

/// Reference multiplication: `result += left · right` with the textbook
/// row → column → inner loop order.
///
/// The innermost loop walks `right` down a column (stride `columns`), which
/// makes this the slowest kernel. It is the ground truth every other kernel
/// is checked against: single-threaded, with a fixed summation order for
/// every output cell (`inner = 0, 1, ..., inners - 1`).
///
/// # Arguments
///
/// * `left` - Matrix A (rows × inners), row-major
/// * `right` - Matrix B (inners × columns), row-major
/// * `result` - Matrix C (rows × columns), row-major, accumulated into
/// * `shape` - Validated dimensions of the three buffers
pub fn naive<T: Element>(left: &[T], right: &[T], result: &mut [T], shape: Shape) {
    let Shape {
        rows,
        inners,
        columns,
    } = shape;

    for row in 0..rows {
        for col in 0..columns {
            for inner in 0..inners {
                result[row * columns + col] +=
                    left[row * inners + inner] * right[inner * columns + col];
            }
        }
    }
}

/// Same traversal as [`naive`], but the inner product of each cell is summed
/// in a local accumulator and written back once.
///
/// The accumulator starts from zero and is added to the result cell, so on
/// a reset buffer the output is bit-identical to [`naive`].
pub fn naive_accumulated<T: Element>(left: &[T], right: &[T], result: &mut [T], shape: Shape) {
    let Shape {
        rows,
        inners,
        columns,
    } = shape;

    for row in 0..rows {
        let left_row = &left[row * inners..(row + 1) * inners];
        for col in 0..columns {
            let mut acc = T::zero();
            for (inner, &a) in left_row.iter().enumerate() {
                acc += a * right[inner * columns + col];
            }
            result[row * columns + col] += acc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE_2X2: Shape = Shape {
        rows: 2,
        inners: 2,
        columns: 2,
    };

    #[test]
    fn test_naive_2x2() {
        let a = [1.0f64, 2.0, 3.0, 4.0];
        let b = [5.0f64, 6.0, 7.0, 8.0];
        let mut c = [0.0f64; 4];
        naive(&a, &b, &mut c, SHAPE_2X2);
        assert_eq!(c, [19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_naive_accumulates() {
        let a = [1.0f32, 2.0, 3.0, 4.0];
        let b = [5.0f32, 6.0, 7.0, 8.0];
        let mut c = [1.0f32; 4];
        naive(&a, &b, &mut c, SHAPE_2X2);
        assert_eq!(c, [20.0, 23.0, 44.0, 51.0]);
    }

    #[test]
    fn test_accumulated_matches_naive_bitwise() {
        // 3x5 · 5x4 with values that do not sum exactly
        let shape = Shape {
            rows: 3,
            inners: 5,
            columns: 4,
        };
        let a: Vec<f32> = (0..15).map(|x| 0.1 + x as f32 / 7.0).collect();
        let b: Vec<f32> = (0..20).map(|x| 1.3 - x as f32 / 11.0).collect();
        let mut expected = vec![0.0f32; 12];
        let mut actual = vec![0.0f32; 12];
        naive(&a, &b, &mut expected, shape);
        naive_accumulated(&a, &b, &mut actual, shape);
        assert_eq!(expected, actual);
    }

    #[test]
    fn test_rectangular_column_vector() {
        // 1x3 · 3x1
        let shape = Shape {
            rows: 1,
            inners: 3,
            columns: 1,
        };
        let mut c = [0.0f64];
        naive_accumulated(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &mut c, shape);
        assert_eq!(c, [32.0]);
    }
}
