use crate::{element::Element, matrix::Shape};

/// Cache-friendly multiplication using row → inner → column loop order.
///
/// Swapping the column and inner loops makes the innermost loop walk one
/// row of `right` and one row of `result` with stride 1. Each output cell
/// still receives its terms in increasing `inner` order, but only
/// tolerance-equality with [`super::naive::naive`] is promised.
///
/// # Arguments
///
/// * `left` - Matrix A (rows × inners), row-major
/// * `right` - Matrix B (inners × columns), row-major
/// * `result` - Matrix C (rows × columns), row-major, accumulated into
/// * `shape` - Validated dimensions of the three buffers
pub fn cache_friendly<T: Element>(left: &[T], right: &[T], result: &mut [T], shape: Shape) {
    let Shape {
        rows,
        inners,
        columns,
    } = shape;

    for row in 0..rows {
        let result_row = &mut result[row * columns..(row + 1) * columns];
        for inner in 0..inners {
            let a = left[row * inners + inner];
            let right_row = &right[inner * columns..(inner + 1) * columns];
            for (c, &b) in result_row.iter_mut().zip(right_row) {
                *c += a * b;
            }
        }
    }
}
