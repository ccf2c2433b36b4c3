//! Loop-unrolled inner product.
//!
//! The row and column loops are those of the reference kernel. The inner
//! loop handles `factor` consecutive terms per iteration in straight-line
//! code and finishes the `inners % factor` remainder with a scalar tail.
//! Terms are still added one at a time in increasing `inner` order, so on a
//! reset buffer the output matches the reference bit for bit.

use crate::{element::Element, matrix::Shape};

use super::UnrollFactor;

/// Multiplies with the inner loop unrolled by `factor`.
///
/// # Arguments
///
/// * `left` - Matrix A (rows × inners), row-major
/// * `right` - Matrix B (inners × columns), row-major
/// * `result` - Matrix C (rows × columns), row-major, accumulated into
/// * `shape` - Validated dimensions of the three buffers
/// * `factor` - Inner steps per loop body
pub fn unrolled<T: Element>(
    left: &[T],
    right: &[T],
    result: &mut [T],
    shape: Shape,
    factor: UnrollFactor,
) {
    match factor {
        UnrollFactor::Four => unrolled_by_4(left, right, result, shape),
        UnrollFactor::Eight => unrolled_by_8(left, right, result, shape),
    }
}

fn unrolled_by_4<T: Element>(left: &[T], right: &[T], result: &mut [T], shape: Shape) {
    let Shape {
        rows,
        inners,
        columns,
    } = shape;
    let main = inners - inners % 4;

    for row in 0..rows {
        let a = &left[row * inners..(row + 1) * inners];
        for col in 0..columns {
            let b = |inner: usize| right[inner * columns + col];
            let mut acc = result[row * columns + col];

            let mut inner = 0;
            while inner < main {
                acc += a[inner] * b(inner);
                acc += a[inner + 1] * b(inner + 1);
                acc += a[inner + 2] * b(inner + 2);
                acc += a[inner + 3] * b(inner + 3);
                inner += 4;
            }
            for inner in main..inners {
                acc += a[inner] * b(inner);
            }

            result[row * columns + col] = acc;
        }
    }
}

fn unrolled_by_8<T: Element>(left: &[T], right: &[T], result: &mut [T], shape: Shape) {
    let Shape {
        rows,
        inners,
        columns,
    } = shape;
    let main = inners - inners % 8;

    for row in 0..rows {
        let a = &left[row * inners..(row + 1) * inners];
        for col in 0..columns {
            let b = |inner: usize| right[inner * columns + col];
            let mut acc = result[row * columns + col];

            let mut inner = 0;
            while inner < main {
                acc += a[inner] * b(inner);
                acc += a[inner + 1] * b(inner + 1);
                acc += a[inner + 2] * b(inner + 2);
                acc += a[inner + 3] * b(inner + 3);
                acc += a[inner + 4] * b(inner + 4);
                acc += a[inner + 5] * b(inner + 5);
                acc += a[inner + 6] * b(inner + 6);
                acc += a[inner + 7] * b(inner + 7);
                inner += 8;
            }
            for inner in main..inners {
                acc += a[inner] * b(inner);
            }

            result[row * columns + col] = acc;
        }
    }
}
