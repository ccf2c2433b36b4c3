use crate::{element::Element, matrix::Shape};

use super::tile_ranges;

/// Cache-blocked multiplication over the shared (`inners`) dimension.
///
/// For every inner tile `[t, min(t + tile_size, inners))` the kernel sweeps
/// all rows, and within the tile accumulates each `left[row, inner]` across
/// a full row of `right`. Between two reuses of a `right` row only
/// `tile_size` rows of `right` are touched, which bounds the working set.
///
/// The final tile is clamped to `inners`, so `tile_size` may be any value
/// `>= 1`, including non-divisors of `inners` and values larger than it.
///
/// # Arguments
///
/// * `left` - Matrix A (rows × inners), row-major
/// * `right` - Matrix B (inners × columns), row-major
/// * `result` - Matrix C (rows × columns), row-major, accumulated into
/// * `shape` - Validated dimensions of the three buffers
/// * `tile_size` - Extent of one inner tile
pub fn tiled<T: Element>(
    left: &[T],
    right: &[T],
    result: &mut [T],
    shape: Shape,
    tile_size: usize,
) {
    let Shape {
        rows,
        inners,
        columns,
    } = shape;

    for inner_tile in tile_ranges(inners, tile_size) {
        for row in 0..rows {
            let result_row = &mut result[row * columns..(row + 1) * columns];
            for inner in inner_tile.clone() {
                let a = left[row * inners + inner];
                let right_row = &right[inner * columns..(inner + 1) * columns];
                for (c, &b) in result_row.iter_mut().zip(right_row) {
                    *c += a * b;
                }
            }
        }
    }
}
