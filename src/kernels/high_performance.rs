//! Tiled, parallel and vectorized multiplication.
//!
//! All three dimensions are blocked by the same `tile_size`, and every
//! dimension is clamped at its bound, so non-divisible tile sizes are safe
//! for any shape.
//!
//! Parallelism strategy:
//! - The result is cut into `(row tile, column tile)` blocks. Each block is
//!   an independent work item that owns the mutable row pieces of its tile,
//!   so no two items ever write the same element.
//! - Items run on the context pool; within an item the inner tiles are
//!   walked serially in increasing order.
//! - The innermost loop zips a row piece of the result with the matching
//!   row piece of `right`; both are contiguous, which lets the compiler
//!   vectorize it.

use std::ops::Range;

use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPool,
};

use crate::{element::Element, matrix::Shape};

use super::tile_ranges;

/// One `(row tile, column tile)` block of the result.
struct TileJob<'a, T> {
    rows: Range<usize>,
    columns: Range<usize>,
    /// One piece per row of `rows`, each `columns.len()` elements long.
    pieces: Vec<&'a mut [T]>,
}

/// Multiplies with all dimensions tiled and tiles distributed over `pool`.
///
/// # Arguments
///
/// * `pool` - Worker pool executing the tile jobs
/// * `left` - Matrix A (rows × inners), row-major
/// * `right` - Matrix B (inners × columns), row-major
/// * `result` - Matrix C (rows × columns), row-major, accumulated into
/// * `shape` - Validated dimensions of the three buffers
/// * `tile_size` - Extent of a tile along every dimension
pub fn high_performance<T: Element>(
    pool: &ThreadPool,
    left: &[T],
    right: &[T],
    result: &mut [T],
    shape: Shape,
    tile_size: usize,
) {
    let jobs = split_into_tiles(result, shape, tile_size);

    pool.install(|| {
        jobs.into_par_iter()
            .for_each(|job| multiply_tile(left, right, job, shape, tile_size));
    });
}

fn split_into_tiles<T>(result: &mut [T], shape: Shape, tile_size: usize) -> Vec<TileJob<'_, T>> {
    let column_tiles: Vec<Range<usize>> = tile_ranges(shape.columns, tile_size).collect();
    let mut jobs = Vec::new();

    let row_bands = result.chunks_mut(tile_size.min(shape.rows) * shape.columns);
    for (rows, band) in tile_ranges(shape.rows, tile_size).zip(row_bands) {
        let first = jobs.len();
        jobs.extend(column_tiles.iter().map(|columns| TileJob {
            rows: rows.clone(),
            columns: columns.clone(),
            pieces: Vec::with_capacity(rows.len()),
        }));

        for row in band.chunks_mut(shape.columns) {
            for (job, piece) in jobs[first..].iter_mut().zip(row.chunks_mut(tile_size)) {
                job.pieces.push(piece);
            }
        }
    }

    jobs
}

fn multiply_tile<T: Element>(
    left: &[T],
    right: &[T],
    job: TileJob<'_, T>,
    shape: Shape,
    tile_size: usize,
) {
    let TileJob {
        rows,
        columns,
        mut pieces,
    } = job;
    let Shape {
        inners,
        columns: width,
        ..
    } = shape;

    for inner_tile in tile_ranges(inners, tile_size) {
        for (row, piece) in rows.clone().zip(pieces.iter_mut()) {
            for inner in inner_tile.clone() {
                let a = left[row * inners + inner];
                let offset = inner * width;
                let right_piece = &right[offset + columns.start..offset + columns.end];
                for (c, &b) in piece.iter_mut().zip(right_piece) {
                    *c += a * b;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::naive::naive;

    fn pool(threads: usize) -> ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    #[test]
    fn test_split_into_tiles_covers_result() {
        // 5x7 result, tile 3 -> 2 row tiles x 3 column tiles
        let shape = Shape {
            rows: 5,
            inners: 1,
            columns: 7,
        };
        let mut result = vec![0u32; 35];
        let jobs = split_into_tiles(&mut result, shape, 3);
        assert_eq!(jobs.len(), 6);
        for job in jobs {
            assert_eq!(job.pieces.len(), job.rows.len());
            for piece in job.pieces {
                assert_eq!(piece.len(), job.columns.len());
                for x in piece.iter_mut() {
                    *x += 1;
                }
            }
        }
        assert!(result.iter().all(|&x| x == 1));
    }

    #[test]
    fn test_high_performance_non_divisible_tiles() {
        // 7x5 · 5x6 with tiles that divide none of the dimensions
        let shape = Shape {
            rows: 7,
            inners: 5,
            columns: 6,
        };
        let a: Vec<f64> = (0..35).map(|x| (x % 9) as f64 - 4.0).collect();
        let b: Vec<f64> = (0..30).map(|x| (x % 4) as f64 * 0.5).collect();
        let mut expected = vec![0.0; 42];
        naive(&a, &b, &mut expected, shape);

        let pool = pool(3);
        for tile_size in [1, 2, 4, 64] {
            let mut actual = vec![0.0; 42];
            high_performance(&pool, &a, &b, &mut actual, shape, tile_size);
            for (x, y) in actual.iter().zip(&expected) {
                assert!((x - y).abs() < 1e-12, "tile_size={}: {} != {}", tile_size, x, y);
            }
        }
    }
}
