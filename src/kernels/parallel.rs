//! Row-partitioned fork-join multiplication.

use std::ops::Range;

use rayon::{
    iter::{IntoParallelIterator, ParallelIterator},
    ThreadPool,
};

use crate::{element::Element, matrix::Shape};

/// Splits `0..rows` into at most `workers` contiguous, non-empty ranges.
///
/// The ranges are disjoint, in increasing order and cover every row exactly
/// once. Sizes differ by at most one row; when `rows < workers` there is one
/// single-row range per row.
pub fn partition_rows(rows: usize, workers: usize) -> Vec<Range<usize>> {
    let parts = workers.max(1).min(rows);
    if parts == 0 {
        return Vec::new();
    }

    let base = rows / parts;
    let extra = rows % parts;

    let mut start = 0;
    (0..parts)
        .map(|part| {
            let len = base + usize::from(part < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Reference-order multiplication with the row loop spread over `pool`.
///
/// Each worker owns one range from [`partition_rows`] and the matching
/// contiguous block of `result`, so no two workers ever write the same
/// element and no locking is needed. `left` and `right` are only read. The
/// call returns once every block is done.
///
/// # Arguments
///
/// * `pool` - Worker pool; its thread count is the partition count
/// * `left` - Matrix A (rows × inners), row-major
/// * `right` - Matrix B (inners × columns), row-major
/// * `result` - Matrix C (rows × columns), row-major, accumulated into
/// * `shape` - Validated dimensions of the three buffers
pub fn parallel<T: Element>(
    pool: &ThreadPool,
    left: &[T],
    right: &[T],
    result: &mut [T],
    shape: Shape,
) {
    let ranges = partition_rows(shape.rows, pool.current_num_threads());

    let mut blocks = Vec::with_capacity(ranges.len());
    let mut rest = result;
    for range in ranges {
        let (block, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * shape.columns);
        blocks.push((range, block));
        rest = tail;
    }

    pool.install(|| {
        blocks
            .into_par_iter()
            .for_each(|(range, block)| multiply_rows(left, right, block, shape, range));
    });
}

/// Naive loop order restricted to `rows`; `block` starts at `rows.start`.
fn multiply_rows<T: Element>(
    left: &[T],
    right: &[T],
    block: &mut [T],
    shape: Shape,
    rows: Range<usize>,
) {
    let Shape {
        inners, columns, ..
    } = shape;

    for (local, row) in rows.enumerate() {
        for col in 0..columns {
            for inner in 0..inners {
                block[local * columns + col] +=
                    left[row * inners + inner] * right[inner * columns + col];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::naive::naive;

    fn assert_exact_cover(rows: usize, workers: usize) {
        let ranges = partition_rows(rows, workers);
        assert!(ranges.len() <= workers.max(1));
        let mut next = 0;
        for range in &ranges {
            assert!(!range.is_empty(), "empty range for rows={} workers={}", rows, workers);
            assert_eq!(range.start, next, "gap or overlap at {}", next);
            next = range.end;
        }
        assert_eq!(next, rows);
    }

    #[test]
    fn test_partition_covers_all_rows() {
        for rows in 0..40 {
            for workers in 1..12 {
                assert_exact_cover(rows, workers);
            }
        }
    }

    #[test]
    fn test_partition_fewer_rows_than_workers() {
        assert_eq!(partition_rows(3, 8), vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_partition_balanced() {
        assert_eq!(partition_rows(10, 4), vec![0..3, 3..6, 6..8, 8..10]);
    }

    #[test]
    fn test_parallel_matches_naive() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap();
        let shape = Shape {
            rows: 9,
            inners: 5,
            columns: 3,
        };
        let a: Vec<f64> = (0..45).map(|x| x as f64 / 3.0).collect();
        let b: Vec<f64> = (0..15).map(|x| 1.0 - x as f64 / 5.0).collect();
        let mut expected = vec![0.0; 27];
        let mut actual = vec![0.0; 27];
        naive(&a, &b, &mut expected, shape);
        parallel(&pool, &a, &b, &mut actual, shape);
        assert_eq!(expected, actual);
    }
}
