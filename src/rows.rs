//! Splits the rows of a frame into contiguous bands, one per worker.

use std::ops::Range;

/// A half-open band of rows `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowRange {
    /// First row, inclusive.
    pub start: usize,
    /// Last row, exclusive.
    pub end: usize,
}

impl RowRange {
    /// Number of rows in the band.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True for the bands trailing workers get when there are more
    /// workers than rows.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The band as a `Range`, for iteration.
    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Divides `height` rows among `workers`.  Every band is
/// `height / workers` rows tall except the last, which runs to `height`
/// and so absorbs the remainder.  When `workers > height` every band but
/// the last is empty.  `workers` must be at least 1.
pub fn partition(height: usize, workers: usize) -> Vec<RowRange> {
    assert!(workers > 0, "cannot partition rows among zero workers");
    let per_worker = height / workers;
    (0..workers)
        .map(|i| RowRange {
            start: i * per_worker,
            end: if i == workers - 1 {
                height
            } else {
                (i + 1) * per_worker
            },
        })
        .collect()
}
