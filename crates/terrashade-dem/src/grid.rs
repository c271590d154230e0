//! Dense height-field grid and the flatten/reshape steps that produce it.
//!
//! The reshape fills the grid **column-major** from the flat sample sequence:
//! flat index `k` lands at row `k % rows`, column `k / rows`. Rendered images
//! depend on this orientation.

use crate::source::{ElevationRaster, RawElevationSample};
use crate::{DemError, Result};
use std::borrow::Borrow;
use std::collections::HashSet;

/// A dense 2-D elevation grid stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationGrid {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl ElevationGrid {
    /// Build a grid from row-major data.
    pub fn from_row_major(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(DemError::ShapeMismatch {
                samples: data.len(),
                rows,
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// A grid filled with a single value.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value at `(row, col)`, or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// One row of the grid.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.data[row * self.cols..(row + 1) * self.cols])
        } else {
            None
        }
    }

    /// All values, row-major.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Lowest and highest elevation, skipping `NaN` cells.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Number of `NaN` (no-data) cells.
    pub fn missing_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }
}

/// Lazy row-by-row walk over a raster's cells, produced by [`flatten`].
#[derive(Debug, Clone)]
pub struct FlatSamples<'a> {
    raster: &'a ElevationRaster,
    next: usize,
}

impl Iterator for FlatSamples<'_> {
    type Item = RawElevationSample;

    fn next(&mut self) -> Option<RawElevationSample> {
        let value = *self.raster.values().get(self.next)?;
        let (width, _) = self.raster.dimensions();
        let (row, col) = (self.next / width, self.next % width);
        self.next += 1;

        Some(RawElevationSample {
            x: self.raster.col_coords()[col],
            y: self.raster.row_coords()[row],
            elevation: if self.raster.is_no_data(value) {
                f64::NAN
            } else {
                value as f64
            },
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.raster.values().len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FlatSamples<'_> {}

/// Flatten a raster into `(x, y, elevation)` samples.
///
/// Samples come out row by row, top to bottom, west to east within a row.
/// No-data cells are kept, with `NaN` elevation, so the sequence stays dense.
/// Nothing is buffered: each sample is built as the iterator advances.
pub fn flatten(raster: &ElevationRaster) -> FlatSamples<'_> {
    FlatSamples { raster, next: 0 }
}

/// Distinct row coordinates (compared bit for bit) and total sample count.
fn row_stats<I>(samples: I) -> (usize, usize)
where
    I: IntoIterator,
    I::Item: Borrow<RawElevationSample>,
{
    let mut seen = HashSet::new();
    let mut count = 0;
    for sample in samples {
        let y = sample.borrow().y;
        // Fold -0.0 onto 0.0 so the two zero encodings are one row
        let y = if y == 0.0 { 0.0 } else { y };
        seen.insert(y.to_bits());
        count += 1;
    }
    (seen.len(), count)
}

/// Count distinct row coordinates, compared bit for bit.
pub fn distinct_row_count<I>(samples: I) -> usize
where
    I: IntoIterator,
    I::Item: Borrow<RawElevationSample>,
{
    row_stats(samples).0
}

/// Reshape flat samples into a grid with one row per distinct row coordinate.
///
/// The grid is filled column-major: the first `rows` elevations form column
/// 0, the next `rows` form column 1, and so on. The samples are walked twice
/// (count, then fill), so only the grid itself is allocated.
pub fn reshape_column_major<I>(samples: I) -> Result<ElevationGrid>
where
    I: IntoIterator,
    I::Item: Borrow<RawElevationSample>,
    I::IntoIter: Clone,
{
    let samples = samples.into_iter();
    let (rows, count) = row_stats(samples.clone());
    if count == 0 {
        return Err(DemError::NoData);
    }
    if count % rows != 0 {
        return Err(DemError::ShapeMismatch {
            samples: count,
            rows,
        });
    }
    let cols = count / rows;

    let mut data = vec![0.0; count];
    for (k, sample) in samples.enumerate() {
        let row = k % rows;
        let col = k / rows;
        data[row * cols + col] = sample.borrow().elevation;
    }

    Ok(ElevationGrid { rows, cols, data })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `n` samples cycling through `row_values` distinct y coordinates,
    /// elevation equal to the flat index.
    fn samples(n: usize, row_values: usize) -> Vec<RawElevationSample> {
        (0..n)
            .map(|k| RawElevationSample {
                x: k as f64,
                y: 10.0 + (k / (n / row_values).max(1) % row_values) as f64,
                elevation: k as f64,
            })
            .collect()
    }

    #[test]
    fn test_reshape_twelve_by_three() {
        let flat = samples(12, 3);
        assert_eq!(distinct_row_count(&flat), 3);

        let grid = reshape_column_major(&flat).unwrap();
        assert_eq!(grid.shape(), (3, 4));
    }

    #[test]
    fn test_reshape_fills_column_major() {
        let flat = samples(12, 3);
        let grid = reshape_column_major(&flat).unwrap();

        assert_eq!(grid.get(0, 0), Some(0.0));
        assert_eq!(grid.get(1, 0), Some(1.0));
        assert_eq!(grid.get(2, 0), Some(2.0));
        assert_eq!(grid.get(0, 1), Some(3.0));
        assert_eq!(grid.get(2, 3), Some(11.0));
        assert_eq!(grid.row(0), Some(&[0.0, 3.0, 6.0, 9.0][..]));
    }

    #[test]
    fn test_reshape_is_deterministic() {
        let flat = samples(12, 3);
        let a = reshape_column_major(&flat).unwrap();
        let b = reshape_column_major(&flat).unwrap();

        let bits_a: Vec<u64> = a.as_slice().iter().map(|v| v.to_bits()).collect();
        let bits_b: Vec<u64> = b.as_slice().iter().map(|v| v.to_bits()).collect();
        assert_eq!(bits_a, bits_b);
        assert_eq!(a.shape(), b.shape());
    }

    #[test]
    fn test_reshape_shape_mismatch() {
        let mut flat = samples(12, 3);
        flat.truncate(10);
        assert_eq!(distinct_row_count(&flat), 3);

        match reshape_column_major(&flat) {
            Err(DemError::ShapeMismatch { samples, rows }) => {
                assert_eq!(samples, 10);
                assert_eq!(rows, 3);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_reshape_empty_is_no_data() {
        let none: Vec<RawElevationSample> = Vec::new();
        assert!(matches!(reshape_column_major(&none), Err(DemError::NoData)));
        assert!(matches!(
            reshape_column_major(flatten(&ElevationRaster::empty())),
            Err(DemError::NoData)
        ));
    }

    #[test]
    fn test_row_count_not_sorted() {
        // Descending latitudes count the same as ascending ones
        let flat: Vec<RawElevationSample> = [3.0, 1.0, 2.0, 3.0, 1.0, 2.0]
            .iter()
            .map(|&y| RawElevationSample {
                x: 0.0,
                y,
                elevation: y,
            })
            .collect();
        let grid = reshape_column_major(&flat).unwrap();
        assert_eq!(grid.shape(), (3, 2));
        assert_eq!(grid.row(0), Some(&[3.0, 3.0][..]));
    }

    #[test]
    fn test_flatten_row_by_row() {
        let raster = ElevationRaster::new(
            2,
            2,
            vec![1.0, 2.0, 3.0, -32768.0],
            vec![47.1, 47.0],
            vec![-122.0, -121.9],
            Some(-32768.0),
        )
        .unwrap();

        assert_eq!(flatten(&raster).len(), 4);
        let flat: Vec<RawElevationSample> = flatten(&raster).collect();
        assert_eq!(flat.len(), 4);
        assert_eq!((flat[0].x, flat[0].y, flat[0].elevation), (-122.0, 47.1, 1.0));
        assert_eq!((flat[1].x, flat[1].y, flat[1].elevation), (-121.9, 47.1, 2.0));
        assert_eq!((flat[2].x, flat[2].y, flat[2].elevation), (-122.0, 47.0, 3.0));
        assert!(flat[3].elevation.is_nan());
    }

    #[test]
    fn test_reshape_straight_from_flatten() {
        // 3 columns x 2 rows, row-major 0..6
        let raster = ElevationRaster::new(
            3,
            2,
            (0..6).map(|v| v as f32).collect(),
            vec![47.1, 47.0],
            vec![-122.0, -121.9, -121.8],
            None,
        )
        .unwrap();

        let lazy = reshape_column_major(flatten(&raster)).unwrap();
        let collected: Vec<RawElevationSample> = flatten(&raster).collect();
        assert_eq!(lazy, reshape_column_major(&collected).unwrap());
        assert_eq!(lazy.shape(), (2, 3));
        assert_eq!(lazy.row(0), Some(&[0.0, 2.0, 4.0][..]));
    }

    #[test]
    fn test_flatten_size_hint_tracks_progress() {
        let raster = ElevationRaster::new(2, 1, vec![1.0, 2.0], vec![0.0], vec![0.0, 1.0], None)
            .unwrap();
        let mut samples = flatten(&raster);
        assert_eq!(samples.len(), 2);
        samples.next();
        assert_eq!(samples.len(), 1);
        samples.next();
        assert_eq!(samples.next(), None);
        assert_eq!(samples.len(), 0);
    }

    #[test]
    fn test_min_max_skips_missing() {
        let grid =
            ElevationGrid::from_row_major(2, 2, vec![5.0, f64::NAN, -3.0, 12.5]).unwrap();
        assert_eq!(grid.min_max(), Some((-3.0, 12.5)));
        assert_eq!(grid.missing_count(), 1);

        let empty = ElevationGrid::filled(1, 1, f64::NAN);
        assert_eq!(empty.min_max(), None);
    }

    #[test]
    fn test_from_row_major_checks_length() {
        assert!(ElevationGrid::from_row_major(2, 3, vec![0.0; 5]).is_err());
        let grid = ElevationGrid::filled(4, 4, 0.0);
        assert_eq!(grid.shape(), (4, 4));
        assert_eq!(grid.get(4, 0), None);
    }
}
