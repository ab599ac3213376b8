//! Condensed pairwise distance and affinity representations.
//!
//! Distances are computed once from a [`DataSource`] and stored as the upper
//! triangle of the `N × N` matrix in row-major order, so the pair `(i, j)`
//! with `i < j` lives at `N·i − i·(i+1)/2 + j − i − 1`. Affinities reuse the
//! same layout. Both are immutable after construction.

use std::ops::Deref;

use crate::{datasource::DataSource, error::DataSourceError, neighbourhood::NeighbourhoodLabels};

/// Symmetric matrix stored as its condensed upper triangle plus a constant
/// diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct CondensedMatrix {
    points: usize,
    values: Vec<f32>,
    diagonal: f32,
}

impl CondensedMatrix {
    /// Number of points covered by the matrix.
    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }

    /// Condensed upper-triangle values.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Looks up the value for the pair `(i, j)` in either order.
    ///
    /// # Panics
    /// Panics when `i` or `j` is not below [`Self::points`].
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(
            i < self.points && j < self.points,
            "pair ({i}, {j}) is outside a matrix over {} points",
            self.points
        );
        if i == j {
            return self.diagonal;
        }
        let (low, high) = if i < j { (i, j) } else { (j, i) };
        self.values[condensed_index(self.points, low, high)]
    }

    /// Extracts the `rows × cols` sub-block.
    ///
    /// # Panics
    /// Panics when any index is not below [`Self::points`].
    #[must_use]
    pub fn block(&self, rows: &[usize], cols: &[usize]) -> PairwiseBlock {
        let values = rows
            .iter()
            .flat_map(|&row| cols.iter().map(move |&col| self.get(row, col)))
            .collect();
        PairwiseBlock {
            rows: rows.len(),
            cols: cols.len(),
            values,
        }
    }
}

fn condensed_index(points: usize, low: usize, high: usize) -> usize {
    points * low - low * (low + 1) / 2 + high - low - 1
}

/// Dense sub-block returned by [`CondensedMatrix::block`].
#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseBlock {
    rows: usize,
    cols: usize,
    values: Vec<f32>,
}

impl PairwiseBlock {
    /// Returns `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the value at (`row`, `col`) of the block.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col).copied()
    }

    /// Returns one row of the block.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.values.get(start..start + self.cols)
    }

    /// Minimum of each column; `+∞` for an empty column.
    #[must_use]
    pub fn column_minima(&self) -> Vec<f32> {
        self.fold_columns(f32::INFINITY, f32::min)
    }

    /// Maximum of each column; `−∞` for an empty column.
    #[must_use]
    pub fn column_maxima(&self) -> Vec<f32> {
        self.fold_columns(f32::NEG_INFINITY, f32::max)
    }

    fn fold_columns(&self, init: f32, fold: fn(f32, f32) -> f32) -> Vec<f32> {
        let mut out = vec![init; self.cols];
        for row in self.values.chunks_exact(self.cols.max(1)) {
            for (acc, &value) in out.iter_mut().zip(row) {
                *acc = fold(*acc, value);
            }
        }
        out
    }
}

/// Pairwise distances between every pair of points.
///
/// # Examples
/// ```
/// use robustclust_core::{DenseMatrix, PairwiseDistances};
///
/// let data = DenseMatrix::try_new("line", vec![vec![0.0], vec![1.0], vec![3.0]])?;
/// let distances = PairwiseDistances::from_source(&data)?;
/// assert_eq!(distances.values(), &[1.0, 3.0, 2.0]);
/// assert_eq!(distances.get(2, 0), 3.0);
/// assert_eq!(distances.get(1, 1), 0.0);
/// # Ok::<(), robustclust_core::DataSourceError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PairwiseDistances(CondensedMatrix);

impl PairwiseDistances {
    /// Computes every pairwise distance of `source`.
    ///
    /// # Errors
    /// Returns [`DataSourceError::EmptyData`] for an empty source,
    /// propagates failures from [`DataSource::batch_distances`], and returns
    /// [`DataSourceError::InvalidDistance`] for negative or non-finite values.
    pub fn from_source<D: DataSource + ?Sized>(source: &D) -> Result<Self, DataSourceError> {
        let points = source.len();
        if points == 0 {
            return Err(DataSourceError::EmptyData);
        }
        let mut values = Vec::with_capacity(points * (points - 1) / 2);
        for left in 0..points {
            let candidates: Vec<usize> = (left + 1..points).collect();
            let row = source.batch_distances(left, &candidates)?;
            for (&right, &value) in candidates.iter().zip(&row) {
                check_distance(left, right, value)?;
            }
            values.extend(row);
        }
        Ok(Self(CondensedMatrix {
            points,
            values,
            diagonal: 0.0,
        }))
    }

    /// Wraps precomputed condensed distances over `points` items.
    ///
    /// # Errors
    /// Returns [`DataSourceError::EmptyData`] when `points == 0`,
    /// [`DataSourceError::DimensionMismatch`] when `values` does not hold
    /// `points·(points−1)/2` entries, and
    /// [`DataSourceError::InvalidDistance`] for negative or non-finite values.
    pub fn from_condensed(points: usize, values: Vec<f32>) -> Result<Self, DataSourceError> {
        if points == 0 {
            return Err(DataSourceError::EmptyData);
        }
        let expected = points * (points - 1) / 2;
        if values.len() != expected {
            return Err(DataSourceError::DimensionMismatch {
                left: expected,
                right: values.len(),
            });
        }
        for left in 0..points {
            for right in left + 1..points {
                check_distance(left, right, values[condensed_index(points, left, right)])?;
            }
        }
        Ok(Self(CondensedMatrix {
            points,
            values,
            diagonal: 0.0,
        }))
    }

    /// Median of the off-diagonal distances, `0` for a single point.
    #[must_use]
    pub fn median(&self) -> f32 {
        let mut sorted = self.0.values.clone();
        let count = sorted.len();
        if count == 0 {
            return 0.0;
        }
        let mid = count / 2;
        let (lower, upper, _) = sorted.select_nth_unstable_by(mid, f32::total_cmp);
        let upper = *upper;
        if count % 2 == 1 {
            return upper;
        }
        let below = lower.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (below + upper) / 2.0
    }
}

impl Deref for PairwiseDistances {
    type Target = CondensedMatrix;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn check_distance(left: usize, right: usize, value: f32) -> Result<(), DataSourceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DataSourceError::InvalidDistance { left, right, value })
    }
}

/// Similarity scores derived from [`PairwiseDistances`] by a Gaussian kernel.
///
/// `a(d) = exp(−d² / (2σ²))` with `σ` the median pairwise distance (or `1`
/// when the median is zero), so values lie in `[0, 1]` and the diagonal is
/// exactly `1`. Pairs more than about thirteen bandwidths apart underflow
/// to `0`.
///
/// # Examples
/// ```
/// use robustclust_core::{Affinities, PairwiseDistances};
///
/// let distances = PairwiseDistances::from_condensed(3, vec![1.0, 2.0, 3.0])?;
/// let affinities = Affinities::from_distances(&distances);
/// assert_eq!(affinities.get(1, 1), 1.0);
/// assert!(affinities.get(0, 1) > affinities.get(0, 2));
/// # Ok::<(), robustclust_core::DataSourceError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Affinities {
    matrix: CondensedMatrix,
    bandwidth: f32,
}

impl Affinities {
    /// Converts distances into affinities.
    #[must_use]
    pub fn from_distances(distances: &PairwiseDistances) -> Self {
        let median = distances.median();
        let bandwidth = if median > 0.0 { median } else { 1.0 };
        let scale = 2.0 * f64::from(bandwidth) * f64::from(bandwidth);
        let values = distances
            .values()
            .iter()
            .map(|&d| (-(f64::from(d) * f64::from(d)) / scale).exp() as f32)
            .collect();
        Self {
            matrix: CondensedMatrix {
                points: distances.points(),
                values,
                diagonal: 1.0,
            },
            bandwidth,
        }
    }

    /// Kernel bandwidth `σ` used by the transform.
    #[must_use]
    pub fn bandwidth(&self) -> f32 {
        self.bandwidth
    }
}

impl Deref for Affinities {
    type Target = CondensedMatrix;

    fn deref(&self) -> &Self::Target {
        &self.matrix
    }
}

/// Dense `N × N` must-link matrix implied by a neighbourhood-label vector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkMatrix {
    points: usize,
    values: Vec<u8>,
}

impl LinkMatrix {
    /// Number of rows (and columns).
    #[must_use]
    pub fn points(&self) -> usize {
        self.points
    }

    /// Returns `1` when `i` and `j` share a neighbourhood, `0` otherwise.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<u8> {
        if i >= self.points || j >= self.points {
            return None;
        }
        self.values.get(i * self.points + j).copied()
    }

    /// Iterates over the matrix rows.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.values.chunks_exact(self.points.max(1))
    }
}

/// Expands neighbourhood labels into an all-pairs link matrix.
///
/// Entries are `1` for every pair sharing a nonzero label, including the
/// diagonal of assigned points, and `0` for pairs with differing labels or
/// involving an unassigned point.
///
/// # Examples
/// ```
/// use robustclust_core::{NeighbourhoodLabels, expand_links};
///
/// let labels = NeighbourhoodLabels::from_raw(vec![1, 0, 1, 2]);
/// let links = expand_links(&labels);
/// assert_eq!(links.get(0, 2), Some(1));
/// assert_eq!(links.get(0, 3), Some(0));
/// assert_eq!(links.get(1, 1), Some(0));
/// ```
#[must_use]
pub fn expand_links(labels: &NeighbourhoodLabels) -> LinkMatrix {
    let raw = labels.as_slice();
    let values = raw
        .iter()
        .flat_map(|&left| {
            raw.iter()
                .map(move |&right| u8::from(left != 0 && left == right))
        })
        .collect();
    LinkMatrix {
        points: raw.len(),
        values,
    }
}
