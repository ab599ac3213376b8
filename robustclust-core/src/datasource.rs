//! Data source abstractions feeding the pairwise distance representation.

use crate::{distance::Metric, error::DataSourceError};

/// Abstraction over a collection of items that can yield pairwise distances.
///
/// # Examples
/// ```
/// use robustclust_core::{DataSource, DataSourceError};
///
/// struct Line(Vec<f32>);
///
/// impl DataSource for Line {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "line" }
///     fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
///         let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let src = Line(vec![1.0, 2.0, 4.0]);
/// assert_eq!(src.len(), 3);
/// assert_eq!(src.distance(0, 2)?, 3.0);
/// assert_eq!(src.batch_distances(0, &[1, 2])?, [1.0, 3.0]);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Returns number of items in the source.
    fn len(&self) -> usize;

    /// Returns whether the source contains no items.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable name.
    fn name(&self) -> &str;

    /// Computes the distance between two items.
    ///
    /// # Errors
    /// Implementations must return [`DataSourceError::OutOfBounds`] for
    /// invalid indices.
    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError>;

    /// Computes the distances from `query` to every entry in `candidates`.
    ///
    /// The default implementation calls [`DataSource::distance`] repeatedly.
    ///
    /// # Errors
    /// Returns any [`DataSourceError`] surfaced by [`DataSource::distance`].
    fn batch_distances(
        &self,
        query: usize,
        candidates: &[usize],
    ) -> Result<Vec<f32>, DataSourceError> {
        candidates
            .iter()
            .map(|&candidate| self.distance(query, candidate))
            .collect()
    }
}

/// In-memory `N × D` matrix of `f32` rows compared under a [`Metric`].
///
/// # Examples
/// ```
/// use robustclust_core::{DataSource, DenseMatrix};
///
/// let matrix = DenseMatrix::try_new("demo", vec![vec![0.0, 0.0], vec![3.0, 4.0]])?;
/// assert_eq!(matrix.len(), 2);
/// assert_eq!(matrix.dimension(), 2);
/// assert!((matrix.distance(0, 1)? - 5.0).abs() < 1e-6);
/// # Ok::<(), robustclust_core::DataSourceError>(())
/// ```
#[derive(Clone, Debug)]
pub struct DenseMatrix {
    name: String,
    values: Vec<f32>,
    dimension: usize,
    metric: Metric,
}

impl DenseMatrix {
    /// Builds a Euclidean matrix after validating uniform row dimensions.
    ///
    /// # Errors
    /// Returns [`DataSourceError::EmptyData`] when `rows` is empty,
    /// [`DataSourceError::ZeroDimension`] when rows have no columns, and
    /// [`DataSourceError::DimensionMismatch`] when row lengths differ.
    pub fn try_new(name: impl Into<String>, rows: Vec<Vec<f32>>) -> Result<Self, DataSourceError> {
        let Some(first) = rows.first() else {
            return Err(DataSourceError::EmptyData);
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(DataSourceError::ZeroDimension);
        }
        if let Some(row) = rows.iter().find(|row| row.len() != dimension) {
            return Err(DataSourceError::DimensionMismatch {
                left: dimension,
                right: row.len(),
            });
        }

        Ok(Self {
            name: name.into(),
            values: rows.into_iter().flatten().collect(),
            dimension,
            metric: Metric::Euclidean,
        })
    }

    /// Replaces the metric used by [`DataSource::distance`].
    #[must_use]
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the configured metric.
    #[must_use]
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the number of columns per row.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns row `index`, if present.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimension)?;
        self.values.get(start..start + self.dimension)
    }
}

impl DataSource for DenseMatrix {
    fn len(&self) -> usize {
        self.values.len() / self.dimension
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
        let left = self.row(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
        let right = self.row(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
        self.metric
            .distance(left, right)
            .map_err(|error| DataSourceError::Kernel {
                left: i,
                right: j,
                error,
            })
    }
}
