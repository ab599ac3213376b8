//! Distance kernels used to build the pairwise distance representation.
//!
//! Both kernels validate their inputs and accumulate in `f64` before
//! narrowing, so callers get a finite, non-negative `f32` or a descriptive
//! [`DistanceError`].

use core::fmt;

use thiserror::Error;

/// Identifies whether an error was produced while inspecting the left or right
/// vector argument.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VectorKind {
    /// Value originating from the first argument.
    Left,
    /// Value originating from the second argument.
    Right,
}

impl fmt::Display for VectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Errors emitted while computing distances.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DistanceError {
    /// Either input vector had zero length.
    #[error("vectors must have positive dimension")]
    ZeroLength,
    /// Input vectors had different lengths.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Length of the left vector.
        left: usize,
        /// Length of the right vector.
        right: usize,
    },
    /// Encountered a non-finite value in one of the vectors.
    #[error("{which} vector contains a non-finite value at index {index}: {value}")]
    NonFinite {
        /// Vector holding the value.
        which: VectorKind,
        /// Position of the value.
        index: usize,
        /// The offending value.
        value: f32,
    },
    /// Cosine distance is undefined for zero-magnitude vectors.
    #[error("{which} vector has zero magnitude")]
    ZeroMagnitude {
        /// Vector with zero magnitude.
        which: VectorKind,
    },
}

/// Convenient alias for distance computations.
pub type Result<T> = core::result::Result<T, DistanceError>;

/// Metric applied between rows of a [`crate::DenseMatrix`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Metric {
    /// Straight-line distance.
    #[default]
    Euclidean,
    /// One minus cosine similarity, in `[0, 2]`.
    Cosine,
}

impl Metric {
    /// Applies the metric to two vectors.
    ///
    /// # Errors
    /// Propagates the validation errors of [`euclidean_distance`] and
    /// [`cosine_distance`].
    pub fn distance(self, left: &[f32], right: &[f32]) -> Result<f32> {
        match self {
            Self::Euclidean => euclidean_distance(left, right),
            Self::Cosine => cosine_distance(left, right),
        }
    }
}

/// Computes the Euclidean distance between two vectors.
///
/// # Examples
///
/// ```
/// use robustclust_core::{DistanceError, euclidean_distance};
///
/// fn main() -> Result<(), DistanceError> {
///     let distance = euclidean_distance(&[1.0, 2.0, 3.0], &[4.0, 6.0, 8.0])?;
///     assert!((distance - 7.071_068).abs() < 1e-6);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`DistanceError::ZeroLength`] when any input is empty.
/// - [`DistanceError::DimensionMismatch`] when input lengths differ.
/// - [`DistanceError::NonFinite`] when a value is NaN or infinite.
pub fn euclidean_distance(left: &[f32], right: &[f32]) -> Result<f32> {
    validate(left, right)?;

    let sum: f64 = left
        .iter()
        .zip(right)
        .map(|(&l, &r)| {
            let diff = f64::from(l) - f64::from(r);
            diff * diff
        })
        .sum();

    Ok(sum.sqrt() as f32)
}

/// Computes the cosine distance between two vectors.
///
/// # Examples
///
/// ```
/// use robustclust_core::{DistanceError, cosine_distance};
///
/// fn main() -> Result<(), DistanceError> {
///     let orthogonal = cosine_distance(&[1.0, 0.0], &[0.0, 1.0])?;
///     assert!((orthogonal - 1.0).abs() < 1e-6);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`DistanceError::ZeroLength`] when any input is empty.
/// - [`DistanceError::DimensionMismatch`] when input lengths differ.
/// - [`DistanceError::NonFinite`] when a value is NaN or infinite.
/// - [`DistanceError::ZeroMagnitude`] when either vector has zero L2 norm.
pub fn cosine_distance(left: &[f32], right: &[f32]) -> Result<f32> {
    validate(left, right)?;

    let mut dot = 0.0f64;
    let mut left_squares = 0.0f64;
    let mut right_squares = 0.0f64;
    for (&l, &r) in left.iter().zip(right) {
        dot += f64::from(l) * f64::from(r);
        left_squares += f64::from(l) * f64::from(l);
        right_squares += f64::from(r) * f64::from(r);
    }

    if left_squares == 0.0 {
        return Err(DistanceError::ZeroMagnitude {
            which: VectorKind::Left,
        });
    }
    if right_squares == 0.0 {
        return Err(DistanceError::ZeroMagnitude {
            which: VectorKind::Right,
        });
    }

    let similarity = dot / (left_squares.sqrt() * right_squares.sqrt());
    // Rounding can push the similarity slightly outside [-1, 1].
    Ok((1.0 - similarity.clamp(-1.0, 1.0)) as f32)
}

fn validate(left: &[f32], right: &[f32]) -> Result<()> {
    if left.is_empty() || right.is_empty() {
        return Err(DistanceError::ZeroLength);
    }
    if left.len() != right.len() {
        return Err(DistanceError::DimensionMismatch {
            left: left.len(),
            right: right.len(),
        });
    }
    ensure_finite(left, VectorKind::Left)?;
    ensure_finite(right, VectorKind::Right)
}

fn ensure_finite(values: &[f32], which: VectorKind) -> Result<()> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(DistanceError::NonFinite {
            which,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}
