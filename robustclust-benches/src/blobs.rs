//! Labelled Gaussian blobs for selection benchmarks.
//!
//! Centroids sit evenly on a circle of radius `separation` in the first two
//! dimensions; further dimensions get a small random offset. Points are
//! dealt to centroids round-robin, so labels cycle `0, 1, .., k - 1`.

use std::f32::consts::PI;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use robustclust_core::{DataSourceError, DenseMatrix};

/// Errors raised while generating blobs.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
    /// The requested cluster count was zero.
    #[error("cluster count must be greater than zero")]
    ZeroClusters,
    /// More clusters than points were requested.
    #[error("cluster count ({cluster_count}) must not exceed point count ({point_count})")]
    ClusterCountExceedsPointCount {
        /// Number of clusters requested.
        cluster_count: usize,
        /// Number of points requested.
        point_count: usize,
    },
    /// A floating-point parameter was non-finite or non-positive.
    #[error("invalid floating-point parameter `{parameter}`")]
    InvalidFloatParameter {
        /// Name of the invalid parameter.
        parameter: &'static str,
    },
    /// The generated rows were rejected by the matrix constructor.
    #[error("generated rows are not a valid matrix: {0}")]
    DataSource(#[from] DataSourceError),
}

/// Configuration for [`generate_blobs`].
#[derive(Clone, Debug)]
pub struct BlobConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Number of blobs, and so ground-truth classes.
    pub cluster_count: usize,
    /// Dimensionality of each point.
    pub dimensions: usize,
    /// Radius of the circle the centroids sit on.
    pub separation: f32,
    /// Seed for centroid placement and sampling.
    pub seed: u64,
}

impl BlobConfig {
    /// Well-separated two-dimensional blobs.
    #[must_use]
    pub const fn planar(point_count: usize, cluster_count: usize, seed: u64) -> Self {
        Self {
            point_count,
            cluster_count,
            dimensions: 2,
            separation: 10.0,
            seed,
        }
    }

    const fn validate(&self) -> Result<(), BlobError> {
        if self.point_count == 0 {
            return Err(BlobError::ZeroPoints);
        }
        if self.dimensions == 0 {
            return Err(BlobError::ZeroDimensions);
        }
        if self.cluster_count == 0 {
            return Err(BlobError::ZeroClusters);
        }
        if self.cluster_count > self.point_count {
            return Err(BlobError::ClusterCountExceedsPointCount {
                cluster_count: self.cluster_count,
                point_count: self.point_count,
            });
        }
        if !self.separation.is_finite() || self.separation <= 0.0 {
            return Err(BlobError::InvalidFloatParameter {
                parameter: "separation",
            });
        }
        Ok(())
    }
}

/// Generates labelled blobs as a Euclidean [`DenseMatrix`].
///
/// # Errors
/// Returns [`BlobError`] when the configuration is invalid.
#[expect(
    clippy::float_arithmetic,
    reason = "Gaussian sampling requires floating-point arithmetic"
)]
pub fn generate_blobs(config: &BlobConfig) -> Result<(DenseMatrix, Vec<usize>), BlobError> {
    config.validate()?;

    let centroids = centroids(config, &mut SmallRng::seed_from_u64(config.seed));
    let mut rng = SmallRng::seed_from_u64(config.seed ^ 0xA5A5_A5A5_A5A5_A5A5_u64);
    let mut rows = Vec::with_capacity(config.point_count);
    let mut labels = Vec::with_capacity(config.point_count);
    for (label, centroid) in centroids
        .iter()
        .enumerate()
        .cycle()
        .take(config.point_count)
    {
        labels.push(label);
        let row = centroid
            .iter()
            .map(|centre| standard_normal_sample(&mut rng).map(|noise| centre + noise))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    let matrix = DenseMatrix::try_new("synthetic-blobs", rows)?;
    Ok((matrix, labels))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "centroid placement uses index-derived floating-point angles"
)]
#[expect(
    clippy::float_arithmetic,
    reason = "centroid placement uses trigonometric expressions"
)]
fn centroids(config: &BlobConfig, rng: &mut SmallRng) -> Vec<Vec<f32>> {
    (0..config.cluster_count)
        .map(|cluster| {
            let angle = (cluster as f32 / config.cluster_count as f32) * (2.0 * PI);
            let mut centroid = vec![0.0_f32; config.dimensions];
            if let Some(value) = centroid.get_mut(0) {
                *value = config.separation * angle.cos();
            }
            if let Some(value) = centroid.get_mut(1) {
                *value = config.separation * angle.sin();
            }
            for value in centroid.iter_mut().skip(2) {
                *value = rng.gen_range((-0.2 * config.separation)..(0.2 * config.separation));
            }
            centroid
        })
        .collect()
}

#[expect(
    clippy::float_arithmetic,
    reason = "Box-Muller transform requires floating-point arithmetic"
)]
fn standard_normal_sample(rng: &mut SmallRng) -> Result<f32, BlobError> {
    let u1 = rng.gen_range(0.0_f32..1.0_f32).max(f32::EPSILON);
    let u2 = rng.gen_range(0.0_f32..1.0_f32);
    let sample = (-2.0_f32 * u1.ln()).sqrt() * (2.0_f32 * PI * u2).cos();
    if sample.is_finite() {
        Ok(sample)
    } else {
        Err(BlobError::InvalidFloatParameter {
            parameter: "standard_normal_sample",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robustclust_core::DataSource;
    use rstest::rstest;

    #[test]
    fn labels_cycle_through_clusters() {
        let (matrix, labels) = generate_blobs(&BlobConfig::planar(7, 3, 11)).expect("valid config");
        assert_eq!(matrix.len(), 7);
        assert_eq!(labels, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn same_seed_repeats_exactly() {
        let config = BlobConfig {
            dimensions: 4,
            ..BlobConfig::planar(12, 2, 3)
        };
        let (first, _) = generate_blobs(&config).expect("valid config");
        let (second, _) = generate_blobs(&config).expect("valid config");
        for index in 0..12 {
            assert_eq!(first.row(index), second.row(index));
        }
    }

    #[test]
    fn blobs_are_closer_within_than_across() {
        let config = BlobConfig {
            separation: 100.0,
            ..BlobConfig::planar(20, 2, 5)
        };
        let (matrix, _) = generate_blobs(&config).expect("valid config");
        let within = matrix.distance(0, 2).expect("in bounds");
        let across = matrix.distance(0, 1).expect("in bounds");
        assert!(within < across, "within {within} vs across {across}");
    }

    #[rstest]
    #[case(BlobConfig::planar(0, 1, 0), "point count must be greater than zero")]
    #[case(BlobConfig::planar(3, 0, 0), "cluster count must be greater than zero")]
    #[case(
        BlobConfig::planar(2, 3, 0),
        "cluster count (3) must not exceed point count (2)"
    )]
    #[case(
        BlobConfig { dimensions: 0, ..BlobConfig::planar(3, 1, 0) },
        "dimension count must be greater than zero"
    )]
    #[case(
        BlobConfig { separation: f32::NAN, ..BlobConfig::planar(3, 1, 0) },
        "invalid floating-point parameter `separation`"
    )]
    fn rejects_invalid_configs(#[case] config: BlobConfig, #[case] message: &str) {
        let err = generate_blobs(&config).expect_err("config is invalid");
        assert_eq!(err.to_string(), message);
    }
}
