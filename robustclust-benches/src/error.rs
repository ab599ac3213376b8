//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of `.expect()`.

use crate::blobs::BlobError;
use robustclust_core::{DataSourceError, HierarchyError, SelectionError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic blob generation failed.
    #[error("blob generation failed: {0}")]
    Blobs(#[from] BlobError),
    /// A data-source distance computation failed.
    #[error("data source error: {0}")]
    DataSource(#[from] DataSourceError),
    /// Constraint selection rejected its input.
    #[error("constraint selection failed: {0}")]
    Selection(#[from] SelectionError),
    /// Merge-tree construction failed.
    #[error("merge tree construction failed: {0}")]
    Hierarchy(#[from] HierarchyError),
}
