//! Benchmark support crate for robustclust.
//!
//! Provides labelled synthetic datasets and parameter types used by the
//! Criterion benchmarks for query selection and average-linkage
//! construction.

pub mod blobs;
pub mod error;
pub mod params;
