//! Benchmark parameter types.

use std::fmt;

use robustclust_core::QueryMethod;

/// Parameters for a constraint-selection benchmark run.
#[derive(Clone, Debug)]
pub struct SelectionBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
    /// Query method under measurement.
    pub method: QueryMethod,
}

impl fmt::Display for SelectionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={},method={}", self.point_count, self.method)
    }
}

/// Parameters for a merge-tree benchmark run.
#[derive(Clone, Debug)]
pub struct LinkageBenchParams {
    /// Number of points in the dataset.
    pub point_count: usize,
}

impl fmt::Display for LinkageBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n={}", self.point_count)
    }
}
