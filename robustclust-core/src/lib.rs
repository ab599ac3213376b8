//! Robustclust core library.
//!
//! Selects budget-bounded pairwise queries for constrained clustering and
//! labels them through an oracle, optionally with simulated answer noise.

mod builder;
mod constraint;
mod datasource;
mod distance;
mod error;
mod hierarchy;
mod neighbourhood;
mod oracle;
mod pairwise;
mod selector;
mod strategy;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{ConstraintSelectorBuilder, QueryMethod, SelectionOptions},
    constraint::{Constraint, ConstraintSet},
    datasource::{DataSource, DenseMatrix},
    distance::{DistanceError, Metric, VectorKind, cosine_distance, euclidean_distance},
    error::{DataSourceError, DataSourceErrorCode, Result, SelectionError, SelectionErrorCode},
    hierarchy::{HierarchyError, HierarchyErrorCode, Merge, MergeTree},
    neighbourhood::{NeighbourhoodId, NeighbourhoodLabels},
    oracle::{LabelOracle, Oracle},
    pairwise::{
        Affinities, CondensedMatrix, LinkMatrix, PairwiseBlock, PairwiseDistances, expand_links,
    },
    selector::{ConstraintSelector, get_constraints},
    strategy::{
        ActiveClassDiscovery, FarthestFirst, MinimaxFarthestFirst, QueryPair, QueryPlan,
        RandomPairs,
    },
};
