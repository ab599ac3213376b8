//! Error types for the robustclust core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::distance::DistanceError;
use crate::hierarchy::HierarchyError;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::DataSource`] operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds {
        /// The requested row that exceeded the source bounds.
        index: usize,
    },
    /// Rows had different dimensions.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch {
        /// Dimensionality of the first row.
        left: usize,
        /// Dimensionality of the offending row.
        right: usize,
    },
    /// Data source contained no rows.
    #[error("data source contains no rows")]
    EmptyData,
    /// Data source rows must have positive dimension.
    #[error("data source vectors must have positive dimension")]
    ZeroDimension,
    /// A distance was negative, NaN, or infinite.
    #[error("invalid distance {value} between items {left} and {right}")]
    InvalidDistance {
        /// First item of the pair.
        left: usize,
        /// Second item of the pair.
        right: usize,
        /// Offending distance value.
        value: f32,
    },
    /// The distance kernel rejected a pair of rows.
    #[error("distance between items {left} and {right} failed: {error}")]
    Kernel {
        /// First item of the pair.
        left: usize,
        /// Second item of the pair.
        right: usize,
        #[source]
        /// Kernel validation failure.
        error: DistanceError,
    },
}

define_error_codes! {
    /// Stable codes describing [`DataSourceError`] variants.
    enum DataSourceErrorCode for DataSourceError {
        /// Requested index was outside the source's bounds.
        OutOfBounds => OutOfBounds { .. } => "DATA_SOURCE_OUT_OF_BOUNDS",
        /// Rows had different dimensions.
        DimensionMismatch => DimensionMismatch { .. } => "DATA_SOURCE_DIMENSION_MISMATCH",
        /// Data source contained no rows.
        EmptyData => EmptyData => "DATA_SOURCE_EMPTY",
        /// Data source rows must have positive dimension.
        ZeroDimension => ZeroDimension => "DATA_SOURCE_ZERO_DIMENSION",
        /// A distance was negative, NaN, or infinite.
        InvalidDistance => InvalidDistance { .. } => "DATA_SOURCE_INVALID_DISTANCE",
        /// The distance kernel rejected a pair of rows.
        Kernel => Kernel { .. } => "DATA_SOURCE_KERNEL_FAILURE",
    }
}

/// Error type produced when configuring or running a
/// [`crate::ConstraintSelector`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SelectionError {
    /// The strategy name is not one of `rand`, `ffqs`, `mmffqs`, `acd`.
    #[error("unknown query method `{name}`; expected one of rand, ffqs, mmffqs, acd")]
    UnknownMethod {
        /// Name supplied by the caller.
        name: Arc<str>,
    },
    /// The answer error rate must be a probability.
    #[error("error_rate must lie in [0, 1] (got {got})")]
    InvalidErrorRate {
        /// The rejected rate.
        got: f64,
    },
    /// The label vector does not cover every point.
    #[error("data source `{data_source}` has {points} items but {labels} labels were given")]
    LabelCountMismatch {
        /// Identifier for the data source.
        data_source: Arc<str>,
        /// Number of items in the data source.
        points: usize,
        /// Number of labels supplied.
        labels: usize,
    },
    /// Pairwise queries need at least two points.
    #[error("data source `{data_source}` has {points} items; at least 2 are required")]
    TooFewPoints {
        /// Identifier for the data source.
        data_source: Arc<str>,
        /// Number of items in the data source.
        points: usize,
    },
    /// Every point carries the same label, so no query is informative.
    #[error("labels for data source `{data_source}` contain a single class")]
    SingleClass {
        /// Identifier for the data source.
        data_source: Arc<str>,
    },
    /// A [`crate::DataSource`] operation failed while computing distances.
    #[error("data source `{data_source}` failed: {error}")]
    DataSource {
        /// Identifier for the data source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying data source error.
        error: DataSourceError,
    },
    /// Building the merge tree for active class discovery failed.
    #[error("merge tree construction failed: {0}")]
    Hierarchy(#[from] HierarchyError),
}

define_error_codes! {
    /// Stable codes describing [`SelectionError`] variants.
    enum SelectionErrorCode for SelectionError {
        /// The strategy name is not recognised.
        UnknownMethod => UnknownMethod { .. } => "SELECTION_UNKNOWN_METHOD",
        /// The answer error rate must be a probability.
        InvalidErrorRate => InvalidErrorRate { .. } => "SELECTION_INVALID_ERROR_RATE",
        /// The label vector does not cover every point.
        LabelCountMismatch => LabelCountMismatch { .. } => "SELECTION_LABEL_COUNT_MISMATCH",
        /// Pairwise queries need at least two points.
        TooFewPoints => TooFewPoints { .. } => "SELECTION_TOO_FEW_POINTS",
        /// Every point carries the same label.
        SingleClass => SingleClass { .. } => "SELECTION_SINGLE_CLASS",
        /// A data source operation failed.
        DataSourceFailure => DataSource { .. } => "SELECTION_DATA_SOURCE_FAILURE",
        /// Building the merge tree failed.
        HierarchyFailure => Hierarchy { .. } => "SELECTION_HIERARCHY_FAILURE",
    }
}

impl SelectionError {
    /// Retrieve the inner [`DataSourceErrorCode`] when the error originated in a
    /// [`crate::DataSource`].
    #[must_use]
    pub const fn data_source_code(&self) -> Option<DataSourceErrorCode> {
        match self {
            Self::DataSource { error, .. } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SelectionError>;
