//! Error types for the ecluster core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::cloud::PointId;

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

/// An error produced by a [`crate::ProximityOracle`] query.
///
/// Query failures are local: the engine skips expansion from the failing point
/// and keeps going.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum OracleError {
    /// The queried point is not covered by the oracle.
    #[error("query point {query} is outside the searchable set of {len} points")]
    QueryOutOfBounds {
        /// Identifier passed to the query.
        query: PointId,
        /// Number of points the oracle can answer for.
        len: usize,
    },
    /// The oracle was never given data to search.
    #[error("proximity oracle has no input cloud")]
    MissingInput,
    /// The oracle rejected the search radius.
    #[error("search radius must be finite and non-negative")]
    InvalidRadius,
    /// The cloud has more dimensions than the spatial index supports.
    #[error("cloud dimension {dimension} exceeds the indexable maximum of {max}")]
    UnsupportedDimension {
        /// Dimension of the cloud.
        dimension: usize,
        /// Largest dimension the index accepts.
        max: usize,
    },
    /// An index handed to the oracle at construction names no cloud point.
    #[error("index {index} is out of bounds for a cloud of {len} points")]
    IndexOutOfBounds {
        /// Offending identifier.
        index: PointId,
        /// Number of points in the cloud.
        len: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`OracleError`] variants.
    enum OracleErrorCode for OracleError {
        /// The queried point is not covered by the oracle.
        QueryOutOfBounds => QueryOutOfBounds { .. } => "ORACLE_QUERY_OUT_OF_BOUNDS",
        /// The oracle was never given data to search.
        MissingInput => MissingInput => "ORACLE_MISSING_INPUT",
        /// The oracle rejected the search radius.
        InvalidRadius => InvalidRadius => "ORACLE_INVALID_RADIUS",
        /// The cloud has more dimensions than the spatial index supports.
        UnsupportedDimension => UnsupportedDimension { .. } => "ORACLE_UNSUPPORTED_DIMENSION",
        /// An index handed to the oracle at construction names no cloud point.
        IndexOutOfBounds => IndexOutOfBounds { .. } => "ORACLE_INDEX_OUT_OF_BOUNDS",
    }
}

/// Error raised when an extraction call is rejected at entry.
///
/// Every variant aborts the whole call before any cluster is produced, so the
/// caller never observes partial output.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExtractionError {
    /// The index subset does not match the oracle's own index cardinality.
    #[error("oracle was built over {oracle} indices but {supplied} were supplied")]
    OracleIndexMismatch {
        /// Cardinality the oracle declares.
        oracle: usize,
        /// Cardinality of the caller's index subset.
        supplied: usize,
    },
    /// The oracle was built over a cloud of a different size.
    #[error("oracle was built over a cloud of {oracle} points but the input cloud has {cloud}")]
    CloudSizeMismatch {
        /// Cloud size the oracle reports.
        oracle: usize,
        /// Size of the cloud passed to the call.
        cloud: usize,
    },
    /// The normal cloud is not parallel to the point cloud.
    #[error("input cloud has {points} points but {normals} normals were supplied")]
    NormalCountMismatch {
        /// Number of points in the cloud.
        points: usize,
        /// Number of normals supplied.
        normals: usize,
    },
    /// The index subset references a position outside the cloud.
    #[error("index {index} is out of bounds for a cloud of {len} points")]
    IndexOutOfBounds {
        /// The offending identifier.
        index: PointId,
        /// Size of the cloud.
        len: usize,
    },
    /// Tolerance must be a finite, non-negative radius.
    #[error("cluster tolerance must be finite and non-negative (got {got})")]
    InvalidTolerance {
        /// The rejected tolerance.
        got: f32,
    },
    /// Minimum cluster size exceeds the maximum.
    #[error("min_cluster_size ({min}) must not exceed max_cluster_size ({max})")]
    InvalidClusterBounds {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ExtractionError`] variants.
    enum ExtractionErrorCode for ExtractionError {
        /// The index subset does not match the oracle's own index cardinality.
        OracleIndexMismatch => OracleIndexMismatch { .. } => "EXTRACTION_ORACLE_INDEX_MISMATCH",
        /// The oracle was built over a cloud of a different size.
        CloudSizeMismatch => CloudSizeMismatch { .. } => "EXTRACTION_CLOUD_SIZE_MISMATCH",
        /// The normal cloud is not parallel to the point cloud.
        NormalCountMismatch => NormalCountMismatch { .. } => "EXTRACTION_NORMAL_COUNT_MISMATCH",
        /// The index subset references a position outside the cloud.
        IndexOutOfBounds => IndexOutOfBounds { .. } => "EXTRACTION_INDEX_OUT_OF_BOUNDS",
        /// Tolerance must be a finite, non-negative radius.
        InvalidTolerance => InvalidTolerance { .. } => "EXTRACTION_INVALID_TOLERANCE",
        /// Minimum cluster size exceeds the maximum.
        InvalidClusterBounds => InvalidClusterBounds { .. } => "EXTRACTION_INVALID_CLUSTER_BOUNDS",
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ExtractionError>;

/// Error raised while assembling a [`crate::DenseCloud`] or [`crate::NormalCloud`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CloudError {
    /// Points must have at least one coordinate.
    #[error("point coordinates must have positive dimension")]
    ZeroDimension,
    /// The flat buffer does not divide into whole points.
    #[error("buffer of {len} values is not a multiple of dimension {dimension}")]
    RaggedBuffer {
        /// Number of values supplied.
        len: usize,
        /// Expected values per point.
        dimension: usize,
    },
    /// A row had a different dimension from the first row.
    #[error("row {row} has dimension {actual} but expected {expected}")]
    DimensionMismatch {
        /// Offending row.
        row: usize,
        /// Dimension of the first row.
        expected: usize,
        /// Dimension of the offending row.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`CloudError`] variants.
    enum CloudErrorCode for CloudError {
        /// Points must have at least one coordinate.
        ZeroDimension => ZeroDimension => "CLOUD_ZERO_DIMENSION",
        /// The flat buffer does not divide into whole points.
        RaggedBuffer => RaggedBuffer { .. } => "CLOUD_RAGGED_BUFFER",
        /// A row had a different dimension from the first row.
        DimensionMismatch => DimensionMismatch { .. } => "CLOUD_DIMENSION_MISMATCH",
    }
}
