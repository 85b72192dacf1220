use arrow_schema::{ArrowError, DataType};
use ecluster_core::CloudError;
use thiserror::Error;

/// Error raised while loading a point cloud from Parquet.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DenseCloudProviderError {
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound { column: String },
    #[error("column `{column}` must be a FixedSizeList<Float32, _> but found {actual:?}")]
    InvalidColumnType { column: String, actual: DataType },
    #[error("column `{column}` must hold Float32 values but found {actual:?}")]
    InvalidListValueType { column: String, actual: DataType },
    #[error("column `{column}` has invalid FixedSizeList dimension {actual}")]
    InvalidDimension { column: String, actual: i32 },
    #[error("normal column `{column}` must have dimension 3 but has {actual}")]
    InvalidNormalDimension { column: String, actual: usize },
    #[error("column `{column}` is nullable (nullable child: {nullable_child})")]
    NullableField { column: String, nullable_child: bool },
    #[error("column `{column}` row {row} is null")]
    NullRow { column: String, row: usize },
    #[error("column `{column}` row {row} contains null value at position {value_index}")]
    NullValue {
        column: String,
        row: usize,
        value_index: usize,
    },
    #[error("column `{column}` row {row} has length {actual} but expected {expected}")]
    InvalidRowLength {
        column: String,
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cloud with {rows} rows and dimension {dimension} exceeds capacity limits")]
    CapacityOverflow { rows: usize, dimension: usize },
    #[error("inconsistent dimensions across batches: expected {expected}, got {actual}")]
    InconsistentBatchDimension { expected: usize, actual: usize },
    #[error("invalid cloud: {0}")]
    Cloud(#[from] CloudError),
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl DenseCloudProviderError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound { .. } => "DENSE_COLUMN_NOT_FOUND",
            Self::InvalidColumnType { .. } => "DENSE_INVALID_COLUMN_TYPE",
            Self::InvalidListValueType { .. } => "DENSE_INVALID_LIST_VALUE_TYPE",
            Self::InvalidDimension { .. } => "DENSE_INVALID_DIMENSION",
            Self::InvalidNormalDimension { .. } => "DENSE_INVALID_NORMAL_DIMENSION",
            Self::NullableField { .. } => "DENSE_NULLABLE_FIELD",
            Self::NullRow { .. } => "DENSE_NULL_ROW",
            Self::NullValue { .. } => "DENSE_NULL_VALUE",
            Self::InvalidRowLength { .. } => "DENSE_INVALID_ROW_LENGTH",
            Self::CapacityOverflow { .. } => "DENSE_CAPACITY_OVERFLOW",
            Self::InconsistentBatchDimension { .. } => "DENSE_INCONSISTENT_BATCH_DIMENSION",
            Self::Cloud(_) => "DENSE_INVALID_CLOUD",
            Self::Arrow(_) => "DENSE_ARROW",
            Self::Parquet(_) => "DENSE_PARQUET",
            Self::Io(_) => "DENSE_IO",
        }
    }
}
