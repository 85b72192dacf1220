//! Helpers for flattening `FixedSizeList<Float32, D>` columns into row-major
//! buffers.
use arrow_array::{Array, FixedSizeListArray, Float32Array};
use arrow_schema::{DataType, Field};

use crate::errors::DenseCloudProviderError;

/// Checks that a schema field is a non-nullable `FixedSizeList<Float32, D>`
/// and returns `D`.
pub(crate) fn validate_fixed_size_list_field(
    field: &Field,
    column: &str,
) -> Result<usize, DenseCloudProviderError> {
    let DataType::FixedSizeList(child, width) = field.data_type() else {
        return Err(DenseCloudProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: field.data_type().clone(),
        });
    };
    if field.is_nullable() || child.is_nullable() {
        return Err(DenseCloudProviderError::NullableField {
            column: column.to_owned(),
            nullable_child: child.is_nullable(),
        });
    }
    if child.data_type() != &DataType::Float32 {
        return Err(DenseCloudProviderError::InvalidListValueType {
            column: column.to_owned(),
            actual: child.data_type().clone(),
        });
    }
    usize::try_from(*width).map_err(|_| DenseCloudProviderError::InvalidDimension {
        column: column.to_owned(),
        actual: *width,
    })
}

/// Downcasts a batch column to a fixed-size list array.
pub(crate) fn as_fixed_size_list<'a>(
    array: &'a dyn Array,
    column: &str,
) -> Result<&'a FixedSizeListArray, DenseCloudProviderError> {
    array
        .as_any()
        .downcast_ref::<FixedSizeListArray>()
        .ok_or_else(|| DenseCloudProviderError::InvalidColumnType {
            column: column.to_owned(),
            actual: array.data_type().clone(),
        })
}

/// Appends every row of `array` to `out`, returning the row width.
///
/// `start_row` offsets row numbers in error reports so that multi-batch reads
/// name absolute rows.
pub(crate) fn append_fixed_size_list_values(
    array: &FixedSizeListArray,
    column: &str,
    expected_dimension: Option<usize>,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<usize, DenseCloudProviderError> {
    let dimension = list_dimension(array, column)?;
    if let Some(expected) = expected_dimension.filter(|&expected| expected != dimension) {
        return Err(DenseCloudProviderError::InconsistentBatchDimension {
            expected,
            actual: dimension,
        });
    }
    copy_list_values(array, column, dimension, start_row, out)?;
    Ok(dimension)
}

fn list_dimension(
    array: &FixedSizeListArray,
    column: &str,
) -> Result<usize, DenseCloudProviderError> {
    let value_type = array.value_type();
    if value_type != DataType::Float32 {
        return Err(DenseCloudProviderError::InvalidListValueType {
            column: column.to_owned(),
            actual: value_type,
        });
    }
    usize::try_from(array.value_length()).map_err(|_| DenseCloudProviderError::InvalidDimension {
        column: column.to_owned(),
        actual: array.value_length(),
    })
}

pub(crate) fn copy_list_values(
    array: &FixedSizeListArray,
    column: &str,
    dimension: usize,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<(), DenseCloudProviderError> {
    let rows = array.len();
    let additional = rows
        .checked_mul(dimension)
        .ok_or(DenseCloudProviderError::CapacityOverflow { rows, dimension })?;
    out.try_reserve(additional)
        .map_err(|_| DenseCloudProviderError::CapacityOverflow { rows, dimension })?;

    for row_index in 0..rows {
        let row = start_row.saturating_add(row_index);
        if array.is_null(row_index) {
            return Err(DenseCloudProviderError::NullRow {
                column: column.to_owned(),
                row,
            });
        }
        let values = array.value(row_index);
        let floats = values.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
            DenseCloudProviderError::InvalidListValueType {
                column: column.to_owned(),
                actual: values.data_type().clone(),
            }
        })?;
        if floats.len() != dimension {
            return Err(DenseCloudProviderError::InvalidRowLength {
                column: column.to_owned(),
                row,
                expected: dimension,
                actual: floats.len(),
            });
        }
        if let Some(value_index) = (0..dimension).find(|&idx| floats.is_null(idx)) {
            return Err(DenseCloudProviderError::NullValue {
                column: column.to_owned(),
                row,
                value_index,
            });
        }
        out.extend(floats.iter().flatten());
    }
    Ok(())
}
