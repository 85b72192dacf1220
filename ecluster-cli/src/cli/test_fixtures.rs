//! Input file builders for CLI tests.
//!
//! Writes small Parquet and xyz clouds into a temporary directory so the
//! command tests can exercise ingestion without external fixtures.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use arrow_array::{Array, ArrayRef, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::arrow_writer::ArrowWriter;
use tempfile::TempDir;

/// Writes a Parquet file with `position: FixedSizeList<Float32, 2>`,
/// `normal: FixedSizeList<Float32, 3>` and `embedding: FixedSizeList<Float32, 4>`
/// columns.
///
/// The four points form two pairs, `(0,0) (0.5,0)` and `(5,5) (5.5,5)`. The
/// first pair has parallel normals, the second orthogonal ones. The embedding
/// column places the same pairs in four dimensions.
pub(super) fn create_parquet_file(
    dir: &TempDir,
    name: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.path().join(name);
    let positions = fixed_size_list(2, vec![0.0, 0.0, 0.5, 0.0, 5.0, 5.0, 5.5, 5.0]);
    let normals = fixed_size_list(
        3,
        vec![
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, //
            1.0, 0.0, 0.0,
        ],
    );
    let embeddings = fixed_size_list(
        4,
        vec![
            0.0, 0.0, 0.0, 0.0, //
            0.5, 0.0, 0.0, 0.0, //
            5.0, 5.0, 5.0, 5.0, //
            5.5, 5.0, 5.0, 5.0,
        ],
    );
    let schema = Arc::new(Schema::new(vec![
        Field::new("position", positions.data_type().clone(), false),
        Field::new("normal", normals.data_type().clone(), false),
        Field::new("embedding", embeddings.data_type().clone(), false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(positions) as ArrayRef,
            Arc::new(normals) as ArrayRef,
            Arc::new(embeddings) as ArrayRef,
        ],
    )?;
    let file = File::create(&path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(path)
}

fn fixed_size_list(width: i32, values: Vec<f32>) -> FixedSizeListArray {
    let item_field = Arc::new(Field::new("item", DataType::Float32, false));
    FixedSizeListArray::new(item_field, width, Arc::new(Float32Array::from(values)), None)
}
