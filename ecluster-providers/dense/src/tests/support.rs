use arrow_array::{ArrayRef, FixedSizeListArray, Float32Array, RecordBatch};
use arrow_schema::{DataType, Field, Schema};
use bytes::Bytes;
use parquet::arrow::arrow_writer::ArrowWriter;
use std::sync::Arc;

pub(crate) fn build_list_array(
    rows: &[Vec<f32>],
    dimension: usize,
    child_nullable: bool,
) -> FixedSizeListArray {
    assert!(rows.iter().all(|row| row.len() == dimension));
    let values = Float32Array::from_iter_values(rows.iter().flatten().copied());
    FixedSizeListArray::new(
        Arc::new(Field::new("item", DataType::Float32, child_nullable)),
        i32::try_from(dimension).expect("dimension fits in i32"),
        Arc::new(values) as ArrayRef,
        None,
    )
}

pub(crate) fn list_field(
    name: &str,
    dimension: usize,
    child_nullable: bool,
    list_nullable: bool,
) -> Field {
    Field::new(
        name,
        DataType::FixedSizeList(
            Arc::new(Field::new("item", DataType::Float32, child_nullable)),
            i32::try_from(dimension).expect("dimension fits in i32"),
        ),
        list_nullable,
    )
}

/// One column for a test file: name plus rows.
pub(crate) struct ColumnSpec<'a> {
    pub name: &'a str,
    pub rows: &'a [Vec<f32>],
}

pub(crate) fn batch_of(columns: &[ColumnSpec<'_>]) -> RecordBatch {
    let fields: Vec<Field> = columns
        .iter()
        .map(|column| {
            let dimension = column.rows.first().map_or(3, Vec::len);
            list_field(column.name, dimension, false, false)
        })
        .collect();
    let arrays: Vec<ArrayRef> = columns
        .iter()
        .map(|column| {
            let dimension = column.rows.first().map_or(3, Vec::len);
            Arc::new(build_list_array(column.rows, dimension, false)) as ArrayRef
        })
        .collect();
    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).expect("batch")
}

pub(crate) fn write_batches(batches: &[RecordBatch]) -> Bytes {
    let schema = batches.first().expect("at least one batch").schema();
    let mut buffer = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buffer, schema, None).expect("writer");
        for batch in batches {
            writer.write(batch).expect("write");
        }
        writer.close().expect("close");
    }
    Bytes::from(buffer)
}

pub(crate) fn write_columns(columns: &[ColumnSpec<'_>]) -> Bytes {
    write_batches(&[batch_of(columns)])
}

pub(crate) fn write_single_field(field: Field, array: ArrayRef) -> Bytes {
    let schema = Arc::new(Schema::new(vec![field]));
    let batch = RecordBatch::try_new(schema, vec![array]).expect("batch");
    write_batches(&[batch])
}
