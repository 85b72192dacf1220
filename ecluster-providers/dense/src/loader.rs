//! Parquet point-cloud loader.
use std::{fs::File, path::Path};

use arrow_array::RecordBatchReader;
use ecluster_core::{CloudHeader, DenseCloud, NormalCloud, PointCloud};
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;
use tracing::{debug, warn};

use crate::errors::DenseCloudProviderError;
use crate::ingest::{append_fixed_size_list_values, as_fixed_size_list, validate_fixed_size_list_field};

/// Point cloud read from Parquet, with normals when a normal column was
/// configured.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedCloud {
    /// Point coordinates.
    pub cloud: DenseCloud,
    /// Per-point normals, parallel to `cloud`.
    pub normals: Option<NormalCloud>,
}

/// Reads `FixedSizeList<Float32, D>` position columns, and optionally a
/// `FixedSizeList<Float32, 3>` normal column, from Parquet.
///
/// # Examples
/// ```no_run
/// use ecluster_providers_dense::ParquetCloudLoader;
///
/// let loaded = ParquetCloudLoader::new("position")
///     .with_normals("normal")
///     .with_frame_id("lidar")
///     .load_path("scan.parquet")?;
/// assert!(loaded.normals.is_some());
/// # Ok::<(), ecluster_providers_dense::DenseCloudProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ParquetCloudLoader {
    position_column: String,
    normal_column: Option<String>,
    frame_id: String,
}

impl ParquetCloudLoader {
    /// Creates a loader reading positions from `position_column`.
    #[must_use]
    pub fn new(position_column: impl Into<String>) -> Self {
        Self {
            position_column: position_column.into(),
            normal_column: None,
            frame_id: String::new(),
        }
    }

    /// Also reads normals from `column`.
    #[must_use]
    pub fn with_normals(mut self, column: impl Into<String>) -> Self {
        self.normal_column = Some(column.into());
        self
    }

    /// Sets the frame identifier stamped on the loaded cloud's header.
    #[must_use]
    pub fn with_frame_id(mut self, frame_id: impl Into<String>) -> Self {
        self.frame_id = frame_id.into();
        self
    }

    /// Returns the position column name.
    #[must_use]
    pub fn position_column(&self) -> &str {
        &self.position_column
    }

    /// Returns the normal column name, if configured.
    #[must_use]
    pub fn normal_column(&self) -> Option<&str> {
        self.normal_column.as_deref()
    }

    /// Loads a cloud from a Parquet file.
    ///
    /// # Errors
    /// Returns [`DenseCloudProviderError::Io`] when the file cannot be opened,
    /// plus every error of [`Self::load_reader`].
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<LoadedCloud, DenseCloudProviderError> {
        let file = File::open(path)?;
        self.load_reader(file)
    }

    /// Loads a cloud from any Parquet chunk reader.
    ///
    /// # Errors
    /// Returns [`DenseCloudProviderError`] when a configured column is
    /// missing, nullable, of the wrong type or width, holds null rows or
    /// values, or when the Parquet data cannot be decoded.
    pub fn load_reader<R>(&self, reader: R) -> Result<LoadedCloud, DenseCloudProviderError>
    where
        R: ChunkReader + 'static,
    {
        let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
        let columns = std::iter::once(self.position_column.as_str()).chain(self.normal_column());
        let mask = ProjectionMask::columns(builder.parquet_schema(), columns);
        let batches = builder.with_projection(mask).build()?;
        let schema = batches.schema();

        let position = ColumnPlan::resolve(&schema, &self.position_column)?;
        let normals = self
            .normal_column
            .as_deref()
            .map(|column| {
                let plan = ColumnPlan::resolve(&schema, column)?;
                if plan.dimension != 3 {
                    return Err(DenseCloudProviderError::InvalidNormalDimension {
                        column: column.to_owned(),
                        actual: plan.dimension,
                    });
                }
                Ok(plan)
            })
            .transpose()?;

        let mut position_values = Vec::new();
        let mut normal_values = Vec::new();
        let mut rows = 0_usize;
        for batch in batches {
            let batch = batch?;
            let list = as_fixed_size_list(batch.column(position.index).as_ref(), &self.position_column)?;
            append_fixed_size_list_values(
                list,
                &self.position_column,
                Some(position.dimension),
                rows,
                &mut position_values,
            )?;
            if let (Some(plan), Some(column)) = (&normals, self.normal_column()) {
                let list = as_fixed_size_list(batch.column(plan.index).as_ref(), column)?;
                append_fixed_size_list_values(list, column, Some(3), rows, &mut normal_values)?;
            }
            rows = rows.saturating_add(batch.num_rows());
        }

        let cloud = DenseCloud::try_new(position.dimension, position_values)?
            .with_header(CloudHeader::new(self.frame_id.clone()));
        let normals = match normals {
            Some(_) => Some(NormalCloud::try_from_flat(&normal_values)?),
            None => None,
        };
        if let Some(normals) = &normals {
            warn_non_unit(normals, self.normal_column().unwrap_or_default());
        }
        debug!(
            points = cloud.len(),
            dimension = cloud.dimension(),
            normals = normals.is_some(),
            "loaded parquet cloud"
        );
        Ok(LoadedCloud { cloud, normals })
    }
}

fn warn_non_unit(normals: &NormalCloud, column: &str) {
    let offenders = normals.non_unit_ids();
    if let Some(&first) = offenders.first() {
        warn!(
            column,
            count = offenders.len(),
            first,
            "non-unit normals loaded; angle gating assumes unit length"
        );
    }
}

struct ColumnPlan {
    index: usize,
    dimension: usize,
}

impl ColumnPlan {
    fn resolve(schema: &arrow_schema::Schema, column: &str) -> Result<Self, DenseCloudProviderError> {
        let index = schema
            .index_of(column)
            .map_err(|_| DenseCloudProviderError::ColumnNotFound {
                column: column.to_owned(),
            })?;
        let dimension = validate_fixed_size_list_field(schema.field(index), column)?;
        Ok(Self { index, dimension })
    }
}
