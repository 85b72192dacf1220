//! ASCII point-cloud reader for whitespace-separated `x y z [nx ny nz]` rows.
//!
//! Blank lines and lines starting with `#` are skipped. The first data row
//! fixes the layout: three columns for positions only, six for positions
//! followed by normals. Every later row must match it.
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use ecluster_core::{CloudError, CloudHeader, DenseCloud, NormalCloud, PointCloud};
use thiserror::Error;
use tracing::{debug, warn};

/// Error raised while reading an xyz file. Line numbers are 1-based.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XyzError {
    #[error("line {line}: expected 3 or 6 columns but found {actual}")]
    UnsupportedColumnCount { line: usize, actual: usize },
    #[error("line {line}: expected {expected} columns but found {actual}")]
    RaggedRow {
        line: usize,
        expected: usize,
        actual: usize,
    },
    #[error("line {line}, column {column}: `{token}` is not a number")]
    InvalidNumber {
        line: usize,
        column: usize,
        token: String,
    },
    #[error("line {line}, column {column}: value must be finite")]
    NonFinite { line: usize, column: usize },
    #[error("invalid cloud: {0}")]
    Cloud(#[from] CloudError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl XyzError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedColumnCount { .. } => "XYZ_UNSUPPORTED_COLUMN_COUNT",
            Self::RaggedRow { .. } => "XYZ_RAGGED_ROW",
            Self::InvalidNumber { .. } => "XYZ_INVALID_NUMBER",
            Self::NonFinite { .. } => "XYZ_NON_FINITE",
            Self::Cloud(_) => "XYZ_INVALID_CLOUD",
            Self::Io(_) => "XYZ_IO",
        }
    }
}

/// Cloud read from an xyz source.
#[derive(Clone, Debug, PartialEq)]
pub struct XyzCloud {
    /// Three-dimensional point coordinates.
    pub cloud: DenseCloud,
    /// Normals, present when the rows carried six columns.
    pub normals: Option<NormalCloud>,
}

/// Reader for ASCII xyz point clouds.
///
/// # Examples
/// ```
/// use ecluster_core::PointCloud;
/// use ecluster_providers_xyz::XyzReader;
///
/// let text = "# x y z nx ny nz\n0 0 0 0 0 1\n\n1 0 0 0 0 1\n";
/// let loaded = XyzReader::new().with_frame_id("desk").parse_str(text)?;
/// assert_eq!(loaded.cloud.len(), 2);
/// assert_eq!(loaded.cloud.header().frame_id(), "desk");
/// assert_eq!(loaded.normals.map(|n| n.len()), Some(2));
/// # Ok::<(), ecluster_providers_xyz::XyzError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct XyzReader {
    frame_id: String,
}

const POSITION_COLUMNS: usize = 3;
const ORIENTED_COLUMNS: usize = 6;

impl XyzReader {
    /// Creates a reader with an empty frame identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the frame identifier stamped on the cloud's header.
    #[must_use]
    pub fn with_frame_id(mut self, frame_id: impl Into<String>) -> Self {
        self.frame_id = frame_id.into();
        self
    }

    /// Reads a cloud from a file.
    ///
    /// # Errors
    /// Returns [`XyzError::Io`] when the file cannot be read, plus every
    /// error of [`Self::read`].
    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<XyzCloud, XyzError> {
        self.read(BufReader::new(File::open(path)?))
    }

    /// Parses a cloud held in memory.
    ///
    /// # Errors
    /// See [`Self::read`].
    pub fn parse_str(&self, text: &str) -> Result<XyzCloud, XyzError> {
        self.read(text.as_bytes())
    }

    /// Reads a cloud line by line.
    ///
    /// # Errors
    /// Returns [`XyzError`] for a row with an unsupported or inconsistent
    /// column count, a token that is not a finite number, or an I/O failure.
    pub fn read<R: BufRead>(&self, reader: R) -> Result<XyzCloud, XyzError> {
        let mut columns: Option<usize> = None;
        let mut positions = Vec::new();
        let mut normals = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let row = parse_row(trimmed, line_number)?;
            let expected = match columns {
                Some(expected) => expected,
                None if matches!(row.len(), POSITION_COLUMNS | ORIENTED_COLUMNS) => {
                    *columns.insert(row.len())
                }
                None => {
                    return Err(XyzError::UnsupportedColumnCount {
                        line: line_number,
                        actual: row.len(),
                    });
                }
            };
            if row.len() != expected {
                return Err(XyzError::RaggedRow {
                    line: line_number,
                    expected,
                    actual: row.len(),
                });
            }
            let (position, normal) = row.split_at(POSITION_COLUMNS);
            positions.extend_from_slice(position);
            normals.extend_from_slice(normal);
        }

        let cloud = DenseCloud::try_new(POSITION_COLUMNS, positions)?
            .with_header(CloudHeader::new(self.frame_id.clone()));
        let normals = match columns {
            Some(ORIENTED_COLUMNS) => Some(NormalCloud::try_from_flat(&normals)?),
            _ => None,
        };
        if let Some(normals) = &normals {
            warn_non_unit(normals);
        }
        debug!(
            points = cloud.len(),
            normals = normals.is_some(),
            "loaded xyz cloud"
        );
        Ok(XyzCloud { cloud, normals })
    }
}

fn warn_non_unit(normals: &NormalCloud) {
    let offenders = normals.non_unit_ids();
    if let Some(&first) = offenders.first() {
        warn!(
            count = offenders.len(),
            first,
            "non-unit normals loaded; angle gating assumes unit length"
        );
    }
}

fn parse_row(line: &str, line_number: usize) -> Result<Vec<f32>, XyzError> {
    line.split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            let column = index + 1;
            let value = token.parse::<f32>().map_err(|_| XyzError::InvalidNumber {
                line: line_number,
                column,
                token: token.to_owned(),
            })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(XyzError::NonFinite {
                    line: line_number,
                    column,
                })
            }
        })
        .collect()
}
