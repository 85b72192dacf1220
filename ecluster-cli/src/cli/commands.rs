//! Command implementations and argument parsing for the ecluster CLI.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use ecluster_core::{
    ClusterBounds, ClusterExtraction, ClusterExtractionBuilder, DenseCloud, Extraction,
    ExtractionError, LinearScanOracle, NormalCloud, PointCloud, ProximityOracle, RTreeOracle,
};
use ecluster_providers_dense::{DenseCloudProviderError, ParquetCloudLoader};
use ecluster_providers_xyz::{XyzError, XyzReader};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

const DEFAULT_TOLERANCE: f32 = 0.02;
const DEFAULT_MIN_CLUSTER_SIZE: usize = 1;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "ecluster",
    about = "Extract Euclidean clusters from a point cloud."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Extract clusters from a point cloud.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Neighbourhood radius linking two points into the same cluster.
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub tolerance: f32,

    /// Minimum number of points a reported cluster must contain.
    #[arg(long = "min-cluster-size", default_value_t = DEFAULT_MIN_CLUSTER_SIZE)]
    pub min_cluster_size: usize,

    /// Maximum number of points a reported cluster may contain.
    #[arg(long = "max-cluster-size", default_value_t = ClusterBounds::DEFAULT_MAX)]
    pub max_cluster_size: usize,

    /// Gate growth on normal deviation, in radians, when normals are loaded.
    #[arg(long = "max-angle", allow_negative_numbers = true)]
    pub max_angle: Option<f64>,

    /// Ask the oracle for nearest-first neighbour lists.
    #[arg(long)]
    pub sorted: bool,

    /// Point cloud source.
    #[command(subcommand)]
    pub source: RunSource,
}

/// Point cloud sources supported by `run`.
#[derive(Debug, Subcommand, Clone)]
pub enum RunSource {
    /// Read a Parquet file holding a `FixedSizeList<Float32, D>` position column.
    Parquet(ParquetArgs),
    /// Read an ASCII xyz file, one `x y z [nx ny nz]` row per line.
    Xyz(XyzArgs),
}

/// Parquet ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct ParquetArgs {
    /// Path to the Parquet file.
    pub path: PathBuf,

    /// Column containing `FixedSizeList<Float32, D>` positions.
    #[arg(long)]
    pub column: String,

    /// Column containing `FixedSizeList<Float32, 3>` normals.
    #[arg(long)]
    pub normals: Option<String>,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Xyz ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct XyzArgs {
    /// Path to the xyz file.
    pub path: PathBuf,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Parquet ingestion failed.
    #[error(transparent)]
    Dense(#[from] DenseCloudProviderError),
    /// Xyz ingestion failed.
    #[error(transparent)]
    Xyz(#[from] XyzError),
    /// Configuration or extraction failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

impl CliError {
    /// Returns the stable code of the underlying error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Dense(err) => err.code(),
            Self::Xyz(err) => err.code(),
            Self::Extraction(err) => err.code().as_str(),
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the data source the cloud was read from.
    pub data_source: String,
    /// Number of points read.
    pub points: usize,
    /// Clusters and counters produced by the extraction.
    pub extraction: Extraction,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading or extraction fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ecluster_cli::cli::{Cli, Command, RunCommand, RunSource, XyzArgs, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 0 0\n0.5 0 0\n9 0 0\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         tolerance: 1.0,
///         min_cluster_size: 1,
///         max_cluster_size: 100,
///         max_angle: None,
///         sorted: false,
///         source: RunSource::Xyz(XyzArgs {
///             path: file.path().to_path_buf(),
///             name: None,
///         }),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.extraction.clusters().len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(tolerance = command.tolerance, source = field::Empty),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let extraction = ClusterExtractionBuilder::new()
        .with_tolerance(command.tolerance)
        .with_min_cluster_size(command.min_cluster_size)
        .with_max_cluster_size(command.max_cluster_size)
        .build()?;
    let options = ExtractOptions {
        extraction,
        max_angle: command.max_angle,
        sorted: command.sorted,
    };

    let span = Span::current();
    let summary = match command.source {
        RunSource::Parquet(args) => {
            span.record("source", field::display("parquet"));
            run_parquet(&options, args)?
        }
        RunSource::Xyz(args) => {
            span.record("source", field::display("xyz"));
            run_xyz(&options, args)?
        }
    };

    info!(
        data_source = summary.data_source.as_str(),
        clusters = summary.extraction.clusters().len(),
        "command completed"
    );
    Ok(summary)
}

struct ExtractOptions {
    extraction: ClusterExtraction,
    max_angle: Option<f64>,
    sorted: bool,
}

#[instrument(
    name = "cli.run_parquet",
    err,
    skip(options, args),
    fields(path = field::Empty, column = field::Empty, normals = field::Empty),
)]
fn run_parquet(
    options: &ExtractOptions,
    args: ParquetArgs,
) -> Result<ExecutionSummary, CliError> {
    let ParquetArgs {
        path,
        column,
        normals,
        name,
    } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("column", field::display(&column));
    span.record(
        "normals",
        field::display(normals.as_deref().unwrap_or("<none>")),
    );

    let data_source = derive_data_source_name(&path, name.as_deref());
    let mut loader = ParquetCloudLoader::new(column).with_frame_id(data_source.clone());
    if let Some(normal_column) = normals {
        loader = loader.with_normals(normal_column);
    }
    let loaded = loader.load_path(&path)?;
    execute(options, data_source, &loaded.cloud, loaded.normals.as_ref())
}

#[instrument(
    name = "cli.run_xyz",
    err,
    skip(options, args),
    fields(path = field::Empty),
)]
fn run_xyz(options: &ExtractOptions, args: XyzArgs) -> Result<ExecutionSummary, CliError> {
    let XyzArgs { path, name } = args;
    Span::current().record("path", field::display(path.display()));

    let data_source = derive_data_source_name(&path, name.as_deref());
    let loaded = XyzReader::new()
        .with_frame_id(data_source.clone())
        .read_path(&path)?;
    execute(options, data_source, &loaded.cloud, loaded.normals.as_ref())
}

fn execute(
    options: &ExtractOptions,
    data_source: String,
    cloud: &DenseCloud,
    normals: Option<&NormalCloud>,
) -> Result<ExecutionSummary, CliError> {
    let oracle = build_oracle(cloud, options.sorted);
    let oracle = oracle.as_ref();
    let extraction = match (options.max_angle, normals) {
        (Some(max_angle), Some(normals)) => {
            options
                .extraction
                .extract_with_normals(cloud, normals, None, oracle, max_angle)?
        }
        (Some(max_angle), None) => {
            warn!(
                max_angle,
                data_source = data_source.as_str(),
                "no normals loaded, ignoring --max-angle"
            );
            options.extraction.extract(cloud, oracle)?
        }
        (None, _) => options.extraction.extract(cloud, oracle)?,
    };
    Ok(ExecutionSummary {
        data_source,
        points: cloud.len(),
        extraction,
    })
}

/// Indexes `cloud` in an R*-tree, falling back to a linear scan for clouds
/// the tree cannot hold.
fn build_oracle(cloud: &DenseCloud, sorted: bool) -> Box<dyn ProximityOracle + '_> {
    match RTreeOracle::new(cloud) {
        Ok(indexed) => Box::new(indexed.with_sorted_results(sorted)),
        Err(err) => {
            warn!(
                error = %err,
                dimension = cloud.dimension(),
                "cloud cannot be indexed, falling back to linear-scan radius search"
            );
            Box::new(LinearScanOracle::new(cloud).with_sorted_results(sorted))
        }
    }
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "data_source".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// Each cluster occupies one line: its position, its size, then its member
/// identifiers separated by spaces.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use ecluster_cli::cli::{ExecutionSummary, render_summary};
/// # use ecluster_core::{ClusterExtractionBuilder, DenseCloud, RTreeOracle};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let cloud = DenseCloud::from_rows(vec![vec![0.0], vec![0.5], vec![4.0]])?;
/// let oracle = RTreeOracle::new(&cloud)?;
/// let extraction = ClusterExtractionBuilder::new()
///     .with_tolerance(1.0)
///     .build()?
///     .extract(&cloud, &oracle)?;
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     points: 3,
///     extraction,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "data source: demo\npoints: 3\nclusters: 2\n0\t2\t0 1\n1\t1\t2\n",
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let clusters = summary.extraction.clusters();
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "points: {}", summary.points)?;
    writeln!(writer, "clusters: {}", clusters.len())?;
    for (index, cluster) in clusters.iter().enumerate() {
        write!(writer, "{index}\t{}\t", cluster.len())?;
        for (position, id) in cluster.indices().iter().enumerate() {
            if position > 0 {
                write!(writer, " ")?;
            }
            write!(writer, "{id}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
