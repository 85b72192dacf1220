//! Command-line interface orchestration for ecluster.
//!
//! The CLI offers a `run` command that loads a point cloud from Parquet or an
//! ASCII xyz file and prints the Euclidean clusters found in it.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, ParquetArgs, RunCommand, RunSource, XyzArgs,
    render_summary, run_cli,
};

#[cfg(test)]
mod test_fixtures;
#[cfg(test)]
mod test_helpers;
