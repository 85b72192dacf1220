//! Parquet ingestion of dense point clouds and their normals.

mod errors;
mod ingest;
mod loader;

pub use errors::DenseCloudProviderError;
pub use loader::{LoadedCloud, ParquetCloudLoader};

#[cfg(test)]
mod tests;
