pub(crate) use super::{DenseCloudProviderError, LoadedCloud, ParquetCloudLoader};

mod support;
