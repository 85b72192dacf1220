//! Shared test utilities used across ecluster crates.

pub mod ci;
pub mod scenes;
pub mod tracing;
