//! Benchmark support crate for ecluster.
//!
//! Provides seeded synthetic point clouds and parameter types used by the
//! Criterion extraction benchmarks.

pub mod error;
pub mod params;
pub mod source;
