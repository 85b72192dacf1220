//! Property-based tests for the cluster growth engine.
//!
//! Checks the partition invariants of every extraction, equivalence with a
//! union-find reference over the radius graph, and the symmetries the engine
//! promises (oracle ordering, normal orientation).

mod properties;
mod reference;
mod strategies;
mod types;
