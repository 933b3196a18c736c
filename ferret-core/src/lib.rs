//! Core engine for Ferret minimal-example search.
//!
//! This crate provides the fundamental building blocks for searching a
//! declaratively described value space for a value satisfying a
//! predicate and deterministically minimizing what it finds: strategies,
//! condition evaluation, the search driver, and the shrinker.

pub mod condition;
pub mod data;
pub mod error;
pub mod search;
pub mod shrink;
pub mod strategy;

// Re-export the main types
pub use condition::*;
pub use data::*;
pub use error::*;
pub use search::*;
pub use shrink::*;
pub use strategy::collections::{map_of, vec_of, MapStrategy, VecStrategy};
pub use strategy::stream::{streaming, Stream, Streaming};
pub use strategy::*;
