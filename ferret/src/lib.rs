//! Ferret minimal-example search.
//!
//! This is the main entry point for the Ferret library, providing
//! a convenient API for searching for and minimizing examples.

pub use ferret_core::*;
