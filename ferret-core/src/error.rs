//! Error types for Ferret searches.

use std::time::Duration;
use thiserror::Error;

/// Classified failure outcomes of a search.
///
/// `DefinitelyNoSuchExample` is a strict refinement of `NoSuchExample`:
/// it is raised instead of the generic variant whenever the strategy's
/// entire finite domain was enumerated, and never alongside it.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Wall-clock budget exceeded before any resolution.
    #[error("ran out of time ({elapsed:.2?}) looking for an example satisfying {condition}")]
    Timeout { condition: String, elapsed: Duration },

    /// Example budget exhausted; the search is inconclusive.
    #[error("no examples found of {condition}")]
    NoSuchExample { condition: String },

    /// The strategy's entire finite domain was enumerated and no value
    /// satisfied the predicate.
    #[error("no examples of {condition} exist: the whole domain was enumerated")]
    DefinitelyNoSuchExample { condition: String },

    /// Invalid configuration.
    #[error("invalid settings: {message}")]
    InvalidSettings { message: String },
}

impl SearchError {
    /// The display name of the condition the search was run against,
    /// where the error carries one.
    pub fn condition(&self) -> Option<&str> {
        match self {
            SearchError::Timeout { condition, .. }
            | SearchError::NoSuchExample { condition }
            | SearchError::DefinitelyNoSuchExample { condition } => Some(condition),
            SearchError::InvalidSettings { .. } => None,
        }
    }
}

/// Result type for Ferret operations.
pub type Result<T> = std::result::Result<T, SearchError>;
