//! Error types for request validation.

use thiserror::Error;

/// Result type alias using OcadsError.
pub type OcadsResult<T> = Result<T, OcadsError>;

/// A request named something outside the fixed allow-lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OcadsError {
    #[error("{name} not recognized. Choose from: {}", .allowed.join(", "))]
    UnknownVariable {
        name: String,
        allowed: Vec<&'static str>,
    },

    #[error("{name} not recognized. Choose from: {}", .allowed.join(", "))]
    UnknownScenario {
        name: String,
        allowed: Vec<&'static str>,
    },
}

impl OcadsError {
    /// The rejected value.
    pub fn name(&self) -> &str {
        match self {
            OcadsError::UnknownVariable { name, .. } | OcadsError::UnknownScenario { name, .. } => {
                name
            }
        }
    }
}
