//! Error types for RosterForge

use thiserror::Error;

/// Main error type for RosterForge operations
#[derive(Debug, Error)]
pub enum RosterError {
    /// The scheduling request is malformed or references something outside the grid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The constraint model was built inconsistently
    #[error("Model error: {0}")]
    Model(String),

    /// The solver backend failed to run
    #[error("Solver error: {0}")]
    Solver(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RosterError {
    /// Shorthand for a [`RosterError::Configuration`] error.
    pub fn configuration(message: impl Into<String>) -> Self {
        RosterError::Configuration(message.into())
    }

    /// Returns true if this error was caused by invalid input.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RosterError::Configuration(_))
    }
}

/// Result type alias for RosterForge operations
pub type Result<T> = std::result::Result<T, RosterError>;
