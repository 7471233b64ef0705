//! Error types for block-world generation.

use thiserror::Error;

/// Result type alias for block-world operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building catalogs, placing blocks or
/// exploring the state space.
#[derive(Debug, Error)]
pub enum Error {
    /// No physically plausible placement was found within the trial budget.
    ///
    /// This is an expected outcome of rejection sampling. Callers discard the
    /// in-progress state and start over from a fresh one.
    #[error("Unstackable: no valid placement after {trials} trials")]
    Unstackable {
        /// Number of placement trials that were attempted.
        trials: usize,
    },

    /// Property catalog is malformed or incomplete.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Every redraw for a block collided with an already drawn block.
    #[error("Could not draw a distinct block #{index} after {attempts} attempts")]
    DuplicateExhausted {
        /// Index of the block being drawn.
        index: usize,
        /// Number of draws attempted.
        attempts: usize,
    },

    /// A material change was requested but the catalog offers no other material.
    #[error("No alternative to material '{0}' in the catalog")]
    NoAlternativeMaterial(String),

    /// A sampling pipeline kept hitting unstackable states.
    #[error("Gave up after {attempts} unstackable attempts")]
    RetriesExhausted {
        /// Number of fresh states that were tried.
        attempts: usize,
    },

    /// A state does not satisfy the stacking invariant.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true for the recoverable placement failure.
    pub fn is_unstackable(&self) -> bool {
        matches!(self, Error::Unstackable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstackable_is_recoverable() {
        assert!(Error::Unstackable { trials: 100 }.is_unstackable());
        assert!(!Error::Internal("x".into()).is_unstackable());
        assert!(!Error::RetriesExhausted { attempts: 3 }.is_unstackable());
    }

    #[test]
    fn test_messages() {
        let e = Error::Unstackable { trials: 100 };
        assert_eq!(e.to_string(), "Unstackable: no valid placement after 100 trials");

        let e = Error::NoAlternativeMaterial("Rubber".into());
        assert!(e.to_string().contains("Rubber"));
    }
}
