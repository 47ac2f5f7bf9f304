//! # Error Types
//!
//! Parse failures for the console vocabulary. Transport and cache errors
//! live in the crates that own those concerns.

use thiserror::Error;

/// Errors raised while interpreting configuration or wire vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The configured dashboard role is not one of the known roles.
    #[error("unknown dashboard role: {0:?} (expected provider, consumer, business or customer)")]
    UnknownRole(String),

    /// The process kind string is not recognized.
    #[error("unknown process kind: {0:?}")]
    UnknownProcessKind(String),

    /// A state string is outside the vocabulary of its process kind.
    #[error("unrecognized {kind} state: {state:?}")]
    UnknownState {
        /// Process kind whose vocabulary was consulted.
        kind: String,
        /// The offending state string.
        state: String,
    },
}
