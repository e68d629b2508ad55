//! Error types for Typeahead core machinery.

use thiserror::Error;

/// Errors from global runtime management.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The global runtime has already been initialized.
    #[error("the global runtime has already been initialized")]
    AlreadyInitialized,
    /// The Tokio runtime could not be built.
    #[error("failed to create runtime: {0}")]
    CreationFailed(String),
}
