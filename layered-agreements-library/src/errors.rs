//! Error types for clause library loading.

use layered_agreements::AssemblyError;
use thiserror::Error;

/// Errors that can occur while loading a clause library.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// A manifest or fragment file could not be read.
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    /// The manifest is not valid TOML or does not have the expected shape.
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    /// The manifest is well-formed but inconsistent.
    #[error("invalid library manifest: {0}")]
    Manifest(String),

    /// A fragment or registration was rejected by the engine.
    #[error("{path}: {source}")]
    Assembly {
        path: String,
        #[source]
        source: AssemblyError,
    },
}

/// Result type for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;
