//! Error types for agreement assembly.
//!
//! Every failure is a deterministic input or configuration error. Nothing is
//! retried and no partial output is ever returned alongside an error.

use thiserror::Error;

use crate::clause::NodePath;

/// Errors that can occur while selecting, substituting, composing or
/// rendering an agreement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// No fragment set is registered for the requested configuration, or an
    /// option names an unknown slot or choice.
    #[error("unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    /// A registered fragment set names a fragment the store does not hold.
    #[error("fragment `{fragment}` is not available for `{agreement}`")]
    MissingFragment { agreement: String, fragment: String },

    /// A placeholder token has no binding in the role map.
    #[error("unresolved placeholder `{token}` at {path}")]
    UnresolvedPlaceholder { token: String, path: NodePath },

    /// A cross-reference names an anchor that is not in the composed set.
    #[error("dangling reference to `{0}`")]
    DanglingReference(String),

    /// Two top-level sections share the same heading.
    #[error("duplicate section `{0}`")]
    DuplicateSection(String),

    /// Two nodes declare the same anchor.
    #[error("duplicate anchor `{0}`")]
    DuplicateAnchor(String),

    /// A node violates the content/children invariant or carries broken
    /// token syntax.
    #[error("malformed clause tree at {path}: {reason}")]
    MalformedClauseTree { path: NodePath, reason: String },

    /// The party list does not fit the configuration.
    #[error("invalid parties: {0}")]
    InvalidParties(String),

    /// A clause-definition document does not have the expected shape.
    #[error("invalid fragment `{fragment}`: {message}")]
    InvalidFragment { fragment: String, message: String },

    /// Structured output could not be produced or read back.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type for assembly operations.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Errors reading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to load config: {path}: {message}")]
    Load { path: String, message: String },

    /// The configuration is not valid TOML or has unknown keys.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
