//! Error types for cluster discovery and command fan-out
//!
//! Only failures that happen before dispatch starts are modelled here.
//! Anything that goes wrong on an individual cluster after dispatch begins
//! is an [`InvocationError`](crate::executor::InvocationError) attached to
//! that cluster's result instead.

use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// The multi-cluster configuration could not be read or parsed.
#[derive(Debug, Error)]
#[error("failed to load kubeconfig {path}: {message}")]
pub struct ConfigError {
    /// Path that was read, or `<default>` when kube default discovery was used
    pub path: String,
    /// Description of what failed
    pub message: String,
}

impl ConfigError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Pre-dispatch failures. Every variant aborts the whole command.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration unreadable or unparsable
    #[error(transparent)]
    Config(ConfigError),

    /// Cluster discovery failed because the context source failed
    #[error("failed to discover clusters: {0}")]
    Discovery(#[source] ConfigError),

    /// Discovery succeeded but yielded nothing to dispatch to
    #[error("no clusters discovered")]
    NoClusters,

    /// Both a filename source and a type/name target were supplied
    #[error("provide either filename or resource type at a time")]
    ConflictingTarget,

    /// Neither a filename source nor a type/name target was supplied
    #[error("{verb}: a resource type or --filename is required")]
    MissingTarget { verb: String },

    /// Invalid flag combination or value
    #[error("validation error: {message}")]
    Validation { message: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}
