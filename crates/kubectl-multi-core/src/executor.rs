//! Single-cluster executor seam
//!
//! The core never runs kubectl itself. It hands a fully built argv to a
//! [`ClusterExecutor`] and records whatever comes back on that cluster's
//! result.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Why a single cluster's invocation did not succeed.
///
/// These never abort the command; they are rendered in the cluster's block.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvocationError {
    /// The executor could not be started
    #[error("failed to start {program}: {message}")]
    Spawn { program: String, message: String },

    /// The executor ran and exited unsuccessfully
    #[error("{}", failed_message(.code, .stderr))]
    Failed { code: Option<i32>, stderr: String },

    #[error("timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// Interrupted while in flight
    #[error("cancelled")]
    Cancelled,
}

fn failed_message(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(c) => format!("exit status {}", c),
        None => "terminated by signal".to_string(),
    };
    let stderr = stderr.trim();
    if stderr.is_empty() {
        status
    } else {
        format!("{}: {}", status, stderr)
    }
}

/// Runs one pre-built command against one cluster.
#[async_trait]
pub trait ClusterExecutor: Send + Sync {
    /// Run `argv` and return its complete stdout.
    ///
    /// `kubeconfig` is the path every invocation should use, if any.
    async fn run(
        &self,
        argv: &[String],
        kubeconfig: Option<&str>,
    ) -> Result<String, InvocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_message_with_stderr() {
        let err = InvocationError::Failed {
            code: Some(1),
            stderr: "Error from server (NotFound): deployments.apps \"nginx\" not found\n"
                .to_string(),
        };
        assert_eq!(
            err.to_string(),
            "exit status 1: Error from server (NotFound): deployments.apps \"nginx\" not found"
        );
    }

    #[test]
    fn test_failed_message_without_stderr() {
        let err = InvocationError::Failed {
            code: None,
            stderr: "  ".to_string(),
        };
        assert_eq!(err.to_string(), "terminated by signal");
    }

    #[test]
    fn test_timeout_message() {
        let err = InvocationError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "timed out after 30s");
    }
}
