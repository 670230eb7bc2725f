//! kubectl process execution
//!
//! The per-cluster executor and the upstream help lookup both shell out to
//! kubectl. Output is captured in full before returning.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use kubectl_multi_core::{ClusterExecutor, InvocationError};

use crate::{Error, Result};

/// Runs kubectl as a child process, one per cluster invocation.
#[derive(Clone, Debug)]
pub struct KubectlExecutor {
    program: String,
}

impl KubectlExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for KubectlExecutor {
    fn default() -> Self {
        Self::new("kubectl")
    }
}

/// Full argv for one invocation, with the kubeconfig appended when set.
pub fn invocation_args(argv: &[String], kubeconfig: Option<&str>) -> Vec<String> {
    let mut args = argv.to_vec();
    if let Some(path) = kubeconfig.filter(|p| !p.is_empty()) {
        args.push(format!("--kubeconfig={}", path));
    }
    args
}

#[async_trait]
impl ClusterExecutor for KubectlExecutor {
    async fn run(
        &self,
        argv: &[String],
        kubeconfig: Option<&str>,
    ) -> std::result::Result<String, InvocationError> {
        let args = invocation_args(argv, kubeconfig);
        debug!(program = %self.program, ?args, "Running kubectl");

        // kill_on_drop: a timed-out or cancelled invocation must not leave
        // the child running
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| InvocationError::Spawn {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(InvocationError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Fetch `kubectl <command> --help`.
pub async fn upstream_help(program: &str, command: &str) -> Result<String> {
    let output = Command::new(program)
        .args([command, "--help"])
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| Error::command_failed(format!("failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(Error::command_failed(format!(
            "{} {} --help failed: {}",
            program,
            command,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    #[test]
    fn test_invocation_args_appends_kubeconfig() {
        let args = invocation_args(&s(&["get", "pods", "--context", "wds1"]), Some("/tmp/kc"));
        assert_eq!(
            args,
            s(&["get", "pods", "--context", "wds1", "--kubeconfig=/tmp/kc"])
        );
    }

    #[test]
    fn test_invocation_args_without_kubeconfig() {
        let argv = s(&["get", "pods"]);
        assert_eq!(invocation_args(&argv, None), argv);
        assert_eq!(invocation_args(&argv, Some("")), argv);
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let exec = KubectlExecutor::new("kubectl-multi-test-no-such-binary");
        let err = exec.run(&s(&["version"]), None).await.unwrap_err();
        assert!(matches!(err, InvocationError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failed() {
        // `false` ignores its arguments and exits 1
        let exec = KubectlExecutor::new("false");
        let err = exec.run(&s(&["get", "pods"]), None).await.unwrap_err();
        assert!(matches!(err, InvocationError::Failed { code: Some(1), .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_captured() {
        let exec = KubectlExecutor::new("echo");
        let out = exec.run(&s(&["hello", "--context", "c"]), None).await.unwrap();
        assert_eq!(out, "hello --context c\n");
    }
}
