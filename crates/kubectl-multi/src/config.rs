//! kubectl-multi configuration stored at `~/.kubectl-multi/`.
//!
//! `~/.kubectl-multi/config.json` holds defaults for flags that rarely
//! change between runs (control-plane context, parallelism, timeout).
//! Command-line flags always win over file values.
//!
//! The kubeconfig resolution chain (highest priority first):
//! 1. Explicit `--kubeconfig` flag
//! 2. `KUBECTL_MULTI_KUBECONFIG` environment variable
//! 3. Fall back to kube default (`KUBECONFIG` env / `~/.kube/config`)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const CONFIG_DIR_NAME: &str = ".kubectl-multi";
const CONFIG_FILE_NAME: &str = "config.json";
const KUBECONFIG_ENV: &str = "KUBECTL_MULTI_KUBECONFIG";

/// Control-plane context used when neither flag nor file sets one.
pub const DEFAULT_CONTROL_PLANE_CONTEXT: &str = "its1";

/// Persistent CLI defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiConfig {
    /// Context of the control-plane (ITS) cluster.
    pub control_plane_context: String,
    /// Maximum concurrent per-cluster invocations.
    pub parallelism: usize,
    /// Per-cluster timeout in seconds; unset waits indefinitely.
    pub timeout_secs: Option<u64>,
    /// Keep the control plane out of read-only fan-outs too.
    pub restrict_control_plane_reads: bool,
    /// kubectl binary to invoke.
    pub kubectl_path: String,
}

impl Default for MultiConfig {
    fn default() -> Self {
        Self {
            control_plane_context: DEFAULT_CONTROL_PLANE_CONTEXT.to_string(),
            parallelism: 1,
            timeout_secs: None,
            restrict_control_plane_reads: false,
            kubectl_path: "kubectl".to_string(),
        }
    }
}

/// Returns `~/.kubectl-multi/`.
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::command_failed("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Path to `~/.kubectl-multi/config.json`.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load config from `~/.kubectl-multi/config.json`, returning default if missing.
pub fn load_config() -> Result<MultiConfig> {
    load_config_from(&config_path()?)
}

/// Load config from an explicit file, returning default if missing.
pub fn load_config_from(path: &std::path::Path) -> Result<MultiConfig> {
    if !path.exists() {
        return Ok(MultiConfig::default());
    }
    let data = std::fs::read_to_string(path)
        .map_err(|e| Error::command_failed(format!("failed to read {}: {}", path.display(), e)))?;
    serde_json::from_str(&data)
        .map_err(|e| Error::command_failed(format!("failed to parse {}: {}", path.display(), e)))
}

/// Resolve a kubeconfig path using the priority chain.
///
/// Returns `Some(path)` if one is configured, `None` to use kube defaults.
pub fn resolve_kubeconfig(explicit: Option<&str>) -> Option<String> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return Some(path.to_string());
    }

    match std::env::var(KUBECONFIG_ENV) {
        Ok(path) if !path.is_empty() => Some(path),
        _ => None,
    }
}
