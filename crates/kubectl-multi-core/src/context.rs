//! Context source - read named contexts from a kubeconfig
//!
//! An explicit path is read on its own. Without one, kube's default
//! discovery applies (`KUBECONFIG`, then `~/.kube/config`).

use std::collections::HashSet;
use std::path::PathBuf;

use kube::config::Kubeconfig;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// A named handle into the multi-cluster configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterContext {
    pub name: String,
    pub is_current: bool,
}

/// Contexts in configuration order plus the active pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedContexts {
    pub contexts: Vec<ClusterContext>,
    /// `None` when the active context could not be resolved
    pub current_context: Option<String>,
}

impl LoadedContexts {
    /// Build from raw names, marking the one equal to `current` as active.
    ///
    /// Duplicate names keep their first occurrence.
    pub fn from_names<I, S>(names: I, current: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let current = current.filter(|c| !c.is_empty());
        let mut seen = HashSet::new();
        let mut contexts = Vec::new();

        for name in names {
            let name = name.into();
            if !seen.insert(name.clone()) {
                warn!(context = %name, "Duplicate context in kubeconfig, keeping first");
                continue;
            }
            let is_current = current.as_deref() == Some(name.as_str());
            contexts.push(ClusterContext { name, is_current });
        }

        Self {
            contexts,
            current_context: current,
        }
    }
}

/// Anything that can produce the list of contexts for discovery.
pub trait ContextSource {
    fn load(&self) -> Result<LoadedContexts, ConfigError>;
}

/// Reads contexts from a kubeconfig file via `kube::config`.
#[derive(Clone, Debug, Default)]
pub struct KubeconfigSource {
    /// Explicit kubeconfig path; `None` uses kube default discovery
    pub path: Option<PathBuf>,
    /// Replaces the kubeconfig's `current-context` when set
    pub context_override: Option<String>,
}

impl KubeconfigSource {
    pub fn new(path: Option<PathBuf>, context_override: Option<String>) -> Self {
        Self {
            path,
            context_override,
        }
    }

    fn read(&self) -> Result<Kubeconfig, ConfigError> {
        match &self.path {
            Some(path) => Kubeconfig::read_from(path)
                .map_err(|e| ConfigError::new(path.display().to_string(), e.to_string())),
            None => Kubeconfig::read().map_err(|e| ConfigError::new("<default>", e.to_string())),
        }
    }
}

impl ContextSource for KubeconfigSource {
    fn load(&self) -> Result<LoadedContexts, ConfigError> {
        let kubeconfig = self.read()?;

        let current = match &self.context_override {
            Some(ctx) if !ctx.is_empty() => Some(ctx.clone()),
            _ => kubeconfig.current_context.clone(),
        };

        let loaded = LoadedContexts::from_names(
            kubeconfig.contexts.into_iter().map(|c| c.name),
            current,
        );
        debug!(
            contexts = loaded.contexts.len(),
            current = ?loaded.current_context,
            "Loaded kubeconfig contexts"
        );
        Ok(loaded)
    }
}
