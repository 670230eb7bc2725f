//! Cluster discovery from kubeconfig contexts
//!
//! Discovery is config-only. Every context becomes a [`ClusterInfo`]; nothing
//! is contacted until dispatch, so unreachable clusters show up as errors in
//! their own report block rather than here.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::classify::{classify, ClusterRole};
use crate::context::ContextSource;
use crate::error::{Error, Result};

/// A discovered, classified unit of dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClusterInfo {
    pub context: String,
    pub role: ClusterRole,
}

/// Discovered clusters in configuration order, with the active context.
#[derive(Clone, Debug, Default)]
pub struct ClusterInventory {
    clusters: Vec<ClusterInfo>,
    by_context: HashMap<String, usize>,
    current_context: Option<String>,
}

impl ClusterInventory {
    pub fn new(clusters: Vec<ClusterInfo>, current_context: Option<String>) -> Self {
        let mut by_context = HashMap::with_capacity(clusters.len());
        for (i, c) in clusters.iter().enumerate() {
            by_context.entry(c.context.clone()).or_insert(i);
        }
        Self {
            clusters,
            by_context,
            current_context,
        }
    }

    pub fn clusters(&self) -> &[ClusterInfo] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn get(&self, context: &str) -> Option<&ClusterInfo> {
        self.by_context.get(context).map(|&i| &self.clusters[i])
    }

    /// The active context, if it names a discovered cluster.
    pub fn current(&self) -> Option<&ClusterInfo> {
        self.current_context.as_deref().and_then(|c| self.get(c))
    }

    /// The active context as configured, discovered or not.
    pub fn current_context(&self) -> Option<&str> {
        self.current_context.as_deref()
    }

    /// The control-plane cluster, if one was discovered.
    pub fn control_plane(&self) -> Option<&ClusterInfo> {
        self.clusters
            .iter()
            .find(|c| c.role == ClusterRole::ControlPlane)
    }

    /// Fail with [`Error::NoClusters`] when nothing was discovered.
    pub fn require_clusters(self) -> Result<Self> {
        if self.is_empty() {
            Err(Error::NoClusters)
        } else {
            Ok(self)
        }
    }
}

/// Discover and classify every context from `source`.
///
/// `control_plane` names the management cluster's context; that context is
/// classified as [`ClusterRole::ControlPlane`] regardless of its name.
pub fn discover_clusters(
    source: &dyn ContextSource,
    control_plane: Option<&str>,
) -> Result<ClusterInventory> {
    let loaded = source.load().map_err(Error::Discovery)?;

    let clusters: Vec<ClusterInfo> = loaded
        .contexts
        .into_iter()
        .map(|ctx| {
            let role = classify(&ctx.name, control_plane);
            debug!(context = %ctx.name, %role, current = ctx.is_current, "Discovered cluster");
            ClusterInfo {
                context: ctx.name,
                role,
            }
        })
        .collect();

    Ok(ClusterInventory::new(clusters, loaded.current_context))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LoadedContexts;
    use crate::error::ConfigError;

    struct StaticSource(Vec<&'static str>, Option<&'static str>);

    impl ContextSource for StaticSource {
        fn load(&self) -> std::result::Result<LoadedContexts, ConfigError> {
            Ok(LoadedContexts::from_names(
                self.0.iter().copied(),
                self.1.map(String::from),
            ))
        }
    }

    struct FailingSource;

    impl ContextSource for FailingSource {
        fn load(&self) -> std::result::Result<LoadedContexts, ConfigError> {
            Err(ConfigError::new("/bad", "permission denied"))
        }
    }

    #[test]
    fn test_discovery_classifies_each_context() {
        let source = StaticSource(vec!["a", "wds-1", "its-hub", "b"], Some("wds-1"));
        let inv = discover_clusters(&source, Some("its-hub")).unwrap();

        let roles: Vec<(&str, ClusterRole)> = inv
            .clusters()
            .iter()
            .map(|c| (c.context.as_str(), c.role))
            .collect();
        assert_eq!(
            roles,
            vec![
                ("a", ClusterRole::Unclassified),
                ("wds-1", ClusterRole::Workload),
                ("its-hub", ClusterRole::ControlPlane),
                ("b", ClusterRole::Unclassified),
            ]
        );
        assert_eq!(inv.current().map(|c| c.context.as_str()), Some("wds-1"));
        assert_eq!(
            inv.control_plane().map(|c| c.context.as_str()),
            Some("its-hub")
        );
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let source = StaticSource(vec!["z", "a", "m"], None);
        let first = discover_clusters(&source, None).unwrap();
        let second = discover_clusters(&source, None).unwrap();
        assert_eq!(first.clusters(), second.clusters());
    }

    #[test]
    fn test_source_failure_is_discovery_error() {
        let err = discover_clusters(&FailingSource, None).unwrap_err();
        assert!(matches!(err, Error::Discovery(_)));
    }

    #[test]
    fn test_empty_inventory_requires_clusters() {
        let inv = discover_clusters(&StaticSource(vec![], None), None).unwrap();
        assert!(inv.is_empty());
        assert!(matches!(inv.require_clusters(), Err(Error::NoClusters)));
    }

    #[test]
    fn test_current_not_discovered() {
        let inv = discover_clusters(&StaticSource(vec!["a"], Some("gone")), None).unwrap();
        assert!(inv.current().is_none());
        assert_eq!(inv.current_context(), Some("gone"));
    }
}
