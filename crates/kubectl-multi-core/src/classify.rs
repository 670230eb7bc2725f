//! Cluster role classification
//!
//! The control-plane cluster is identified by the context name the caller
//! passes in. Workload clusters are recognised by the `wds` marker anywhere
//! in the context name. The marker match is case-sensitive: `WDS-1` is not a
//! workload cluster.

use std::fmt;

use serde::Serialize;

/// Marker token identifying workload (WDS) clusters.
pub const WORKLOAD_MARKER: &str = "wds";

/// Namespace used when none is given.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Role a discovered cluster plays in the multi-cluster setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterRole {
    /// The cluster hosting the management plane (ITS)
    ControlPlane,
    /// A managed workload cluster (WDS)
    Workload,
    Unclassified,
}

impl fmt::Display for ClusterRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterRole::ControlPlane => write!(f, "its"),
            ClusterRole::Workload => write!(f, "wds"),
            ClusterRole::Unclassified => write!(f, "-"),
        }
    }
}

/// Whether `name` contains the workload marker.
pub fn is_workload_cluster(name: &str) -> bool {
    name.contains(WORKLOAD_MARKER)
}

/// Classify a context name.
///
/// `control_plane` is the context of the management cluster; a match on it
/// wins over the name pattern.
pub fn classify(name: &str, control_plane: Option<&str>) -> ClusterRole {
    if name.is_empty() {
        return ClusterRole::Unclassified;
    }
    if control_plane == Some(name) {
        return ClusterRole::ControlPlane;
    }
    if is_workload_cluster(name) {
        ClusterRole::Workload
    } else {
        ClusterRole::Unclassified
    }
}

/// Namespace to report for a command: the given one, or `default`.
///
/// The value is not trimmed.
pub fn target_namespace(namespace: &str) -> &str {
    if namespace.is_empty() {
        DEFAULT_NAMESPACE
    } else {
        namespace
    }
}
