//! Dispatch planning
//!
//! Ordering rules:
//! 1. The active context goes first, unless it is a restricted control plane.
//! 2. Every other cluster follows in discovery order.
//! 3. A restricted control plane is never invoked. It gets a synthesized
//!    notice as the last step.
//!
//! The control plane is restricted for mutating verbs, and for read-only
//! verbs too when [`PlanPolicy::restrict_control_plane_reads`] is set. When
//! unrestricted it is an ordinary cluster and follows rules 1 and 2.

use crate::command::CommandSpec;
use crate::discovery::{ClusterInfo, ClusterInventory};

/// Switches that change how a plan is laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlanPolicy {
    /// Apply the control-plane restriction to read-only verbs as well
    pub restrict_control_plane_reads: bool,
}

/// One entry of a [`DispatchPlan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlannedStep {
    /// Run `argv` against `cluster`
    Invoke { cluster: ClusterInfo, argv: Vec<String> },
    /// Do not run anything; report the control-plane notice
    Restricted { cluster: ClusterInfo },
}

impl PlannedStep {
    pub fn cluster(&self) -> &ClusterInfo {
        match self {
            PlannedStep::Invoke { cluster, .. } | PlannedStep::Restricted { cluster } => cluster,
        }
    }
}

/// Ordered steps for one command invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchPlan {
    pub steps: Vec<PlannedStep>,
}

impl DispatchPlan {
    pub fn build(command: &CommandSpec, inventory: &ClusterInventory, policy: PlanPolicy) -> Self {
        let restricted = command.class.mutates() || policy.restrict_control_plane_reads;
        let control_plane = if restricted {
            inventory.control_plane().map(|c| c.context.as_str())
        } else {
            None
        };
        let current = inventory
            .current()
            .map(|c| c.context.as_str())
            .filter(|c| Some(*c) != control_plane);

        let invoke = |cluster: &ClusterInfo| PlannedStep::Invoke {
            cluster: cluster.clone(),
            argv: command.argv_for(&cluster.context),
        };

        let mut steps = Vec::with_capacity(inventory.len());

        if let Some(cluster) = current.and_then(|c| inventory.get(c)) {
            steps.push(invoke(cluster));
        }

        for cluster in inventory.clusters() {
            let ctx = Some(cluster.context.as_str());
            if ctx == current || ctx == control_plane {
                continue;
            }
            steps.push(invoke(cluster));
        }

        if let Some(cluster) = control_plane.and_then(|c| inventory.get(c)) {
            steps.push(PlannedStep::Restricted {
                cluster: cluster.clone(),
            });
        }

        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Contexts in plan order.
    pub fn contexts(&self) -> Vec<&str> {
        self.steps
            .iter()
            .map(|s| s.cluster().context.as_str())
            .collect()
    }

    /// Number of steps that will actually run.
    pub fn invocations(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, PlannedStep::Invoke { .. }))
            .count()
    }
}
