//! Command dispatcher - run a plan against every cluster
//!
//! Steps run with bounded concurrency (`parallelism` 1 is strictly
//! sequential). Each result is written into the slot of its plan position,
//! so the report order is the plan order whatever order invocations finish
//! in. A failed, timed-out or cancelled invocation only affects its own slot.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::executor::{ClusterExecutor, InvocationError};
use crate::plan::{DispatchPlan, PlannedStep};
use crate::report::ClusterResult;

/// Execution bounds for a dispatch run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Maximum concurrent invocations; values below 1 are treated as 1
    pub parallelism: usize,
    /// Per-cluster limit; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            parallelism: 1,
            timeout: None,
        }
    }
}

/// Drives a [`DispatchPlan`] through a [`ClusterExecutor`].
pub struct Dispatcher {
    executor: Arc<dyn ClusterExecutor>,
    kubeconfig: Option<String>,
    options: DispatchOptions,
}

impl Dispatcher {
    pub fn new(
        executor: Arc<dyn ClusterExecutor>,
        kubeconfig: Option<String>,
        options: DispatchOptions,
    ) -> Self {
        Self {
            executor,
            kubeconfig,
            options,
        }
    }

    /// Run every step and return results in plan order.
    ///
    /// On cancellation, in-flight invocations report [`InvocationError::Cancelled`]
    /// and steps that had not started yet produce no result.
    pub async fn dispatch(
        &self,
        plan: &DispatchPlan,
        cancel: &CancellationToken,
    ) -> Vec<ClusterResult> {
        let parallelism = self.options.parallelism.max(1);
        info!(
            steps = plan.len(),
            invocations = plan.invocations(),
            parallelism,
            "Dispatching command"
        );

        let mut slots: Vec<Option<ClusterResult>> = vec![None; plan.len()];
        let mut completed = stream::iter(plan.steps.iter().enumerate())
            .map(|(index, step)| async move { (index, self.run_step(step, cancel).await) })
            .buffer_unordered(parallelism);

        while let Some((index, result)) = completed.next().await {
            slots[index] = result;
        }

        slots.into_iter().flatten().collect()
    }

    async fn run_step(
        &self,
        step: &PlannedStep,
        cancel: &CancellationToken,
    ) -> Option<ClusterResult> {
        let (cluster, argv) = match step {
            PlannedStep::Restricted { cluster } => {
                debug!(context = %cluster.context, "Skipping control-plane cluster");
                return Some(ClusterResult::restricted(&cluster.context));
            }
            PlannedStep::Invoke { cluster, argv } => (cluster, argv),
        };

        if cancel.is_cancelled() {
            debug!(context = %cluster.context, "Cancelled before dispatch, skipping");
            return None;
        }

        debug!(context = %cluster.context, role = %cluster.role, ?argv, "Invoking");
        let run = self.executor.run(argv, self.kubeconfig.as_deref());
        let outcome = tokio::select! {
            _ = cancel.cancelled() => Err(InvocationError::Cancelled),
            res = with_timeout(self.options.timeout, run) => res,
        };

        Some(match outcome {
            Ok(output) => {
                debug!(context = %cluster.context, "Invocation succeeded");
                ClusterResult::success(&cluster.context, output)
            }
            Err(err) => {
                warn!(context = %cluster.context, error = %err, "Invocation failed");
                ClusterResult::failure(&cluster.context, err)
            }
        })
    }
}

async fn with_timeout<F>(limit: Option<Duration>, fut: F) -> Result<String, InvocationError>
where
    F: Future<Output = Result<String, InvocationError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .unwrap_or(Err(InvocationError::Timeout(limit))),
        None => fut.await,
    }
}
