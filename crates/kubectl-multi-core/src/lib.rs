//! Multi-cluster kubectl fan-out
//!
//! Discovers cluster contexts from a kubeconfig, classifies each as the
//! control plane (ITS), a workload cluster (WDS) or unclassified, and runs
//! one logical kubectl command against all of them. Results come back as a
//! single report in a deterministic order, with failures isolated to the
//! cluster they happened on.

pub mod classify;
pub mod command;
pub mod confirm;
pub mod context;
pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod execute;
pub mod executor;
pub mod plan;
pub mod report;

pub use classify::{classify, is_workload_cluster, target_namespace, ClusterRole};
pub use command::{CommandSpec, CommonFlags, Target, VerbClass};
pub use confirm::confirm_destructive;
pub use context::{ClusterContext, ContextSource, KubeconfigSource, LoadedContexts};
pub use discovery::{discover_clusters, ClusterInfo, ClusterInventory};
pub use dispatch::{DispatchOptions, Dispatcher};
pub use error::{ConfigError, Error, Result};
pub use execute::{CommandRequest, ExecutionConfig, FanOut, Outcome, Prompt, Report};
pub use executor::{ClusterExecutor, InvocationError};
pub use plan::{DispatchPlan, PlanPolicy, PlannedStep};
pub use report::{render, ClusterResult, ReportFormat, ResultKind, ResultStatus, Summary};
