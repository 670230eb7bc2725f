//! Execute entry point - one logical command across all clusters
//!
//! Order of operations:
//! 1. Resolve the target (fails fast on a conflicting or missing target)
//! 2. Discover clusters (fails on config errors or zero clusters)
//! 3. Confirmation gate, once, for destructive verbs
//! 4. Plan and dispatch
//! 5. Render the report
//!
//! Only steps 1-3 can fail the command. Once dispatch starts every problem
//! is reported inside the affected cluster's block.

use std::io::Write;
use std::sync::Arc;

use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::classify::target_namespace;
use crate::command::{CommandSpec, CommonFlags, Target, VerbClass};
use crate::confirm::confirm_destructive;
use crate::context::ContextSource;
use crate::discovery::discover_clusters;
use crate::dispatch::{DispatchOptions, Dispatcher};
use crate::error::Result;
use crate::executor::ClusterExecutor;
use crate::plan::{DispatchPlan, PlanPolicy};
use crate::report::{render, ClusterResult, ReportFormat};

/// Everything that shapes one run, threaded through explicitly.
#[derive(Clone, Debug, Default)]
pub struct ExecutionConfig {
    /// Kubeconfig path handed to the executor; `None` uses its defaults
    pub kubeconfig: Option<String>,
    /// Context of the control-plane (ITS) cluster
    pub control_plane_context: Option<String>,
    pub dispatch: DispatchOptions,
    pub policy: PlanPolicy,
    /// Skip the confirmation prompt
    pub assume_yes: bool,
    pub report_format: ReportFormat,
    pub summary: bool,
}

/// Raw command input as the front-end parsed it.
#[derive(Clone, Debug)]
pub struct CommandRequest {
    pub verb: String,
    pub class: VerbClass,
    /// Positional `TYPE [NAME]` args
    pub args: Vec<String>,
    /// `-f` source
    pub filename: Option<String>,
    pub flags: CommonFlags,
    pub verb_args: Vec<String>,
    pub passthrough: Vec<String>,
}

impl CommandRequest {
    pub fn new(verb: impl Into<String>, class: VerbClass) -> Self {
        Self {
            verb: verb.into(),
            class,
            args: Vec::new(),
            filename: None,
            flags: CommonFlags::default(),
            verb_args: Vec::new(),
            passthrough: Vec::new(),
        }
    }

    /// Resolve into a validated [`CommandSpec`].
    pub fn into_spec(self) -> Result<CommandSpec> {
        let target = Target::from_args(&self.verb, &self.args, self.filename.as_deref())?;
        let spec = CommandSpec::new(self.verb, self.class, target)
            .with_flags(self.flags)
            .with_verb_args(self.verb_args)
            .with_passthrough(self.passthrough);
        spec.validate()?;
        Ok(spec)
    }
}

/// Results plus their rendered form.
#[derive(Clone, Debug)]
pub struct Report {
    pub results: Vec<ClusterResult>,
    pub rendered: String,
}

/// How a command ended, when it did not fail before dispatch.
#[derive(Clone, Debug)]
pub enum Outcome {
    Completed(Report),
    /// Declined at the confirmation gate, or interrupted before dispatch;
    /// nothing was dispatched
    Cancelled,
}

/// Terminal used by the confirmation gate.
pub struct Prompt<'a, R, W> {
    pub input: &'a mut R,
    pub output: &'a mut W,
}

/// The fan-out engine with its collaborators.
pub struct FanOut<'a> {
    source: &'a dyn ContextSource,
    executor: Arc<dyn ClusterExecutor>,
    config: &'a ExecutionConfig,
}

impl<'a> FanOut<'a> {
    pub fn new(
        source: &'a dyn ContextSource,
        executor: Arc<dyn ClusterExecutor>,
        config: &'a ExecutionConfig,
    ) -> Self {
        Self {
            source,
            executor,
            config,
        }
    }

    pub async fn execute<R, W>(
        &self,
        request: CommandRequest,
        prompt: Prompt<'_, R, W>,
        cancel: &CancellationToken,
    ) -> Result<Outcome>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let command = request.into_spec()?;

        let inventory =
            discover_clusters(self.source, self.config.control_plane_context.as_deref())?
                .require_clusters()?;
        debug!(clusters = inventory.len(), "Cluster discovery complete");

        if command.class.needs_confirmation() && !self.config.assume_yes {
            let question = format!(
                "Are you sure you want to {} these resources across {} clusters?",
                command.verb,
                inventory.len()
            );
            if !confirm_destructive(&question, prompt.input, prompt.output, cancel).await {
                info!(verb = %command.verb, "Confirmation declined, nothing dispatched");
                return Ok(Outcome::Cancelled);
            }
        }

        if cancel.is_cancelled() {
            info!(verb = %command.verb, "Interrupted before dispatch, nothing dispatched");
            return Ok(Outcome::Cancelled);
        }

        let plan = DispatchPlan::build(&command, &inventory, self.config.policy);
        info!(
            verb = %command.verb,
            namespace = target_namespace(command.flags.namespace.as_deref().unwrap_or_default()),
            order = ?plan.contexts(),
            "Planned fan-out"
        );

        let dispatcher = Dispatcher::new(
            self.executor.clone(),
            self.config.kubeconfig.clone(),
            self.config.dispatch,
        );
        let results = dispatcher.dispatch(&plan, cancel).await;
        let rendered = render(&results, self.config.report_format, self.config.summary)?;

        Ok(Outcome::Completed(Report { results, rendered }))
    }
}
