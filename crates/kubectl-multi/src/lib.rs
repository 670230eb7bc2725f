//! kubectl-multi CLI library

pub mod commands;
pub mod config;
pub mod error;
pub mod kubectl;

pub use error::{Error, Result};

use clap::{Args, Parser, Subcommand, ValueEnum};
use kubectl_multi_core::ReportFormat;

/// kubectl-multi - run kubectl commands across every managed cluster
#[derive(Parser, Debug)]
#[command(name = "kubectl-multi")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to kubeconfig file (default: $KUBECTL_MULTI_KUBECONFIG, $KUBECONFIG or ~/.kube/config)
    #[arg(long, global = true)]
    pub kubeconfig: Option<String>,

    /// Context of the control-plane (ITS) cluster
    #[arg(long = "remote-context", global = true)]
    pub remote_context: Option<String>,

    /// Treat this context as the active one instead of the kubeconfig's current-context
    #[arg(long, global = true)]
    pub context: Option<String>,

    /// Namespace passed to every cluster
    #[arg(short = 'n', long, global = true)]
    pub namespace: Option<String>,

    /// Act across all namespaces
    #[arg(short = 'A', long, global = true)]
    pub all_namespaces: bool,

    /// Maximum clusters to run against at once (default 1: one after another)
    #[arg(long, global = true)]
    pub parallel: Option<usize>,

    /// Per-cluster timeout in seconds (0 disables)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Keep the control-plane cluster out of read-only commands too
    #[arg(long, global = true)]
    pub restrict_control_plane_reads: bool,

    /// Report format
    #[arg(long, default_value = "text", global = true)]
    pub report: ReportArg,

    /// Append a succeeded/failed/skipped summary to the report
    #[arg(long, global = true)]
    pub summary: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Report format
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ReportArg {
    /// One block per cluster (default)
    #[default]
    Text,
    Json,
    Yaml,
}

impl From<ReportArg> for ReportFormat {
    fn from(arg: ReportArg) -> Self {
        match arg {
            ReportArg::Text => ReportFormat::Text,
            ReportArg::Json => ReportFormat::Json,
            ReportArg::Yaml => ReportFormat::Yaml,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete resources across all managed clusters
    Delete(commands::delete::DeleteArgs),
    /// Display resources across all managed clusters
    Get(commands::read::ReadArgs),
    /// Show details of resources across all managed clusters
    Describe(commands::read::ReadArgs),
    /// Display resource (CPU/memory) usage across all managed clusters
    Top(commands::read::TopArgs),
    /// Apply a configuration from a file across all managed clusters
    Apply(commands::apply::ApplyArgs),
    /// Create resources from a file across all managed clusters
    Create(commands::apply::ApplyArgs),
    /// Set a new size for a deployment, replica set or stateful set across all managed clusters
    Scale(commands::update::ScaleArgs),
    /// Update fields of a resource across all managed clusters
    Patch(commands::update::PatchArgs),
    /// List the clusters commands will run against
    Clusters(commands::clusters::ClustersArgs),
    /// Show kubectl's help for a command merged with multi-cluster usage
    Usage(commands::usage::UsageArgs),
}

impl Cli {
    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        let globals = &self.globals;
        match self.command {
            Commands::Delete(args) => commands::delete::run(globals, args).await,
            Commands::Get(args) => commands::read::run(globals, "get", args).await,
            Commands::Describe(args) => commands::read::run(globals, "describe", args).await,
            Commands::Top(args) => commands::read::run_top(globals, args).await,
            Commands::Apply(args) => commands::apply::run(globals, "apply", args).await,
            Commands::Create(args) => commands::apply::run(globals, "create", args).await,
            Commands::Scale(args) => commands::update::run_scale(globals, args).await,
            Commands::Patch(args) => commands::update::run_patch(globals, args).await,
            Commands::Clusters(args) => commands::clusters::run(globals, args).await,
            Commands::Usage(args) => commands::usage::run(args).await,
        }
    }
}
