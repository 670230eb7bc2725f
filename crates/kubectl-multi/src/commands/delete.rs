//! `kubectl multi delete` - delete resources from every managed cluster
//!
//! The control-plane cluster is never touched; it gets a notice block
//! instead. Asks for confirmation once before anything is deleted.
//!
//! # Usage
//!
//! ```bash
//! # Delete a deployment from all managed clusters
//! kubectl multi delete deployment nginx
//!
//! # Delete resources from a file across all clusters
//! kubectl multi delete -f deployment.yaml
//!
//! # Delete pods with a label, without prompting
//! kubectl multi delete pods -l app=nginx --yes
//! ```

use clap::Args;

use kubectl_multi_core::{CommandRequest, VerbClass};

use crate::{GlobalArgs, Result};

/// Delete resources across all managed clusters
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// TYPE [NAME ...] or TYPE/NAME ...
    pub resources: Vec<String>,

    /// Filename, directory, or URL to files identifying the resources to delete
    #[arg(short = 'f', long)]
    pub filename: Option<String>,

    /// Process the directory used in -f, --filename recursively
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Must be "none", "server", or "client"
    #[arg(long, default_value = "none")]
    pub dry_run: String,

    /// Selector (label query) to filter on
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// Delete all resources of the given type
    #[arg(long)]
    pub all: bool,

    /// Immediately remove resources from the API and bypass graceful deletion
    #[arg(long)]
    pub force: bool,

    /// Seconds given to the resource to terminate gracefully
    #[arg(long)]
    pub grace_period: Option<i64>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Extra kubectl arguments, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl DeleteArgs {
    /// Verb-specific flags in kubectl syntax.
    fn verb_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(selector) = &self.selector {
            args.push("-l".to_string());
            args.push(selector.clone());
        }
        if self.all {
            args.push("--all".to_string());
        }
        if self.force {
            args.push("--force".to_string());
        }
        if let Some(secs) = self.grace_period {
            args.push(format!("--grace-period={}", secs));
        }
        args
    }

    pub fn into_request(self, globals: &GlobalArgs) -> CommandRequest {
        let mut request = CommandRequest::new("delete", VerbClass::Destructive);
        request.verb_args = self.verb_args();
        request.flags = globals.common_flags(self.recursive, Some(self.dry_run));
        request.args = self.resources;
        request.filename = self.filename;
        request.passthrough = self.extra;
        request
    }
}

/// Run the delete command
pub async fn run(globals: &GlobalArgs, args: DeleteArgs) -> Result<()> {
    let yes = args.yes;
    super::fan_out(globals, args.into_request(globals), yes).await
}
