//! `apply` and `create` - push manifests from a file to every workload cluster

use clap::Args;

use kubectl_multi_core::{CommandRequest, VerbClass};

use crate::{GlobalArgs, Result};

/// Apply or create resources from files across all managed clusters
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Filename, directory, or URL to files containing the resources
    #[arg(short = 'f', long, required = true)]
    pub filename: String,

    /// Process the directory used in -f, --filename recursively
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Must be "none", "server", or "client"
    #[arg(long, default_value = "none")]
    pub dry_run: String,

    /// Extra kubectl arguments, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl ApplyArgs {
    pub fn into_request(self, globals: &GlobalArgs, verb: &str) -> CommandRequest {
        let mut request = CommandRequest::new(verb, VerbClass::Mutating);
        request.flags = globals.common_flags(self.recursive, Some(self.dry_run));
        request.filename = Some(self.filename);
        request.passthrough = self.extra;
        request
    }
}

/// Run `apply` or `create`
pub async fn run(globals: &GlobalArgs, verb: &str, args: ApplyArgs) -> Result<()> {
    super::fan_out(globals, args.into_request(globals, verb), false).await
}
