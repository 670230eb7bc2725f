//! Read-only commands: `get`, `describe`, `top`
//!
//! These run against the control-plane cluster as well unless
//! `--restrict-control-plane-reads` (or the config file) says otherwise.

use clap::Args;

use kubectl_multi_core::{CommandRequest, VerbClass};

use crate::{GlobalArgs, Result};

/// Query resources across all managed clusters
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// TYPE [NAME ...] or TYPE/NAME ...
    pub resources: Vec<String>,

    /// Filename, directory, or URL to files identifying the resources
    #[arg(short = 'f', long)]
    pub filename: Option<String>,

    /// Process the directory used in -f, --filename recursively
    #[arg(short = 'R', long)]
    pub recursive: bool,

    /// Selector (label query) to filter on
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// kubectl output format (e.g. wide, yaml, json)
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Extra kubectl arguments, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl ReadArgs {
    pub fn into_request(self, globals: &GlobalArgs, verb: &str) -> CommandRequest {
        let mut request = CommandRequest::new(verb, VerbClass::ReadOnly);
        request.verb_args = selector_args(self.selector.as_deref());
        if let Some(output) = self.output {
            request.verb_args.push("-o".to_string());
            request.verb_args.push(output);
        }
        request.flags = globals.common_flags(self.recursive, None);
        request.args = self.resources;
        request.filename = self.filename;
        request.passthrough = self.extra;
        request
    }
}

/// Display resource usage across all managed clusters
#[derive(Args, Debug)]
pub struct TopArgs {
    /// `pod` or `node`, optionally followed by a name
    #[arg(required = true)]
    pub resources: Vec<String>,

    /// Selector (label query) to filter on
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// Extra kubectl arguments, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

fn selector_args(selector: Option<&str>) -> Vec<String> {
    match selector {
        Some(s) => vec!["-l".to_string(), s.to_string()],
        None => Vec::new(),
    }
}

/// Run `get` or `describe`
pub async fn run(globals: &GlobalArgs, verb: &str, args: ReadArgs) -> Result<()> {
    super::fan_out(globals, args.into_request(globals, verb), false).await
}

/// Run `top`
pub async fn run_top(globals: &GlobalArgs, args: TopArgs) -> Result<()> {
    let mut request = CommandRequest::new("top", VerbClass::ReadOnly);
    request.verb_args = selector_args(args.selector.as_deref());
    request.flags = globals.common_flags(false, None);
    request.args = args.resources;
    request.passthrough = args.extra;
    super::fan_out(globals, request, false).await
}
