//! In-place updates: `scale` and `patch`

use clap::{Args, ValueEnum};

use kubectl_multi_core::{CommandRequest, VerbClass};

use crate::{GlobalArgs, Result};

/// Scale resources across all managed clusters
#[derive(Args, Debug)]
pub struct ScaleArgs {
    /// TYPE NAME or TYPE/NAME
    pub resources: Vec<String>,

    /// Filename identifying the resource to scale
    #[arg(short = 'f', long)]
    pub filename: Option<String>,

    /// The new desired number of replicas
    #[arg(long, required = true)]
    pub replicas: u32,

    /// Extra kubectl arguments, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

/// Patch strategy
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PatchType {
    Strategic,
    Merge,
    Json,
}

impl PatchType {
    fn as_str(self) -> &'static str {
        match self {
            PatchType::Strategic => "strategic",
            PatchType::Merge => "merge",
            PatchType::Json => "json",
        }
    }
}

/// Patch resources across all managed clusters
#[derive(Args, Debug)]
pub struct PatchArgs {
    /// TYPE NAME or TYPE/NAME
    pub resources: Vec<String>,

    /// Filename identifying the resource to patch
    #[arg(short = 'f', long)]
    pub filename: Option<String>,

    /// The patch to apply to the resource
    #[arg(short = 'p', long, required = true)]
    pub patch: String,

    /// The type of patch being provided
    #[arg(long = "type")]
    pub patch_type: Option<PatchType>,

    /// Must be "none", "server", or "client"
    #[arg(long, default_value = "none")]
    pub dry_run: String,

    /// Extra kubectl arguments, after `--`
    #[arg(last = true)]
    pub extra: Vec<String>,
}

impl ScaleArgs {
    pub fn into_request(self, globals: &GlobalArgs) -> CommandRequest {
        let mut request = CommandRequest::new("scale", VerbClass::Mutating);
        request.verb_args = vec![format!("--replicas={}", self.replicas)];
        request.flags = globals.common_flags(false, None);
        request.args = self.resources;
        request.filename = self.filename;
        request.passthrough = self.extra;
        request
    }
}

impl PatchArgs {
    pub fn into_request(self, globals: &GlobalArgs) -> CommandRequest {
        let mut request = CommandRequest::new("patch", VerbClass::Mutating);
        request.verb_args = vec!["-p".to_string(), self.patch];
        if let Some(t) = self.patch_type {
            request.verb_args.push(format!("--type={}", t.as_str()));
        }
        request.flags = globals.common_flags(false, Some(self.dry_run));
        request.args = self.resources;
        request.filename = self.filename;
        request.passthrough = self.extra;
        request
    }
}

/// Run `scale`
pub async fn run_scale(globals: &GlobalArgs, args: ScaleArgs) -> Result<()> {
    super::fan_out(globals, args.into_request(globals), false).await
}

/// Run `patch`
pub async fn run_patch(globals: &GlobalArgs, args: PatchArgs) -> Result<()> {
    super::fan_out(globals, args.into_request(globals), false).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_scale_request() {
        let cli = Cli::try_parse_from([
            "kubectl-multi",
            "scale",
            "deployment/web",
            "--replicas",
            "3",
            "-n",
            "apps",
        ])
        .unwrap();
        let Commands::Scale(args) = cli.command else {
            panic!("expected scale");
        };
        let spec = args.into_request(&cli.globals).into_spec().unwrap();
        assert_eq!(
            spec.argv_for("wds1"),
            vec![
                "scale",
                "deployment/web",
                "--context",
                "wds1",
                "-n",
                "apps",
                "--replicas=3"
            ]
        );
    }

    #[test]
    fn test_patch_request() {
        let cli = Cli::try_parse_from([
            "kubectl-multi",
            "patch",
            "deployment",
            "web",
            "-p",
            r#"{"spec":{"replicas":2}}"#,
            "--type",
            "merge",
        ])
        .unwrap();
        let Commands::Patch(args) = cli.command else {
            panic!("expected patch");
        };
        let spec = args.into_request(&cli.globals).into_spec().unwrap();
        assert_eq!(
            spec.argv_for("c"),
            vec![
                "patch",
                "deployment",
                "web",
                "--context",
                "c",
                "-p",
                r#"{"spec":{"replicas":2}}"#,
                "--type=merge"
            ]
        );
    }

    #[test]
    fn test_scale_requires_replicas() {
        assert!(Cli::try_parse_from(["kubectl-multi", "scale", "deployment/web"]).is_err());
    }
}
