//! `kubectl multi usage <COMMAND>` - kubectl's help merged with multi-cluster usage
//!
//! Runs `kubectl <COMMAND> --help`, splits the text into its sections and
//! prints them after the multi-cluster description, usage and examples.
//! When kubectl is not available only the multi-cluster part is shown.

use clap::Args;
use tracing::warn;

use crate::config::{self, MultiConfig};
use crate::kubectl::upstream_help;
use crate::{Error, Result};

/// Show combined help for a fanned-out command
#[derive(Args, Debug)]
pub struct UsageArgs {
    /// Command to describe (e.g. delete, get, apply)
    pub command: String,
}

/// Sections of `kubectl <command> --help` output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandInfo {
    pub description: String,
    pub examples: String,
    pub options: String,
    pub usage: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Description,
    Examples,
    Options,
    Usage,
    Trailer,
}

impl CommandInfo {
    /// Split kubectl help text on its `Examples:`, `Options:` and `Usage:` headers.
    ///
    /// Text after the usage block (the "Use kubectl options" footer) is dropped.
    pub fn parse(help: &str) -> Self {
        let mut sections: [Vec<&str>; 4] = Default::default();
        let mut current = Section::Description;

        for line in help.lines() {
            let next = match line.trim_end() {
                "Examples:" => Some(Section::Examples),
                "Options:" => Some(Section::Options),
                "Usage:" => Some(Section::Usage),
                _ => None,
            };
            if let Some(section) = next {
                current = section;
                continue;
            }
            if current == Section::Usage && line.trim().is_empty() {
                current = Section::Trailer;
                continue;
            }

            let idx = match current {
                Section::Description => 0,
                Section::Examples => 1,
                Section::Options => 2,
                Section::Usage => 3,
                Section::Trailer => continue,
            };
            sections[idx].push(line);
        }

        let [description, examples, options, usage] = sections.map(|lines| join_trimmed(&lines));
        Self {
            description,
            examples,
            options,
            usage,
        }
    }
}

/// Join lines, dropping leading and trailing blank lines.
fn join_trimmed(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].join("\n"),
        _ => String::new(),
    }
}

/// Multi-cluster text shown ahead of kubectl's own help.
#[derive(Clone, Copy, Debug)]
pub struct MultiClusterHelp {
    pub description: &'static str,
    pub examples: &'static str,
    pub usage: &'static str,
}

/// Multi-cluster help for a supported command.
pub fn multi_cluster_help(command: &str) -> Option<MultiClusterHelp> {
    let help = match command {
        "delete" => MultiClusterHelp {
            description: "Delete resources across all managed clusters.\n\
                This command deletes resources from every managed workload cluster. \
                The control-plane cluster is never modified.",
            examples: "# Delete a deployment from all managed clusters\n\
                kubectl multi delete deployment nginx\n\n\
                # Delete pods with a specific label from all clusters\n\
                kubectl multi delete pods -l app=nginx\n\n\
                # Delete resources from a file across all clusters\n\
                kubectl multi delete -f deployment.yaml\n\n\
                # Delete all pods in all clusters without prompting\n\
                kubectl multi delete pods --all --yes",
            usage: "kubectl multi delete [TYPE[.VERSION][.GROUP] [NAME | -l label] | TYPE[.VERSION][.GROUP]/NAME ...] [flags]",
        },
        "get" => MultiClusterHelp {
            description: "Display one or many resources across all managed clusters.",
            examples: "# List all pods in every cluster\n\
                kubectl multi get pods -A\n\n\
                # List deployments with a label, wide output\n\
                kubectl multi get deployments -l app=web -o wide",
            usage: "kubectl multi get [TYPE[.VERSION][.GROUP] [NAME | -l label] | TYPE[.VERSION][.GROUP]/NAME ...] [flags]",
        },
        "describe" => MultiClusterHelp {
            description: "Show details of a resource or group of resources across all managed clusters.",
            examples: "# Describe a deployment in every cluster\n\
                kubectl multi describe deployment/nginx -n apps",
            usage: "kubectl multi describe (-f FILENAME | TYPE [NAME_PREFIX | -l label] | TYPE/NAME) [flags]",
        },
        "top" => MultiClusterHelp {
            description: "Display resource (CPU/memory) usage across all managed clusters.",
            examples: "# Show node usage in every cluster\n\
                kubectl multi top node\n\n\
                # Show pod usage in a namespace\n\
                kubectl multi top pod -n apps",
            usage: "kubectl multi top (node | pod) [NAME] [flags]",
        },
        "apply" => MultiClusterHelp {
            description: "Apply a configuration to resources across all managed clusters.",
            examples: "# Apply a manifest to every workload cluster\n\
                kubectl multi apply -f deployment.yaml\n\n\
                # Apply a directory recursively as a server-side dry run\n\
                kubectl multi apply -f manifests/ -R --dry-run server",
            usage: "kubectl multi apply -f FILENAME [flags]",
        },
        "create" => MultiClusterHelp {
            description: "Create resources from a file across all managed clusters.",
            examples: "# Create the resources in a file in every workload cluster\n\
                kubectl multi create -f namespace.yaml",
            usage: "kubectl multi create -f FILENAME [flags]",
        },
        "scale" => MultiClusterHelp {
            description: "Set a new size for a deployment, replica set or stateful set across all managed clusters.",
            examples: "# Scale a deployment to 3 replicas in every workload cluster\n\
                kubectl multi scale deployment/web --replicas 3",
            usage: "kubectl multi scale (-f FILENAME | TYPE NAME | TYPE/NAME) --replicas=COUNT [flags]",
        },
        "patch" => MultiClusterHelp {
            description: "Update fields of a resource across all managed clusters.",
            examples: "# Merge-patch a deployment in every workload cluster\n\
                kubectl multi patch deployment web -p '{\"spec\":{\"replicas\":2}}' --type merge",
            usage: "kubectl multi patch (-f FILENAME | TYPE NAME | TYPE/NAME) -p PATCH [flags]",
        },
        _ => return None,
    };
    Some(help)
}

const SUPPORTED_COMMANDS: &[&str] = &[
    "delete", "get", "describe", "top", "apply", "create", "scale", "patch",
];

/// Global flag lines, with defaults taken from the config file.
fn global_flags(defaults: &MultiConfig) -> Vec<String> {
    vec![
        "      --kubeconfig='': Path to the kubeconfig file".to_string(),
        format!(
            "      --remote-context='{}': Context of the control-plane (ITS) cluster",
            defaults.control_plane_context
        ),
        "      --context='': Treat this context as the active one".to_string(),
        "  -n, --namespace='': Namespace passed to every cluster".to_string(),
        "  -A, --all-namespaces=false: Act across all namespaces".to_string(),
        format!(
            "      --parallel={}: Maximum clusters to run against at once",
            defaults.parallelism
        ),
        format!(
            "      --timeout={}: Per-cluster timeout in seconds (0 disables)",
            defaults.timeout_secs.unwrap_or(0)
        ),
        format!(
            "      --restrict-control-plane-reads={}: Keep the control-plane cluster out of read-only commands too",
            defaults.restrict_control_plane_reads
        ),
        "      --report='text': Report format (text, json, yaml)".to_string(),
        "      --summary=false: Append a succeeded/failed/skipped summary".to_string(),
        "  -v, --verbose=false: Debug logging".to_string(),
    ]
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| if l.is_empty() { String::new() } else { format!("  {}", l) })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Merge kubectl's help sections with the multi-cluster text.
pub fn format_multi_cluster_help(
    info: &CommandInfo,
    multi: &MultiClusterHelp,
    defaults: &MultiConfig,
) -> String {
    let mut out = String::new();
    out.push_str(multi.description);
    out.push_str("\n\nUsage:\n");
    out.push_str(&indent(multi.usage));
    out.push_str("\n\nExamples:\n");
    out.push_str(&indent(multi.examples));
    out.push('\n');

    if !info.description.is_empty() {
        out.push_str("\nOriginal kubectl description:\n");
        out.push_str(&indent(&info.description));
        out.push('\n');
    }
    if !info.options.is_empty() {
        out.push_str("\nOptions:\n");
        out.push_str(&info.options);
        out.push('\n');
    }
    if !info.usage.is_empty() {
        out.push_str("\nOriginal kubectl usage:\n");
        out.push_str(&info.usage);
        out.push('\n');
    }

    out.push_str("\nGlobal Flags (multi-cluster):\n");
    for flag in global_flags(defaults) {
        out.push_str(&flag);
        out.push('\n');
    }
    out
}

pub async fn run(args: UsageArgs) -> Result<()> {
    let multi = multi_cluster_help(&args.command).ok_or_else(|| {
        Error::validation(format!(
            "no multi-cluster help for {:?}; supported commands: {}",
            args.command,
            SUPPORTED_COMMANDS.join(", ")
        ))
    })?;

    let defaults = config::load_config()?;
    let info = match upstream_help(&defaults.kubectl_path, &args.command).await {
        Ok(text) => CommandInfo::parse(&text),
        Err(e) => {
            warn!(error = %e, "kubectl help unavailable, showing multi-cluster help only");
            CommandInfo::default()
        }
    };

    print!("{}", format_multi_cluster_help(&info, &multi, &defaults));
    Ok(())
}
