//! CLI commands

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use kubectl_multi_core::{
    CommandRequest, CommonFlags, DispatchOptions, ExecutionConfig, FanOut, KubeconfigSource,
    Outcome, PlanPolicy, Prompt,
};

use crate::config::{self, MultiConfig};
use crate::kubectl::KubectlExecutor;
use crate::{Error, GlobalArgs, Result};

pub mod apply;
pub mod clusters;
pub mod delete;
pub mod format;
pub mod read;
pub mod update;
pub mod usage;

impl GlobalArgs {
    /// Flags shared by every fanned-out invocation.
    pub fn common_flags(&self, recursive: bool, dry_run: Option<String>) -> CommonFlags {
        CommonFlags {
            recursive,
            dry_run,
            namespace: self.namespace.clone(),
            all_namespaces: self.all_namespaces,
        }
    }

    /// Merge flags over file defaults into the run configuration.
    pub fn execution_config(&self, file: &MultiConfig, assume_yes: bool) -> Result<ExecutionConfig> {
        let parallelism = self.parallel.unwrap_or(file.parallelism);
        if parallelism == 0 {
            return Err(Error::validation("--parallel must be at least 1"));
        }

        let timeout = match self.timeout.or(file.timeout_secs) {
            Some(0) | None => None,
            Some(secs) => Some(Duration::from_secs(secs)),
        };

        let control_plane = self
            .remote_context
            .clone()
            .unwrap_or_else(|| file.control_plane_context.clone());

        Ok(ExecutionConfig {
            kubeconfig: config::resolve_kubeconfig(self.kubeconfig.as_deref()),
            control_plane_context: Some(control_plane).filter(|c| !c.is_empty()),
            dispatch: DispatchOptions {
                parallelism,
                timeout,
            },
            policy: PlanPolicy {
                restrict_control_plane_reads: self.restrict_control_plane_reads
                    || file.restrict_control_plane_reads,
            },
            assume_yes,
            report_format: self.report.into(),
            summary: self.summary,
        })
    }
}

/// Run one logical command across every discovered cluster and print the report.
///
/// Per-cluster failures are part of the report and do not fail the command.
pub async fn fan_out(globals: &GlobalArgs, request: CommandRequest, assume_yes: bool) -> Result<()> {
    let file_config = config::load_config()?;
    let exec_config = globals.execution_config(&file_config, assume_yes)?;
    debug!(config = ?exec_config, "Resolved execution config");

    let source = KubeconfigSource::new(
        exec_config.kubeconfig.as_ref().map(PathBuf::from),
        globals.context.clone(),
    );
    let executor = Arc::new(KubectlExecutor::new(file_config.kubectl_path.clone()));

    let cancel = CancellationToken::new();
    let interrupt = tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let verb = request.verb.clone();
    let mut input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut prompt_out = std::io::stderr();
    let outcome = FanOut::new(&source, executor, &exec_config)
        .execute(
            request,
            Prompt {
                input: &mut input,
                output: &mut prompt_out,
            },
            &cancel,
        )
        .await;
    interrupt.abort();

    write_outcome(&outcome?, &verb, &mut std::io::stdout(), &mut std::io::stderr())?;

    // A prompt interrupted by Ctrl-C leaves a blocking stdin read behind that
    // would hold up runtime shutdown
    if cancel.is_cancelled() {
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
    Ok(())
}

const INTERRUPTED_EXIT_CODE: i32 = 130;

/// The report goes to `out`; the cancellation notice goes to `err` so a
/// JSON or YAML report on stdout stays parseable.
fn write_outcome<O: Write, E: Write>(
    outcome: &Outcome,
    verb: &str,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    match outcome {
        Outcome::Completed(report) => {
            out.write_all(report.rendered.as_bytes())?;
            out.flush()?;
        }
        Outcome::Cancelled => writeln!(err, "{} cancelled...", capitalize(verb))?,
    }
    Ok(())
}

/// First Ctrl-C cancels in-flight invocations; a second one exits.
async fn cancel_on_interrupt(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        return;
    }
    warn!("Interrupted, cancelling in-flight invocations (Ctrl-C again to exit)");
    cancel.cancel();

    if tokio::signal::ctrl_c().await.is_ok() {
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportArg;
    use kubectl_multi_core::{Report, ReportFormat};

    fn globals() -> GlobalArgs {
        GlobalArgs {
            kubeconfig: Some("/tmp/kc".into()),
            remote_context: None,
            context: None,
            namespace: None,
            all_namespaces: false,
            parallel: None,
            timeout: None,
            restrict_control_plane_reads: false,
            report: ReportArg::Text,
            summary: false,
            verbose: false,
        }
    }

    #[test]
    fn test_file_defaults_apply() {
        let file = MultiConfig {
            control_plane_context: "its-hub".into(),
            parallelism: 4,
            timeout_secs: Some(20),
            restrict_control_plane_reads: true,
            kubectl_path: "kubectl".into(),
        };
        let cfg = globals().execution_config(&file, false).unwrap();

        assert_eq!(cfg.kubeconfig.as_deref(), Some("/tmp/kc"));
        assert_eq!(cfg.control_plane_context.as_deref(), Some("its-hub"));
        assert_eq!(cfg.dispatch.parallelism, 4);
        assert_eq!(cfg.dispatch.timeout, Some(Duration::from_secs(20)));
        assert!(cfg.policy.restrict_control_plane_reads);
        assert_eq!(cfg.report_format, ReportFormat::Text);
    }

    #[test]
    fn test_flags_override_file() {
        let mut g = globals();
        g.remote_context = Some("hub".into());
        g.parallel = Some(2);
        g.timeout = Some(0);
        g.report = ReportArg::Json;

        let file = MultiConfig {
            timeout_secs: Some(20),
            ..Default::default()
        };
        let cfg = g.execution_config(&file, true).unwrap();

        assert_eq!(cfg.control_plane_context.as_deref(), Some("hub"));
        assert_eq!(cfg.dispatch.parallelism, 2);
        assert_eq!(cfg.dispatch.timeout, None);
        assert!(cfg.assume_yes);
        assert_eq!(cfg.report_format, ReportFormat::Json);
    }

    #[test]
    fn test_zero_parallelism_rejected() {
        let mut g = globals();
        g.parallel = Some(0);
        assert!(g.execution_config(&MultiConfig::default(), false).is_err());
    }

    #[test]
    fn test_empty_remote_context_disables_restriction() {
        let mut g = globals();
        g.remote_context = Some(String::new());
        let cfg = g.execution_config(&MultiConfig::default(), false).unwrap();
        assert!(cfg.control_plane_context.is_none());
    }

    #[test]
    fn test_common_flags() {
        let mut g = globals();
        g.namespace = Some("apps".into());
        g.all_namespaces = true;
        let flags = g.common_flags(true, Some("client".into()));
        assert!(flags.recursive);
        assert_eq!(flags.dry_run.as_deref(), Some("client"));
        assert_eq!(flags.namespace.as_deref(), Some("apps"));
        assert!(flags.all_namespaces);
    }

    #[test]
    fn test_cancelled_notice_goes_to_stderr() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_outcome(&Outcome::Cancelled, "delete", &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "Delete cancelled...\n");
    }

    #[test]
    fn test_report_goes_to_stdout() {
        let report = Report {
            results: Vec::new(),
            rendered: "{\"results\": []}\n".to_string(),
        };
        let mut out = Vec::new();
        let mut err = Vec::new();
        write_outcome(&Outcome::Completed(report), "get", &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"results\": []}\n");
        assert!(err.is_empty());
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("delete"), "Delete");
        assert_eq!(capitalize(""), "");
    }
}
