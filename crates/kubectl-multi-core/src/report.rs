//! Per-cluster results and the combined report

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::Result;
use crate::executor::InvocationError;

/// Whether a result came from a real invocation or was synthesized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultKind {
    Dispatched,
    /// Control-plane notice; nothing was run
    Restricted,
}

/// Outcome for one cluster, in dispatch order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterResult {
    pub context: String,
    pub output: String,
    pub error: Option<InvocationError>,
    pub kind: ResultKind,
}

impl ClusterResult {
    pub fn success(context: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            output: output.into(),
            error: None,
            kind: ResultKind::Dispatched,
        }
    }

    pub fn failure(context: impl Into<String>, error: InvocationError) -> Self {
        Self {
            context: context.into(),
            output: String::new(),
            error: Some(error),
            kind: ResultKind::Dispatched,
        }
    }

    /// Notice for the control-plane cluster, which is never invoked.
    pub fn restricted(context: impl Into<String>) -> Self {
        let context = context.into();
        Self {
            output: format!(
                "Cannot perform this operation on ITS (control) cluster: {}\n",
                context
            ),
            context,
            error: None,
            kind: ResultKind::Restricted,
        }
    }

    pub fn status(&self) -> ResultStatus {
        match (&self.kind, &self.error) {
            (ResultKind::Restricted, _) => ResultStatus::Skipped,
            (_, Some(_)) => ResultStatus::Failed,
            (_, None) => ResultStatus::Succeeded,
        }
    }
}

/// Status label used in structured reports and the summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// Report output format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Counts over a finished result set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn from_results(results: &[ClusterResult]) -> Self {
        let mut summary = Summary::default();
        for r in results {
            match r.status() {
                ResultStatus::Succeeded => summary.succeeded += 1,
                ResultStatus::Failed => summary.failed += 1,
                ResultStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} skipped",
            self.succeeded, self.failed, self.skipped
        )
    }
}

#[derive(Serialize)]
struct ResultView<'a> {
    context: &'a str,
    status: ResultStatus,
    output: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ReportView<'a> {
    results: Vec<ResultView<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Summary>,
}

/// Render results in the order given.
///
/// The summary is computed from the full result set, after every block is
/// known.
pub fn render(results: &[ClusterResult], format: ReportFormat, summary: bool) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(results, summary)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&view(results, summary))? + "\n"),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(&view(results, summary))?),
    }
}

/// One `=== Cluster: <ctx> ===` block per result, separated by blank lines.
pub fn render_text(results: &[ClusterResult], summary: bool) -> String {
    let mut out = String::new();
    for r in results {
        let _ = writeln!(out, "=== Cluster: {} ===", r.context);
        match &r.error {
            Some(err) => {
                let _ = writeln!(out, "Error: {}", err);
            }
            None => {
                out.push_str(&r.output);
                if !r.output.is_empty() && !r.output.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
        out.push('\n');
    }
    if summary {
        let _ = writeln!(out, "{}", Summary::from_results(results));
    }
    out
}

fn view(results: &[ClusterResult], summary: bool) -> ReportView<'_> {
    ReportView {
        results: results
            .iter()
            .map(|r| ResultView {
                context: &r.context,
                status: r.status(),
                output: if r.error.is_some() { "" } else { r.output.as_str() },
                error: r.error.as_ref().map(|e| e.to_string()),
            })
            .collect(),
        summary: summary.then(|| Summary::from_results(results)),
    }
}
