//! `kubectl multi clusters` - list the clusters commands fan out to
//!
//! Discovery only reads the kubeconfig, so this never contacts a cluster.

use clap::{Args, ValueEnum};
use serde::Serialize;

use kubectl_multi_core::{
    discover_clusters, target_namespace, ClusterInventory, ClusterRole, KubeconfigSource,
};

use super::format::print_table;
use crate::config;
use crate::{GlobalArgs, Result};

/// List discovered clusters and their roles
#[derive(Args, Debug)]
pub struct ClustersArgs {
    /// Output format
    #[arg(short = 'o', long, default_value = "table")]
    pub output: OutputFormat,
}

/// Output format for the cluster list
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Columnar table (default)
    #[default]
    Table,
    /// JSON
    Json,
}

#[derive(Debug, Serialize)]
struct ClusterRow<'a> {
    context: &'a str,
    role: ClusterRole,
    current: bool,
    namespace: &'a str,
}

fn cluster_rows<'a>(inventory: &'a ClusterInventory, namespace: &'a str) -> Vec<ClusterRow<'a>> {
    let current = inventory.current_context();
    inventory
        .clusters()
        .iter()
        .map(|c| ClusterRow {
            context: &c.context,
            role: c.role,
            current: current == Some(c.context.as_str()),
            namespace,
        })
        .collect()
}

pub async fn run(globals: &GlobalArgs, args: ClustersArgs) -> Result<()> {
    let file_config = config::load_config()?;
    let exec_config = globals.execution_config(&file_config, false)?;
    let source = KubeconfigSource::new(
        exec_config.kubeconfig.as_ref().map(Into::into),
        globals.context.clone(),
    );
    let inventory = discover_clusters(&source, exec_config.control_plane_context.as_deref())?;

    if inventory.is_empty() {
        println!("No clusters found.");
        return Ok(());
    }

    let namespace = target_namespace(globals.namespace.as_deref().unwrap_or(""));
    let rows = cluster_rows(&inventory, namespace);

    match args.output {
        OutputFormat::Table => {
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|r| {
                    vec![
                        if r.current { "*" } else { "" }.to_string(),
                        r.context.to_string(),
                        r.role.to_string(),
                        r.namespace.to_string(),
                    ]
                })
                .collect();
            print_table(&["CURRENT", "NAME", "ROLE", "NAMESPACE"], &table);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&rows)?;
            println!("{}", json);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kubectl_multi_core::ClusterInfo;

    fn inventory() -> ClusterInventory {
        ClusterInventory::new(
            vec![
                ClusterInfo {
                    context: "its1".into(),
                    role: ClusterRole::ControlPlane,
                },
                ClusterInfo {
                    context: "wds1".into(),
                    role: ClusterRole::Workload,
                },
                ClusterInfo {
                    context: "edge".into(),
                    role: ClusterRole::Unclassified,
                },
            ],
            Some("wds1".into()),
        )
    }

    #[test]
    fn test_rows_mark_current_context() {
        let inv = inventory();
        let rows = cluster_rows(&inv, "default");
        let current: Vec<&str> = rows.iter().filter(|r| r.current).map(|r| r.context).collect();
        assert_eq!(current, vec!["wds1"]);
        assert_eq!(rows[0].role, ClusterRole::ControlPlane);
        assert!(rows.iter().all(|r| r.namespace == "default"));
    }

    #[test]
    fn test_rows_serialize() {
        let inv = inventory();
        let json = serde_json::to_value(cluster_rows(&inv, "apps")).unwrap();
        assert_eq!(json[1]["context"], "wds1");
        assert_eq!(json[1]["current"], true);
        assert_eq!(json[2]["namespace"], "apps");
    }
}
