use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde_json::json;

use project_permissions::models::permission::{PermissionInfo, RemoveResponse};
use project_permissions::permissions::{
    compute_auto_assigned_map, grants, parse_permissions, remove_selection_and_update,
    resolve_full_permissions, DependencyGraph, Permission,
};
use project_permissions::AppConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "project permission resolver", long_about = None)]
struct Cli {
    /// Dependency graph JSON file; overrides DEPENDENCY_GRAPH_PATH
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the effective permissions and auto-assignment causes for a selection
    Resolve { permissions: Vec<String> },
    /// Remove one explicit permission from a selection and recompute
    Remove {
        permission: String,
        #[arg(long = "from", num_args = 1.., required = true)]
        from: Vec<String>,
    },
    /// Print the permission catalog with dependencies
    Graph,
    /// Report whether the dependency graph contains a cycle
    Check,
    /// Report whether granted permissions satisfy any of the required ones
    Grants {
        #[arg(long, num_args = 1.., required = true)]
        granted: Vec<String>,
        #[arg(long, num_args = 1.., required = true)]
        required: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Try to load env from CWD, then fall back to the crate-local `.env`.
    if dotenv().is_err() {
        let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
        let _ = dotenvy::from_path(crate_env);
    }

    let cli = Cli::parse();
    let graph = load_graph(cli.graph)?;

    let output = match cli.command {
        Commands::Resolve { permissions } => {
            let selected = parse_permissions(&permissions)?;
            json!({
                "effective": resolve_full_permissions(&graph, &selected),
                "auto_assigned": compute_auto_assigned_map(&graph, &selected),
            })
        }
        Commands::Remove { permission, from } => {
            let to_remove: Permission = permission
                .parse()
                .with_context(|| format!("cannot remove {permission}"))?;
            let true_selected = parse_permissions(&from)?;
            let outcome = remove_selection_and_update(&graph, to_remove, &true_selected);
            serde_json::to_value(RemoveResponse::from(outcome))?
        }
        Commands::Graph => serde_json::to_value(PermissionInfo::catalog(&graph))?,
        Commands::Check => match graph.find_cycle() {
            Some(cycle) => json!({ "acyclic": false, "cycle": cycle }),
            None => json!({ "acyclic": true }),
        },
        Commands::Grants { granted, required } => {
            let granted = parse_permissions(&granted)?;
            let required: Vec<Permission> = parse_permissions(&required)?.into_iter().collect();
            json!({ "granted": grants(&granted, &required) })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn load_graph(path: Option<PathBuf>) -> anyhow::Result<DependencyGraph> {
    let mut config = AppConfig::from_env()?;
    if path.is_some() {
        config.graph_path = path;
    }
    Ok(config.load_graph()?)
}
