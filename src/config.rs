use std::path::PathBuf;

use crate::errors::AppError;
use crate::permissions::DependencyGraph;

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// JSON file overriding the built-in dependency graph.
    pub graph_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            graph_path: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = get("APP_PORT")
            .map(|val| val.trim().parse::<u16>())
            .unwrap_or(Ok(DEFAULT_PORT))
            .map_err(|_| AppError::configuration("APP_PORT must be a valid port number"))?;

        let graph_path = get("DEPENDENCY_GRAPH_PATH").map(PathBuf::from);

        Ok(Self { port, graph_path })
    }

    /// Load the dependency graph once at startup.
    ///
    /// Cycles are reported but accepted.
    pub fn load_graph(&self) -> Result<DependencyGraph, AppError> {
        let graph = match &self.graph_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading dependency graph from file");
                DependencyGraph::from_path(path)?
            }
            None => DependencyGraph::default(),
        };

        if let Some(cycle) = graph.find_cycle() {
            let path: Vec<&str> = cycle.iter().map(|p| p.as_str()).collect();
            tracing::warn!(cycle = %path.join(" -> "), "dependency graph contains a cycle");
        }

        Ok(graph)
    }
}
