use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use super::permission::{Permission, UnknownPermission};

#[derive(thiserror::Error, Debug)]
pub enum GraphConfigError {
    #[error("failed to read dependency graph {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dependency graph at `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid dependency graph: unknown permission key `{key}`")]
    UnknownKey { key: String },
}

/// Directed mapping from a permission to the permissions it directly implies.
///
/// The graph is read-only once built. Permissions without an entry are leaves.
/// Cycles are allowed; traversals over the graph track what they have visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<Permission, Vec<Permission>>,
}

impl Default for DependencyGraph {
    /// The project permission graph used by the assignment dialog.
    ///
    /// Document permissions point back at `edit_project`, so selecting any one of
    /// them pulls in every sibling document permission through `edit_project`.
    fn default() -> Self {
        use Permission::*;

        Self::empty()
            .with_dependencies(
                EditProject,
                [ViewProject, AddDocument, EditDocument, DeleteDocument],
            )
            .with_dependencies(DeleteProject, [ViewProject])
            .with_dependencies(AddDocument, [ViewProject, EditProject])
            .with_dependencies(EditDocument, [ViewProject, EditProject])
            .with_dependencies(DeleteDocument, [ViewProject, EditProject])
    }
}

impl DependencyGraph {
    pub fn empty() -> Self {
        Self {
            edges: BTreeMap::new(),
        }
    }

    /// Replaces the dependency list of `permission`.
    pub fn with_dependencies(
        mut self,
        permission: Permission,
        dependencies: impl IntoIterator<Item = Permission>,
    ) -> Self {
        self.edges.insert(permission, dependencies.into_iter().collect());
        self
    }

    /// Parse a graph from a JSON object of `permission -> [permissions]`.
    ///
    /// Keys are parsed after deserialization so an unknown key is reported by name.
    pub fn from_json_str(raw: &str) -> Result<Self, GraphConfigError> {
        let deserializer = &mut serde_json::Deserializer::from_str(raw);
        let raw_edges: BTreeMap<String, Vec<Permission>> =
            serde_path_to_error::deserialize(deserializer).map_err(|err| {
                let path = err.path().to_string();
                GraphConfigError::Parse {
                    path,
                    source: err.into_inner(),
                }
            })?;

        let mut edges = BTreeMap::new();
        for (key, dependencies) in raw_edges {
            let permission = key
                .parse::<Permission>()
                .map_err(|UnknownPermission(key)| GraphConfigError::UnknownKey { key })?;
            edges.insert(permission, dependencies);
        }

        Ok(Self { edges })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GraphConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| GraphConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let graph = Self::from_json_str(&raw)?;
        tracing::debug!(
            path = %path.display(),
            permissions = graph.edges.len(),
            edges = graph.edge_count(),
            "loaded dependency graph"
        );
        Ok(graph)
    }

    pub fn dependencies_of(&self, permission: Permission) -> &[Permission] {
        self.edges
            .get(&permission)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Permissions that list `permission` as a direct dependency, in display order.
    pub fn dependents_of(&self, permission: Permission) -> Vec<Permission> {
        self.edges
            .iter()
            .filter(|(_, deps)| deps.contains(&permission))
            .map(|(source, _)| *source)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Permission, &[Permission])> + '_ {
        self.edges.iter().map(|(p, deps)| (*p, deps.as_slice()))
    }

    /// Number of permissions with an explicit dependency entry.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Finds one cycle, returned as a path whose last element repeats the first.
    pub fn find_cycle(&self) -> Option<Vec<Permission>> {
        let mut done = BTreeSet::new();

        for start in self.edges.keys().copied() {
            if done.contains(&start) {
                continue;
            }

            let mut path = vec![start];
            // Each frame is (node, index of the next dependency to explore).
            let mut stack = vec![(start, 0usize)];

            while let Some((node, next)) = stack.last_mut() {
                let deps = self.dependencies_of(*node);
                if *next >= deps.len() {
                    done.insert(*node);
                    stack.pop();
                    path.pop();
                    continue;
                }

                let dep = deps[*next];
                *next += 1;

                if let Some(pos) = path.iter().position(|p| *p == dep) {
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(dep);
                    return Some(cycle);
                }

                if !done.contains(&dep) {
                    path.push(dep);
                    stack.push((dep, 0));
                }
            }
        }

        None
    }
}
