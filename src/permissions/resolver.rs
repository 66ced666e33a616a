//! Dependency closure over a [`DependencyGraph`].
//!
//! Everything here is a pure function of the graph and an explicit selection.
//! Removal always recomputes from the remaining explicit selection; nothing is
//! patched incrementally.

use std::collections::{BTreeMap, BTreeSet};

use super::graph::DependencyGraph;
use super::permission::{Permission, PermissionSet};

/// Auto-assigned permission -> explicit selections that imply it.
pub type AutoAssignedMap = BTreeMap<Permission, PermissionSet>;

/// Result of unchecking one explicit permission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// The effective set after removal.
    pub updated_selected: PermissionSet,
    pub auto_assigned_map: AutoAssignedMap,
    pub true_selected: PermissionSet,
}

/// Closes `selected` over the graph. The roots are part of the result.
pub fn resolve_full_permissions(
    graph: &DependencyGraph,
    selected: &PermissionSet,
) -> PermissionSet {
    let mut result = PermissionSet::new();
    let mut pending: Vec<Permission> = selected.iter().copied().collect();

    while let Some(permission) = pending.pop() {
        if !result.insert(permission) {
            continue;
        }
        pending.extend(
            graph
                .dependencies_of(permission)
                .iter()
                .copied()
                .filter(|dep| !result.contains(dep)),
        );
    }

    result
}

/// Attributes every auto-assigned permission to the explicit selections that imply it.
///
/// Traversal from a root stops at dependencies that are themselves selected;
/// those are walked as their own root. Visited state is kept per `(root, dep)`
/// edge so that a dependency shared by two roots is attributed to both.
pub fn compute_auto_assigned_map(
    graph: &DependencyGraph,
    selected: &PermissionSet,
) -> AutoAssignedMap {
    let mut auto_assigned = AutoAssignedMap::new();
    let mut visited: BTreeSet<(Permission, Permission)> = BTreeSet::new();

    for root in selected.iter().copied() {
        let mut pending = vec![root];

        while let Some(permission) = pending.pop() {
            for dep in graph.dependencies_of(permission).iter().copied() {
                if !visited.insert((root, dep)) {
                    continue;
                }
                if selected.contains(&dep) {
                    continue;
                }

                auto_assigned.entry(dep).or_default().insert(root);
                pending.push(dep);
            }
        }
    }

    auto_assigned
}

/// Drops `to_remove` from the explicit selection and recomputes from scratch.
///
/// Removing a permission that is not explicitly selected leaves the selection
/// unchanged.
pub fn remove_selection_and_update(
    graph: &DependencyGraph,
    to_remove: Permission,
    true_selected: &PermissionSet,
) -> RemovalOutcome {
    let mut remaining = true_selected.clone();
    remaining.remove(&to_remove);

    RemovalOutcome {
        updated_selected: resolve_full_permissions(graph, &remaining),
        auto_assigned_map: compute_auto_assigned_map(graph, &remaining),
        true_selected: remaining,
    }
}
