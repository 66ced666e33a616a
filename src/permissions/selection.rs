use serde::Deserialize;
use utoipa::ToSchema;

use super::graph::DependencyGraph;
use super::permission::{Permission, PermissionSet};
use super::resolver::{
    compute_auto_assigned_map, remove_selection_and_update, resolve_full_permissions,
    AutoAssignedMap,
};

/// How a user row in the assignment list is currently rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RowMode {
    /// Assigning new users: checkboxes are live.
    #[default]
    Assign,
    /// Edit-enabled list, row not being edited: every checkbox is locked.
    Locked,
    /// Edit-enabled list, row being edited.
    Editing,
}

/// Permission selection for one user while their row is being edited.
///
/// Only `true_selected` is authoritative; `effective` and `auto_assigned` are
/// recomputed from it after every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    true_selected: PermissionSet,
    effective: PermissionSet,
    auto_assigned: AutoAssignedMap,
}

impl SelectionState {
    pub fn from_explicit(graph: &DependencyGraph, true_selected: PermissionSet) -> Self {
        let effective = resolve_full_permissions(graph, &true_selected);
        let auto_assigned = compute_auto_assigned_map(graph, &true_selected);
        Self {
            true_selected,
            effective,
            auto_assigned,
        }
    }

    /// A user just added to the assignment list starts as admin.
    pub fn new_user(graph: &DependencyGraph) -> Self {
        Self::from_explicit(graph, PermissionSet::from([Permission::Admin]))
    }

    /// Rebuild a selection from a stored permission list.
    ///
    /// Stored lists are already expanded and do not say which entries were
    /// chosen directly, so every loaded permission is treated as explicit.
    pub fn from_loaded(
        graph: &DependencyGraph,
        loaded: impl IntoIterator<Item = Permission>,
    ) -> Self {
        Self::from_explicit(graph, loaded.into_iter().collect())
    }

    pub fn true_selected(&self) -> &PermissionSet {
        &self.true_selected
    }

    pub fn effective(&self) -> &PermissionSet {
        &self.effective
    }

    pub fn auto_assigned(&self) -> &AutoAssignedMap {
        &self.auto_assigned
    }

    pub fn auto_assigned_roles(&self) -> impl Iterator<Item = Permission> + '_ {
        self.auto_assigned.keys().copied()
    }

    pub fn is_auto_assigned(&self, permission: Permission) -> bool {
        self.auto_assigned.contains_key(&permission)
    }

    pub fn is_checked(&self, permission: Permission) -> bool {
        self.effective.contains(&permission)
    }

    pub fn check(&mut self, graph: &DependencyGraph, permission: Permission) {
        let next = if permission.is_admin() {
            PermissionSet::from([Permission::Admin])
        } else if self.true_selected.contains(&Permission::Admin) {
            PermissionSet::from([permission])
        } else {
            let mut next = self.true_selected.clone();
            next.insert(permission);
            next
        };

        tracing::debug!(
            permission = %permission,
            explicit = next.len(),
            "permission checked"
        );
        *self = Self::from_explicit(graph, next);
    }

    pub fn uncheck(&mut self, graph: &DependencyGraph, permission: Permission) {
        let outcome = remove_selection_and_update(graph, permission, &self.true_selected);

        tracing::debug!(
            permission = %permission,
            explicit = outcome.true_selected.len(),
            effective = outcome.updated_selected.len(),
            "permission unchecked"
        );
        self.true_selected = outcome.true_selected;
        self.effective = outcome.updated_selected;
        self.auto_assigned = outcome.auto_assigned_map;
    }

    pub fn toggle(&mut self, graph: &DependencyGraph, permission: Permission, checked: bool) {
        if checked {
            self.check(graph, permission);
        } else {
            self.uncheck(graph, permission);
        }
    }

    /// Whether the checkbox for `permission` accepts input.
    ///
    /// Auto-assigned permissions cannot be unchecked directly, and admin is
    /// mutually exclusive with every other permission.
    pub fn is_disabled(&self, permission: Permission, mode: RowMode) -> bool {
        if mode == RowMode::Locked {
            return true;
        }

        let admin_selected = self.effective.contains(&Permission::Admin);
        let other_selected = self.effective.iter().any(|p| !p.is_admin());

        self.is_auto_assigned(permission)
            || (permission.is_admin() && other_selected)
            || (!permission.is_admin() && admin_selected)
    }

    /// Every permission whose checkbox is disabled, in display order.
    pub fn disabled_permissions(&self, mode: RowMode) -> Vec<Permission> {
        Permission::ALL
            .into_iter()
            .filter(|p| self.is_disabled(*p, mode))
            .collect()
    }

    /// A row can only be saved while it grants something.
    pub fn can_save(&self) -> bool {
        !self.effective.is_empty()
    }

    /// The list sent to the backend when the row is saved: the full effective set.
    pub fn persisted_permissions(&self) -> Vec<Permission> {
        self.effective.iter().copied().collect()
    }
}
