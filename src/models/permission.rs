use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::permissions::{
    AutoAssignedMap, DependencyGraph, Permission, RemovalOutcome, RowMode, SelectionState,
};

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PermissionInfo {
    pub name: Permission,
    #[schema(example = "Can view project details and content")]
    pub description: String,
    pub is_system_level: bool,
    /// Permissions granted automatically alongside this one
    pub depends_on: Vec<Permission>,
    /// Permissions that grant this one automatically
    pub required_by: Vec<Permission>,
}

impl PermissionInfo {
    pub fn catalog(graph: &DependencyGraph) -> Vec<PermissionInfo> {
        Permission::ALL
            .iter()
            .map(|permission| PermissionInfo {
                name: *permission,
                description: permission.description().to_string(),
                is_system_level: permission.is_system_level(),
                depends_on: graph.dependencies_of(*permission).to_vec(),
                required_by: graph.dependents_of(*permission),
            })
            .collect()
    }
}

// =============================================================================
// RESOLUTION
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveRequest {
    #[schema(example = json!(["add_document"]))]
    pub selected: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResolveResponse {
    pub effective: Vec<Permission>,
    /// Auto-assigned permission -> explicit selections implying it
    #[schema(value_type = Object)]
    pub auto_assigned: BTreeMap<Permission, Vec<Permission>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveRequest {
    #[schema(example = "edit_project")]
    pub to_remove: String,
    #[schema(example = json!(["edit_project", "delete_project"]))]
    pub true_selected: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RemoveResponse {
    pub updated_selected: Vec<Permission>,
    #[schema(value_type = Object)]
    pub auto_assigned_map: BTreeMap<Permission, Vec<Permission>>,
    pub true_selected: Vec<Permission>,
}

impl From<RemovalOutcome> for RemoveResponse {
    fn from(outcome: RemovalOutcome) -> Self {
        RemoveResponse {
            updated_selected: outcome.updated_selected.into_iter().collect(),
            auto_assigned_map: attribution(&outcome.auto_assigned_map),
            true_selected: outcome.true_selected.into_iter().collect(),
        }
    }
}

// =============================================================================
// SELECTION STATE
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleRequest {
    /// Explicit selections before the toggle
    #[serde(default)]
    pub true_selected: Vec<String>,
    #[schema(example = "view_project")]
    pub permission: String,
    pub checked: bool,
    #[serde(default)]
    pub mode: RowMode,
}

/// Stored permissions of an assigned user, as returned by the backend
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoadRequest {
    #[schema(example = json!(["view_project", "edit_project"]))]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub mode: RowMode,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectionView {
    pub true_selected: Vec<Permission>,
    /// Effective permissions, rendered as checked
    pub roles: Vec<Permission>,
    /// Implied permissions, rendered as checked and disabled
    pub auto_assigned_roles: Vec<Permission>,
    #[schema(value_type = Object)]
    pub auto_assigned: BTreeMap<Permission, Vec<Permission>>,
    /// Checkboxes that do not accept input in the requested row mode
    pub disabled_roles: Vec<Permission>,
    pub can_save: bool,
}

impl SelectionView {
    pub fn new(state: &SelectionState, mode: RowMode) -> Self {
        SelectionView {
            true_selected: state.true_selected().iter().copied().collect(),
            roles: state.persisted_permissions(),
            auto_assigned_roles: state.auto_assigned_roles().collect(),
            auto_assigned: attribution(state.auto_assigned()),
            disabled_roles: state.disabled_permissions(mode),
            can_save: state.can_save(),
        }
    }
}

// =============================================================================
// ACCESS CHECK
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckRequest {
    /// Effective permissions held by the user
    #[schema(example = json!(["view_project", "delete_project"]))]
    pub granted: Vec<String>,
    /// Any one of these is enough
    #[schema(example = json!(["edit_project"]))]
    pub required: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    pub granted: bool,
}

fn attribution(map: &AutoAssignedMap) -> BTreeMap<Permission, Vec<Permission>> {
    map.iter()
        .map(|(permission, causes)| (*permission, causes.iter().copied().collect()))
        .collect()
}
