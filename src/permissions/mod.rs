//! Project permissions and their dependency resolution.
//!
//! - [`Permission`]: closed set of project permissions, serialized as snake_case names
//! - [`DependencyGraph`]: static "implies" edges between permissions
//! - [`resolver`]: closure and auto-assignment attribution over a graph
//! - [`SelectionState`]: checkbox state machine for one user row

mod check;
mod graph;
mod permission;
pub mod resolver;
mod selection;

pub use check::grants;
pub use graph::{DependencyGraph, GraphConfigError};
pub use permission::{
    parse_permissions, Permission, PermissionSet, UnknownPermission, UnknownPermissions,
};
pub use resolver::{
    compute_auto_assigned_map, remove_selection_and_update, resolve_full_permissions,
    AutoAssignedMap, RemovalOutcome,
};
pub use selection::{RowMode, SelectionState};
