//! Permission resolution endpoints.
//!
//! Handlers only parse names and shape responses; every computation goes
//! through [`crate::permissions`] against the graph held in [`AppState`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::app::AppState;
use crate::errors::AppResult;
use crate::models::permission::*;
use crate::permissions::{
    compute_auto_assigned_map, grants, parse_permissions, remove_selection_and_update,
    resolve_full_permissions, Permission, SelectionState, UnknownPermission, UnknownPermissions,
};

/// List all permissions with their dependencies
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "Permissions",
    responses((status = 200, description = "Permission catalog", body = [PermissionInfo]))
)]
pub async fn list_permissions(State(state): State<AppState>) -> Json<Vec<PermissionInfo>> {
    Json(PermissionInfo::catalog(&state.graph))
}

/// Close an explicit selection over the dependency graph
#[utoipa::path(
    post,
    path = "/api/permissions/resolve",
    tag = "Permissions",
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Effective permissions", body = ResolveResponse),
        (status = 400, description = "Unknown permission names"),
    )
)]
pub async fn resolve(
    State(state): State<AppState>,
    payload: Result<Json<ResolveRequest>, JsonRejection>,
) -> AppResult<Json<ResolveResponse>> {
    let Json(req) = payload?;
    let selected = parse_permissions(&req.selected)?;

    let effective = resolve_full_permissions(&state.graph, &selected);
    let auto_assigned = compute_auto_assigned_map(&state.graph, &selected);

    Ok(Json(ResolveResponse {
        effective: effective.into_iter().collect(),
        auto_assigned: auto_assigned
            .into_iter()
            .map(|(permission, causes)| (permission, causes.into_iter().collect()))
            .collect(),
    }))
}

/// Remove one explicit selection and recompute
#[utoipa::path(
    post,
    path = "/api/permissions/remove",
    tag = "Permissions",
    request_body = RemoveRequest,
    responses(
        (status = 200, description = "Selection after removal", body = RemoveResponse),
        (status = 400, description = "Unknown permission names"),
    )
)]
pub async fn remove(
    State(state): State<AppState>,
    payload: Result<Json<RemoveRequest>, JsonRejection>,
) -> AppResult<Json<RemoveResponse>> {
    let Json(req) = payload?;
    let to_remove = parse_single(&req.to_remove)?;
    let true_selected = parse_permissions(&req.true_selected)?;

    let outcome = remove_selection_and_update(&state.graph, to_remove, &true_selected);
    Ok(Json(outcome.into()))
}

/// Apply one checkbox toggle to an explicit selection
#[utoipa::path(
    post,
    path = "/api/permissions/toggle",
    tag = "Permissions",
    request_body = ToggleRequest,
    responses(
        (status = 200, description = "Selection after the toggle", body = SelectionView),
        (status = 400, description = "Unknown permission names"),
    )
)]
pub async fn toggle(
    State(state): State<AppState>,
    payload: Result<Json<ToggleRequest>, JsonRejection>,
) -> AppResult<Json<SelectionView>> {
    let Json(req) = payload?;
    let permission = parse_single(&req.permission)?;
    let true_selected = parse_permissions(&req.true_selected)?;

    let mut selection = SelectionState::from_explicit(&state.graph, true_selected);
    selection.toggle(&state.graph, permission, req.checked);

    Ok(Json(SelectionView::new(&selection, req.mode)))
}

/// Rebuild a selection from a user's stored permissions
#[utoipa::path(
    post,
    path = "/api/permissions/load",
    tag = "Permissions",
    request_body = LoadRequest,
    responses(
        (status = 200, description = "Reconstructed selection", body = SelectionView),
        (status = 400, description = "Unknown permission names"),
    )
)]
pub async fn load(
    State(state): State<AppState>,
    payload: Result<Json<LoadRequest>, JsonRejection>,
) -> AppResult<Json<SelectionView>> {
    let Json(req) = payload?;
    let loaded = parse_permissions(&req.permissions)?;

    let selection = SelectionState::from_loaded(&state.graph, loaded);
    Ok(Json(SelectionView::new(&selection, req.mode)))
}

/// Check whether granted permissions satisfy a requirement
#[utoipa::path(
    post,
    path = "/api/permissions/check",
    tag = "Permissions",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Whether access is granted", body = CheckResponse),
        (status = 400, description = "Unknown permission names"),
    )
)]
pub async fn check(
    payload: Result<Json<CheckRequest>, JsonRejection>,
) -> AppResult<Json<CheckResponse>> {
    let Json(req) = payload?;
    let granted = parse_permissions(&req.granted)?;
    let required: Vec<Permission> = parse_permissions(&req.required)?.into_iter().collect();

    Ok(Json(CheckResponse {
        granted: grants(&granted, &required),
    }))
}

fn parse_single(name: &str) -> AppResult<Permission> {
    name.parse::<Permission>()
        .map_err(|UnknownPermission(name)| UnknownPermissions(vec![name]).into())
}
