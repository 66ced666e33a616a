use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use project_permissions::permissions::DependencyGraph;
use project_permissions::{create_app, AppState};

fn app() -> Router {
    create_app(AppState::new(DependencyGraph::default()))
}

async fn post_json(app: Router, uri: &str, body: Value) -> Result<(StatusCode, Value)> {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;

    let resp = app.oneshot(req).await?;
    let status = resp.status();
    let body_bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let value = serde_json::from_slice(&body_bytes)?;
    Ok((status, value))
}

#[tokio::test]
async fn catalog_lists_every_permission_in_display_order() -> Result<()> {
    let req = Request::builder()
        .method("GET")
        .uri("/api/permissions")
        .body(Body::empty())?;
    let resp = app().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let body_bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let catalog: Vec<Value> = serde_json::from_slice(&body_bytes)?;
    let names: Vec<&str> = catalog.iter().filter_map(|p| p["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "admin",
            "view_project",
            "edit_project",
            "delete_project",
            "add_document",
            "edit_document",
            "delete_document",
            "manage_api_keys",
        ]
    );

    assert_eq!(catalog[0]["is_system_level"], true);
    assert_eq!(catalog[3]["depends_on"], json!(["view_project"]));
    assert_eq!(
        catalog[2]["required_by"],
        json!(["add_document", "edit_document", "delete_document"])
    );
    Ok(())
}

#[tokio::test]
async fn resolve_reproduces_wide_document_closure() -> Result<()> {
    let (status, body) =
        post_json(app(), "/api/permissions/resolve", json!({ "selected": ["add_document"] }))
            .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["effective"],
        json!(["view_project", "edit_project", "add_document", "edit_document", "delete_document"])
    );
    assert_eq!(body["auto_assigned"]["edit_project"], json!(["add_document"]));
    assert!(body["auto_assigned"].get("add_document").is_none());
    Ok(())
}

#[tokio::test]
async fn resolve_rejects_unknown_names() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/resolve",
        json!({ "selected": ["view_project", "owner", "root"] }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "bad request: invalid permissions: owner, root");
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() -> Result<()> {
    let (status, body) =
        post_json(app(), "/api/permissions/resolve", json!({ "selected": "admin" })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    Ok(())
}

#[tokio::test]
async fn remove_keeps_shared_dependency() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/remove",
        json!({ "to_remove": "edit_project", "true_selected": ["edit_project", "delete_project"] }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["true_selected"], json!(["delete_project"]));
    assert_eq!(body["updated_selected"], json!(["view_project", "delete_project"]));
    assert_eq!(body["auto_assigned_map"], json!({ "view_project": ["delete_project"] }));
    Ok(())
}

#[tokio::test]
async fn toggle_admin_then_view_project_drops_admin() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/toggle",
        json!({ "true_selected": ["delete_project"], "permission": "admin", "checked": true }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["true_selected"], json!(["admin"]));

    let (status, body) = post_json(
        app(),
        "/api/permissions/toggle",
        json!({
            "true_selected": body["true_selected"],
            "permission": "view_project",
            "checked": true,
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["true_selected"], json!(["view_project"]));
    assert_eq!(body["roles"], json!(["view_project"]));
    assert_eq!(body["auto_assigned_roles"], json!([]));
    assert_eq!(body["can_save"], true);
    Ok(())
}

#[tokio::test]
async fn toggle_unchecking_last_permission_blocks_save() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/toggle",
        json!({
            "true_selected": ["edit_project"],
            "permission": "edit_project",
            "checked": false,
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"], json!([]));
    assert_eq!(body["can_save"], false);
    Ok(())
}

#[tokio::test]
async fn load_treats_stored_permissions_as_explicit() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/load",
        json!({ "permissions": ["view_project", "delete_project", "view_project"] }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["true_selected"], json!(["view_project", "delete_project"]));
    assert_eq!(body["roles"], json!(["view_project", "delete_project"]));
    assert_eq!(body["auto_assigned_roles"], json!([]));
    assert_eq!(body["disabled_roles"], json!(["admin"]));
    Ok(())
}

#[tokio::test]
async fn toggle_over_loaded_admin_keeps_only_the_new_permission() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/toggle",
        json!({
            "true_selected": ["admin", "delete_project"],
            "permission": "manage_api_keys",
            "checked": true,
        }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["true_selected"], json!(["manage_api_keys"]));
    assert_eq!(body["roles"], json!(["manage_api_keys"]));
    Ok(())
}

#[tokio::test]
async fn toggle_reports_disabled_checkboxes() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/toggle",
        json!({ "permission": "delete_project", "checked": true }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["auto_assigned_roles"], json!(["view_project"]));
    assert_eq!(body["disabled_roles"], json!(["admin", "view_project"]));

    let (status, body) = post_json(
        app(),
        "/api/permissions/load",
        json!({ "permissions": ["admin"], "mode": "locked" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["disabled_roles"].as_array().map(Vec::len), Some(8));

    let (status, body) = post_json(
        app(),
        "/api/permissions/load",
        json!({ "permissions": ["admin"], "mode": "editing" }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["disabled_roles"],
        json!([
            "view_project",
            "edit_project",
            "delete_project",
            "add_document",
            "edit_document",
            "delete_document",
            "manage_api_keys",
        ])
    );
    Ok(())
}

#[tokio::test]
async fn unknown_row_mode_is_a_bad_request() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/load",
        json!({ "permissions": ["admin"], "mode": "readonly" }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    Ok(())
}

#[tokio::test]
async fn check_applies_admin_bypass() -> Result<()> {
    let (status, body) = post_json(
        app(),
        "/api/permissions/check",
        json!({ "granted": ["view_project", "delete_project"], "required": ["edit_project"] }),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["granted"], false);

    let (_, body) = post_json(
        app(),
        "/api/permissions/check",
        json!({ "granted": ["admin"], "required": ["edit_project"] }),
    )
    .await?;
    assert_eq!(body["granted"], true);

    let (status, body) = post_json(
        app(),
        "/api/permissions/check",
        json!({ "granted": ["owner"], "required": ["edit_project"] }),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "bad request: invalid permissions: owner");
    Ok(())
}
