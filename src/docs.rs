use std::sync::Arc;

use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::permissions::{Permission, RowMode};
use crate::routes;

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health,
		routes::permissions::list_permissions,
		routes::permissions::resolve,
		routes::permissions::remove,
		routes::permissions::toggle,
		routes::permissions::load,
		routes::permissions::check
	),
	components(
		schemas(
			Permission,
			routes::health::HealthResponse,
			models::permission::PermissionInfo,
			models::permission::ResolveRequest,
			models::permission::ResolveResponse,
			models::permission::RemoveRequest,
			models::permission::RemoveResponse,
			models::permission::ToggleRequest,
			models::permission::LoadRequest,
			models::permission::SelectionView,
			models::permission::CheckRequest,
			models::permission::CheckResponse,
			RowMode
		)
	),
	tags(
		(name = "Health", description = "Service health"),
		(name = "Permissions", description = "Permission dependency resolution")
	)
)]
pub struct ApiDoc;

pub fn build_openapi(port: u16) -> utoipa::openapi::OpenApi {
	let mut doc = ApiDoc::openapi();
	doc.servers = Some(vec![utoipa::openapi::Server::new(format!(
		"http://localhost:{port}"
	))]);
	doc
}

pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> anyhow::Result<Router> {
	let swagger_config = utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
		.try_it_out_enabled(true);

	let doc_json = Arc::new(serde_json::to_value(&doc)?);

	let json_route = {
		let doc_json = Arc::clone(&doc_json);
		get(move || {
			let doc_json = Arc::clone(&doc_json);
			async move { Json((*doc_json).clone()) }
		})
	};

	Ok(Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config)))
}
