use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::permissions::DependencyGraph;
use crate::routes::{health, permissions};

#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<DependencyGraph>,
}

impl AppState {
    pub fn new(graph: DependencyGraph) -> Self {
        Self {
            graph: Arc::new(graph),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let permission_routes = Router::new()
        .route("/", get(permissions::list_permissions))
        .route("/resolve", post(permissions::resolve))
        .route("/remove", post(permissions::remove))
        .route("/toggle", post(permissions::toggle))
        .route("/load", post(permissions::load))
        .route("/check", post(permissions::check));

    Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/permissions", permission_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
