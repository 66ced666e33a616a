pub mod app;
pub mod config;
pub mod docs;
pub mod errors;
pub mod models;
pub mod permissions;
pub mod routes;

// Re-export commonly used items for tests
pub use app::{create_app, AppState};
pub use config::AppConfig;
