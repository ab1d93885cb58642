// Askdata - upload-and-ask data agent service

pub mod config;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod prompt;
pub mod registry;
pub mod routes;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
