//! API Routes
//!
//! - `/api/uploads` - file upload and normalization
//! - `/api/ask` - question about an uploaded file
//! - `/api/search` - direct question with no upload context
//! - `/api/settings` - generation parameters
//! - `/api/health` - health check

pub mod ask;
pub mod health;
pub mod settings;
pub mod uploads;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    Router::new()
        .merge(uploads::router(state.clone()))
        .merge(ask::router(state.clone()))
        .merge(settings::router(state))
        .merge(health::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
