//! Generation settings API
//!
//! - GET /api/settings - current sampling parameters
//! - POST /api/settings - partial update, validated against the allowed ranges

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;
use validator::Validate;

use crate::models::{AppState, SettingsResponse, UpdateSettingsRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/settings", get(get_settings).post(update_settings))
        .with_state(state)
}

async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let generation = *state.generation.read().await;
    Json(SettingsResponse::from(generation))
}

async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> AppResult<Json<SettingsResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(format!("invalid settings: {}", e)))?;

    let mut generation = state.generation.write().await;
    if let Some(temperature) = request.temperature {
        generation.temperature = temperature;
    }
    if let Some(top_p) = request.top_p {
        generation.top_p = top_p;
    }
    if let Some(max_output_tokens) = request.max_output_tokens {
        generation.max_output_tokens = max_output_tokens;
    }

    info!(
        temperature = generation.temperature,
        top_p = generation.top_p,
        max_output_tokens = generation.max_output_tokens,
        "generation settings updated"
    );

    Ok(Json(SettingsResponse::from(*generation)))
}
