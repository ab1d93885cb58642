use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;

use crate::models::{AnswerResponse, AppState, AskRequest, SearchRequest};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/ask", post(ask))
        .route("/api/search", post(search))
        .with_state(state)
}

/// Ask a question about a previously uploaded file.
async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> AppResult<Json<AnswerResponse>> {
    let record = state
        .registry
        .get(&request.upload_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("upload {}", request.upload_id)))?;

    // copy the settings out; the lock is never held across the service call
    let generation = *state.generation.read().await;

    info!(upload_id = %record.id, kind = record.content.kind(), "dispatching query");
    let text = state
        .dispatcher
        .answer(&record.content, &request.question, &generation)
        .await?;

    Ok(Json(AnswerResponse { text }))
}

/// Direct search: the same instruction envelope with no upload context.
async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> AppResult<Json<AnswerResponse>> {
    let generation = *state.generation.read().await;

    let text = state
        .dispatcher
        .search(&request.question, &generation)
        .await?;

    Ok(Json(AnswerResponse { text }))
}
