use std::sync::Arc;

use axum::extract::{Multipart, Query, State};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{AppState, UploadPreview, UploadResponse};
use crate::normalize::{normalize, DataTable, NormalizedContent, UploadedFile};
use crate::registry::UploadRecord;
use crate::types::{AppError, AppResult};

/// Preview sizing: 5 rows unless the client asks for more, capped like the
/// original preview control.
const DEFAULT_PREVIEW_ROWS: usize = 5;
const MIN_PREVIEW_ROWS: usize = 5;
const MAX_PREVIEW_ROWS: usize = 1000;

/// Text previews show the first chunk only; full text stays in the registry.
const TEXT_PREVIEW_CHARS: usize = 1000;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/uploads", post(upload_file))
        .with_state(state)
}

#[derive(Debug, serde::Deserialize)]
struct UploadParams {
    preview_rows: Option<usize>,
}

async fn upload_file(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut file: Option<UploadedFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {}", e)))?
    {
        if field.name() == Some("file") {
            let name = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::Validation("file field has no filename".to_string()))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {}", e)))?;
            file = Some(UploadedFile { name, bytes });
        }
    }
    let file =
        file.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;

    let content = normalize(&file).inspect_err(|e| {
        warn!(filename = %file.name, "failed to normalize upload: {}", e);
    })?;

    let preview_rows = params
        .preview_rows
        .unwrap_or(DEFAULT_PREVIEW_ROWS)
        .clamp(MIN_PREVIEW_ROWS, MAX_PREVIEW_ROWS);

    let preview = match &content {
        NormalizedContent::Table(table) => table_preview(table, preview_rows),
        NormalizedContent::Text(text) => text_preview(text),
        NormalizedContent::Image(image) => UploadPreview::Image {
            width: image.width,
            height: image.height,
            format: image.format_name(),
        },
        NormalizedContent::Unsupported => return Err(AppError::UnsupportedFormat),
    };

    let record = UploadRecord {
        id: Uuid::new_v4(),
        filename: file.name.clone(),
        content_type: mime_guess::from_path(&file.name)
            .first_or_octet_stream()
            .to_string(),
        size: file.bytes.len(),
        uploaded_at: chrono::Utc::now(),
        content: Arc::new(content),
    };

    info!(
        upload_id = %record.id,
        filename = %record.filename,
        kind = record.content.kind(),
        size = record.size,
        "upload normalized"
    );

    let response = UploadResponse {
        id: record.id,
        filename: record.filename.clone(),
        kind: record.content.kind(),
        preview,
    };
    state.registry.insert(record).await;

    Ok(Json(response))
}

fn table_preview(table: &DataTable, preview_rows: usize) -> UploadPreview {
    let head = table
        .head(preview_rows)
        .iter()
        .map(|row| {
            let mut object = serde_json::Map::new();
            for (column, cell) in table.columns.iter().zip(row) {
                object.insert(
                    column.clone(),
                    serde_json::to_value(cell).unwrap_or(serde_json::Value::Null),
                );
            }
            serde_json::Value::Object(object)
        })
        .collect();

    UploadPreview::Table {
        total_rows: table.row_count(),
        total_columns: table.column_count(),
        columns: table.columns.clone(),
        head,
    }
}

fn text_preview(text: &str) -> UploadPreview {
    let total_chars = text.chars().count();
    let preview = if total_chars > TEXT_PREVIEW_CHARS {
        let clipped: String = text.chars().take(TEXT_PREVIEW_CHARS).collect();
        format!("{}...", clipped)
    } else {
        text.to_string()
    };

    UploadPreview::Text {
        preview,
        total_chars,
    }
}
