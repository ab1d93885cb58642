use std::sync::Arc;

use tokio::sync::RwLock;
use validator::Validate;

use crate::config::{Config, GenerationConfig};
use crate::llm::TextGenerator;
use crate::prompt::QueryDispatcher;
use crate::registry::UploadRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Sampling parameters shared by all queries; written only between
    /// requests through the settings endpoint.
    pub generation: Arc<RwLock<GenerationConfig>>,
    pub registry: UploadRegistry,
    pub dispatcher: Arc<QueryDispatcher>,
}

impl AppState {
    pub fn new(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            generation: Arc::new(RwLock::new(GenerationConfig::default())),
            registry: UploadRegistry::default(),
            dispatcher: Arc::new(QueryDispatcher::new(generator)),
        }
    }
}

// API Request/Response types

#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub id: uuid::Uuid,
    pub filename: String,
    pub kind: &'static str,
    pub preview: UploadPreview,
}

/// Shape of the preview block depends on what the upload normalized to.
#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
pub enum UploadPreview {
    Table {
        total_rows: usize,
        total_columns: usize,
        columns: Vec<String>,
        head: Vec<serde_json::Value>,
    },
    Text {
        preview: String,
        total_chars: usize,
    },
    Image {
        width: u32,
        height: u32,
        format: String,
    },
}

#[derive(Debug, serde::Deserialize)]
pub struct AskRequest {
    pub upload_id: uuid::Uuid,
    pub question: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct SearchRequest {
    pub question: String,
}

#[derive(Debug, serde::Serialize)]
pub struct AnswerResponse {
    pub text: String,
}

#[derive(Debug, serde::Serialize)]
pub struct SettingsResponse {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl From<GenerationConfig> for SettingsResponse {
    fn from(config: GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

/// Partial update; omitted fields keep their current values.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub top_p: Option<f32>,
    #[validate(range(min = 100, max = 10000))]
    pub max_output_tokens: Option<u32>,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
