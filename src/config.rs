use serde::Deserialize;
use std::env;

use crate::types::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub google_api_key: String,
    pub model: String,
}

/// Tunable sampling parameters forwarded with every query. Updated between
/// requests through the settings endpoint, read-only during a request.
#[derive(Debug, Clone, Copy, serde::Serialize, Deserialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 8192,
        }
    }
}

impl Config {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let google_api_key = env::var("GOOGLE_API_KEY").map_err(|_| {
            AppError::Configuration(
                "GOOGLE_API_KEY is not set. Ensure it's defined in your environment or .env file."
                    .to_string(),
            )
        })?;

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .map_err(|e| AppError::Configuration(format!("invalid PORT: {}", e)))?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            llm: LlmConfig {
                google_api_key,
                model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| crate::llm::gemini::models::DEFAULT.to_string()),
            },
        })
    }
}
