// Gemini (Google Generative Language API) adapter implementation
// Endpoint: https://generativelanguage.googleapis.com/v1beta
// API Reference: https://ai.google.dev/api/generate-content
//
// Each call is a single-turn generateContent request: no history is carried
// between questions, and the API key travels as a query parameter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::llm::provider::{GeneratedText, TextGenerator, TokenUsage};
use crate::types::{AppError, AppResult};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

// Request types for the generateContent API
#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl From<&GenerationConfig> for GeminiGenerationConfig {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            temperature: config.temperature,
            top_p: config.top_p,
            top_k: config.top_k,
            max_output_tokens: config.max_output_tokens,
        }
    }
}

// Response types for the generateContent API
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
    #[serde(rename = "finishReason", default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Deserialize)]
struct GeminiErrorBody {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    /// Point the client at a different server. Used by tests to talk to a
    /// local mock instead of the live API.
    pub fn with_base_url(api_key: &str, model: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> AppResult<GeneratedText> {
        let request = GenerateContentRequest {
            // single fresh user turn; no conversation history
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: config.into(),
        };

        let response = self
            .client
            .post(self.request_url())
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Query(format!("Gemini request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try the API's structured error body first
            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&error_text) {
                return Err(AppError::Query(format!(
                    "Gemini API error ({}): {} (status: {:?})",
                    status, error_response.error.message, error_response.error.status
                )));
            }

            return Err(AppError::Query(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Query(format!("Failed to parse Gemini response: {}", e)))?;

        let candidate = body
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Query("Gemini returned no candidates".to_string()))?;

        let content = candidate
            .content
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        let usage = body
            .usage_metadata
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            })
            .unwrap_or_default();

        Ok(GeneratedText {
            content,
            finish_reason: candidate.finish_reason.unwrap_or_else(|| "STOP".to_string()),
            usage,
        })
    }
}

/// Available Gemini models (see https://ai.google.dev/gemini-api/docs/models)
pub mod models {
    /// Fast, low-latency model suited to interactive data questions
    pub const GEMINI_1_5_FLASH: &str = "gemini-1.5-flash";
    /// Larger model for harder reasoning over the same API
    pub const GEMINI_1_5_PRO: &str = "gemini-1.5-pro";
    /// Next-generation flash model
    pub const GEMINI_2_0_FLASH: &str = "gemini-2.0-flash";

    /// Default model selection
    pub const DEFAULT: &str = GEMINI_1_5_FLASH;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_shape() {
        let client = GeminiClient::new("secret", models::DEFAULT);
        assert_eq!(
            client.request_url(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=secret"
        );
    }

    #[test]
    fn test_with_base_url_strips_trailing_slash() {
        let client = GeminiClient::with_base_url("k", "m", "http://127.0.0.1:4000/");
        assert_eq!(
            client.request_url(),
            "http://127.0.0.1:4000/models/m:generateContent?key=k"
        );
    }

    #[test]
    fn test_generation_config_serializes_camel_case() {
        let config = GenerationConfig::default();
        let wire: GeminiGenerationConfig = (&config).into();
        let json = serde_json::to_value(&wire).unwrap();
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((json["topP"].as_f64().unwrap() - 0.9).abs() < 1e-6);
        assert_eq!(json["topK"], 40);
        assert_eq!(json["maxOutputTokens"], 8192);
    }

    #[tokio::test]
    async fn test_generate_parses_success_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{
                        "content": {"parts": [{"text": "The total of val is "}, {"text": "30."}], "role": "model"},
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 7, "totalTokenCount": 19}
                }"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::with_base_url("k", models::DEFAULT, &server.url());
        let result = client
            .generate("What is the total of val?", &GenerationConfig::default())
            .await
            .unwrap();

        assert_eq!(result.content, "The total of val is 30.");
        assert_eq!(result.finish_reason, "STOP");
        assert_eq!(result.usage.total_tokens, 19);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(
                r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#,
            )
            .create_async()
            .await;

        let client = GeminiClient::with_base_url("bad", models::DEFAULT, &server.url());
        let err = client
            .generate("hi", &GenerationConfig::default())
            .await
            .unwrap_err();

        match err {
            AppError::Query(message) => assert!(message.contains("API key not valid")),
            other => panic!("expected query error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_rejects_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = GeminiClient::with_base_url("k", models::DEFAULT, &server.url());
        let err = client
            .generate("hi", &GenerationConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Query(_)));
    }

    #[tokio::test]
    async fn test_generate_requires_a_candidate() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let client = GeminiClient::with_base_url("k", models::DEFAULT, &server.url());
        let err = client
            .generate("hi", &GenerationConfig::default())
            .await
            .unwrap_err();

        match err {
            AppError::Query(message) => assert!(message.contains("no candidates")),
            other => panic!("expected query error, got {:?}", other),
        }
    }
}
