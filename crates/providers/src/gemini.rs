//! Gemini `generateContent` client.
//!
//! Non-streaming REST client for the Google generative-language API. The
//! API key is passed per call so the rotation layer can swap credentials
//! between attempts without rebuilding the client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use anigate_config::ModelConfig;
use anigate_core::error::ModelError;
use anigate_core::model::{GenerationRequest, TextModel};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// A client for one Gemini model.
pub struct GeminiClient {
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client from model configuration.
    pub fn new(config: &ModelConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            model: config.name.clone(),
            base_url: GEMINI_API_BASE.to_string(),
            client,
        }
    }

    /// Point the client at a different API base URL (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl TextModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> Result<String, ModelError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let body = ApiRequest {
            contents: vec![ApiContent {
                role: "user".into(),
                parts: vec![ApiPart {
                    text: request.prompt.clone(),
                }],
            }],
            system_instruction: ApiSystemInstruction {
                parts: vec![ApiPart {
                    text: request.system_instruction.clone(),
                }],
            },
            generation_config: ApiGenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_output_tokens,
            },
        };

        debug!(model = %self.model, prompt_chars = request.prompt.len(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(e.to_string())
                } else {
                    ModelError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ModelError::RateLimited {
                retry_after_secs: 5,
            });
        }

        if status == 401 || status == 403 {
            return Err(ModelError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Gemini returned error");
            return Err(ModelError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Network(format!("Failed to parse response: {e}")))?;

        let text = api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ModelError::ApiError {
                status_code: status,
                message: "Response contained no candidates".into(),
            })?;

        Ok(text)
    }
}

// ── Wire types ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ApiRequest {
    contents: Vec<ApiContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: ApiSystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: ApiGenerationConfig,
}

#[derive(Serialize)]
struct ApiSystemInstruction {
    parts: Vec<ApiPart>,
}

#[derive(Serialize)]
struct ApiContent {
    role: String,
    parts: Vec<ApiPart>,
}

#[derive(Serialize, Deserialize)]
struct ApiPart {
    text: String,
}

#[derive(Serialize)]
struct ApiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Deserialize)]
struct ApiCandidate {
    content: ApiCandidateContent,
}

#[derive(Deserialize)]
struct ApiCandidateContent {
    #[serde(default)]
    parts: Vec<ApiPart>,
}
