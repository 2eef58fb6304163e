//! TextModel trait — the abstraction over the remote generative model.
//!
//! A TextModel knows how to send a single prompt plus a system instruction
//! to a generative-model API and return the generated text. The API key is
//! passed per call: the rotation layer decides which credential each
//! attempt uses, so the client itself stays stateless.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A single generation request. Ephemeral — one per call, no identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The user's message.
    pub prompt: String,

    /// The persona/instruction payload sent alongside the prompt.
    pub system_instruction: String,

    /// Sampling temperature (0.0 = deterministic).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Cap on generated output length.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

fn default_temperature() -> f32 {
    0.6
}

fn default_max_output_tokens() -> u32 {
    1000
}

impl GenerationRequest {
    /// Create a request with the default sampling settings.
    pub fn new(prompt: impl Into<String>, system_instruction: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.into(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// The core model trait.
///
/// The response generator calls `generate()` without knowing which backend
/// is behind it, which is what makes the retry loop testable with mocks.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// A human-readable name for this model client (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a request using the given API key and return the generated text.
    async fn generate(
        &self,
        api_key: &str,
        request: &GenerationRequest,
    ) -> std::result::Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults() {
        let req = GenerationRequest::new("hello", "be brief");
        assert!((req.temperature - 0.6).abs() < f32::EPSILON);
        assert_eq!(req.max_output_tokens, 1000);
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"prompt":"hi","system_instruction":""}"#).unwrap();
        assert!((req.temperature - 0.6).abs() < f32::EPSILON);
        assert_eq!(req.max_output_tokens, 1000);
    }
}
