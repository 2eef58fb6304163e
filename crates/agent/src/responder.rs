//! The response generator.
//!
//! One call per inbound chat message: scan for trigger keywords, inject
//! cached profile context when they match, build the persona instruction,
//! then attempt generation once per key in the pool, rotating on failure.
//! `respond()` always returns displayable text — pool exhaustion and
//! unexpected failures map to fixed sentinel messages, never to an error.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use anigate_config::{AppConfig, ModelConfig, PersonaConfig};
use anigate_context::{ContextCache, GithubSource};
use anigate_core::error::ModelError;
use anigate_core::model::{GenerationRequest, TextModel};
use anigate_core::source::ContextSource;
use anigate_providers::{GeminiClient, KeyRotator};

/// Returned after every key in the pool has failed for one request.
pub const OVERLOAD_MESSAGE: &str = "System Overload. 💀";

/// Returned when the pipeline cannot run at all (e.g. no credentials).
pub const APOLOGY_MESSAGE: &str = "I can't reach the archives right now. 💜";

/// Keywords whose presence (case-insensitive substring) in a prompt
/// triggers context injection.
pub const TRIGGER_KEYWORDS: &[&str] = &[
    "project", "repo", "code", "github", "work", "contact", "email", "reach", "message", "dm",
    "hire", "built", "created", "stack", "tech", "about", "who",
];

/// The response generation pipeline.
///
/// Holds the rotation cursor and context cache as owned, constructor-
/// injected state; one instance per process, shared behind an `Arc` by the
/// hosting layer.
pub struct Responder {
    model: Arc<dyn TextModel>,
    source: Arc<dyn ContextSource>,
    rotator: KeyRotator,
    cache: ContextCache,
    persona: PersonaConfig,
    generation: ModelConfig,
}

impl Responder {
    pub fn new(
        model: Arc<dyn TextModel>,
        source: Arc<dyn ContextSource>,
        rotator: KeyRotator,
        cache: ContextCache,
        persona: PersonaConfig,
        generation: ModelConfig,
    ) -> Self {
        Self {
            model,
            source,
            rotator,
            cache,
            persona,
            generation,
        }
    }

    /// Wire up the production pipeline: Gemini client, GitHub source,
    /// key rotator, and cache, all from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, ModelError> {
        let model = Arc::new(GeminiClient::new(&config.model));
        let source = Arc::new(GithubSource::new(&config.github, &config.contact));
        let rotator = KeyRotator::new(config.api_keys.clone())?;
        let cache = ContextCache::new(Duration::from_secs(config.github.cache_ttl_secs));

        Ok(Self::new(
            model,
            source,
            rotator,
            cache,
            config.persona.clone(),
            config.model.clone(),
        ))
    }

    /// Generate a reply for one prompt. Always returns displayable text.
    pub async fn respond(&self, prompt: &str) -> String {
        let context = if needs_context(prompt) {
            self.cache.get(self.source.as_ref()).await
        } else {
            String::new()
        };

        // Rebuilt per request: the cached context may have changed.
        let instruction = build_instruction(&self.persona, &context);
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            system_instruction: instruction,
            temperature: self.generation.temperature,
            max_output_tokens: self.generation.max_output_tokens,
        };

        let attempts = self.rotator.len();
        for attempt in 1..=attempts {
            let (index, key) = self.rotator.active();
            debug!(attempt, total = attempts, key = index + 1, "generation attempt");

            match self.model.generate(key, &request).await {
                Ok(text) => return text.trim().to_string(),
                Err(e) => {
                    warn!(key = index + 1, error = %e, "generation failed");
                    if attempt == attempts {
                        return OVERLOAD_MESSAGE.to_string();
                    }
                    self.rotator.rotate();
                }
            }
        }

        // Reachable only with an empty pool, which configuration rejects
        // at startup.
        warn!("no generation attempts possible, credential pool is empty");
        APOLOGY_MESSAGE.to_string()
    }

    /// Index of the key the next attempt would use.
    pub fn active_key_index(&self) -> usize {
        self.rotator.active().0
    }
}

/// Whether a prompt asks about anything the profile context covers.
pub fn needs_context(prompt: &str) -> bool {
    let lower = prompt.to_lowercase();
    TRIGGER_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Concatenate the persona preamble, the (possibly empty) context blob,
/// and the fixed response style rules.
fn build_instruction(persona: &PersonaConfig, context: &str) -> String {
    format!(
        "Act as {bot}, an AI assistant created by {owner}. \
         You are helpful, tech-savvy, and professional. 💜\n\n\
         --- CONTEXT DATA ---\n\
         {context}\n\n\
         --- RESPONSE STYLE GUIDE ---\n\
         1. **Brevity is King:** Keep answers under 3-4 sentences unless explaining complex code.\n\
         2. **Bullet Points:** Always use bullet points for lists. Never use comma-separated lists in paragraphs.\n\
         3. **Directness:** Start your answer immediately. Do not use filler phrases like 'Here is the information you requested'.\n\
         4. **No Fluff:** Remove adjectives that don't add facts.\n\
         5. **Contact:** If asked for contact, output the email/link and nothing else.",
        bot = persona.bot_name,
        owner = persona.owner_name,
    )
}
