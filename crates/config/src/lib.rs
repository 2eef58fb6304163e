//! Configuration loading, validation, and management for Anigate.
//!
//! Loads configuration from `~/.anigate/config.toml` with environment
//! variable overrides. API keys come from numbered environment entries
//! (`GEMINI_API_KEY1`, `GEMINI_API_KEY2`, …) with a plain `GEMINI_API_KEY`
//! fallback. An empty key pool is rejected at startup — a relay without
//! credentials cannot serve a single request, and failing here beats a
//! confusing failure on the first chat message.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.anigate/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gemini API keys, tried in order. Usually supplied via the
    /// `GEMINI_API_KEY{n}` environment variables rather than the file.
    #[serde(default)]
    pub api_keys: Vec<String>,

    /// Persona settings for the assistant.
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Static contact fields injected into the context blob.
    #[serde(default)]
    pub contact: ContactConfig,

    /// GitHub data source settings.
    #[serde(default)]
    pub github: GithubConfig,

    /// Generation settings for the remote model.
    #[serde(default)]
    pub model: ModelConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_keys", &format!("[{} key(s), REDACTED]", self.api_keys.len()))
            .field("persona", &self.persona)
            .field("contact", &self.contact)
            .field("github", &self.github)
            .field("model", &self.model)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// Display name of the assistant.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,

    /// The person the assistant represents.
    #[serde(default = "default_owner_name")]
    pub owner_name: String,
}

fn default_bot_name() -> String {
    "Ani".into()
}
fn default_owner_name() -> String {
    "Cid Kageno".into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            owner_name: default_owner_name(),
        }
    }
}

/// Static contact fields. Kept in configuration rather than read off the
/// network so the assembled context stays reliable when the profile API
/// hides them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// GitHub login whose profile is fetched.
    #[serde(default = "default_github_username")]
    pub username: String,

    /// Per-read timeout for the three data-source requests.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// How long a fetched context blob stays fresh.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Cap on the profile README excerpt, in characters.
    #[serde(default = "default_readme_excerpt_chars")]
    pub readme_excerpt_chars: usize,
}

fn default_github_username() -> String {
    "cid-kageno-dev".into()
}
fn default_fetch_timeout_secs() -> u64 {
    5
}
fn default_cache_ttl_secs() -> u64 {
    300
}
fn default_readme_excerpt_chars() -> usize {
    1500
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            username: default_github_username(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            readme_excerpt_chars: default_readme_excerpt_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model name passed to the generateContent endpoint.
    #[serde(default = "default_model_name")]
    pub name: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Whole-request timeout for a single generation attempt.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_model_name() -> String {
    "gemini-2.5-flash".into()
}
fn default_temperature() -> f32 {
    0.6
}
fn default_max_output_tokens() -> u32 {
    1000
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: default_model_name(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.anigate/config.toml),
    /// then apply environment overrides and validate.
    ///
    /// Key resolution order:
    /// 1. `GEMINI_API_KEY1`, `GEMINI_API_KEY2`, … (consumed in order until
    ///    the first gap)
    /// 2. plain `GEMINI_API_KEY`
    /// 3. the `api_keys` list in the config file
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        let env_keys = collect_keys(|name| std::env::var(name).ok());
        if !env_keys.is_empty() {
            config.api_keys = env_keys;
        }

        // Allow env var to override the model name
        if let Ok(model) = std::env::var("ANIGATE_MODEL") {
            config.model.name = model;
        }

        // Allow env var to override the GitHub username
        if let Ok(username) = std::env::var("ANIGATE_GITHUB_USERNAME") {
            config.github.username = username;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file yields defaults; validation happens in `load()` after
    /// environment keys are merged.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".anigate")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_keys.is_empty() {
            return Err(ConfigError::ValidationError(
                "no API keys configured — set GEMINI_API_KEY1 (or GEMINI_API_KEY), \
                 or add an api_keys list to config.toml"
                    .into(),
            ));
        }

        if self.api_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "api_keys contains an empty entry".into(),
            ));
        }

        if self.model.temperature < 0.0 || self.model.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "model.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.github.username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "github.username must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `anigate config`).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_keys: Vec::new(),
            persona: PersonaConfig::default(),
            contact: ContactConfig::default(),
            github: GithubConfig::default(),
            model: ModelConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Collect API keys from environment-style lookups.
///
/// Numbered entries win: `GEMINI_API_KEY1`, `GEMINI_API_KEY2`, … are taken
/// in order until the first missing index. If none exist, a single plain
/// `GEMINI_API_KEY` is used.
fn collect_keys(get: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut keys = Vec::new();
    let mut i = 1;
    while let Some(key) = get(&format!("GEMINI_API_KEY{i}")) {
        if key.trim().is_empty() {
            break;
        }
        keys.push(key);
        i += 1;
    }

    if keys.is_empty()
        && let Some(single) = get("GEMINI_API_KEY")
        && !single.trim().is_empty()
    {
        keys.push(single);
    }

    keys
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_config_shape() {
        let config = AppConfig::default();
        assert_eq!(config.model.name, "gemini-2.5-flash");
        assert!((config.model.temperature - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.github.cache_ttl_secs, 300);
        assert_eq!(config.github.fetch_timeout_secs, 5);
        assert_eq!(config.gateway.port, 5000);
    }

    #[test]
    fn empty_pool_rejected() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn non_empty_pool_accepted() {
        let config = AppConfig {
            api_keys: vec!["key-a".into()],
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            api_keys: vec!["key-a".into()],
            model: ModelConfig {
                temperature: 5.0,
                ..ModelConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn numbered_keys_collected_in_order() {
        let vars = env(&[
            ("GEMINI_API_KEY1", "first"),
            ("GEMINI_API_KEY2", "second"),
            ("GEMINI_API_KEY3", "third"),
            // Also set the plain key: numbered entries must win.
            ("GEMINI_API_KEY", "plain"),
        ]);
        let keys = collect_keys(|name| vars.get(name).cloned());
        assert_eq!(keys, vec!["first", "second", "third"]);
    }

    #[test]
    fn numbered_keys_stop_at_gap() {
        let vars = env(&[
            ("GEMINI_API_KEY1", "first"),
            // no GEMINI_API_KEY2
            ("GEMINI_API_KEY3", "orphan"),
        ]);
        let keys = collect_keys(|name| vars.get(name).cloned());
        assert_eq!(keys, vec!["first"]);
    }

    #[test]
    fn plain_key_fallback() {
        let vars = env(&[("GEMINI_API_KEY", "only")]);
        let keys = collect_keys(|name| vars.get(name).cloned());
        assert_eq!(keys, vec!["only"]);
    }

    #[test]
    fn no_keys_anywhere() {
        let keys = collect_keys(|_| None);
        assert!(keys.is_empty());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig {
            api_keys: vec!["key-a".into(), "key-b".into()],
            ..AppConfig::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api_keys, config.api_keys);
        assert_eq!(parsed.github.username, config.github.username);
        assert_eq!(parsed.gateway.port, config.gateway.port);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().github.username, "cid-kageno-dev");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[persona]
bot_name = "Echo"

[github]
username = "someone-else"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.persona.bot_name, "Echo");
        assert_eq!(config.persona.owner_name, "Cid Kageno");
        assert_eq!(config.github.username, "someone-else");
        assert_eq!(config.github.cache_ttl_secs, 300);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
api_keys = ["from-file"]

[gateway]
port = 8099
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api_keys, vec!["from-file"]);
        assert_eq!(config.gateway.port, 8099);
    }

    #[test]
    fn debug_redacts_keys() {
        let config = AppConfig {
            api_keys: vec!["super-secret".into()],
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gemini-2.5-flash"));
        assert!(toml_str.contains("cache_ttl_secs"));
    }
}
