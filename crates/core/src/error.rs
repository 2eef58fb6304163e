//! Error types for the Anigate domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Anigate operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model errors ---
    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    // --- Data source errors ---
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures from the remote generative-model API.
///
/// Clone so mocks and retry bookkeeping can hold onto the last error.
#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by the model API, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Model client not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures from the external profile data source.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("Data source returned status {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Data source request timed out: {0}")]
    Timeout(String),

    #[error("Network error reaching data source: {0}")]
    Network(String),

    #[error("Failed to decode data source response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_error_displays_correctly() {
        let err = Error::Model(ModelError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn fetch_error_displays_correctly() {
        let err = Error::Fetch(FetchError::Http {
            status: 404,
            url: "https://api.github.com/users/nobody".into(),
        });
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("users/nobody"));
    }

    #[test]
    fn model_error_is_cloneable() {
        let err = ModelError::RateLimited {
            retry_after_secs: 5,
        };
        let clone = err.clone();
        assert_eq!(err.to_string(), clone.to_string());
    }
}
