//! Scorer service trait definitions

use async_trait::async_trait;

/// Error types for scorer service operations
#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type ScorerResult<T> = Result<T, ScorerError>;

/// One multimodal evaluation request: instruction text plus the sequence's
/// images in ascending step order.
#[derive(Debug, Clone)]
pub struct ScorerRequest {
    pub system: String,
    pub prompt: String,
    /// Base64-encoded PNG payloads.
    pub images: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ScorerRequest {
    pub fn new(system: impl Into<String>, prompt: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
            images,
            max_tokens: 2000,
            temperature: 0.3,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait for multimodal scorer services.
///
/// Implementations return the evaluator's free-form reply text; callers own
/// all parsing and tolerate malformed output.
#[async_trait]
pub trait ScorerService: Send + Sync {
    /// Model identifier used for requests.
    fn model(&self) -> &str;

    /// Send one evaluation request and return the raw reply text.
    async fn score(&self, request: &ScorerRequest) -> ScorerResult<String>;
}
