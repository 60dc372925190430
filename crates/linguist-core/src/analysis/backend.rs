use serde::Serialize;
use thiserror::Error;

/// One text segment of a generation request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PromptPart {
    pub text: String,
}

impl PromptPart {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Response from an AI backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    /// The model's response text (may be empty).
    pub text: String,
    /// Input tokens consumed.
    pub input_tokens: u64,
    /// Output tokens produced.
    pub output_tokens: u64,
}

/// Failures on the way to and from the model service.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("error fetching from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error fetching from {url}: [{status}] {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("response was blocked due to {0}")]
    Blocked(String),

    #[error("invalid response body from the AI service: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Service(String),
}

/// Trait for AI generation backends. Blocking, one request per call.
pub trait AnalysisBackend: Send + Sync {
    /// Send the prompt parts as a single user turn.
    /// `Ok(None)` means the service answered without a response object.
    fn generate(
        &self,
        api_key: &str,
        parts: &[PromptPart],
    ) -> Result<Option<BackendResponse>, BackendError>;
}
