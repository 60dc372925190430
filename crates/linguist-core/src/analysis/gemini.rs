use crate::config::AiConfig;
use crate::errors::CoreError;
use serde::Deserialize;
use tracing::debug;

use super::backend::{AnalysisBackend, BackendError, BackendResponse, PromptPart};

/// Finish reasons that still carry a usable answer.
const NORMAL_FINISH_REASONS: &[&str] = &["STOP", "MAX_TOKENS"];

/// AI backend that calls the Gemini `generateContent` REST endpoint.
pub struct GeminiBackend {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(config: &AiConfig) -> Result<Self, CoreError> {
        let client = client_builder()
            .build()
            .map_err(|e| CoreError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self::with_client(client, config))
    }

    fn with_client(client: reqwest::blocking::Client, config: &AiConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

impl AnalysisBackend for GeminiBackend {
    fn generate(
        &self,
        api_key: &str,
        parts: &[PromptPart],
    ) -> Result<Option<BackendResponse>, BackendError> {
        let url = self.url();
        let body = serde_json::json!({
            "contents": [{ "role": "user", "parts": parts }],
        });

        debug!(
            model = %self.model,
            parts = parts.len(),
            prompt_chars = parts.iter().map(|p| p.text.len()).sum::<usize>(),
            "sending generateContent request"
        );

        // Key goes in a header so it never shows up in a URL inside an error message.
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|source| BackendError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let text = response.text().map_err(|source| BackendError::Transport {
            url: url.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                url,
                status: status.as_u16(),
                message: error_message(&text, status.canonical_reason()),
            });
        }

        let decoded = decode_generate_response(&text)?;
        if let Some(ref r) = decoded {
            debug!(
                input_tokens = r.input_tokens,
                output_tokens = r.output_tokens,
                response_chars = r.text.len(),
                "generateContent returned"
            );
        }
        Ok(decoded)
    }
}

/// The call lasts as long as the service takes. The blocking client would
/// otherwise cut it off after 30 seconds.
fn client_builder() -> reqwest::blocking::ClientBuilder {
    reqwest::blocking::Client::builder().timeout(None)
}

// ── Wire types ──

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Content {
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct UsageMetadata {
    prompt_token_count: u64,
    candidates_token_count: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turn a successful `generateContent` body into a backend response.
/// A JSON `null` body is the "no response object" case.
pub(crate) fn decode_generate_response(body: &str) -> Result<Option<BackendResponse>, BackendError> {
    let Some(wire) = serde_json::from_str::<Option<GenerateContentResponse>>(body)? else {
        return Ok(None);
    };

    if let Some(reason) = wire.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(BackendError::Blocked(reason));
    }

    let (input_tokens, output_tokens) = wire
        .usage_metadata
        .map(|u| (u.prompt_token_count, u.candidates_token_count))
        .unwrap_or((0, 0));

    let Some(candidate) = wire.candidates.into_iter().next() else {
        return Ok(Some(BackendResponse {
            text: String::new(),
            input_tokens,
            output_tokens,
        }));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason {
            if !NORMAL_FINISH_REASONS.contains(&reason.as_str()) {
                return Err(BackendError::Blocked(reason));
            }
        }
    }

    Ok(Some(BackendResponse {
        text,
        input_tokens,
        output_tokens,
    }))
}

/// Best message for a non-success status: the service's own error text when it sent one.
fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        return envelope.error.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        reason.unwrap_or("unknown error").to_string()
    } else {
        truncate_for_error(trimmed).to_string()
    }
}

fn truncate_for_error(s: &str) -> &str {
    if s.len() <= 500 {
        s
    } else {
        let mut i = 500;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        &s[..i]
    }
}
