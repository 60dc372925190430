pub mod backend;
pub mod gemini;
pub mod prompts;

use crate::credential::Credential;
use crate::errors::AnalysisError;
use crate::models::{AnalysisResult, RequiredField};
use crate::util::clean_response;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use backend::{AnalysisBackend, BackendError};

/// Everything that can go wrong once a request has been issued.
/// Surfaced to callers as `AnalysisError` with the `ANALYSIS_FAILED` code.
#[derive(Error, Debug)]
enum ResponseError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("No response received from the AI model.")]
    NoResponse,

    #[error("Empty response received from the AI model.")]
    EmptyText,

    #[error("Failed to parse AI response: {0}")]
    Parse(serde_json::Error),

    #[error("Failed to parse AI response: Missing or empty required field: {0}")]
    MissingField(RequiredField),

    #[error("Failed to parse AI response: Invalid type for required field: {0}")]
    InvalidField(RequiredField),
}

/// Owns the contract with the model: preconditions, prompt, one call,
/// fence cleaning, JSON parsing and field validation.
pub struct Analyzer<B> {
    backend: B,
    credential: Credential,
}

impl<B: AnalysisBackend> Analyzer<B> {
    pub fn new(backend: B, credential: Credential) -> Self {
        Self {
            backend,
            credential,
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Analyze a pasted conversation.
    ///
    /// Credential presence, credential shape and non-empty input are checked
    /// before any request is made. After that exactly one backend call is
    /// issued; there is no retry.
    pub fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let api_key = self.credential.validate()?;

        if text.trim().is_empty() {
            return Err(AnalysisError::empty_input());
        }

        self.request(api_key, text).map_err(|e| {
            error!(error = %e, "Analysis failed");
            AnalysisError::failed(&e)
        })
    }

    fn request(&self, api_key: &str, text: &str) -> Result<AnalysisResult, ResponseError> {
        let parts = prompts::build_analysis_parts(text);
        let response = self
            .backend
            .generate(api_key, &parts)?
            .ok_or(ResponseError::NoResponse)?;

        if response.text.is_empty() {
            return Err(ResponseError::EmptyText);
        }

        let cleaned = clean_response(&response.text);
        parse_analysis_response(cleaned).inspect_err(|e| {
            warn!(error = %e, response_text = cleaned, "Failed to parse AI response");
        })
    }
}

/// Parse cleaned model output and check the six fields, in order.
/// Missing, null, false, zero and "" all count as absent.
fn parse_analysis_response(text: &str) -> Result<AnalysisResult, ResponseError> {
    let value: Value = serde_json::from_str(text).map_err(ResponseError::Parse)?;

    for field in RequiredField::ALL {
        match value.get(field.as_str()) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => {
                return Err(ResponseError::MissingField(field));
            }
            Some(Value::String(s)) if s.is_empty() => {
                return Err(ResponseError::MissingField(field));
            }
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => {
                return Err(ResponseError::MissingField(field));
            }
            Some(Value::String(_)) => {}
            Some(_) => return Err(ResponseError::InvalidField(field)),
        }
    }

    serde_json::from_value(value).map_err(ResponseError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use super::backend::{BackendResponse, PromptPart};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    const KEY: &str = "AIzaSyA1b2C3d4E5f6G7h8I9j0-_kLmN";

    const FENCED: &str = "```json\n{\"interestLevel\":\"high\",\"flirtingScore\":\"moderate\",\"redFlags\":\"None detected\",\"mood\":\"playful\",\"ghostingRisk\":\"low\",\"insights\":\"They seem engaged.\"}\n```";

    /// Backend double that replays canned outcomes and records every call.
    struct FakeBackend {
        outcome: fn() -> Result<Option<BackendResponse>, BackendError>,
        calls: Mutex<Vec<Vec<PromptPart>>>,
    }

    impl FakeBackend {
        fn new(outcome: fn() -> Result<Option<BackendResponse>, BackendError>) -> Self {
            Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl AnalysisBackend for FakeBackend {
        fn generate(
            &self,
            _api_key: &str,
            parts: &[PromptPart],
        ) -> Result<Option<BackendResponse>, BackendError> {
            self.calls.lock().unwrap().push(parts.to_vec());
            (self.outcome)()
        }
    }

    impl AnalysisBackend for &FakeBackend {
        fn generate(
            &self,
            api_key: &str,
            parts: &[PromptPart],
        ) -> Result<Option<BackendResponse>, BackendError> {
            (**self).generate(api_key, parts)
        }
    }

    fn text(s: &str) -> Result<Option<BackendResponse>, BackendError> {
        Ok(Some(BackendResponse {
            text: s.to_string(),
            input_tokens: 10,
            output_tokens: 20,
        }))
    }

    fn fenced() -> Result<Option<BackendResponse>, BackendError> {
        text(FENCED)
    }

    fn analyzer(backend: &FakeBackend) -> Analyzer<&FakeBackend> {
        Analyzer::new(backend, Credential::new(Some(KEY.to_string()), "GEMINI_API_KEY"))
    }

    #[test]
    fn test_empty_input_makes_no_call() {
        let backend = FakeBackend::new(fenced);
        let analyzer = analyzer(&backend);
        for input in ["", "   ", "\n\t \n"] {
            let err = analyzer.analyze(input).unwrap_err();
            assert_eq!(err.kind, ErrorKind::EmptyInput);
            assert_eq!(err.message, "Please provide some text to analyze.");
            assert_eq!(err.code(), None);
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_missing_credential_makes_no_call() {
        let backend = FakeBackend::new(fenced);
        let analyzer = Analyzer::new(&backend, Credential::new(None, "GEMINI_API_KEY"));
        let err = analyzer.analyze("hey").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingCredential);
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_malformed_credential_makes_no_call() {
        let backend = FakeBackend::new(fenced);
        for key in ["too-short-key", "has spaces in the key value!", "abcdefghijklmnopqrs$t"] {
            let analyzer = Analyzer::new(
                &backend,
                Credential::new(Some(key.to_string()), "GEMINI_API_KEY"),
            );
            let err = analyzer.analyze("hey").unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidCredential);
            assert_eq!(err.message, "Invalid API key format. Please check your Gemini API key.");
        }
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_credential_checked_before_input() {
        let backend = FakeBackend::new(fenced);
        let analyzer = Analyzer::new(&backend, Credential::new(None, "GEMINI_API_KEY"));
        let err = analyzer.analyze("").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingCredential);
    }

    #[test]
    fn test_fenced_response_parses_exactly() {
        let backend = FakeBackend::new(fenced);
        let result = analyzer(&backend).analyze("hey, you up?").unwrap();
        assert_eq!(result.interest_level, "high");
        assert_eq!(result.flirting_score, "moderate");
        assert_eq!(result.red_flags, "None detected");
        assert_eq!(result.mood, "playful");
        assert_eq!(result.ghosting_risk, "low");
        assert_eq!(result.insights, "They seem engaged.");
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn test_request_carries_prompt_and_chat() {
        let backend = FakeBackend::new(fenced);
        analyzer(&backend).analyze("hey, you up?").unwrap();
        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].len(), 2);
        assert_eq!(calls[0][0].text, prompts::SYSTEM_PROMPT);
        assert!(calls[0][1].text.contains("Chat to analyze:\nhey, you up?"));
    }

    #[test]
    fn test_non_json_response_fails_with_parse_message() {
        let backend = FakeBackend::new(|| text("Sorry, I can't help with that."));
        let err = analyzer(&backend).analyze("hey, you up?").unwrap_err();
        assert_eq!(err.kind, ErrorKind::AnalysisFailed);
        assert_eq!(err.code(), Some("ANALYSIS_FAILED"));
        assert!(err.message.starts_with("Failed to parse AI response: "));
        assert!(err.details.is_some());
        assert_eq!(backend.call_count(), 1);
    }

    /// Writer handed to a fmt subscriber so tests can read what was logged.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_parse_failure_logs_error_and_cleaned_text() {
        let backend = FakeBackend::new(|| text("```json\nSorry, I can't help with that.\n```"));
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let err = tracing::subscriber::with_default(subscriber, || {
            analyzer(&backend).analyze("hey, you up?")
        })
        .unwrap_err();

        let logs = captured.contents();
        let parse_message = serde_json::from_str::<Value>("Sorry, I can't help with that.")
            .unwrap_err()
            .to_string();
        assert_eq!(err.message, format!("Failed to parse AI response: {parse_message}"));
        assert!(logs.contains("WARN"), "{logs}");
        assert!(logs.contains(&parse_message), "{logs}");
        assert!(logs.contains("Sorry, I can't help with that."), "{logs}");
        assert!(!logs.contains("```"), "{logs}");
    }

    #[test]
    fn test_each_missing_field_is_named() {
        for field in RequiredField::ALL {
            let mut value: serde_json::Value = serde_json::from_str(crate::util::clean_response(FENCED)).unwrap();
            value.as_object_mut().unwrap().remove(field.as_str());
            let err = parse_analysis_response(&value.to_string()).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("Failed to parse AI response: Missing or empty required field: {field}")
            );
        }
    }

    #[test]
    fn test_missing_red_flags_through_analyze() {
        let backend = FakeBackend::new(|| {
            text(r#"{"interestLevel":"high","flirtingScore":"moderate","mood":"playful","ghostingRisk":"low","insights":"ok"}"#)
        });
        let err = analyzer(&backend).analyze("hi").unwrap_err();
        assert_eq!(err.code(), Some("ANALYSIS_FAILED"));
        assert!(err.message.contains("Missing or empty required field: redFlags"));
    }

    #[test]
    fn test_first_missing_field_wins() {
        let err = parse_analysis_response(r#"{"interestLevel":"high","mood":""}"#).unwrap_err();
        assert!(err.to_string().ends_with("required field: flirtingScore"));
    }

    #[test]
    fn test_falsy_values_count_as_missing() {
        for falsy in [r#""""#, "null", "false", "0"] {
            let json = format!(
                r#"{{"interestLevel":"a","flirtingScore":"b","redFlags":"c","mood":{falsy},"ghostingRisk":"e","insights":"f"}}"#
            );
            let err = parse_analysis_response(&json).unwrap_err();
            assert!(matches!(err, ResponseError::MissingField(RequiredField::Mood)), "{falsy}");
        }
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let json = r#"{"interestLevel":"a","flirtingScore":7,"redFlags":"c","mood":"d","ghostingRisk":"e","insights":"f"}"#;
        let err = parse_analysis_response(json).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse AI response: Invalid type for required field: flirtingScore"
        );
    }

    #[test]
    fn test_non_object_json_fails_on_first_field() {
        for json in ["[1, 2]", "\"just a string\"", "null", "42"] {
            let err = parse_analysis_response(json).unwrap_err();
            assert!(matches!(err, ResponseError::MissingField(RequiredField::InterestLevel)), "{json}");
        }
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let json = r#"{"interestLevel":"a","flirtingScore":"b","redFlags":"c","mood":"d","ghostingRisk":"e","insights":"f","confidence":"high"}"#;
        let result = parse_analysis_response(json).unwrap();
        assert_eq!(result.insights, "f");
    }

    #[test]
    fn test_no_response_object() {
        let backend = FakeBackend::new(|| Ok(None));
        let err = analyzer(&backend).analyze("hi").unwrap_err();
        assert_eq!(err.message, "No response received from the AI model.");
        assert_eq!(err.code(), Some("ANALYSIS_FAILED"));
    }

    #[test]
    fn test_empty_response_text() {
        let backend = FakeBackend::new(|| text(""));
        let err = analyzer(&backend).analyze("hi").unwrap_err();
        assert_eq!(err.message, "Empty response received from the AI model.");
        assert_eq!(err.code(), Some("ANALYSIS_FAILED"));
    }

    #[test]
    fn test_transport_failure_is_wrapped_once() {
        let backend = FakeBackend::new(|| Err(BackendError::Service("connection reset".to_string())));
        let analyzer = analyzer(&backend);
        let err = analyzer.analyze("hi").unwrap_err();
        assert_eq!(err.kind, ErrorKind::AnalysisFailed);
        assert_eq!(err.message, "connection reset");
        assert!(err.details.unwrap().contains("Service"));
        assert_eq!(backend.call_count(), 1);

        // A second invocation is a second call, never an automatic retry
        let _ = analyzer.analyze("hi");
        assert_eq!(backend.call_count(), 2);
    }

    #[test]
    fn test_service_and_parse_failures_share_code() {
        let unreachable = FakeBackend::new(|| Err(BackendError::Blocked("SAFETY".to_string())));
        let garbage = FakeBackend::new(|| text("not json"));
        let a = analyzer(&unreachable).analyze("hi").unwrap_err();
        let b = analyzer(&garbage).analyze("hi").unwrap_err();
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.code(), b.code());
        assert_ne!(a.message, b.message);
    }
}
