use thiserror::Error;

/// Code carried by every failure raised after the preconditions pass.
pub const ANALYSIS_FAILED: &str = "ANALYSIS_FAILED";

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Closed set of ways an analysis can fail.
///
/// Transport failures and malformed model output share `AnalysisFailed`;
/// only the message tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingCredential,
    InvalidCredential,
    EmptyInput,
    AnalysisFailed,
}

/// The single error shape handed back to the presentation layer.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AnalysisError {
    pub kind: ErrorKind,
    pub message: String,
    /// Diagnostic rendering of the underlying error, when there is one.
    pub details: Option<String>,
}

impl AnalysisError {
    pub fn missing_credential(env_var: &str) -> Self {
        Self {
            kind: ErrorKind::MissingCredential,
            message: format!(
                "API key is missing. Please set your Gemini API key in the {env_var} environment variable."
            ),
            details: None,
        }
    }

    pub fn invalid_credential() -> Self {
        Self {
            kind: ErrorKind::InvalidCredential,
            message: "Invalid API key format. Please check your Gemini API key.".to_string(),
            details: None,
        }
    }

    pub fn empty_input() -> Self {
        Self {
            kind: ErrorKind::EmptyInput,
            message: "Please provide some text to analyze.".to_string(),
            details: None,
        }
    }

    /// Wrap any failure from the request/response stage, keeping its message.
    pub fn failed<E: std::error::Error>(err: &E) -> Self {
        Self {
            kind: ErrorKind::AnalysisFailed,
            message: err.to_string(),
            details: Some(format!("{err:?}")),
        }
    }

    /// Machine-readable code. Precondition failures have none.
    pub fn code(&self) -> Option<&'static str> {
        match self.kind {
            ErrorKind::AnalysisFailed => Some(ANALYSIS_FAILED),
            _ => None,
        }
    }
}
