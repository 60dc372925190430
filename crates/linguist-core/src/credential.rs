use crate::errors::AnalysisError;
use regex::Regex;
use std::sync::OnceLock;

static KEY_SHAPE: OnceLock<Regex> = OnceLock::new();

fn key_shape() -> &'static Regex {
    KEY_SHAPE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{20,}$").unwrap())
}

/// Basic shape check for an API key. Not authentication: it only keeps
/// obviously malformed tokens off the wire.
pub fn is_valid_api_key(key: &str) -> bool {
    key_shape().is_match(key)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStatus {
    Missing,
    Malformed,
    Valid,
}

/// The API key as supplied at startup, plus where it was read from.
#[derive(Clone)]
pub struct Credential {
    value: Option<String>,
    source: String,
}

impl Credential {
    /// An empty value counts as not configured.
    pub fn new(value: Option<String>, source: impl Into<String>) -> Self {
        Self {
            value: value.filter(|v| !v.is_empty()),
            source: source.into(),
        }
    }

    /// Read the key from an environment variable.
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var(var).ok(), var)
    }

    /// Name of the environment variable the key comes from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_configured(&self) -> bool {
        self.value.is_some()
    }

    pub fn status(&self) -> CredentialStatus {
        match &self.value {
            None => CredentialStatus::Missing,
            Some(v) if !is_valid_api_key(v) => CredentialStatus::Malformed,
            Some(_) => CredentialStatus::Valid,
        }
    }

    /// Presence then shape, each its own error.
    pub fn validate(&self) -> Result<&str, AnalysisError> {
        let key = self
            .value
            .as_deref()
            .ok_or_else(|| AnalysisError::missing_credential(&self.source))?;
        if !is_valid_api_key(key) {
            return Err(AnalysisError::invalid_credential());
        }
        Ok(key)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("value", &self.value.as_ref().map(|_| "[REDACTED]"))
            .field("source", &self.source)
            .finish()
    }
}
