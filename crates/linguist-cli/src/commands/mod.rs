pub mod analyze;
pub mod form;
pub mod init;
pub mod status;

use anyhow::{Context, Result};
use linguist_core::analysis::Analyzer;
use linguist_core::analysis::gemini::GeminiBackend;
use linguist_core::config::Config;
use linguist_core::credential::Credential;
use std::path::Path;

/// Load the config file, falling back to defaults when it doesn't exist.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("loading config from {}", path.display()))
}

/// Build the analyzer, reading the API key once from the configured environment variable.
pub fn build_analyzer(config: &Config) -> Result<Analyzer<GeminiBackend>> {
    let backend = GeminiBackend::new(&config.ai).context("setting up the Gemini client")?;
    let credential = Credential::from_env(&config.ai.api_key_env);
    Ok(Analyzer::new(backend, credential))
}
