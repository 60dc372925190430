use anyhow::Result;
use colored::Colorize;
use linguist_core::credential::{Credential, CredentialStatus};

use super::load_config;
use std::path::Path;

pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let credential = Credential::from_env(&config.ai.api_key_env);

    println!("{}", "linguist status".cyan().bold());
    println!();

    println!(
        "  {} {}{}",
        "Config:".white(),
        config_path.display(),
        if config_path.exists() {
            String::new()
        } else {
            " (not found, using defaults)".dimmed().to_string()
        }
    );
    println!();

    println!("{}", "Model".white().bold());
    println!("  {} {}", "Model:".white(), config.ai.model.cyan());
    println!("  {} {}", "Endpoint:".white(), config.ai.endpoint.cyan());
    println!("  {} {}", "Timeout:".white(), "none".cyan());
    println!();

    // Never print the key itself
    println!("{}", "API key".white().bold());
    println!("  {} {}", "Variable:".white(), credential.source().cyan());
    let state = match credential.status() {
        CredentialStatus::Valid => "configured".green(),
        CredentialStatus::Malformed => "invalid format".red(),
        CredentialStatus::Missing => "not set".red(),
    };
    println!("  {} {}", "Status:".white(), state);

    Ok(())
}
