use anyhow::Result;
use colored::Colorize;
use linguist_core::config::Config;
use std::path::Path;

pub fn run(config_path: &Path) -> Result<()> {
    // Create config.toml (and its directory) if it doesn't exist
    let config = if config_path.exists() {
        println!("  {} {}", "Exists".yellow(), config_path.display());
        Config::load(config_path)?
    } else {
        let config = Config::default();
        config.save(config_path)?;
        println!("  {} {}", "Created".green(), config_path.display());
        config
    };

    println!();
    println!("{}", "linguist initialized successfully".green().bold());
    println!(
        "  Export your Gemini API key as {} and run {}",
        config.ai.api_key_env.cyan(),
        "linguist".cyan()
    );

    Ok(())
}
