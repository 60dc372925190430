use anyhow::{Context, Result};
use colored::Colorize;
use linguist_core::models::AnalysisResult;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::{build_analyzer, load_config};
use crate::form::{CARDS, INSIGHTS_TITLE};

pub fn run(config_path: &Path, file: Option<&Path>, json: bool, verbose: bool) -> Result<()> {
    let config = load_config(config_path)?;

    let text = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading conversation from stdin")?;
            buf
        }
    };

    if text.trim().is_empty() {
        anyhow::bail!("Please enter some text to analyze");
    }

    let analyzer = build_analyzer(&config)?;
    debug!(
        model = %config.ai.model,
        endpoint = %config.ai.endpoint,
        chars = text.len(),
        "analyzing conversation"
    );

    if !json {
        eprintln!(
            "{}",
            format!("Analyzing with {}...", config.ai.model).dimmed()
        );
    }

    let result = match analyzer.analyze(&text) {
        Ok(result) => result,
        Err(e) => {
            if verbose {
                if let Some(details) = &e.details {
                    eprintln!("{} {}", "details:".dimmed(), details.dimmed());
                }
            }
            return Err(match e.code() {
                Some(code) => anyhow::anyhow!("[{code}] {}", e.message),
                None => anyhow::Error::new(e),
            });
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_result(result: &AnalysisResult) {
    println!();
    for (field, title) in CARDS {
        println!("  {}", title.magenta().bold());
        println!("    {}", result.get(field).white());
        println!();
    }
    println!("  {}", INSIGHTS_TITLE.magenta().bold());
    println!("    {}", result.insights.white());
    println!();
}
