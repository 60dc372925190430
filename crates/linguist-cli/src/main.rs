mod commands;
mod form;

use clap::{Parser, Subcommand};
use linguist_core::config::{default_config_path, linguist_dir};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const LOG_FILE: &str = "linguist.log";

#[derive(Parser)]
#[command(name = "linguist", about = "Decode your crush's messages with AI")]
struct Cli {
    /// Config file to use instead of ~/.linguist/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log request and failure details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive form (the default)
    Form,
    /// Analyze a conversation from a file or stdin and print the reading
    Analyze {
        /// Read the conversation from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create ~/.linguist/ and a default config
    Init,
    /// Show configuration and whether the API key is usable
    Status,
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Form);

    init_tracing(cli.verbose, matches!(command, Commands::Form));

    let config_path = cli.config.unwrap_or_else(default_config_path);

    let result = match command {
        Commands::Form => commands::form::run(&config_path),
        Commands::Analyze { file, json } => {
            commands::analyze::run(&config_path, file.as_deref(), json, cli.verbose)
        }
        Commands::Init => commands::init::run(&config_path),
        Commands::Status => commands::status::run(&config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// RUST_LOG wins when set. Otherwise warnings only, debug for our crates
/// with --verbose.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,linguist=debug,linguist_core=debug"
    } else {
        "warn"
    }
}

/// The form owns the terminal, so its logs go to a file instead of stderr.
fn open_log_file(dir: &Path) -> std::io::Result<File> {
    std::fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
}

fn init_tracing(verbose: bool, interactive: bool) {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let writer = if interactive {
        match open_log_file(&linguist_dir()) {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => {
                // Nowhere to write that won't draw over the form
                filter = EnvFilter::new("off");
                BoxMakeWriter::new(std::io::sink)
            }
        }
    } else {
        BoxMakeWriter::new(std::io::stderr)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(!interactive)
        .with_target(true)
        .without_time()
        .init();
}
