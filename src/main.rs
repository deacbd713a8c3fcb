use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;

mod ai;
mod app;
mod config;
mod error;
mod models;
mod services;
mod ui;

use app::{App, RunOptions};
use config::{Config, ProviderKind};
use error::Result;
use models::{Attitude, Style, Tone};

/// Write a long-form article with an LLM, expanding the draft until it
/// reaches the requested length.
#[derive(Debug, Parser)]
#[command(name = "longform", version, about)]
struct Cli {
    /// Article topic (asked interactively when omitted)
    #[arg(short, long)]
    topic: Option<String>,

    /// Tone, e.g. Informative, Persuasive, Journalistic
    #[arg(long)]
    tone: Option<Tone>,

    /// Writing style, e.g. Academic, "Blog Post", Storytelling
    #[arg(long)]
    style: Option<Style>,

    /// Attitude, e.g. Neutral, Optimistic, Skeptical
    #[arg(long)]
    attitude: Option<Attitude>,

    /// Reference document (.txt, .md or .pdf); repeatable
    #[arg(short, long = "reference", value_name = "FILE")]
    references: Vec<PathBuf>,

    /// Text provider to use [mistral, gemini]
    #[arg(short, long)]
    provider: Option<ProviderKind>,

    /// Minimum number of words
    #[arg(long, value_name = "N")]
    min_words: Option<u32>,

    /// Maximum number of generation attempts
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,

    /// Directory to save the article in
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Do not save the article to a file
    #[arg(long)]
    no_save: bool,

    /// Print raw Markdown instead of rendering it
    #[arg(long)]
    plain: bool,

    /// Skip the API key check before generating
    #[arg(long)]
    skip_key_check: bool,

    /// Use an alternative config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log progress details to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Only warnings and errors by default; RUST_LOG still takes precedence
    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

/// Returns whether an article was produced.
async fn run(cli: Cli) -> Result<bool> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let options = RunOptions {
        topic: cli.topic,
        tone: cli.tone,
        style: cli.style,
        attitude: cli.attitude,
        references: cli.references,
        provider: cli.provider,
        min_words: cli.min_words,
        max_attempts: cli.max_attempts,
        output_dir: cli.output_dir,
        no_save: cli.no_save,
        plain: cli.plain,
        skip_key_check: cli.skip_key_check,
        interactive: std::io::stdin().is_terminal(),
    };

    let report = App::new(config).run(&options).await?;
    if let Some(path) = &report.saved_to {
        eprintln!("Article saved to {}", path.display());
    }
    Ok(!report.result.is_failed())
}
