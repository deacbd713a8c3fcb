use std::io::IsTerminal;
use std::path::PathBuf;

use crate::ai::{GeminiProvider, Generator, MistralProvider, TextProvider};
use crate::config::{Config, ProviderKind};
use crate::error::{AppError, Result};
use crate::models::{ArticleRequest, ArticleResult, Attitude, Style, Tone};
use crate::services::{ingest_paths, resolve_api_key, save_article};
use crate::ui::{ask_article_details, outcome_summary, ArticleDetails, MarkdownRenderer};

/// Per-run choices, typically straight from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub topic: Option<String>,
    pub tone: Option<Tone>,
    pub style: Option<Style>,
    pub attitude: Option<Attitude>,
    pub references: Vec<PathBuf>,
    pub provider: Option<ProviderKind>,
    pub min_words: Option<u32>,
    pub max_attempts: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub no_save: bool,
    pub plain: bool,
    pub skip_key_check: bool,
    pub interactive: bool,
}

pub struct RunReport {
    pub result: ArticleResult,
    pub saved_to: Option<PathBuf>,
}

pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// validate input -> ingest -> connect -> generate -> present -> export
    pub async fn run(&self, options: &RunOptions) -> Result<RunReport> {
        let request = self.prepare_request(options).await?;
        let provider = self.connect(options).await?;
        self.execute(&request, provider.as_ref(), options).await
    }

    /// Collects and validates the article details and reference material.
    pub async fn prepare_request(&self, options: &RunOptions) -> Result<ArticleRequest> {
        let preset = ArticleDetails {
            topic: options.topic.clone().unwrap_or_default(),
            tone: options.tone.unwrap_or_default(),
            attitude: options.attitude,
            style: options.style.unwrap_or_default(),
        };

        let details = if options.interactive && preset.topic.trim().is_empty() {
            let ask_choices =
                options.tone.is_none() && options.style.is_none() && options.attitude.is_none();
            ask_article_details(preset, ask_choices)?
        } else {
            preset
        };

        let mut builder = ArticleRequest::builder(details.topic)
            .tone(details.tone)
            .style(details.style)
            .attitude(details.attitude)
            .min_word_count(options.min_words.unwrap_or(self.config.min_word_count))
            .max_attempts(options.max_attempts.unwrap_or(self.config.max_attempts));

        if !options.references.is_empty() {
            let report = ingest_paths(&options.references).await;
            for skipped in &report.skipped {
                eprintln!("Skipped '{}': {}", skipped.name, skipped.reason);
            }
            if report.is_empty() {
                eprintln!("No usable reference material was found.");
            } else {
                eprintln!(
                    "Using {} reference document(s), {} characters in total.",
                    report.accepted.len(),
                    report.char_count()
                );
                builder = builder.reference_material(report.material);
            }
        }

        let request = builder.build()?;
        eprintln!("Article Topic: '{}'", request.topic());
        eprintln!("Article Tone: '{}'", request.tone());
        if let Some(attitude) = request.attitude() {
            eprintln!("Article Attitude: '{}'", attitude);
        }
        eprintln!("Article Style: '{}'", request.style());
        Ok(request)
    }

    /// Builds the configured provider and, unless disabled, checks its key.
    pub async fn connect(&self, options: &RunOptions) -> Result<Box<dyn TextProvider>> {
        let kind = options.provider.unwrap_or(self.config.provider);
        let api_key = resolve_api_key(kind, &self.config, options.interactive)?;

        let provider: Box<dyn TextProvider> = match kind {
            ProviderKind::Mistral => Box::new(MistralProvider::new(
                api_key,
                &self.config.mistral_base_url,
                &self.config.mistral_model,
            )?),
            ProviderKind::Gemini => Box::new(GeminiProvider::new(
                api_key,
                &self.config.gemini_base_url,
                &self.config.gemini_model,
            )?),
        };

        if self.config.verify_api_key && !options.skip_key_check {
            provider.verify().await.map_err(|e| {
                AppError::ProviderUnavailable(format!(
                    "{} rejected the API key check: {}",
                    provider.name(),
                    e
                ))
            })?;
            eprintln!("API key validated: connection to {} successful.", provider.name());
        }

        Ok(provider)
    }

    /// Runs generation against `provider`, then shows and saves the article.
    pub async fn execute(
        &self,
        request: &ArticleRequest,
        provider: &dyn TextProvider,
        options: &RunOptions,
    ) -> Result<RunReport> {
        eprintln!(
            "Starting article generation with {} ({})...",
            provider.name(),
            provider.model()
        );

        let max_attempts = request.max_attempts();
        let min_words = request.min_word_count();
        let result = Generator::new(provider, self.config.generation.clone())
            .on_attempt(move |attempt| {
                tracing::debug!("Prompt for attempt {}:\n{}", attempt.index, attempt.prompt);
                match attempt.text {
                    Some(_) if attempt.word_count < min_words as usize => eprintln!(
                        "Attempt {}/{}: {} words, still too short",
                        attempt.index, max_attempts, attempt.word_count
                    ),
                    Some(_) => eprintln!(
                        "Attempt {}/{}: {} words, target reached",
                        attempt.index, max_attempts, attempt.word_count
                    ),
                    None => eprintln!(
                        "Attempt {}/{}: no usable response",
                        attempt.index, max_attempts
                    ),
                }
            })
            .generate(request)
            .await?;

        self.present(&result, options.plain);
        eprintln!("{}", outcome_summary(request, &result));

        let saved_to = if options.no_save || result.is_failed() {
            None
        } else {
            let dir = options
                .output_dir
                .clone()
                .unwrap_or_else(|| self.config.output_dir());
            Some(save_article(&dir, request.topic(), &result.text).await?)
        };

        Ok(RunReport { result, saved_to })
    }

    fn present(&self, result: &ArticleResult, plain: bool) {
        let stdout = std::io::stdout();
        if plain || !stdout.is_terminal() {
            println!("{}", result.text);
            return;
        }

        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(100)
            .min(100);
        let styled = std::env::var_os("NO_COLOR").is_none();
        let rendered = MarkdownRenderer::new(width, styled).render(&result.text);
        println!("\n{}\n", rendered);
    }
}
