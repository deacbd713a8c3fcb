use chrono::Utc;

use crate::error::Result;
use crate::models::{word_count, ArticleRequest, ArticleResult, FailureKind, GenerationAttempt, Outcome};

use super::{build_prompt, GenerationConfig, ProviderError, TextProvider};

type AttemptObserver<'a> = Box<dyn Fn(&GenerationAttempt) + Send + Sync + 'a>;

/// Drives a provider until the article is long enough, the attempt budget
/// runs out, or a call fails.
pub struct Generator<'a> {
    provider: &'a dyn TextProvider,
    config: GenerationConfig,
    observer: Option<AttemptObserver<'a>>,
}

impl<'a> Generator<'a> {
    pub fn new(provider: &'a dyn TextProvider, config: GenerationConfig) -> Self {
        Self {
            provider,
            config,
            observer: None,
        }
    }

    /// Called after every attempt, successful or not.
    pub fn on_attempt(mut self, observer: impl Fn(&GenerationAttempt) + Send + Sync + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Runs the generate/expand loop.
    ///
    /// Only an invalid request is returned as `Err`. Provider failures end the
    /// loop and are reported through [`ArticleResult::outcome`], with the
    /// failure sentinel as the text.
    pub async fn generate(&self, request: &ArticleRequest) -> Result<ArticleResult> {
        request.validate()?;

        let min = request.min_word_count() as usize;
        let mut current_text = String::new();
        let mut attempt: u32 = 0;
        let mut failure: Option<(FailureKind, String)> = None;

        while word_count(&current_text) < min && attempt < request.max_attempts() {
            attempt += 1;
            tracing::info!(
                "Generation attempt {}/{} with {} ({})",
                attempt,
                request.max_attempts(),
                self.provider.name(),
                self.provider.model()
            );

            let prompt = build_prompt(request, &current_text, attempt);
            let response = self.provider.generate(&prompt, &self.config).await;

            let outcome = match response {
                Ok(text) if text.trim().is_empty() => Err(ProviderError::Empty),
                other => other,
            };

            match outcome {
                Ok(text) => {
                    // Each response is the whole article, never a delta.
                    current_text = text;
                    let words = word_count(&current_text);
                    tracing::info!("Attempt {} produced {} words", attempt, words);
                    self.notify(GenerationAttempt {
                        index: attempt,
                        prompt: prompt.flatten(),
                        text: Some(current_text.clone()),
                        word_count: words,
                    });
                }
                Err(e) => {
                    let kind = if e.is_empty_or_blocked() {
                        FailureKind::EmptyOrBlockedResponse
                    } else {
                        FailureKind::ProviderCallFailure
                    };
                    tracing::error!("Attempt {} failed: {}", attempt, e);
                    self.notify(GenerationAttempt {
                        index: attempt,
                        prompt: prompt.flatten(),
                        text: None,
                        word_count: 0,
                    });
                    current_text = kind.sentinel().to_string();
                    failure = Some((kind, e.to_string()));
                    break;
                }
            }
        }

        let final_words = word_count(&current_text);
        let (met_minimum, outcome) = match failure {
            Some((kind, message)) => (false, Outcome::Failed { kind, message }),
            None if final_words >= min => (true, Outcome::Complete),
            None => {
                tracing::warn!(
                    "Could not reach {} words after {} attempts (got {})",
                    min,
                    attempt,
                    final_words
                );
                (false, Outcome::BudgetExhausted)
            }
        };

        Ok(ArticleResult {
            text: current_text,
            word_count: final_words,
            met_minimum,
            attempts_used: attempt,
            outcome,
            generated_at: Utc::now(),
        })
    }

    fn notify(&self, attempt: GenerationAttempt) {
        if let Some(observer) = &self.observer {
            observer(&attempt);
        }
    }
}
