use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Counts whitespace-separated tokens, the same way every time.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Why a generation run stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// Network, HTTP status, timeout or malformed response.
    ProviderCallFailure,
    /// Well-formed response with no usable content (empty or safety-filtered).
    EmptyOrBlockedResponse,
}

impl FailureKind {
    /// Placeholder text returned as the "article" for this failure.
    pub fn sentinel(self) -> &'static str {
        match self {
            FailureKind::ProviderCallFailure => {
                "ERROR: Failed to generate article due to an API error. Please check your inputs and API key."
            }
            FailureKind::EmptyOrBlockedResponse => {
                "ERROR: Could not generate content. Please try adjusting your prompt or inputs."
            }
        }
    }
}

/// The three distinguishable ways a run ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The minimum word count was reached.
    Complete,
    /// Every attempt was used and the text is still short.
    BudgetExhausted,
    /// A provider call failed; no further attempts were made.
    Failed { kind: FailureKind, message: String },
}

/// One request/response cycle. Lives only for the duration of a run.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    /// 1-based.
    pub index: u32,
    pub prompt: String,
    /// `None` when the call failed.
    pub text: Option<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResult {
    pub text: String,
    pub word_count: usize,
    pub met_minimum: bool,
    pub attempts_used: u32,
    pub outcome: Outcome,
    pub generated_at: DateTime<Utc>,
}

impl ArticleResult {
    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}
