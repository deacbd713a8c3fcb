mod article;
mod options;
mod request;

pub use article::{word_count, ArticleResult, FailureKind, GenerationAttempt, Outcome};
pub use options::{Attitude, Style, Tone};
pub use request::{ArticleRequest, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_WORD_COUNT};
