use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::{Attitude, Style, Tone};

pub const DEFAULT_MIN_WORD_COUNT: u32 = 1800;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Everything the generator needs to write one article.
///
/// Built once through [`ArticleRequest::builder`] after the user's input has
/// been collected. Fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRequest {
    topic: String,
    tone: Tone,
    style: Style,
    attitude: Option<Attitude>,
    /// Combined reference text; empty means "no reference material".
    reference_material: String,
    min_word_count: u32,
    max_attempts: u32,
}

impl ArticleRequest {
    pub fn builder(topic: impl Into<String>) -> ArticleRequestBuilder {
        ArticleRequestBuilder {
            topic: topic.into(),
            tone: Tone::default(),
            style: Style::default(),
            attitude: None,
            reference_material: String::new(),
            min_word_count: DEFAULT_MIN_WORD_COUNT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn attitude(&self) -> Option<Attitude> {
        self.attitude
    }

    pub fn reference_material(&self) -> &str {
        &self.reference_material
    }

    pub fn min_word_count(&self) -> u32 {
        self.min_word_count
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Checks a request that did not come from the builder, e.g. one
    /// deserialized from a file.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "article topic cannot be empty".to_string(),
            ));
        }
        if self.min_word_count == 0 {
            return Err(AppError::InvalidRequest(
                "minimum word count must be positive".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(AppError::InvalidRequest(
                "at least one generation attempt is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn has_reference_material(&self) -> bool {
        !self.reference_material.trim().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ArticleRequestBuilder {
    topic: String,
    tone: Tone,
    style: Style,
    attitude: Option<Attitude>,
    reference_material: String,
    min_word_count: u32,
    max_attempts: u32,
}

impl ArticleRequestBuilder {
    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn attitude(mut self, attitude: Option<Attitude>) -> Self {
        self.attitude = attitude;
        self
    }

    pub fn reference_material(mut self, material: impl Into<String>) -> Self {
        self.reference_material = material.into();
        self
    }

    pub fn min_word_count(mut self, count: u32) -> Self {
        self.min_word_count = count;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn build(self) -> Result<ArticleRequest> {
        let request = ArticleRequest {
            topic: self.topic.trim().to_string(),
            tone: self.tone,
            style: self.style,
            attitude: self.attitude,
            reference_material: self.reference_material,
            min_word_count: self.min_word_count,
            max_attempts: self.max_attempts,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let request = ArticleRequest::builder("  Renewable Energy ").build().unwrap();
        assert_eq!(request.topic(), "Renewable Energy");
        assert_eq!(request.tone(), Tone::Informative);
        assert_eq!(request.style(), Style::Conversational);
        assert_eq!(request.attitude(), None);
        assert_eq!(request.min_word_count(), 1800);
        assert_eq!(request.max_attempts(), 3);
        assert!(!request.has_reference_material());
    }

    #[test]
    fn rejects_blank_topic() {
        let err = ArticleRequest::builder("   ").build().unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn rejects_zero_counts() {
        let err = ArticleRequest::builder("Tides")
            .min_word_count(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let err = ArticleRequest::builder("Tides")
            .max_attempts(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn deserialized_request_still_validates() {
        let built = ArticleRequest::builder("Tides").build().unwrap();
        let mut value = serde_json::to_value(built).unwrap();
        value["topic"] = serde_json::json!("  ");
        let request: ArticleRequest = serde_json::from_value(value).unwrap();

        assert!(matches!(request.validate(), Err(AppError::InvalidRequest(_))));
    }
}
