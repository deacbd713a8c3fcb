use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{GenerationConfig, Prompt, ProviderError, TextProvider};

pub const MISTRAL_API_URL: &str = "https://api.mistral.ai/v1";
pub const MISTRAL_MODEL: &str = "mistral-medium-latest";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    random_seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<MessageContent>,
}

/// Mistral returns either a plain string or a list of typed chunks.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Chunks(Vec<ContentChunk>),
}

#[derive(Debug, Deserialize)]
struct ContentChunk {
    text: Option<String>,
}

/// Chat-completions binding with bearer-token auth.
pub struct MistralProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl MistralProvider {
    pub fn new(api_key: String, base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("longform/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl TextProvider for MistralProvider {
    fn name(&self) -> &str {
        "Mistral"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(
        &self,
        prompt: &Prompt,
        config: &GenerationConfig,
    ) -> std::result::Result<String, ProviderError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &prompt.system {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &prompt.user,
        });

        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: config.max_output_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
            random_seed: config.random_seed,
        };

        tracing::debug!("POST {}/chat/completions (model {})", self.base_url, self.model);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .timeout(Duration::from_secs(config.timeout_secs))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited(body));
        }
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

fn parse_completion(body: &str) -> std::result::Result<String, ProviderError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ProviderError::Empty)?;

    let text = match content {
        MessageContent::Text(text) => text,
        MessageContent::Chunks(chunks) => chunks
            .into_iter()
            .filter_map(|chunk| chunk.text)
            .collect::<Vec<_>>()
            .join(""),
    };

    if text.trim().is_empty() {
        return Err(ProviderError::Empty);
    }
    Ok(text)
}
