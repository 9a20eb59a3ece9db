use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SummarizerConfig;
use crate::error::ProfileError;

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, ProfileError>;
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiSummarizer {
    client: reqwest::Client,
    api_key: String,
    config: SummarizerConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiSummarizer {
    pub fn new(config: SummarizerConfig) -> Result<Self, ProfileError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ProfileError::GenerationFailure(
                    "no API key configured (set OPENAI_API_KEY or LINKEDINGEST_SUMMARIZER__API_KEY)"
                        .to_string(),
                )
            })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ProfileError::GenerationFailure(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    fn request<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    #[tracing::instrument(skip_all, fields(model = %self.config.model, prompt_chars = prompt.len()))]
    async fn summarize(&self, prompt: &str) -> Result<String, ProfileError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| ProfileError::GenerationFailure(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProfileError::GenerationFailure(format!("failed to read response: {e}"))
        })?;
        if !status.is_success() {
            debug!(%status, body = %body, "completion request rejected");
            return Err(ProfileError::GenerationFailure(format!(
                "API returned {status}"
            )));
        }

        let summary = parse_completion(&body)?;
        info!(summary_chars = summary.len(), "summary generated");
        Ok(summary)
    }
}

/// First non-empty choice of a chat-completions response body.
fn parse_completion(body: &str) -> Result<String, ProfileError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProfileError::GenerationFailure(format!("invalid response: {e}")))?;

    response
        .choices
        .into_iter()
        .filter_map(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
        .ok_or_else(|| ProfileError::GenerationFailure("response contained no text".to_string()))
}
