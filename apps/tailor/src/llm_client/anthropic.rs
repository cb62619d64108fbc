//! Anthropic Messages API backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::RESUME_STRATEGIST_SYSTEM;
use super::{send_with_retries, BackendKind, Completion, GenerationBackend, LlmError};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    /// Extracts the text content from the first text block.
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Clone)]
pub struct AnthropicBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl AnthropicBackend {
    pub fn new(api_key: String, model: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl GenerationBackend for AnthropicBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion, LlmError> {
        let request_body = AnthropicRequest {
            model: &self.model,
            max_tokens,
            temperature,
            system: RESUME_STRATEGIST_SYSTEM,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = send_with_retries(|| {
            self.client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
        })
        .await?;

        let body: AnthropicResponse = response.json().await?;

        debug!(
            "Anthropic usage: input_tokens={}, output_tokens={}",
            body.usage.input_tokens, body.usage.output_tokens
        );

        let text = body.text().ok_or(LlmError::EmptyContent)?.to_string();
        Ok(Completion {
            text,
            tokens_used: body.usage.input_tokens + body.usage.output_tokens,
        })
    }
}
