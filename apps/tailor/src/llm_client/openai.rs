//! OpenAI Chat Completions backend.

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::prompts::RESUME_STRATEGIST_SYSTEM;
use super::{send_with_retries, BackendKind, Completion, GenerationBackend, LlmError};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
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
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

#[derive(Clone)]
pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
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
impl GenerationBackend for OpenAiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::OpenAi
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
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: RESUME_STRATEGIST_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens,
            temperature,
        };

        let response = send_with_retries(|| {
            self.client
                .post(OPENAI_API_URL)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
                .header(header::CONTENT_TYPE, "application/json")
                .json(&request_body)
        })
        .await?;

        let body: ChatResponse = response.json().await?;
        let tokens_used = body.usage.as_ref().map(|u| u.total_tokens).unwrap_or(0);
        debug!("OpenAI usage: total_tokens={tokens_used}");

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        Ok(Completion { text, tokens_used })
    }
}
