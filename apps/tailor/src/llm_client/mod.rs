/// Generative Call Gateway — the single point of entry for every text-generation call.
///
/// ARCHITECTURAL RULE: No other module may call a provider API directly.
/// All generation goes through `Gateway::generate`.
///
/// Transport failures never escape the gateway as errors: they come back inside a
/// `GenerationResponse` with `success = false`. Only configuration failures
/// (unknown or unconfigured backend) are returned as `Err`.
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;

pub mod anthropic;
pub mod openai;
pub mod prompts;
pub mod rate_limit;
pub mod sections;

pub use rate_limit::RateLimiter;

pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
const MAX_RETRIES: u32 = 3;

/// The interchangeable generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    OpenAi,
    Anthropic,
}

impl BackendKind {
    pub const ALL: [BackendKind; 2] = [BackendKind::OpenAi, BackendKind::Anthropic];

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "openai",
            BackendKind::Anthropic => "anthropic",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(BackendKind::OpenAi),
            "anthropic" => Ok(BackendKind::Anthropic),
            other => Err(GatewayError::UnknownBackend(other.to_string())),
        }
    }
}

/// Failure of a single backend call. Converted into a failed `GenerationResponse`
/// by the gateway; never returned to gateway callers.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Configuration failures. These are hard errors: the caller asked for something
/// the gateway cannot serve at all.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unknown generation backend: '{0}'")]
    UnknownBackend(String),

    #[error("Generation backend '{0}' is not configured (missing API key)")]
    NotConfigured(BackendKind),
}

/// Raw output of one successful backend call.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub tokens_used: u32,
}

/// A text-completion provider. Implement this to add a backend without touching
/// the gateway or any caller.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn model(&self) -> &str;

    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Completion, LlmError>;
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    /// `None` selects the configured default backend.
    pub backend: Option<BackendKind>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            backend: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Normalized result of a generation call, identical in shape for every backend.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResponse {
    pub content: String,
    pub backend: BackendKind,
    pub model: String,
    pub tokens_used: u32,
    pub success: bool,
    pub error: Option<String>,
}

impl GenerationResponse {
    /// The reply text when the call succeeded, otherwise the failure description.
    pub fn into_result(self) -> Result<String, String> {
        if self.success {
            Ok(self.content)
        } else {
            Err(self
                .error
                .unwrap_or_else(|| "unknown generation failure".to_string()))
        }
    }
}

/// Routes prompts to the configured backends and spaces calls per backend.
pub struct Gateway {
    backends: HashMap<BackendKind, Arc<dyn GenerationBackend>>,
    default_backend: BackendKind,
    limiter: RateLimiter,
}

impl Gateway {
    pub fn new(default_backend: BackendKind, min_interval: Duration) -> Self {
        Self {
            backends: HashMap::new(),
            default_backend,
            limiter: RateLimiter::new(min_interval),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn GenerationBackend>) -> Self {
        self.backends.insert(backend.kind(), backend);
        self
    }

    /// Registers every backend whose API key is present in the configuration.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let mut gateway = Gateway::new(config.default_backend, config.min_call_interval);

        if let Some(key) = &config.openai_api_key {
            let backend = openai::OpenAiBackend::new(key.clone(), config.openai_model.clone())?;
            gateway = gateway.with_backend(Arc::new(backend));
        }
        if let Some(key) = &config.anthropic_api_key {
            let backend =
                anthropic::AnthropicBackend::new(key.clone(), config.anthropic_model.clone())?;
            gateway = gateway.with_backend(Arc::new(backend));
        }

        Ok(gateway)
    }

    pub fn default_backend(&self) -> BackendKind {
        self.default_backend
    }

    pub fn is_available(&self, kind: BackendKind) -> bool {
        self.backends.contains_key(&kind)
    }

    /// True when a call without an explicit backend selector can be served.
    pub fn default_available(&self) -> bool {
        self.is_available(self.default_backend)
    }

    pub fn available_backends(&self) -> Vec<BackendKind> {
        BackendKind::ALL
            .into_iter()
            .filter(|kind| self.is_available(*kind))
            .collect()
    }

    /// Sends a prompt to the selected (or default) backend.
    ///
    /// Blocks until the backend's minimum call spacing has elapsed.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError> {
        let kind = request.backend.unwrap_or(self.default_backend);
        let backend = self
            .backends
            .get(&kind)
            .ok_or(GatewayError::NotConfigured(kind))?;

        info!("Generating response using {kind}");
        self.limiter.wait_turn(kind).await;

        match backend
            .complete(&request.prompt, request.max_tokens, request.temperature)
            .await
        {
            Ok(completion) => {
                info!(
                    "{kind} call successful - model: {}, tokens: {}",
                    backend.model(),
                    completion.tokens_used
                );
                Ok(GenerationResponse {
                    content: completion.text,
                    backend: kind,
                    model: backend.model().to_string(),
                    tokens_used: completion.tokens_used,
                    success: true,
                    error: None,
                })
            }
            Err(e) => {
                warn!("{kind} call failed: {e}");
                Ok(GenerationResponse {
                    content: String::new(),
                    backend: kind,
                    model: backend.model().to_string(),
                    tokens_used: 0,
                    success: false,
                    error: Some(e.to_string()),
                })
            }
        }
    }

    /// Same as `generate`, with the backend chosen by name. Unknown names are a hard error.
    pub async fn generate_with(
        &self,
        selector: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GatewayError> {
        let kind: BackendKind = selector.parse()?;
        self.generate(request.backend(kind)).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Sends a request, retrying on 429 and 5xx with exponential backoff (1s, 2s).
/// `build` is called once per attempt.
pub(crate) async fn send_with_retries<F>(mut build: F) -> Result<reqwest::Response, LlmError>
where
    F: FnMut() -> reqwest::RequestBuilder,
{
    let mut last_error: Option<LlmError> = None;

    for attempt in 0..MAX_RETRIES {
        if attempt > 0 {
            let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
            warn!(
                "Generation call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(LlmError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if status.as_u16() == 429 || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generation API returned {}: {}", status, body);
            last_error = Some(LlmError::Api {
                status: status.as_u16(),
                message: body,
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Generation API responded {status} on attempt {}", attempt + 1);
        return Ok(response);
    }

    Err(last_error.unwrap_or(LlmError::RateLimited {
        retries: MAX_RETRIES,
    }))
}

/// Strips ```lang ... ``` or ``` ... ``` code fences from a reply.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    // Drop an optional language tag on the opening fence line.
    let body = match stripped.find('\n') {
        Some(idx) if !stripped[..idx].trim().contains(' ') => &stripped[idx + 1..],
        _ => stripped,
    };
    body.trim_end()
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(body.trim())
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_backend_kind_parses_known_names() {
        assert_eq!("openai".parse::<BackendKind>().unwrap(), BackendKind::OpenAi);
        assert_eq!(
            " Anthropic ".parse::<BackendKind>().unwrap(),
            BackendKind::Anthropic
        );
    }

    #[test]
    fn test_backend_kind_rejects_unknown_name() {
        let err = "gemini".parse::<BackendKind>().unwrap_err();
        assert!(matches!(err, GatewayError::UnknownBackend(ref name) if name == "gemini"));
    }

    #[test]
    fn test_strip_code_fences_with_tag() {
        assert_eq!(strip_code_fences("```text\nLed the team\n```"), "Led the team");
    }

    #[test]
    fn test_strip_code_fences_without_tag() {
        assert_eq!(strip_code_fences("```\nLed the team\n```"), "Led the team");
    }

    #[test]
    fn test_strip_code_fences_no_fences() {
        assert_eq!(strip_code_fences("  Led the team "), "Led the team");
    }

    #[tokio::test]
    async fn test_generate_success_is_normalized() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::Anthropic).reply("three word reply"));
        let gateway = gateway_with(backend.clone());

        let response = gateway
            .generate(GenerationRequest::new("prompt"))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.content, "three word reply");
        assert_eq!(response.backend, BackendKind::Anthropic);
        assert_eq!(response.model, "scripted");
        assert_eq!(response.tokens_used, 3);
        assert!(response.error.is_none());
        assert_eq!(backend.prompts(), vec!["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_generate_transport_failure_is_not_an_error() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).fail("upstream down"));
        let gateway = gateway_with(backend);

        let response = gateway
            .generate(GenerationRequest::new("prompt"))
            .await
            .unwrap();

        assert!(!response.success);
        assert!(response.content.is_empty());
        assert_eq!(response.tokens_used, 0);
        assert!(response.error.unwrap().contains("upstream down"));
    }

    #[tokio::test]
    async fn test_generate_unconfigured_backend_is_hard_error() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).reply("x"));
        let gateway = gateway_with(backend);

        let err = gateway
            .generate(GenerationRequest::new("prompt").backend(BackendKind::Anthropic))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotConfigured(BackendKind::Anthropic)));
    }

    #[tokio::test]
    async fn test_generate_with_unknown_selector_is_hard_error() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::OpenAi).reply("x"));
        let gateway = gateway_with(backend);

        let err = gateway
            .generate_with("mistral", GenerationRequest::new("prompt"))
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnknownBackend(_)));
    }

    #[test]
    fn test_available_backends_lists_only_registered() {
        let backend = Arc::new(ScriptedBackend::new(BackendKind::Anthropic));
        let gateway = Gateway::new(BackendKind::OpenAi, Duration::ZERO).with_backend(backend);

        assert_eq!(gateway.available_backends(), vec![BackendKind::Anthropic]);
        assert!(!gateway.default_available());
        assert!(gateway.is_available(BackendKind::Anthropic));
    }

    #[test]
    fn test_failed_response_into_result_carries_error() {
        let response = GenerationResponse {
            content: String::new(),
            backend: BackendKind::OpenAi,
            model: "gpt-4".to_string(),
            tokens_used: 0,
            success: false,
            error: Some("boom".to_string()),
        };
        assert_eq!(response.into_result().unwrap_err(), "boom");
    }
}
