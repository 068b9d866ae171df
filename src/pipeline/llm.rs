//! Completion request: send the filled prompt, get the whole response back.
//!
//! [`CompletionClient`] is the seam between the pipeline and the model. The
//! request handler only ever sees `Arc<dyn CompletionClient>`, built once by
//! [`client_from_config`] at process start, so tests substitute a recording
//! fake and the server shares one client across requests.
//!
//! Two backends exist:
//!
//! * [`OllamaClient`] talks to Ollama's native `/api/generate` endpoint with
//!   `stream: false`. This is the default.
//! * [`ProviderClient`] routes through an `edgequake_llm` provider for
//!   hosted models (OpenAI, Anthropic, Gemini, …).
//!
//! Neither retries. A failure surfaces as a service-kind [`CodeDocError`].

use crate::config::ServiceConfig;
use crate::error::CodeDocError;
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, LLMProvider, ProviderFactory};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// A text-completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Human-readable backend description for logs, e.g. `ollama:llama3`.
    fn describe(&self) -> String;

    /// Send `prompt` and wait for the complete response.
    async fn complete(&self, prompt: &str) -> Result<String, CodeDocError>;
}

/// Build the client named by `config`.
///
/// `provider: None` (or `"ollama"`) selects the native Ollama client at
/// `base_url`; any other name goes through the provider factory.
pub fn client_from_config(config: &ServiceConfig) -> Result<Arc<dyn CompletionClient>, CodeDocError> {
    let client: Arc<dyn CompletionClient> = match config.provider.as_deref() {
        None | Some("ollama") => Arc::new(OllamaClient::new(config)?),
        Some(name) => {
            let provider = ProviderFactory::create_llm_provider(name, &config.model).map_err(|e| {
                CodeDocError::ProviderNotConfigured {
                    provider: name.to_string(),
                    hint: format!("{e}"),
                }
            })?;
            Arc::new(ProviderClient::new(name, provider, config.timeout_secs))
        }
    };
    info!("Completion backend: {}", client.describe());
    Ok(client)
}

// ── Ollama ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for Ollama's native generate API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    timeout_secs: Option<u64>,
}

impl OllamaClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, CodeDocError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| CodeDocError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Full URL of the generate endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn transport_error(&self, e: reqwest::Error) -> CodeDocError {
        if e.is_timeout() {
            CodeDocError::ServiceTimeout {
                secs: self.timeout_secs.unwrap_or_default(),
            }
        } else {
            CodeDocError::ServiceUnreachable {
                base_url: self.base_url.clone(),
                detail: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl CompletionClient for OllamaClient {
    fn describe(&self) -> String {
        format!("ollama:{} @ {}", self.model, self.base_url)
    }

    async fn complete(&self, prompt: &str) -> Result<String, CodeDocError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        debug!("POST {} ({} prompt bytes)", self.endpoint(), prompt.len());

        let response = self
            .http
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(CodeDocError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.transport_error(e))?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| CodeDocError::MalformedResponse {
                detail: e.to_string(),
            })?;
        Ok(parsed.response)
    }
}

// ── Hosted providers ─────────────────────────────────────────────────────

/// Adapter from an `edgequake_llm` provider to [`CompletionClient`].
pub struct ProviderClient {
    name: String,
    provider: Arc<dyn LLMProvider>,
    timeout_secs: Option<u64>,
}

impl ProviderClient {
    pub fn new(name: impl Into<String>, provider: Arc<dyn LLMProvider>, timeout_secs: Option<u64>) -> Self {
        Self {
            name: name.into(),
            provider,
            timeout_secs,
        }
    }
}

#[async_trait]
impl CompletionClient for ProviderClient {
    fn describe(&self) -> String {
        format!("provider:{}", self.name)
    }

    async fn complete(&self, prompt: &str) -> Result<String, CodeDocError> {
        let messages = vec![ChatMessage::user(prompt)];
        let call = self.provider.chat(&messages, None);

        let result = match self.timeout_secs {
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), call)
                .await
                .map_err(|_| CodeDocError::ServiceTimeout { secs })?,
            None => call.await,
        };

        let response = result.map_err(|e| CodeDocError::LlmApiError {
            provider: self.name.clone(),
            message: e.to_string(),
        })?;
        debug!(
            "Provider {}: {} input tokens, {} output tokens",
            self.name, response.prompt_tokens, response.completion_tokens
        );
        Ok(response.content)
    }
}
