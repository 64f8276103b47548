//! Response generation boundary.
//!
//! The only suspension point in the pipeline: a call to an external
//! OpenAI-compatible chat-completions backend. Failures are an explicit
//! result type, never a compliance outcome.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::config::BackendConfig;
use crate::domain::HcpContext;
use crate::prompts;

/// Generation failure taxonomy.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("backend returned an empty completion")]
    EmptyCompletion,
}

impl GenerationError {
    /// Whether a bounded retry is worthwhile.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Transport(_) => true,
            GenerationError::Backend { status, .. } => *status == 429 || *status >= 500,
            GenerationError::EmptyCompletion => false,
        }
    }
}

/// Request to the chat-completions API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat-completions API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

fn completion_text(response: ChatResponse) -> Result<String, GenerationError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(GenerationError::EmptyCompletion);
    }

    Ok(content)
}

/// Shared client for the generative text backend.
///
/// Imposes a request timeout, caps in-flight calls with a semaphore,
/// and retries transient failures with exponential backoff.
pub struct ChatBackend {
    config: BackendConfig,
    client: Client,
    permits: Semaphore,
}

impl ChatBackend {
    pub fn new(config: BackendConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let permits = Semaphore::new(config.max_concurrency.max(1));

        Self {
            config,
            client,
            permits,
        }
    }

    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.config.api_key.is_empty()
    }

    /// Run one chat completion, with bounded retries.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .expect("backend semaphore closed");

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.send_once(system, user).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self
                        .config
                        .retry_backoff_ms
                        .saturating_mul(1u64 << (attempt - 1));
                    tracing::warn!(
                        error = %e,
                        attempt,
                        delay_ms = delay,
                        "Transient backend failure, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_base))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Backend { status, body });
        }

        let chat_response: ChatResponse = response.json().await?;
        completion_text(chat_response)
    }
}

/// A generation path for one agent role.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Produce a candidate answer for an approved query.
    async fn generate(
        &self,
        query: &str,
        caller_id: &str,
        context: Option<&HcpContext>,
    ) -> Result<String, GenerationError>;
}

/// The sales strategist agent.
pub struct SalesAgent {
    backend: Arc<ChatBackend>,
}

impl SalesAgent {
    pub fn new(backend: Arc<ChatBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl ResponseGenerator for SalesAgent {
    async fn generate(
        &self,
        query: &str,
        caller_id: &str,
        context: Option<&HcpContext>,
    ) -> Result<String, GenerationError> {
        let system = prompts::sales_agent_system();
        let user = prompts::sales_agent_request(query, caller_id, context);

        self.backend.complete(&system, &user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_and_server_errors_are_transient() {
        let rate_limited = GenerationError::Backend {
            status: 429,
            body: String::new(),
        };
        let server_error = GenerationError::Backend {
            status: 503,
            body: String::new(),
        };

        assert!(rate_limited.is_transient());
        assert!(server_error.is_transient());
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        let bad_request = GenerationError::Backend {
            status: 400,
            body: String::new(),
        };

        assert!(!bad_request.is_transient());
        assert!(!GenerationError::EmptyCompletion.is_transient());
    }

    #[test]
    fn test_completion_text_extraction() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"Lead with the adherence data."}}]}"#,
        )
        .unwrap();

        assert_eq!(
            completion_text(response).unwrap(),
            "Lead with the adherence data."
        );
    }

    #[test]
    fn test_empty_completion_rejected() {
        let blank: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(matches!(
            completion_text(blank),
            Err(GenerationError::EmptyCompletion)
        ));

        let missing: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            completion_text(missing),
            Err(GenerationError::EmptyCompletion)
        ));
    }

    #[test]
    fn test_unconfigured_backend_reports_it() {
        let backend = ChatBackend::new(BackendConfig::default());
        assert!(!backend.is_configured());
    }
}
