use crate::config::Config;
use crate::logging::{log_event, LogCategory, LogLevel};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use colored::*;
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt;
use std::time::Duration;

/// One generation request: the full prompt plus sampling parameters.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
}

/// Failure classes at the transport boundary.
///
/// Only `Connection` is retryable; HTTP error statuses and malformed bodies
/// are deliberately surfaced as-is so service-side problems are not hammered
/// with retries.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// Connection-level failure (unreachable host, refused, timed out)
    Connection(String),
    /// HTTP error status with the raw response body
    Status(u16, String),
    /// Response body could not be parsed
    Malformed(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connection(msg) => write!(f, "connection failure: {}", msg),
            TransportError::Status(code, body) => write!(f, "HTTP {}: {}", code, body),
            TransportError::Malformed(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Connection(_))
    }
}

/// Seam between the completion client and the generation service.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one chat request and return the raw response body.
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError>;
}

/// Production transport: OpenAI-compatible chat-completions endpoint.
pub struct HttpTransport {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(api_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<Value, TransportError> {
        let body = json!({
            "model": request.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "temperature": request.temperature,
        });

        let mut builder = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                TransportError::Connection(e.to_string())
            } else {
                TransportError::Malformed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(TransportError::Status(status.as_u16(), text));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

/// Bounded retry-with-backoff for connection failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_secs(config.backoff_base_secs),
            Duration::from_secs(config.backoff_cap_secs),
        )
    }

    /// Exponential delay before the next attempt: min(base * 2^(n-1), cap)
    /// where `completed_attempts` counts attempts already made.
    pub fn delay_after(&self, completed_attempts: u32) -> Duration {
        let factor = 2u32.saturating_pow(completed_attempts.saturating_sub(1));
        let delay = self.base_delay.saturating_mul(factor);
        delay.min(self.max_delay)
    }
}

/// Client that turns a prompt into an executable command string.
pub struct CompletionClient {
    transport: Box<dyn ChatTransport>,
    retry: RetryPolicy,
    model: String,
    temperature: f32,
}

impl CompletionClient {
    pub fn new(
        transport: Box<dyn ChatTransport>,
        retry: RetryPolicy,
        model: String,
        temperature: f32,
    ) -> Self {
        Self {
            transport,
            retry,
            model,
            temperature,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let transport = HttpTransport::new(
            config.api_url.clone(),
            config.api_key(),
            Duration::from_millis(config.request_timeout_ms),
        );
        Self::new(
            Box::new(transport),
            RetryPolicy::from_config(config),
            config.model.clone(),
            config.temperature,
        )
    }

    /// Request a shell command for the given prompt.
    ///
    /// Connection failures are retried with backoff; exhausting the attempts
    /// surfaces a network error. HTTP errors and malformed or empty responses
    /// are never retried: the raw response is shown for diagnosis and an
    /// empty command is returned so the caller reports "no valid command".
    pub async fn request_command(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            temperature: self.temperature,
        };

        let mut attempts = 0u32;
        loop {
            attempts += 1;
            match self.transport.send(&request).await {
                Ok(body) => return Ok(self.command_from_body(&body)),
                Err(err) if err.is_retryable() => {
                    log_event(
                        LogLevel::Warning,
                        LogCategory::Network,
                        &format!("Attempt {} failed: {}", attempts, err),
                    );
                    if attempts >= self.retry.max_attempts {
                        return Err(anyhow!(
                            "Failed to reach the generation service after {} attempts: {}",
                            attempts,
                            err
                        ));
                    }
                    tokio::time::sleep(self.retry.delay_after(attempts)).await;
                }
                Err(err) => {
                    // Service-side problem: show the raw response, don't retry.
                    eprintln!("{} {}", "Unusable API response:".yellow(), err);
                    log_event(
                        LogLevel::Error,
                        LogCategory::Completion,
                        &format!("Non-retryable response: {}", err),
                    );
                    return Ok(String::new());
                }
            }
        }
    }

    fn command_from_body(&self, body: &Value) -> String {
        match body["choices"][0]["message"]["content"].as_str() {
            Some(content) if !content.trim().is_empty() => extract_command(content),
            _ => {
                eprintln!(
                    "{}",
                    "Error: No valid command found in API response.".yellow()
                );
                log_event(
                    LogLevel::Error,
                    LogCategory::Completion,
                    "Response carried no usable choices payload",
                );
                String::new()
            }
        }
    }
}

/// Extract the command from a completion, unwrapping fenced code if present.
///
/// A ```bash fence wins over a generic fence; with neither, the trimmed
/// completion passes through whole. Only the first fence pair is honored.
pub fn extract_command(completion: &str) -> String {
    let text = completion.trim();

    if let Some(start) = text.find("```bash") {
        let after = &text[start + "```bash".len()..];
        let inner = match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        };
        return inner.trim().to_string();
    }

    if let Some(start) = text.find("```") {
        let after = &text[start + "```".len()..];
        let inner = match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        };
        return inner.trim().to_string();
    }

    text.to_string()
}
