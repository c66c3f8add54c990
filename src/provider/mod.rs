//! Generation provider adapter
//!
//! Architecture: Ports and Adapters - The orchestrator consumes a single-method port
//! - `Generator` is the injection seam; orchestration logic never names a provider
//! - `OpenAiGenerator` adapts any OpenAI-compatible chat-completions endpoint
//! - Only the returned text content is interpreted; provider metadata is ignored

use crate::config::GenerationConfig;
use crate::domain::violations::{WardenError, WardenResult};
use async_trait::async_trait;
use serde_json::json;
use std::env;
use std::time::Duration;

/// The consumed generation capability: text in, text out, possibly failing.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce rewritten text from system instructions and a user prompt.
    async fn generate(
        &self,
        instructions: &str,
        prompt: &str,
        temperature: f32,
    ) -> WardenResult<String>;
}

/// Adapter for OpenAI-compatible chat-completions endpoints
#[derive(Debug)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiGenerator {
    /// Create a generator from settings and an explicit API key
    pub fn new(config: &GenerationConfig, api_key: impl Into<String>) -> WardenResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WardenError::generation(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Create a generator reading the API key from the environment variable
    /// named by the configuration
    pub fn from_env(config: &GenerationConfig) -> WardenResult<Self> {
        let api_key = env::var(&config.api_key_env).map_err(|_| {
            WardenError::generation(format!(
                "Missing API key: environment variable '{}' is not set",
                config.api_key_env
            ))
        })?;

        Self::new(config, api_key)
    }

    /// The model name this generator sends to the provider
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Generator for OpenAiGenerator {
    async fn generate(
        &self,
        instructions: &str,
        prompt: &str,
        temperature: f32,
    ) -> WardenResult<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!("Requesting completion from {} with model {}", url, self.model);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [
                    {"role": "system", "content": instructions},
                    {"role": "user", "content": prompt}
                ],
                "temperature": temperature
            }))
            .send()
            .await
            .map_err(|e| WardenError::generation(format!("Request failed: {e}")))?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| WardenError::generation(format!("Failed to read response body: {e}")))?;

        if !status.is_success() {
            return Err(WardenError::generation(format!(
                "Provider returned status {status}: {body_text}"
            )));
        }

        let body: serde_json::Value = serde_json::from_str(&body_text)
            .map_err(|e| WardenError::generation(format!("Malformed response body: {e}")))?;

        let content = body["choices"][0]["message"]["content"].as_str().ok_or_else(|| {
            WardenError::generation(format!("No text content in provider response: {body_text}"))
        })?;

        if content.trim().is_empty() {
            return Err(WardenError::generation("Provider returned empty text".to_string()));
        }

        Ok(content.to_string())
    }
}
