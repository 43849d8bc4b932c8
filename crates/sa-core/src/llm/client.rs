//! LLM API HTTP Client
//!
//! Supports both the Claude Messages API and OpenAI-compatible APIs
//! (GLM, etc.)

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{Config, LlmProvider};
use crate::error::{Error, Result};

use super::types::*;

/// LLM API client (supports Claude and OpenAI-compatible APIs)
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    provider: LlmProvider,
}

impl LlmClient {
    /// Create a new LLM client
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(Error::Http)?;

        let base_url = match &config.llm.base_url {
            Some(url) => url.clone(),
            None => match config.llm.provider {
                LlmProvider::Claude => "https://api.anthropic.com/v1".to_string(),
                LlmProvider::OpenAi => "https://api.openai.com/v1".to_string(),
            },
        };

        Ok(Self {
            client,
            api_key: config.llm.api_key.clone(),
            model: config.llm.model.clone(),
            base_url,
            provider: config.llm.provider.clone(),
        })
    }

    /// Create with custom base URL (for testing or custom endpoints)
    pub fn with_base_url(config: &Config, base_url: String) -> Result<Self> {
        let mut client = Self::new(config)?;
        client.base_url = base_url;
        Ok(client)
    }

    /// Send a message request to the configured provider
    pub async fn messages(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        match self.provider {
            LlmProvider::Claude => self.send_claude_request(request).await,
            LlmProvider::OpenAi => self.send_openai_request(request).await,
        }
    }

    /// Send request to the Claude API
    async fn send_claude_request(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/messages", self.base_url);

        debug!("Sending request to Claude API: {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("Claude API error: {} - {}", status, body);
            return Err(Error::Llm(format!("{}: {}", status, body)));
        }

        let parsed: MessagesResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Llm(format!("Failed to parse response: {} - {}", e, body)))?;

        info!(
            "Claude API response: stop_reason={:?}, tokens={}",
            parsed.stop_reason,
            parsed.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    /// Send request to an OpenAI-compatible API (GLM, etc.)
    async fn send_openai_request(&self, request: MessagesRequest) -> Result<MessagesResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!("Sending request to OpenAI-compatible API: {}", url);

        let openai_request = ChatCompletionRequest::from_messages_request(&request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body = response.text().await.map_err(Error::Http)?;

        if !status.is_success() {
            warn!("OpenAI API error: {} - {}", status, body);
            return Err(Error::Llm(format!("{}: {}", status, body)));
        }

        let openai_response: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Llm(format!("Failed to parse response: {} - {}", e, body)))?;

        let parsed = openai_response.to_messages_response();

        info!(
            "OpenAI API response: stop_reason={:?}, tokens={}",
            parsed.stop_reason,
            parsed.usage.as_ref().map(|u| u.output_tokens).unwrap_or(0)
        );

        Ok(parsed)
    }

    /// Get the model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the provider type
    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }
}
