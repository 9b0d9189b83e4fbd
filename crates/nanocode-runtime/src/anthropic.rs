//! Anthropic Messages Backend
//!
//! The internal message model already has the Messages API shape, so
//! requests carry the conversation unchanged and response content blocks
//! are used as they arrive.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use nanocode_core::{
    AgentError, BackendKind, ChatBackend, ChatRequest, Config, ContentBlock, Result, schema::anthropic_tools,
};

use crate::http;

/// Date-versioned API marker sent with every request
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic passthrough backend
pub struct AnthropicBackend {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<Value>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl AnthropicBackend {
    /// Create from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            http: http::client(config.request_timeout)?,
            url: config.anthropic_url.clone(),
            api_key: config.anthropic_api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Request body: `{model, max_tokens, system, messages, tools}`
    pub fn build_body(&self, request: &ChatRequest<'_>) -> Value {
        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "system": request.system,
            "messages": request.messages,
            "tools": anthropic_tools(request.tools),
        })
    }

    /// Extract content blocks from a Messages API response
    pub fn parse_response(body: Value) -> Result<Vec<ContentBlock>> {
        let response: MessagesResponse = serde_json::from_value(body)
            .map_err(|e| AgentError::Parse(format!("unexpected messages shape: {e}")))?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = ?response.stop_reason,
                "Anthropic usage"
            );
        }

        Ok(response
            .content
            .into_iter()
            .filter_map(|raw| match serde_json::from_value::<ContentBlock>(raw.clone()) {
                Ok(block) => Some(block),
                Err(_) => {
                    tracing::debug!(block_type = %raw["type"], "Skipping unsupported content block");
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl ChatBackend for AnthropicBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<Vec<ContentBlock>> {
        let body = self.build_body(request);
        let builder = self
            .http
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json");

        let response = http::post_json(builder, &body).await?;
        Self::parse_response(response)
    }
}
