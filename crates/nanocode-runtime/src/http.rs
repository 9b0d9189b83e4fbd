//! JSON-over-HTTP plumbing shared by both backends.

use std::time::Duration;

use nanocode_core::{AgentError, Result};
use serde_json::Value;

/// Longest response excerpt kept in error messages
const ERROR_BODY_LIMIT: usize = 2000;

/// Build the HTTP client used for model calls
pub fn client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AgentError::Config(format!("failed to build HTTP client: {e}")))
}

/// Send `body` and return the parsed JSON response.
///
/// Non-success statuses become `Auth` (401/403) or `Http` errors carrying
/// the response body.
pub async fn post_json(request: reqwest::RequestBuilder, body: &Value) -> Result<Value> {
    let response = request
        .json(body)
        .send()
        .await
        .map_err(|e| AgentError::Transport(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| AgentError::Transport(e.to_string()))?;

    if !status.is_success() {
        let body = excerpt(&text);
        return Err(match status.as_u16() {
            401 | 403 => AgentError::Auth(body),
            code => AgentError::Http { status: code, body },
        });
    }

    serde_json::from_str(&text)
        .map_err(|e| AgentError::Parse(format!("{e}: {}", excerpt(&text))))
}

fn excerpt(text: &str) -> String {
    if text.len() <= ERROR_BODY_LIMIT {
        return text.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
