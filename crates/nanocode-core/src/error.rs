//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Request never produced a response (connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Credentials rejected by the backend
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tool not found in registry
    #[error("unknown tool: {0}")]
    ToolNotFound(String),

    /// Tool arguments do not match the tool's parameters
    #[error("invalid arguments: {0}")]
    ToolValidation(String),

    /// Tool ran and failed; the message is shown to the model verbatim
    #[error("{0}")]
    ToolExecution(String),

    /// Maximum model round-trips reached in one turn
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(msg) => format!("Could not reach the model API: {msg}"),
            Self::Http { status: 429, .. } => {
                "The model API is rate limiting requests. Please wait a moment.".into()
            }
            Self::Http { status, body } => format!("The model API returned {status}: {body}"),
            Self::Auth(_) => "Authentication failed. Please check your API key.".into(),
            Self::Parse(msg) => format!("Unexpected response from the model API: {msg}"),
            Self::MaxIterations(n) => {
                format!("Stopped after {n} model calls without a final answer.")
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        assert_eq!(
            AgentError::Auth("401".into()).user_message(),
            "Authentication failed. Please check your API key."
        );
        assert_eq!(
            AgentError::Http { status: 500, body: "boom".into() }.user_message(),
            "The model API returned 500: boom"
        );
    }

    #[test]
    fn test_tool_errors_display_plainly() {
        assert_eq!(AgentError::ToolNotFound("fly".into()).to_string(), "unknown tool: fly");
        assert_eq!(
            AgentError::ToolExecution("old_string not found".into()).to_string(),
            "old_string not found"
        );
    }
}
