//! Configuration
//!
//! Built once at startup from the environment and passed by reference into
//! the backend factory and the agent.

use std::time::Duration;

use crate::error::{AgentError, Result};

pub const DEFAULT_MODEL: &str = "claude-opus-4-5";
pub const DEFAULT_MAX_TOKENS: u32 = 8192;
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// Wire protocol family, decided by model name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Anthropic Messages API; internal messages are sent as-is
    Anthropic,
    /// OpenAI-compatible API; messages are translated
    OpenAi,
}

impl BackendKind {
    /// `claude*` and `anthropic*` (any case) select Anthropic, everything else OpenAI
    pub fn for_model(model: &str) -> Self {
        let model = model.to_lowercase();
        if model.starts_with("claude") || model.starts_with("anthropic") {
            Self::Anthropic
        } else {
            Self::OpenAi
        }
    }
}

/// OpenAI endpoint, decided by model name
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenAiEndpoint {
    ChatCompletions,
    /// Codex models are only served from the responses endpoint
    Responses,
}

impl OpenAiEndpoint {
    pub fn for_model(model: &str) -> Self {
        if model.to_lowercase().contains("codex") {
            Self::Responses
        } else {
            Self::ChatCompletions
        }
    }
}

/// Runtime configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Model identifier; selects backend and endpoint
    pub model: String,

    /// Maximum tokens to generate per response
    pub max_tokens: u32,

    pub anthropic_api_key: String,
    pub anthropic_url: String,

    pub openai_api_key: String,
    pub openai_chat_url: String,
    pub openai_responses_url: String,

    /// Wall-clock limit for one `bash` invocation
    pub bash_timeout: Duration,

    /// HTTP request timeout for model calls
    pub request_timeout: Duration,

    /// Cap on model round-trips per turn (`None` = unbounded)
    pub max_iterations: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            anthropic_api_key: String::new(),
            anthropic_url: ANTHROPIC_API_URL.into(),
            openai_api_key: String::new(),
            openai_chat_url: OPENAI_CHAT_URL.into(),
            openai_responses_url: OPENAI_RESPONSES_URL.into(),
            bash_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(300),
            max_iterations: None,
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            model: get("MODEL").unwrap_or(defaults.model),
            max_tokens: parse_number(&get, "NANOCODE_MAX_TOKENS")?.unwrap_or(defaults.max_tokens),
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").unwrap_or_default(),
            anthropic_url: get("ANTHROPIC_API_URL").unwrap_or(defaults.anthropic_url),
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            openai_chat_url: get("OPENAI_CHAT_URL").unwrap_or(defaults.openai_chat_url),
            openai_responses_url: get("OPENAI_RESPONSES_URL")
                .unwrap_or(defaults.openai_responses_url),
            bash_timeout: parse_number(&get, "NANOCODE_BASH_TIMEOUT_SECS")?
                .map_or(defaults.bash_timeout, Duration::from_secs),
            request_timeout: parse_number(&get, "NANOCODE_REQUEST_TIMEOUT_SECS")?
                .map_or(defaults.request_timeout, Duration::from_secs),
            max_iterations: parse_number(&get, "NANOCODE_MAX_ITERATIONS")?,
        })
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn backend_kind(&self) -> BackendKind {
        BackendKind::for_model(&self.model)
    }

    pub fn openai_endpoint(&self) -> OpenAiEndpoint {
        OpenAiEndpoint::for_model(&self.model)
    }

    /// URL the OpenAI backend posts to for this model
    pub fn openai_url(&self) -> &str {
        match self.openai_endpoint() {
            OpenAiEndpoint::ChatCompletions => &self.openai_chat_url,
            OpenAiEndpoint::Responses => &self.openai_responses_url,
        }
    }
}

fn parse_number<T, G>(get: &G, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| AgentError::Config(format!("{key}={raw}: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.model, "claude-opus-4-5");
        assert_eq!(config.max_tokens, 8192);
        assert_eq!(config.bash_timeout, Duration::from_secs(30));
        assert_eq!(config.max_iterations, None);
        assert_eq!(config.backend_kind(), BackendKind::Anthropic);
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("MODEL", "gpt-5-codex"),
            ("OPENAI_API_KEY", "sk-test"),
            ("NANOCODE_MAX_ITERATIONS", "25"),
            ("NANOCODE_BASH_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();

        assert_eq!(config.backend_kind(), BackendKind::OpenAi);
        assert_eq!(config.openai_endpoint(), OpenAiEndpoint::Responses);
        assert_eq!(config.openai_url(), OPENAI_RESPONSES_URL);
        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.max_iterations, Some(25));
        assert_eq!(config.bash_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_bad_number_is_config_error() {
        let err = Config::from_lookup(lookup(&[("NANOCODE_MAX_TOKENS", "lots")])).unwrap_err();
        assert!(matches!(err, AgentError::Config(msg) if msg.contains("NANOCODE_MAX_TOKENS")));
    }

    #[test]
    fn test_backend_selection() {
        for model in ["claude-opus-4-5", "Claude-3-haiku", "ANTHROPIC/claude", "anthropic-x"] {
            assert_eq!(BackendKind::for_model(model), BackendKind::Anthropic, "{model}");
        }
        for model in ["gpt-4o", "o3", "my-claude", "codex-mini", ""] {
            assert_eq!(BackendKind::for_model(model), BackendKind::OpenAi, "{model}");
        }
    }

    #[test]
    fn test_codex_routes_to_responses() {
        assert_eq!(OpenAiEndpoint::for_model("gpt-5-Codex"), OpenAiEndpoint::Responses);
        assert_eq!(OpenAiEndpoint::for_model("codex-mini-latest"), OpenAiEndpoint::Responses);
        assert_eq!(OpenAiEndpoint::for_model("gpt-4o"), OpenAiEndpoint::ChatCompletions);
    }
}
