//! # nanocode-runtime
//!
//! HTTP chat backends for nanocode.
//!
//! ## Backends
//!
//! - **Anthropic**: Messages API, conversation passed through as-is
//! - **OpenAI**: Chat Completions (or Responses for codex models), with
//!   translation to and from the internal message model
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nanocode_runtime::connect;
//!
//! let backend = connect(&Config::from_env()?)?;
//! let agent = AgentBuilder::new().backend(backend).build()?;
//! ```

pub mod anthropic;
mod http;
pub mod openai;

use std::sync::Arc;

use nanocode_core::{BackendKind, ChatBackend, Config, Result};

pub use anthropic::AnthropicBackend;
pub use openai::OpenAiBackend;

/// Pick and construct the backend for `config.model`.
///
/// A missing credential is not fatal here; the first request will fail with
/// an authentication error instead.
pub fn connect(config: &Config) -> Result<Arc<dyn ChatBackend>> {
    let kind = config.backend_kind();
    let key = match kind {
        BackendKind::Anthropic => &config.anthropic_api_key,
        BackendKind::OpenAi => &config.openai_api_key,
    };
    if key.is_empty() {
        tracing::warn!(?kind, model = %config.model, "No API key configured for backend");
    }

    let backend: Arc<dyn ChatBackend> = match kind {
        BackendKind::Anthropic => Arc::new(AnthropicBackend::from_config(config)?),
        BackendKind::OpenAi => Arc::new(OpenAiBackend::from_config(config)?),
    };
    tracing::info!(?kind, model = %config.model, "Backend selected");
    Ok(backend)
}
