//! Chat Backend Strategy
//!
//! One interface over the two wire protocols. A backend is constructed once
//! from the resolved configuration; the agent never branches on provider.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use nanocode_core::provider::{ChatBackend, ChatRequest};
//!
//! let backend = nanocode_runtime::connect(&config)?;
//! let blocks = backend.complete(&ChatRequest::new(system, messages, &specs)).await?;
//! ```

use async_trait::async_trait;

use crate::config::BackendKind;
use crate::error::Result;
use crate::message::{ContentBlock, Message};
use crate::tool::ToolSpec;

/// Everything a backend needs for one model call
#[derive(Clone, Copy, Debug)]
pub struct ChatRequest<'a> {
    /// System prompt
    pub system: &'a str,

    /// Full conversation so far
    pub messages: &'a [Message],

    /// Tools the model may call
    pub tools: &'a [ToolSpec],
}

impl<'a> ChatRequest<'a> {
    pub const fn new(system: &'a str, messages: &'a [Message], tools: &'a [ToolSpec]) -> Self {
        Self {
            system,
            messages,
            tools,
        }
    }
}

/// Strategy trait for model backends
///
/// Implementations translate the internal message model to their wire
/// format, perform one blocking round-trip, and normalize the reply into
/// content blocks in the order the model produced them.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Protocol family this backend speaks
    fn kind(&self) -> BackendKind;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Send the conversation and return the model's content blocks
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<Vec<ContentBlock>>;
}
