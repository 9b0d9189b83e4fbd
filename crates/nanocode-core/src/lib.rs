//! # nanocode-core
//!
//! Provider-agnostic conversation model, tool registry and the agentic loop.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Session                              │
//! │  ┌──────────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │ Conversation │  │ ToolRegistry │  │    ChatBackend      │  │
//! │  │  (messages)  │──│  + dispatch  │──│ (Anthropic/OpenAI)  │  │
//! │  └──────────────┘  └──────────────┘  └─────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `ChatBackend` trait hides which wire protocol is in use; both
//! implementations live in `nanocode-runtime`.

pub mod config;
pub mod error;
pub mod event;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod schema;
pub mod session;
pub mod tool;

#[cfg(test)]
mod test_support;

pub use config::{BackendKind, Config, OpenAiEndpoint};
pub use error::{AgentError, Result};
pub use event::{EventSink, NullSink};
pub use message::{ContentBlock, Conversation, Message, MessageContent, Role, ToolInput};
pub use provider::{ChatBackend, ChatRequest};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use session::{Command, Flow, InputEvent, InputSource, Session, SessionState};
pub use tool::{ParamType, ParameterSpec, Tool, ToolRegistry, ToolSpec};
