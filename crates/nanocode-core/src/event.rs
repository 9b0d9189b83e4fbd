//! Display events emitted while a session runs.
//!
//! The core never prints. Frontends implement [`EventSink`] to render text,
//! tool activity and errors however they like.

use crate::error::AgentError;
use crate::message::ToolInput;

/// Receiver for everything the user should see
pub trait EventSink: Send {
    /// Narrative text from the model
    fn on_text(&mut self, text: &str);

    /// A tool is about to run
    fn on_tool_call(&mut self, name: &str, input: &ToolInput);

    /// A tool finished; `output` is exactly what goes back to the model
    fn on_tool_result(&mut self, name: &str, output: &str);

    /// The conversation was reset
    fn on_cleared(&mut self) {}

    /// A turn failed and was discarded
    fn on_error(&mut self, error: &AgentError);

    /// The model stopped requesting tools
    fn on_turn_complete(&mut self) {}
}

/// Sink that drops every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_text(&mut self, _text: &str) {}
    fn on_tool_call(&mut self, _name: &str, _input: &ToolInput) {}
    fn on_tool_result(&mut self, _name: &str, _output: &str) {}
    fn on_error(&mut self, _error: &AgentError) {}
}
