//! Conversation Messages
//!
//! Provider-agnostic message format used across the agent system. The
//! serialized form matches the Anthropic Messages API, so the passthrough
//! backend can send it unchanged; the translating backend maps it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments of a tool call, as produced by the model
pub type ToolInput = serde_json::Map<String, Value>;

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Human input or tool results fed back to the model
    User,
    /// Model output
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One unit of conversation content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Narrative text from the model
    Text { text: String },

    /// A request from the model to run a tool
    ToolUse {
        id: String,
        name: String,
        input: ToolInput,
    },

    /// The outcome of a previous `ToolUse`, matched by id
    ToolResult { tool_use_id: String, content: String },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(id: impl Into<String>, name: impl Into<String>, input: ToolInput) -> Self {
        Self::ToolUse {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
        }
    }

    /// Whether this block asks for a tool to be run
    pub const fn is_tool_use(&self) -> bool {
        matches!(self, Self::ToolUse { .. })
    }
}

/// Borrowed view of a `ToolUse` block
#[derive(Clone, Copy, Debug)]
pub struct ToolUse<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub input: &'a ToolInput,
}

/// Message body: plain human text or an ordered block sequence
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Text or content blocks
    pub content: MessageContent,
}

impl Message {
    /// Create a user message from human input
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(content.into()),
        }
    }

    /// Create an assistant message from the blocks the model returned
    pub fn assistant(blocks: Vec<ContentBlock>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Blocks(blocks),
        }
    }

    /// Create the user message that answers a round of tool calls.
    ///
    /// Only `ToolResult` blocks belong here; they must appear in the same
    /// order as the `ToolUse` blocks they answer.
    pub fn tool_results(results: Vec<ContentBlock>) -> Self {
        debug_assert!(
            results
                .iter()
                .all(|b| matches!(b, ContentBlock::ToolResult { .. }))
        );
        Self {
            role: Role::User,
            content: MessageContent::Blocks(results),
        }
    }

    /// Content blocks, empty for plain text messages
    pub fn blocks(&self) -> &[ContentBlock] {
        match &self.content {
            MessageContent::Text(_) => &[],
            MessageContent::Blocks(blocks) => blocks,
        }
    }

    /// Tool calls in this message, in the order the model emitted them
    pub fn tool_uses(&self) -> Vec<ToolUse<'_>> {
        self.blocks()
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolUse { id, name, input }),
                _ => None,
            })
            .collect()
    }

    /// All text in the message, joined with newlines
    pub fn text(&self) -> Option<String> {
        match &self.content {
            MessageContent::Text(text) => Some(text.clone()),
            MessageContent::Blocks(blocks) => {
                let parts: Vec<&str> = blocks
                    .iter()
                    .filter_map(|b| match b {
                        ContentBlock::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join("\n"))
                }
            }
        }
    }

    /// Estimate token count (rough approximation)
    pub fn estimate_tokens(&self) -> u32 {
        let chars = match &self.content {
            MessageContent::Text(text) => text.len(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .map(|b| match b {
                    ContentBlock::Text { text } => text.len(),
                    ContentBlock::ToolUse { name, input, .. } => {
                        name.len() + Value::Object(input.clone()).to_string().len()
                    }
                    ContentBlock::ToolResult { content, .. } => content.len(),
                })
                .sum(),
        };
        // ~4 characters per token, +4 for role overhead
        u32::try_from(chars / 4).unwrap_or(u32::MAX).saturating_add(4)
    }
}

/// Conversation history, owned by the session
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Drop every message
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Drop messages past `len`, used to discard an aborted turn
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    /// Estimate total tokens in conversation
    pub fn estimate_tokens(&self) -> u32 {
        self.messages.iter().map(Message::estimate_tokens).sum()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_serializes_as_plain_string() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({"role": "user", "content": "Hello"})
        );
    }

    #[test]
    fn test_assistant_blocks_wire_shape() {
        let mut input = ToolInput::new();
        input.insert("path".into(), json!("src/main.rs"));
        let msg = Message::assistant(vec![
            ContentBlock::text("Reading it."),
            ContentBlock::tool_use("toolu_1", "read", input),
        ]);

        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "role": "assistant",
                "content": [
                    {"type": "text", "text": "Reading it."},
                    {"type": "tool_use", "id": "toolu_1", "name": "read", "input": {"path": "src/main.rs"}}
                ]
            })
        );
    }

    #[test]
    fn test_tool_results_deserialize() {
        let raw = json!({
            "role": "user",
            "content": [{"type": "tool_result", "tool_use_id": "toolu_1", "content": "ok"}]
        });
        let msg: Message = serde_json::from_value(raw).unwrap();
        assert_eq!(msg, Message::tool_results(vec![ContentBlock::tool_result("toolu_1", "ok")]));
    }

    #[test]
    fn test_tool_uses_preserve_order() {
        let msg = Message::assistant(vec![
            ContentBlock::tool_use("a", "glob", ToolInput::new()),
            ContentBlock::text("then"),
            ContentBlock::tool_use("b", "grep", ToolInput::new()),
        ]);
        let ids: Vec<&str> = msg.tool_uses().iter().map(|t| t.id).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(msg.text().as_deref(), Some("then"));
    }

    #[test]
    fn test_conversation_clear_and_truncate() {
        let mut conv = Conversation::new();
        conv.push(Message::user("Hi"));
        conv.push(Message::assistant(vec![ContentBlock::text("Hello!")]));
        conv.push(Message::user("More"));

        conv.truncate(2);
        assert_eq!(conv.len(), 2);
        assert_eq!(conv.last().unwrap().role, Role::Assistant);

        conv.clear();
        assert!(conv.is_empty());
    }
}
