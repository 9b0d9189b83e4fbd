//! OpenAI-compatible Backend
//!
//! Translates the internal message model to the Chat Completions shape and
//! back:
//!
//! | internal                          | wire                                           |
//! |-----------------------------------|------------------------------------------------|
//! | user text                         | `{role: user, content}`                        |
//! | assistant `Text`                  | `{role: assistant, content}`                   |
//! | assistant `ToolUse`               | `{role: assistant, tool_calls: [{id, function}]}` |
//! | user `ToolResult` (one per entry) | `{role: tool, tool_call_id, content}`          |
//!
//! Codex models are posted to the responses endpoint; everything else goes
//! to chat completions.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use nanocode_core::{
    AgentError, BackendKind, ChatBackend, ChatRequest, Config, ContentBlock, Message, MessageContent,
    OpenAiEndpoint, Result, Role, ToolInput, schema::openai_tools,
};

use crate::http;

/// One message in Chat Completions format
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub role: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<WireToolCall>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl WireMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            ..Self::default()
        }
    }
}

/// A function call requested by the model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,

    pub function: WireFunction,
}

/// Function name plus JSON-encoded arguments
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFunction {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".into()
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,

    /// Responses API items, used when `choices` is absent
    #[serde(default)]
    output: Vec<Value>,

    #[serde(default)]
    usage: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: WireMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

/// OpenAI translating backend
pub struct OpenAiBackend {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    endpoint: OpenAiEndpoint,
}

impl OpenAiBackend {
    /// Create from configuration; the endpoint is fixed by the model name
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            http: http::client(config.request_timeout)?,
            url: config.openai_url().to_string(),
            api_key: config.openai_api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            endpoint: config.openai_endpoint(),
        })
    }

    /// Which endpoint this backend posts to
    pub const fn endpoint(&self) -> OpenAiEndpoint {
        self.endpoint
    }

    /// Request URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request body: `{model, messages, tools, max_tokens}`
    pub fn build_body(&self, request: &ChatRequest<'_>) -> Value {
        json!({
            "model": self.model,
            "messages": to_wire_messages(request.system, request.messages),
            "tools": openai_tools(request.tools),
            "max_tokens": self.max_tokens,
        })
    }
}

/// Flatten the conversation into Chat Completions messages.
///
/// The system prompt leads as a `system` message. Block order is kept, so
/// tool results follow the calls they answer.
pub fn to_wire_messages(system: &str, messages: &[Message]) -> Vec<WireMessage> {
    let mut wire = Vec::with_capacity(messages.len() + 1);
    if !system.is_empty() {
        wire.push(WireMessage::new("system", system));
    }

    for message in messages {
        match (&message.role, &message.content) {
            (Role::User, MessageContent::Text(text)) => wire.push(WireMessage::new("user", text)),
            (role, MessageContent::Text(text)) => wire.push(WireMessage::new(&role.to_string(), text)),
            (role, MessageContent::Blocks(blocks)) => {
                for block in blocks {
                    if let Some(entry) = encode_block(*role, block) {
                        wire.push(entry);
                    }
                }
            }
        }
    }
    wire
}

fn encode_block(role: Role, block: &ContentBlock) -> Option<WireMessage> {
    match (role, block) {
        (Role::Assistant, ContentBlock::Text { text }) => Some(WireMessage::new("assistant", text)),
        (Role::Assistant, ContentBlock::ToolUse { id, name, input }) => Some(WireMessage {
            role: "assistant".into(),
            tool_calls: Some(vec![WireToolCall {
                id: Some(id.clone()),
                call_type: function_type(),
                function: WireFunction {
                    name: name.clone(),
                    arguments: Value::Object(input.clone()).to_string(),
                },
            }]),
            ..WireMessage::default()
        }),
        (Role::User, ContentBlock::ToolResult { tool_use_id, content }) => Some(WireMessage {
            role: "tool".into(),
            content: Some(content.clone()),
            tool_call_id: Some(tool_use_id.clone()),
            ..WireMessage::default()
        }),
        (Role::User, ContentBlock::Text { text }) => Some(WireMessage::new("user", text)),
        (role, block) => {
            tracing::warn!(%role, ?block, "Dropping block with no OpenAI equivalent");
            None
        }
    }
}

/// Turn one assistant wire message into content blocks.
///
/// Text (if non-empty) comes first, then one `ToolUse` per call. Arguments
/// that fail to parse as a JSON object become an empty map.
pub fn from_wire_message(message: &WireMessage) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();

    if let Some(text) = message.content.as_deref().filter(|t| !t.is_empty()) {
        blocks.push(ContentBlock::text(text));
    }

    for call in message.tool_calls.iter().flatten() {
        blocks.push(ContentBlock::tool_use(
            call.id.clone().unwrap_or_else(generated_call_id),
            call.function.name.clone(),
            parse_arguments(&call.function.name, &call.function.arguments),
        ));
    }
    blocks
}

/// Extract content blocks from a completion response
pub fn parse_response(body: Value) -> Result<Vec<ContentBlock>> {
    let response: CompletionResponse = serde_json::from_value(body)
        .map_err(|e| AgentError::Parse(format!("unexpected completion shape: {e}")))?;

    if let Some(usage) = &response.usage {
        tracing::debug!(%usage, "OpenAI usage");
    }

    if let Some(choice) = response.choices.first() {
        tracing::debug!(finish_reason = ?choice.finish_reason, "OpenAI choice");
        return Ok(from_wire_message(&choice.message));
    }

    Ok(response.output.iter().flat_map(from_output_item).collect())
}

/// Responses API output item → content blocks
fn from_output_item(item: &Value) -> Vec<ContentBlock> {
    match item["type"].as_str() {
        Some("message") => item["content"]
            .as_array()
            .into_iter()
            .flatten()
            .filter(|part| part["type"] == "output_text")
            .filter_map(|part| part["text"].as_str())
            .filter(|text| !text.is_empty())
            .map(ContentBlock::text)
            .collect(),
        Some("function_call") => {
            let name = item["name"].as_str().unwrap_or_default();
            let id = item["call_id"]
                .as_str()
                .or_else(|| item["id"].as_str())
                .map_or_else(generated_call_id, str::to_string);
            let arguments = item["arguments"].as_str().unwrap_or_default();
            vec![ContentBlock::tool_use(id, name, parse_arguments(name, arguments))]
        }
        _ => Vec::new(),
    }
}

fn parse_arguments(tool: &str, arguments: &str) -> ToolInput {
    match serde_json::from_str::<Value>(arguments) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            tracing::warn!(%tool, %other, "Tool arguments are not an object; using empty arguments");
            ToolInput::new()
        }
        Err(e) => {
            tracing::warn!(%tool, error = %e, "Unparseable tool arguments; using empty arguments");
            ToolInput::new()
        }
    }
}

fn generated_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::OpenAi
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<Vec<ContentBlock>> {
        let body = self.build_body(request);
        let builder = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json");

        let response = http::post_json(builder, &body).await?;
        parse_response(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanocode_core::ToolSpec;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn input(value: Value) -> ToolInput {
        value.as_object().cloned().unwrap()
    }

    fn backend(model: &str, base: &str) -> OpenAiBackend {
        let config = Config {
            model: model.into(),
            openai_api_key: "sk-test".into(),
            openai_chat_url: format!("{base}/v1/chat/completions"),
            openai_responses_url: format!("{base}/v1/responses"),
            ..Config::default()
        };
        OpenAiBackend::from_config(&config).unwrap()
    }

    #[test]
    fn test_outbound_mapping() {
        let messages = vec![
            Message::user("fix the bug"),
            Message::assistant(vec![
                ContentBlock::text("Looking."),
                ContentBlock::tool_use("call_1", "read", input(json!({"path": "a.rs"}))),
                ContentBlock::tool_use("call_2", "read", input(json!({"path": "b.rs"}))),
            ]),
            Message::tool_results(vec![
                ContentBlock::tool_result("call_1", "   1| fn a() {}"),
                ContentBlock::tool_result("call_2", "error: No such file"),
            ]),
        ];

        let wire = serde_json::to_value(to_wire_messages("sys", &messages)).unwrap();
        assert_eq!(
            wire,
            json!([
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "fix the bug"},
                {"role": "assistant", "content": "Looking."},
                {"role": "assistant", "tool_calls": [{
                    "id": "call_1", "type": "function",
                    "function": {"name": "read", "arguments": "{\"path\":\"a.rs\"}"}
                }]},
                {"role": "assistant", "tool_calls": [{
                    "id": "call_2", "type": "function",
                    "function": {"name": "read", "arguments": "{\"path\":\"b.rs\"}"}
                }]},
                {"role": "tool", "tool_call_id": "call_1", "content": "   1| fn a() {}"},
                {"role": "tool", "tool_call_id": "call_2", "content": "error: No such file"},
            ])
        );
    }

    #[test]
    fn test_arguments_keep_model_order() {
        let call = ContentBlock::tool_use(
            "call_3",
            "edit",
            input(json!({"path": "x.py", "old": "a", "new": "b"})),
        );
        let wire = to_wire_messages("", &[Message::assistant(vec![call])]);
        let arguments = &wire[0].tool_calls.as_ref().unwrap()[0].function.arguments;
        assert_eq!(arguments, r#"{"path":"x.py","old":"a","new":"b"}"#);
    }

    #[test]
    fn test_text_and_tool_use_round_trip() {
        let original = vec![
            ContentBlock::text("I'll edit it."),
            ContentBlock::tool_use(
                "call_7",
                "edit",
                input(json!({"path": "x.py", "old": "a", "new": "b", "all": true, "n": 3})),
            ),
        ];

        let wire = to_wire_messages("", &[Message::assistant(original.clone())]);
        let decoded: Vec<ContentBlock> = wire.iter().flat_map(from_wire_message).collect();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_inbound_first_choice() {
        let blocks = parse_response(json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": "Checking.",
                        "tool_calls": [
                            {"id": "c1", "type": "function", "function": {"name": "glob", "arguments": "{\"pat\":\"*.rs\"}"}},
                            {"id": "c2", "type": "function", "function": {"name": "bash", "arguments": "not json"}}
                        ]
                    },
                    "finish_reason": "tool_calls"
                },
                {"message": {"role": "assistant", "content": "second choice"}}
            ]
        }))
        .unwrap();

        assert_eq!(
            blocks,
            vec![
                ContentBlock::text("Checking."),
                ContentBlock::tool_use("c1", "glob", input(json!({"pat": "*.rs"}))),
                ContentBlock::tool_use("c2", "bash", ToolInput::new()),
            ]
        );
    }

    #[test]
    fn test_inbound_null_content_and_missing_id() {
        let blocks = parse_response(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{"type": "function", "function": {"name": "read", "arguments": "[1, 2]"}}]
            }}]
        }))
        .unwrap();

        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            ContentBlock::ToolUse { id, name, input } => {
                assert!(id.starts_with("call_"));
                assert_eq!(name, "read");
                assert!(input.is_empty());
            }
            other => panic!("expected tool use, got {other:?}"),
        }
    }

    #[test]
    fn test_inbound_no_choices() {
        assert!(parse_response(json!({"choices": []})).unwrap().is_empty());
    }

    #[test]
    fn test_inbound_choice_without_message() {
        let blocks = parse_response(json!({"choices": [{"finish_reason": "stop"}]})).unwrap();
        assert!(blocks.is_empty());

        let blocks = parse_response(json!({"choices": [{"message": {"content": "no role"}}]})).unwrap();
        assert_eq!(blocks, vec![ContentBlock::text("no role")]);
    }

    #[test]
    fn test_inbound_wrong_shape_is_parse_error() {
        let err = parse_response(json!({"choices": "nope"})).unwrap_err();
        assert!(matches!(err, AgentError::Parse(_)));
    }

    #[test]
    fn test_inbound_responses_output_items() {
        let blocks = parse_response(json!({
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "content": [{"type": "output_text", "text": "On it."}]},
                {"type": "function_call", "call_id": "fc_1", "name": "grep", "arguments": "{\"pat\":\"TODO\"}"}
            ]
        }))
        .unwrap();

        assert_eq!(
            blocks,
            vec![
                ContentBlock::text("On it."),
                ContentBlock::tool_use("fc_1", "grep", input(json!({"pat": "TODO"}))),
            ]
        );
    }

    #[test]
    fn test_endpoint_selection() {
        let chat = backend("gpt-4o", "http://h");
        assert_eq!(chat.endpoint(), OpenAiEndpoint::ChatCompletions);
        assert_eq!(chat.url(), "http://h/v1/chat/completions");

        let codex = backend("gpt-5-codex", "http://h");
        assert_eq!(codex.endpoint(), OpenAiEndpoint::Responses);
        assert_eq!(codex.url(), "http://h/v1/responses");
    }

    #[test]
    fn test_body_shape() {
        let backend = backend("gpt-4o", "http://h");
        let specs = vec![ToolSpec::from_signature("glob", "Find files", &[("pat", "string"), ("path", "string?")]).unwrap()];
        let body = backend.build_body(&ChatRequest::new("sys", &[], &specs));

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 8192);
        assert_eq!(body["tools"][0]["function"]["parameters"]["required"], json!(["pat"]));
        assert_eq!(body["messages"], json!([{"role": "system", "content": "sys"}]));
    }

    #[tokio::test]
    async fn test_complete_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o", "max_tokens": 8192})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "hello"}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend("gpt-4o", &server.uri());
        let messages = vec![Message::user("hi")];
        let blocks = backend
            .complete(&ChatRequest::new("sys", &messages, &[]))
            .await
            .unwrap();
        assert_eq!(blocks, vec![ContentBlock::text("hello")]);
    }

    #[tokio::test]
    async fn test_codex_posts_to_responses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "from responses"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = backend("codex-mini-latest", &server.uri());
        let messages = vec![Message::user("hi")];
        let blocks = backend
            .complete(&ChatRequest::new("sys", &messages, &[]))
            .await
            .unwrap();
        assert_eq!(blocks, vec![ContentBlock::text("from responses")]);
    }
}
