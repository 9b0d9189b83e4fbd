//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::BackendKind;
use crate::error::{AgentError, Result};
use crate::event::EventSink;
use crate::message::{ContentBlock, Message, ToolInput};
use crate::provider::{ChatBackend, ChatRequest};
use crate::tool::{Tool, ToolSpec, parse_args};

/// What the backend saw on one call
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<String>,
}

/// Backend that replays canned responses in order
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<Vec<ContentBlock>>>>,
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<Vec<ContentBlock>>) -> Arc<Self> {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<Vec<ContentBlock>>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(results.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Anthropic
    }

    fn model(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ChatRequest<'_>) -> Result<Vec<ContentBlock>> {
        self.seen.lock().unwrap().push(SeenRequest {
            system: request.system.to_string(),
            messages: request.messages.to_vec(),
            tools: request.tools.iter().map(|t| t.name.clone()).collect(),
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Other("script exhausted".into())))
    }
}

/// Returns its `text` argument
pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::from_signature("echo", "Echo text back", &[("text", "string")]).unwrap()
    }

    async fn execute(&self, args: &ToolInput) -> Result<String> {
        #[derive(serde::Deserialize)]
        struct Args {
            text: String,
        }
        let args: Args = parse_args(args)?;
        Ok(args.text)
    }
}

/// Sink that keeps a log of events
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<String>,
}

impl EventSink for RecordingSink {
    fn on_text(&mut self, text: &str) {
        self.events.push(format!("text:{text}"));
    }

    fn on_tool_call(&mut self, name: &str, _input: &ToolInput) {
        self.events.push(format!("call:{name}"));
    }

    fn on_tool_result(&mut self, name: &str, output: &str) {
        self.events.push(format!("result:{name}:{output}"));
    }

    fn on_cleared(&mut self) {
        self.events.push("cleared".into());
    }

    fn on_error(&mut self, error: &AgentError) {
        self.events.push(format!("error:{error}"));
    }

    fn on_turn_complete(&mut self) {
        self.events.push("done".into());
    }
}

/// Build a tool input map from a JSON object literal
pub fn input(value: serde_json::Value) -> ToolInput {
    value.as_object().cloned().unwrap_or_default()
}
