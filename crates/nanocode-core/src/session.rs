//! Session Controller
//!
//! Owns the conversation and drives the turn-taking state machine:
//!
//! ```text
//! AwaitingUserInput ─► AwaitingModel ─► InterpretingResponse ─┬─► Idle
//!                           ▲                                 │
//!                           └──────── DispatchingTools ◄──────┘
//! ```
//!
//! A turn ends when the model answers without requesting any tool. Tool
//! calls run one at a time, in the order the model emitted them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::event::EventSink;
use crate::message::{ContentBlock, Conversation, Message};
use crate::reasoning::Agent;

/// Unique session identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the controller is in a turn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    AwaitingUserInput,
    AwaitingModel,
    InterpretingResponse,
    DispatchingTools,
    /// Last turn finished; nothing in flight
    Idle,
}

/// Parsed line of user input
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Blank line
    Empty,
    /// `/c`: reset the conversation
    Clear,
    /// `/q` or `exit`
    Quit,
    /// Anything else goes to the model
    Prompt(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "/c" => Self::Clear,
            "/q" | "exit" => Self::Quit,
            prompt => Self::Prompt(prompt.to_string()),
        }
    }
}

/// Whether the REPL keeps going after a line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One event from the input side
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// End of input (Ctrl-D, closed pipe)
    Eof,
    /// Ctrl-C at the prompt
    Interrupted,
}

/// Source of user input lines
#[async_trait]
pub trait InputSource: Send {
    /// Block until the user enters a line
    async fn next_line(&mut self) -> Result<InputEvent>;
}

/// Counters for one completed turn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TurnSummary {
    pub model_calls: usize,
    pub tool_calls: usize,
}

/// An interactive agent session
pub struct Session {
    id: SessionId,
    agent: Agent,
    conversation: Conversation,
    state: SessionState,
    started_at: DateTime<Utc>,
    turns: usize,
}

impl Session {
    /// Create a new session
    pub fn new(agent: Agent) -> Self {
        Self {
            id: SessionId::new(),
            agent,
            conversation: Conversation::new(),
            state: SessionState::AwaitingUserInput,
            started_at: Utc::now(),
            turns: 0,
        }
    }

    pub const fn id(&self) -> &SessionId {
        &self.id
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Completed turns so far
    pub const fn turns(&self) -> usize {
        self.turns
    }

    /// Drop the whole conversation; no network call
    pub fn clear(&mut self) {
        self.conversation.clear();
        self.state = SessionState::AwaitingUserInput;
        tracing::debug!(session = %self.id, "Conversation cleared");
    }

    /// Handle one line of user input.
    ///
    /// Turn failures are reported through `sink` and do not stop the session.
    pub async fn handle_line(&mut self, line: &str, sink: &mut dyn EventSink) -> Flow {
        match Command::parse(line) {
            Command::Empty => Flow::Continue,
            Command::Quit => Flow::Quit,
            Command::Clear => {
                self.clear();
                sink.on_cleared();
                Flow::Continue
            }
            Command::Prompt(prompt) => {
                if let Err(e) = self.run_turn(&prompt, sink).await {
                    tracing::warn!(session = %self.id, error = %e, "Turn failed");
                    sink.on_error(&e);
                }
                Flow::Continue
            }
        }
    }

    /// Run one full turn for `prompt`.
    ///
    /// On error the conversation is restored to what it was before the
    /// turn, so no unanswered tool call is left behind.
    pub async fn run_turn(&mut self, prompt: &str, sink: &mut dyn EventSink) -> Result<TurnSummary> {
        let checkpoint = self.conversation.len();
        self.conversation.push(Message::user(prompt));

        let result = self.agentic_loop(sink).await;
        match &result {
            Ok(summary) => {
                self.turns += 1;
                self.state = SessionState::Idle;
                tracing::debug!(
                    session = %self.id,
                    model_calls = summary.model_calls,
                    tool_calls = summary.tool_calls,
                    "Turn complete"
                );
            }
            Err(_) => {
                self.conversation.truncate(checkpoint);
                self.state = SessionState::AwaitingUserInput;
            }
        }
        result
    }

    async fn agentic_loop(&mut self, sink: &mut dyn EventSink) -> Result<TurnSummary> {
        let mut summary = TurnSummary::default();

        loop {
            self.agent.check_iterations(summary.model_calls)?;

            self.state = SessionState::AwaitingModel;
            let blocks = self.agent.call_model(&self.conversation).await?;
            summary.model_calls += 1;

            self.state = SessionState::InterpretingResponse;
            let mut results = Vec::new();
            for block in &blocks {
                match block {
                    ContentBlock::Text { text } => sink.on_text(text),
                    ContentBlock::ToolUse { id, name, input } => {
                        self.state = SessionState::DispatchingTools;
                        results.push(self.agent.run_tool(id, name, input, sink).await);
                        self.state = SessionState::InterpretingResponse;
                    }
                    ContentBlock::ToolResult { tool_use_id, .. } => {
                        tracing::warn!(%tool_use_id, "Ignoring tool_result block in model output");
                    }
                }
            }
            summary.tool_calls += results.len();

            if !blocks.is_empty() {
                self.conversation.push(Message::assistant(blocks));
            }

            if results.is_empty() {
                sink.on_turn_complete();
                return Ok(summary);
            }
            self.conversation.push(Message::tool_results(results));
        }
    }

    /// Read lines from `input` until quit, end of input or interrupt
    pub async fn run<I>(&mut self, input: &mut I, sink: &mut dyn EventSink) -> Result<()>
    where
        I: InputSource + ?Sized,
    {
        tracing::info!(
            session = %self.id,
            model = %self.agent.backend().model(),
            tools = self.agent.tools().len(),
            "Session started"
        );

        loop {
            self.state = SessionState::AwaitingUserInput;
            let line = match input.next_line().await? {
                InputEvent::Line(line) => line,
                InputEvent::Eof | InputEvent::Interrupted => break,
            };
            if self.handle_line(&line, sink).await == Flow::Quit {
                break;
            }
        }

        tracing::info!(
            session = %self.id,
            turns = self.turns,
            duration_secs = (Utc::now() - self.started_at).num_seconds(),
            "Session ended"
        );
        Ok(())
    }
}
