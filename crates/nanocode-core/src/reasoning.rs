//! Agent
//!
//! The two actions the session loop alternates between: asking the model for
//! the next response, and running the tools that response asked for.

use std::path::Path;
use std::sync::Arc;

use tokio::time::Instant;

use crate::config::Config;
use crate::error::{AgentError, Result};
use crate::event::EventSink;
use crate::message::{ContentBlock, Conversation, ToolInput};
use crate::provider::{ChatBackend, ChatRequest};
use crate::tool::{ToolRegistry, ToolSpec};

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt sent with every request
    pub system_prompt: String,

    /// Maximum model calls per turn (`None` = unbounded)
    pub max_iterations: Option<usize>,
}

impl AgentConfig {
    /// Default configuration for an agent working in `cwd`
    pub fn for_cwd(cwd: &Path) -> Self {
        Self {
            system_prompt: system_prompt(cwd),
            max_iterations: None,
        }
    }

    /// Take the iteration cap from runtime configuration
    pub fn from_config(config: &Config, cwd: &Path) -> Self {
        Self {
            max_iterations: config.max_iterations,
            ..Self::for_cwd(cwd)
        }
    }
}

/// The static system prompt, naming the working directory
pub fn system_prompt(cwd: &Path) -> String {
    format!("Concise coding assistant. cwd: {}", cwd.display())
}

/// Model backend plus tools
pub struct Agent {
    backend: Arc<dyn ChatBackend>,
    tools: Arc<ToolRegistry>,
    specs: Vec<ToolSpec>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(backend: Arc<dyn ChatBackend>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        let specs = tools.specs();
        Self {
            backend,
            tools,
            specs,
            config,
        }
    }

    /// Send the whole conversation and wait for the model's blocks
    pub async fn call_model(&self, conversation: &Conversation) -> Result<Vec<ContentBlock>> {
        let request = ChatRequest::new(&self.config.system_prompt, conversation.messages(), &self.specs);
        let started = Instant::now();

        tracing::debug!(
            model = %self.backend.model(),
            messages = conversation.len(),
            est_tokens = conversation.estimate_tokens(),
            "Calling model"
        );

        let blocks = self.backend.complete(&request).await?;

        tracing::debug!(
            blocks = blocks.len(),
            tool_uses = blocks.iter().filter(|b| b.is_tool_use()).count(),
            elapsed = ?started.elapsed(),
            "Model responded"
        );
        Ok(blocks)
    }

    /// Run one tool call and return the `ToolResult` block answering it
    pub async fn run_tool(
        &self,
        id: &str,
        name: &str,
        input: &ToolInput,
        sink: &mut dyn EventSink,
    ) -> ContentBlock {
        sink.on_tool_call(name, input);
        let output = self.tools.dispatch(name, input).await;
        sink.on_tool_result(name, &output);
        ContentBlock::tool_result(id, output)
    }

    /// Fail once `calls` model calls have been made and the cap is reached
    pub fn check_iterations(&self, calls: usize) -> Result<()> {
        match self.config.max_iterations {
            Some(max) if calls >= max => Err(AgentError::MaxIterations(max)),
            _ => Ok(()),
        }
    }

    /// Get the backend
    pub fn backend(&self) -> &dyn ChatBackend {
        self.backend.as_ref()
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    backend: Option<Arc<dyn ChatBackend>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self {
            backend: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::for_cwd(&cwd),
        }
    }

    pub fn backend(mut self, backend: Arc<dyn ChatBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    /// Replace the whole agent configuration
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn max_iterations(mut self, max: Option<usize>) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let backend = self
            .backend
            .ok_or_else(|| AgentError::Config("Backend is required".into()))?;

        Ok(Agent::new(backend, Arc::new(self.tools), self.config))
    }
}
