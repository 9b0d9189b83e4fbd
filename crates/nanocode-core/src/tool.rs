//! Tool System
//!
//! Tools are registered once at startup and shared read-only by the schema
//! generator and the dispatcher. Dispatch never fails: every outcome,
//! including unknown tools and tool errors, becomes a string that can be
//! handed back to the model.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Instant;

use crate::error::{AgentError, Result};
use crate::message::ToolInput;

/// Prefix marking a tool result as a failure
pub const ERROR_PREFIX: &str = "error: ";

/// Primitive parameter type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    /// Declared as "number"; all numeric parameters are integers
    Integer,
    Boolean,
}

impl ParamType {
    /// JSON Schema type name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }

    fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
        }
    }
}

impl std::str::FromStr for ParamType {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(Self::String),
            "number" | "integer" => Ok(Self::Integer),
            "boolean" => Ok(Self::Boolean),
            other => Err(AgentError::Config(format!("unsupported parameter type: {other}"))),
        }
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name
    pub name: String,

    /// Primitive type
    #[serde(rename = "type")]
    pub param_type: ParamType,

    /// Whether this parameter is required
    pub required: bool,
}

impl ParameterSpec {
    pub fn required(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            required: false,
        }
    }

    /// Parse a compact signature such as `"string"` or `"number?"`.
    ///
    /// A trailing `?` marks the parameter optional.
    pub fn parse(name: impl Into<String>, signature: &str) -> Result<Self> {
        let (base, required) = signature
            .strip_suffix('?')
            .map_or((signature, true), |base| (base, false));
        Ok(Self {
            name: name.into(),
            param_type: base.parse()?,
            required,
        })
    }
}

/// Tool definition: what the model is told about a tool
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions, in declaration order
    pub parameters: Vec<ParameterSpec>,
}

impl ToolSpec {
    /// Build a spec from `(name, signature)` pairs, e.g. `("limit", "number?")`
    pub fn from_signature(
        name: impl Into<String>,
        description: impl Into<String>,
        params: &[(&str, &str)],
    ) -> Result<Self> {
        let parameters = params
            .iter()
            .map(|(param, signature)| ParameterSpec::parse(*param, signature))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.into(),
            description: description.into(),
            parameters,
        })
    }

    /// Check arguments against the declared parameters
    pub fn validate(&self, args: &ToolInput) -> Result<()> {
        for param in &self.parameters {
            match args.get(&param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(AgentError::ToolValidation(format!(
                        "missing required parameter: {}",
                        param.name
                    )));
                }
                Some(value) if !value.is_null() && !param.param_type.matches(value) => {
                    return Err(AgentError::ToolValidation(format!(
                        "parameter {} must be {}, got {}",
                        param.name,
                        param.param_type.as_str(),
                        value
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Deserialize tool arguments into a typed parameter struct
pub fn parse_args<T: DeserializeOwned>(args: &ToolInput) -> Result<T> {
    serde_json::from_value(Value::Object(args.clone()))
        .map_err(|e| AgentError::ToolValidation(e.to_string()))
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's name, description and parameters
    fn spec(&self) -> ToolSpec;

    /// Execute the tool with given arguments
    async fn execute(&self, args: &ToolInput) -> Result<String>;
}

/// Registry for available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<(ToolSpec, Arc<dyn Tool>)>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool. A tool with the same name replaces the old one
    /// in place, keeping its position.
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let spec = tool.spec();
        if let Some(&idx) = self.index.get(&spec.name) {
            self.tools[idx] = (spec, tool);
        } else {
            self.index.insert(spec.name.clone(), self.tools.len());
            self.tools.push((spec, tool));
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&idx| self.tools[idx].1.clone())
    }

    /// All tool specs, in registration order
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|(spec, _)| spec.clone()).collect()
    }

    /// Get tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|(spec, _)| spec.name.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call, surfacing failures as `Err`
    pub async fn execute(&self, name: &str, args: &ToolInput) -> Result<String> {
        let idx = *self
            .index
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;
        let (spec, tool) = &self.tools[idx];

        spec.validate(args)?;
        tool.execute(args).await
    }

    /// Execute a tool call and always produce a result string.
    ///
    /// Failures come back as `"error: <cause>"`.
    pub async fn dispatch(&self, name: &str, args: &ToolInput) -> String {
        let started = Instant::now();
        match self.execute(name, args).await {
            Ok(output) => {
                tracing::debug!(tool = %name, elapsed = ?started.elapsed(), "Tool succeeded");
                output
            }
            Err(e) => {
                tracing::debug!(tool = %name, elapsed = ?started.elapsed(), error = %e, "Tool failed");
                format!("{ERROR_PREFIX}{e}")
            }
        }
    }
}
