//! Error Types for Tools

use nanocode_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("old_string not found")]
    OldStringNotFound,

    #[error("old_string appears {0} times, must be unique (use all=true)")]
    OldStringNotUnique(usize),

    #[error("old_string must not be empty")]
    EmptyOldString,

    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),

    #[error("failed to start shell: {0}")]
    Spawn(std::io::Error),

    #[error("exit status {code}: {output}")]
    ExitStatus { code: i32, output: String },

    #[error("command timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ToolError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<ToolError> for AgentError {
    fn from(err: ToolError) -> Self {
        Self::ToolExecution(err.to_string())
    }
}
