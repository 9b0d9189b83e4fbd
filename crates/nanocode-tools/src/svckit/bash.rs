//! Bash Tool
//!
//! Runs `sh -c <cmd>` in the working directory with a wall-clock limit.
//! The child is killed if the limit expires.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use nanocode_core::{
    ParamType, ParameterSpec, Result as CoreResult, Tool, ToolInput, ToolSpec, tool::parse_args,
};

use crate::error::{Result, ToolError};

/// Output when the command printed nothing
pub const EMPTY_OUTPUT: &str = "(empty)";

/// Default wall-clock limit
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct BashArgs {
    cmd: String,
}

/// Tool for running shell commands
#[derive(Debug)]
pub struct BashTool {
    timeout: Duration,
}

impl BashTool {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Run `cmd`, returning combined stdout and stderr
    pub async fn run(&self, cmd: &str) -> Result<String> {
        let child = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(ToolError::Spawn)?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ToolError::Timeout(self.timeout))?
            .map_err(ToolError::Spawn)?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let text = match text.trim() {
            "" => EMPTY_OUTPUT.to_string(),
            trimmed => trimmed.to_string(),
        };

        if output.status.success() {
            Ok(text)
        } else {
            Err(ToolError::ExitStatus {
                code: output.status.code().unwrap_or(-1),
                output: text,
            })
        }
    }
}

impl Default for BashTool {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Tool for BashTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "bash".into(),
            description: "Run shell command".into(),
            parameters: vec![ParameterSpec::required("cmd", ParamType::String)],
        }
    }

    async fn execute(&self, args: &ToolInput) -> CoreResult<String> {
        let args: BashArgs = parse_args(args)?;
        tracing::debug!(cmd = %args.cmd, timeout_secs = self.timeout.as_secs(), "Running shell command");
        Ok(self.run(&args.cmd).await?)
    }
}
