//! Write Tool

use async_trait::async_trait;
use serde::Deserialize;

use nanocode_core::{
    ParamType, ParameterSpec, Result as CoreResult, Tool, ToolInput, ToolSpec, tool::parse_args,
};

use crate::error::ToolError;

#[derive(Debug, Deserialize)]
struct WriteArgs {
    path: String,
    content: String,
}

/// Tool that replaces a file's contents
#[derive(Debug, Default)]
pub struct WriteTool;

#[async_trait]
impl Tool for WriteTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "write".into(),
            description: "Write content to file".into(),
            parameters: vec![
                ParameterSpec::required("path", ParamType::String),
                ParameterSpec::required("content", ParamType::String),
            ],
        }
    }

    async fn execute(&self, args: &ToolInput) -> CoreResult<String> {
        let args: WriteArgs = parse_args(args)?;
        tokio::fs::write(&args.path, args.content.as_bytes())
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;

        tracing::debug!(path = %args.path, bytes = args.content.len(), "File written");
        Ok("ok".into())
    }
}
