//! Read Tool
//!
//! Returns a window of a text file with right-aligned line numbers.

use async_trait::async_trait;
use serde::Deserialize;

use nanocode_core::{
    ParamType, ParameterSpec, Result as CoreResult, Tool, ToolInput, ToolSpec, tool::parse_args,
};

use crate::error::ToolError;

#[derive(Debug, Deserialize)]
struct ReadArgs {
    path: String,
    #[serde(default)]
    offset: Option<usize>,
    #[serde(default)]
    limit: Option<usize>,
}

/// Tool for reading files with line numbers
#[derive(Debug, Default)]
pub struct ReadTool;

/// Number lines `offset..offset + limit` of `text`, keeping line endings
pub fn number_lines(text: &str, offset: usize, limit: Option<usize>) -> String {
    text.split_inclusive('\n')
        .enumerate()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .map(|(idx, line)| format!("{:>4}| {line}", idx + 1))
        .collect()
}

#[async_trait]
impl Tool for ReadTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "read".into(),
            description: "Read file with line numbers (file path, not directory)".into(),
            parameters: vec![
                ParameterSpec::required("path", ParamType::String),
                ParameterSpec::optional("offset", ParamType::Integer),
                ParameterSpec::optional("limit", ParamType::Integer),
            ],
        }
    }

    async fn execute(&self, args: &ToolInput) -> CoreResult<String> {
        let args: ReadArgs = parse_args(args)?;
        let text = tokio::fs::read_to_string(&args.path)
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;

        Ok(number_lines(&text, args.offset.unwrap_or(0), args.limit))
    }
}
