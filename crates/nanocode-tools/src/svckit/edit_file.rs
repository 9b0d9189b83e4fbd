//! Edit Tool
//!
//! Exact string replacement. The target must occur exactly once unless
//! `all` is set.

use async_trait::async_trait;
use serde::Deserialize;

use nanocode_core::{
    ParamType, ParameterSpec, Result as CoreResult, Tool, ToolInput, ToolSpec, tool::parse_args,
};

use crate::error::{Result, ToolError};

#[derive(Debug, Deserialize)]
struct EditArgs {
    path: String,
    old: String,
    new: String,
    #[serde(default)]
    all: Option<bool>,
}

/// Tool for in-place string replacement
#[derive(Debug, Default)]
pub struct EditTool;

/// Apply one edit to `text`
pub fn replace(text: &str, old: &str, new: &str, all: bool) -> Result<String> {
    if old.is_empty() {
        return Err(ToolError::EmptyOldString);
    }
    match text.matches(old).count() {
        0 => Err(ToolError::OldStringNotFound),
        count if count > 1 && !all => Err(ToolError::OldStringNotUnique(count)),
        _ if all => Ok(text.replace(old, new)),
        _ => Ok(text.replacen(old, new, 1)),
    }
}

#[async_trait]
impl Tool for EditTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "edit".into(),
            description: "Replace old with new in file (old must be unique unless all=true)".into(),
            parameters: vec![
                ParameterSpec::required("path", ParamType::String),
                ParameterSpec::required("old", ParamType::String),
                ParameterSpec::required("new", ParamType::String),
                ParameterSpec::optional("all", ParamType::Boolean),
            ],
        }
    }

    async fn execute(&self, args: &ToolInput) -> CoreResult<String> {
        let args: EditArgs = parse_args(args)?;
        let text = tokio::fs::read_to_string(&args.path)
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;

        let updated = replace(&text, &args.old, &args.new, args.all.unwrap_or(false))?;
        tokio::fs::write(&args.path, updated)
            .await
            .map_err(|e| ToolError::io(&args.path, e))?;
        Ok("ok".into())
    }
}
