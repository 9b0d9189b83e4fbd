//! Grep Tool
//!
//! Regex search over every readable text file below a directory.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use nanocode_core::{
    ParamType, ParameterSpec, Result as CoreResult, Tool, ToolInput, ToolSpec, tool::parse_args,
};

use super::glob_files::{MATCH_OPTIONS, NO_MATCHES, full_pattern};
use crate::error::{Result, ToolError};

/// Maximum number of hits returned
pub const MAX_HITS: usize = 50;

#[derive(Debug, Deserialize)]
struct GrepArgs {
    pat: String,
    #[serde(default)]
    path: Option<String>,
}

/// Tool for searching file contents
#[derive(Debug, Default)]
pub struct GrepTool;

/// `path:line:text` for each matching line, at most [`MAX_HITS`]
pub fn search(regex: &Regex, base: Option<&str>) -> Result<Vec<String>> {
    let mut hits = Vec::new();

    for path in glob::glob_with(&full_pattern(base, "**/*"), MATCH_OPTIONS)?.flatten() {
        if !path.is_file() {
            continue;
        }
        // Binary and unreadable files are skipped
        let Ok(text) = std::fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in text.lines().enumerate() {
            if regex.is_match(line) {
                hits.push(format!("{}:{}:{}", path.display(), idx + 1, line.trim_end()));
                if hits.len() >= MAX_HITS {
                    return Ok(hits);
                }
            }
        }
    }
    Ok(hits)
}

#[async_trait]
impl Tool for GrepTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "grep".into(),
            description: "Search files for regex pattern".into(),
            parameters: vec![
                ParameterSpec::required("pat", ParamType::String),
                ParameterSpec::optional("path", ParamType::String),
            ],
        }
    }

    async fn execute(&self, args: &ToolInput) -> CoreResult<String> {
        let args: GrepArgs = parse_args(args)?;
        let regex = Regex::new(&args.pat).map_err(ToolError::from)?;

        let hits = tokio::task::spawn_blocking(move || search(&regex, args.path.as_deref()))
            .await
            .map_err(ToolError::from)??;

        tracing::debug!(pattern = %args.pat, hits = hits.len(), "Grep finished");
        if hits.is_empty() {
            return Ok(NO_MATCHES.into());
        }
        Ok(hits.join("\n"))
    }
}
