//! Glob Tool
//!
//! Finds files by pattern, newest first.

use std::path::PathBuf;
use std::time::SystemTime;

use async_trait::async_trait;
use glob::MatchOptions;
use serde::Deserialize;

use nanocode_core::{
    ParamType, ParameterSpec, Result as CoreResult, Tool, ToolInput, ToolSpec, tool::parse_args,
};

use crate::error::Result;

/// Output when nothing matches
pub const NO_MATCHES: &str = "none";

/// `*` stays inside one path component and never matches a leading dot
pub(crate) const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Debug, Deserialize)]
struct GlobArgs {
    pat: String,
    #[serde(default)]
    path: Option<String>,
}

/// Tool for finding files by glob pattern
#[derive(Debug, Default)]
pub struct GlobTool;

/// Join a base directory and a pattern the way the tool does
pub fn full_pattern(base: Option<&str>, pat: &str) -> String {
    format!("{}/{pat}", base.unwrap_or(".")).replace("//", "/")
}

/// Matching paths, most recently modified first; directories sort last
pub fn find(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<(SystemTime, PathBuf)> = glob::glob_with(pattern, MATCH_OPTIONS)?
        .filter_map(|entry| {
            entry
                .map_err(|e| tracing::debug!(error = %e, "Skipping unreadable glob entry"))
                .ok()
        })
        .map(|path| (modified(&path), path))
        .collect();

    entries.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(entries.into_iter().map(|(_, path)| path).collect())
}

fn modified(path: &std::path::Path) -> SystemTime {
    std::fs::metadata(path)
        .ok()
        .filter(std::fs::Metadata::is_file)
        .and_then(|meta| meta.modified().ok())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

#[async_trait]
impl Tool for GlobTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "glob".into(),
            description: "Find files by pattern, sorted by mtime".into(),
            parameters: vec![
                ParameterSpec::required("pat", ParamType::String),
                ParameterSpec::optional("path", ParamType::String),
            ],
        }
    }

    async fn execute(&self, args: &ToolInput) -> CoreResult<String> {
        let args: GlobArgs = parse_args(args)?;
        let pattern = full_pattern(args.path.as_deref(), &args.pat);

        let paths = tokio::task::spawn_blocking(move || find(&pattern))
            .await
            .map_err(crate::ToolError::from)??;

        if paths.is_empty() {
            return Ok(NO_MATCHES.into());
        }
        Ok(paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
