//! # nanocode-tools
//!
//! Filesystem and shell tools for the nanocode agent.
//!
//! ```text
//! ┌────────┬──────────────────────────┬──────────────────────────────┐
//! │ tool   │ parameters               │ result                       │
//! ├────────┼──────────────────────────┼──────────────────────────────┤
//! │ read   │ path, offset?, limit?    │ "   1| line" per line        │
//! │ write  │ path, content            │ "ok"                         │
//! │ edit   │ path, old, new, all?     │ "ok"                         │
//! │ glob   │ pat, path?               │ paths, newest first / "none" │
//! │ grep   │ pat, path?               │ "path:line:text" / "none"    │
//! │ bash   │ cmd                      │ stdout+stderr / "(empty)"    │
//! └────────┴──────────────────────────┴──────────────────────────────┘
//! ```
//!
//! Tool failures surface to the model as `"error: ..."` strings through
//! `ToolRegistry::dispatch`.

pub mod error;
pub mod svckit;

use nanocode_core::{Config, ToolRegistry};

pub use error::{Result, ToolError};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{BashTool, EditTool, GlobTool, GrepTool, ReadTool, WriteTool};
}

/// Registry with every built-in tool, in the order they are offered to the model
pub fn default_registry(config: &Config) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tools::ReadTool);
    registry.register(tools::WriteTool);
    registry.register(tools::EditTool);
    registry.register(tools::GlobTool);
    registry.register(tools::GrepTool);
    registry.register(tools::BashTool::new(config.bash_timeout));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanocode_core::schema::anthropic_tools;
    use serde_json::json;

    #[test]
    fn test_default_registry_order_and_schema() {
        let registry = default_registry(&Config::default());
        assert_eq!(registry.names(), vec!["read", "write", "edit", "glob", "grep", "bash"]);

        let schema = anthropic_tools(&registry.specs());
        assert_eq!(
            schema[0]["input_schema"],
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "offset": {"type": "integer"},
                    "limit": {"type": "integer"}
                },
                "required": ["path"]
            })
        );
        assert_eq!(schema[2]["input_schema"]["properties"]["all"], json!({"type": "boolean"}));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let registry = default_registry(&Config::default());
        let out = registry.dispatch("teleport", &serde_json::Map::new()).await;
        assert_eq!(out, "error: unknown tool: teleport");
    }
}
