//! Terminal Rendering

use std::path::Path;

use colored::Colorize;
use regex::{Captures, Regex};

use nanocode_core::{AgentError, EventSink, ToolInput};

const MAX_WIDTH: usize = 80;
const ARG_PREVIEW_CHARS: usize = 50;
const RESULT_PREVIEW_CHARS: usize = 60;

/// Dim horizontal rule, at most 80 columns wide
pub fn separator() -> String {
    let width = std::env::var("COLUMNS")
        .ok()
        .and_then(|cols| cols.parse::<usize>().ok())
        .map_or(MAX_WIDTH, |cols| cols.min(MAX_WIDTH));
    "─".repeat(width).dimmed().to_string()
}

/// Startup line: name, model and working directory
pub fn banner(model: &str, cwd: &Path) {
    println!(
        "{} | {}\n",
        "nanocode".bold(),
        format!("{model} | {}", cwd.display()).dimmed()
    );
}

/// First argument value, truncated for display
pub fn arg_preview(input: &ToolInput) -> String {
    let Some(first) = input.values().next() else {
        return String::new();
    };
    let text = first
        .as_str()
        .map_or_else(|| first.to_string(), str::to_string);
    text.chars().take(ARG_PREVIEW_CHARS).collect()
}

/// First line of a tool result plus a count of the lines not shown
pub fn result_preview(output: &str) -> String {
    let mut lines = output.split('\n');
    let first = lines.next().unwrap_or_default();
    let rest = lines.count();

    let mut preview: String = first.chars().take(RESULT_PREVIEW_CHARS).collect();
    if rest > 0 {
        preview.push_str(&format!(" ... +{rest} lines"));
    } else if first.chars().count() > RESULT_PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Prints session events to stdout
pub struct TerminalSink {
    bold: Regex,
}

impl TerminalSink {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            bold: Regex::new(r"\*\*(.+?)\*\*")?,
        })
    }

    /// Render `**bold**` spans
    fn markdown(&self, text: &str) -> String {
        self.bold
            .replace_all(text, |caps: &Captures<'_>| caps[1].bold().to_string())
            .into_owned()
    }
}

impl EventSink for TerminalSink {
    fn on_text(&mut self, text: &str) {
        println!("\n{} {}", "⏺".cyan(), self.markdown(text));
    }

    fn on_tool_call(&mut self, name: &str, input: &ToolInput) {
        println!(
            "\n{}({})",
            format!("⏺ {}", capitalize(name)).green(),
            arg_preview(input).dimmed()
        );
    }

    fn on_tool_result(&mut self, _name: &str, output: &str) {
        println!(" {}", format!("⎿ {}", result_preview(output)).dimmed());
    }

    fn on_cleared(&mut self) {
        println!("{}", "⏺ Cleared conversation".green());
    }

    fn on_error(&mut self, error: &AgentError) {
        println!("{}", format!("⏺ Error: {}", error.user_message()).red());
    }

    fn on_turn_complete(&mut self) {
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_arg_preview() {
        let input = json!({"path": "src/main.rs", "offset": 10});
        assert_eq!(arg_preview(input.as_object().unwrap()), "src/main.rs");

        let edit = json!({"path": "lib.py", "old": "a", "new": "b", "all": true});
        assert_eq!(arg_preview(edit.as_object().unwrap()), "lib.py");

        let long = json!({"cmd": "x".repeat(80)});
        assert_eq!(arg_preview(long.as_object().unwrap()).len(), ARG_PREVIEW_CHARS);

        assert_eq!(arg_preview(&ToolInput::new()), "");
    }

    #[test]
    fn test_result_preview() {
        assert_eq!(result_preview("ok"), "ok");
        assert_eq!(result_preview("a\nb\nc"), "a ... +2 lines");
        let long = "y".repeat(70);
        assert_eq!(result_preview(&long), format!("{}...", "y".repeat(60)));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("read"), "Read");
        assert_eq!(capitalize("BASH"), "Bash");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_markdown_bold() {
        colored::control::set_override(false);
        let sink = TerminalSink::new().unwrap();
        assert_eq!(sink.markdown("a **b** c"), "a b c");
    }
}
