//! Service Kit - Agent Tools
//!
//! The six local tools the model can call. Each implements
//! `nanocode_core::Tool` and reports failures as `ToolError`.

mod bash;
mod edit_file;
mod glob_files;
mod grep_files;
mod read_file;
mod write_file;

pub use bash::BashTool;
pub use edit_file::EditTool;
pub use glob_files::GlobTool;
pub use grep_files::GrepTool;
pub use read_file::ReadTool;
pub use write_file::WriteTool;
