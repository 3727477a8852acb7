//! Tool error types

use thiserror::Error;

use crate::env::EnvError;

/// Errors that can occur during tool registration or execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("command failed with exit code {exit_code}:\n{output}")]
    CommandFailed { exit_code: i32, output: String },

    #[error(transparent)]
    Env(#[from] EnvError),
}
