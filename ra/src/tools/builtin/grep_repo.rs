//! grep_repo tool - search the repository for a pattern

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, ParamType, Tool, ToolError, str_arg};

/// Recursive repository search, excluding `.git`
pub struct GrepRepoTool;

#[async_trait]
impl Tool for GrepRepoTool {
    fn name(&self) -> &'static str {
        "grep_repo"
    }

    fn description(&self) -> &'static str {
        "Search recursively for a pattern in the repository. Returns file:line:match lines."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "pattern",
            ParamType::String,
            "pattern to search for",
        )]
    }

    async fn run(&self, args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        let pattern = str_arg(args, "pattern")?;
        if pattern.is_empty() {
            return Err(ToolError::InvalidArgument("empty pattern".to_string()));
        }

        // `|| true` keeps no-match (grep exit 1) from reading as a failure
        let command = format!(
            "grep -RIn --exclude-dir=.git -e {} . || true",
            shell_words::quote(pattern)
        );

        let output = env.execute(&command).await?;
        if output.stdout.trim().is_empty() {
            Ok("(no matches)".to_string())
        } else {
            Ok(output.stdout)
        }
    }
}
