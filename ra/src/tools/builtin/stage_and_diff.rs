//! stage_and_diff tool - stage all changes and show the cached diff

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, Tool, ToolError};

/// Stage everything and return the staged unified diff
///
/// The model uses this before `finish` to produce the patch text it must
/// attach.
pub struct StageAndDiffTool;

#[async_trait]
impl Tool for StageAndDiffTool {
    fn name(&self) -> &'static str {
        "stage_and_diff"
    }

    fn description(&self) -> &'static str {
        "Stage all changes (git add -A) and return the staged unified diff. Use the output as \
         the patch argument of finish."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![]
    }

    async fn run(&self, _args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        let output = env.execute("git add -A && git diff --cached").await?;
        if !output.success() {
            return Err(ToolError::CommandFailed {
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        if output.stdout.trim().is_empty() {
            Ok("(empty diff - no staged changes)".to_string())
        } else {
            Ok(output.stdout)
        }
    }
}
