//! syntax_check tool - byte-compile the repository's python sources

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, Tool, ToolError};

/// Quick syntax sweep via `compileall`; quiet output means clean
pub struct SyntaxCheckTool;

#[async_trait]
impl Tool for SyntaxCheckTool {
    fn name(&self) -> &'static str {
        "syntax_check"
    }

    fn description(&self) -> &'static str {
        "Byte-compile all python sources in the repository to catch syntax errors. \
         Empty output means no errors."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![]
    }

    async fn run(&self, _args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        let output = env.execute("python -m compileall -q . || true").await?;
        let text = output.combined();
        if text.trim().is_empty() {
            Ok("(no syntax errors)".to_string())
        } else {
            Ok(text)
        }
    }
}
