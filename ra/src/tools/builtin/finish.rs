//! finish tool - terminate the run and submit the final patch

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, ParamType, Tool, ToolError, str_arg};

/// Mandatory termination tool
///
/// The agent loop intercepts `finish` calls before they reach the
/// execution bridge: the `patch` argument becomes the run's output
/// artifact. Always registered regardless of configuration.
pub struct FinishTool;

#[async_trait]
impl Tool for FinishTool {
    fn name(&self) -> &'static str {
        "finish"
    }

    fn description(&self) -> &'static str {
        "End the run and submit the final unified diff. Stage your edits and use stage_and_diff \
         (or git diff) to produce the patch text first; pass it verbatim as the patch argument."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "patch",
            ParamType::String,
            "unified diff of all changes made during the run",
        )]
    }

    async fn run(&self, args: &Map<String, Value>, _env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        // Only reachable when executed outside an agent loop
        Ok(str_arg(args, "patch")?.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::LocalEnvironment;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_finish_echoes_patch() {
        let temp = tempdir().unwrap();
        let env = LocalEnvironment::new(temp.path().to_path_buf());
        let args = json!({"patch": "diff --git a/x b/x"}).as_object().cloned().unwrap();

        let out = FinishTool.run(&args, &env).await.unwrap();
        assert_eq!(out, "diff --git a/x b/x");
    }

    #[tokio::test]
    async fn test_finish_requires_patch() {
        let temp = tempdir().unwrap();
        let env = LocalEnvironment::new(temp.path().to_path_buf());
        let args = Map::new();

        assert!(FinishTool.run(&args, &env).await.is_err());
    }
}
