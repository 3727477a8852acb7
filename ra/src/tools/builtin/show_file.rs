//! show_file tool - print a file with line numbers

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, ParamType, Tool, ToolError, str_arg};

/// Show the full content of a file, numbered
pub struct ShowFileTool;

#[async_trait]
impl Tool for ShowFileTool {
    fn name(&self) -> &'static str {
        "show_file"
    }

    fn description(&self) -> &'static str {
        "Show the content of a file with line numbers."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "file_path",
            ParamType::String,
            "path of the file to show",
        )]
    }

    async fn run(&self, args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        let file_path = str_arg(args, "file_path")?;
        let command = format!("cat -n {}", shell_words::quote(file_path));

        let output = env.execute(&command).await?;
        if output.success() {
            Ok(output.stdout)
        } else {
            Err(ToolError::CommandFailed {
                exit_code: output.exit_code,
                output: output.combined(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::LocalEnvironment;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_show_file_numbers_lines() {
        let temp = tempdir().unwrap();
        std::fs::write(temp.path().join("a.txt"), "first\nsecond\n").unwrap();
        let env = LocalEnvironment::new(temp.path().to_path_buf());
        let args = json!({"file_path": "a.txt"}).as_object().cloned().unwrap();

        let out = ShowFileTool.run(&args, &env).await.unwrap();
        assert!(out.contains("1"));
        assert!(out.contains("first"));
        assert!(out.contains("second"));
    }

    #[tokio::test]
    async fn test_show_missing_file_fails() {
        let temp = tempdir().unwrap();
        let env = LocalEnvironment::new(temp.path().to_path_buf());
        let args = json!({"file_path": "nope.txt"}).as_object().cloned().unwrap();

        assert!(ShowFileTool.run(&args, &env).await.is_err());
    }
}
