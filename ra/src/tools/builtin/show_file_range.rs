//! show_file_range tool - print a line range with line numbers

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, ParamType, Tool, ToolError, int_arg, str_arg};

/// Show an inclusive line range of a file, numbered from the range start
pub struct ShowFileRangeTool;

#[async_trait]
impl Tool for ShowFileRangeTool {
    fn name(&self) -> &'static str {
        "show_file_range"
    }

    fn description(&self) -> &'static str {
        "Show a line range from a file (inclusive), with line numbers."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required("file_path", ParamType::String, "path of the file to show"),
            ParamSpec::required("from_line", ParamType::Integer, "first line (1-based)"),
            ParamSpec::required("to_line", ParamType::Integer, "last line (inclusive)"),
        ]
    }

    async fn run(&self, args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        let file_path = str_arg(args, "file_path")?;
        let from_line = int_arg(args, "from_line")?;
        let to_line = int_arg(args, "to_line")?;

        if from_line < 1 || to_line < from_line {
            return Err(ToolError::InvalidArgument(format!(
                "invalid line range {}-{}",
                from_line, to_line
            )));
        }

        let command = format!(
            "sed -n '{},{}p' {} | nl -ba -v {}",
            from_line,
            to_line,
            shell_words::quote(file_path),
            from_line
        );

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
