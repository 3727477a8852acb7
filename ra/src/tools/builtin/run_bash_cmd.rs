//! run_bash_cmd tool - execute a shell command in the sandbox

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, ParamType, Tool, ToolError, str_arg};

/// Run an arbitrary shell command and return its output
///
/// A non-zero exit status is a [`ToolError::CommandFailed`] so the model
/// sees the failure as an error observation rather than plain output.
pub struct RunBashCmdTool;

#[async_trait]
impl Tool for RunBashCmdTool {
    fn name(&self) -> &'static str {
        "run_bash_cmd"
    }

    fn description(&self) -> &'static str {
        "Run a command in a bash shell inside the repository and return its output. \
         Fails if the command exits non-zero."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![ParamSpec::required(
            "command",
            ParamType::String,
            "shell command to run",
        )]
    }

    async fn run(&self, args: &Map<String, Value>, env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        let command = str_arg(args, "command")?;
        if command.trim().is_empty() {
            return Err(ToolError::InvalidArgument("empty command".to_string()));
        }

        debug!(%command, "run_bash_cmd: executing");
        let output = env.execute(command).await?;

        if output.success() {
            Ok(output.combined())
        } else {
            Err(ToolError::CommandFailed {
                exit_code: output.exit_code,
                output: output.combined(),
            })
        }
    }
}
