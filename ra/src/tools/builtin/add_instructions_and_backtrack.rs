//! add_instructions_and_backtrack tool - rewind to an earlier message

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::env::SandboxEnvironment;
use crate::tools::{ParamSpec, ParamType, Tool, ToolError};

/// Instruction-injection backtracking tool
///
/// The agent loop intercepts this call and performs the head move and
/// instruction append itself; the sandbox is never involved. Registered
/// only when backtracking is enabled.
pub struct AddInstructionsAndBacktrackTool;

#[async_trait]
impl Tool for AddInstructionsAndBacktrackTool {
    fn name(&self) -> &'static str {
        "add_instructions_and_backtrack"
    }

    fn description(&self) -> &'static str {
        "Call this when you are stuck or repeating mistakes. Replaces your standing instructions \
         with the given text and rewinds the conversation to the message with the given id; \
         context after that point is discarded."
    }

    fn params(&self) -> Vec<ParamSpec> {
        vec![
            ParamSpec::required(
                "instructions",
                ParamType::String,
                "new standing instructions to follow from here on",
            ),
            ParamSpec::required(
                "at_message_id",
                ParamType::Integer,
                "id of the message to rewind the conversation to",
            ),
        ]
    }

    async fn run(&self, _args: &Map<String, Value>, _env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
        // Intercepted by the agent loop; only reachable if executed standalone
        Ok("backtracking is handled by the agent loop".to_string())
    }
}
