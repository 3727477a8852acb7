//! Execution bridge - runs validated tool calls against the sandbox
//!
//! The bridge is the only place where tool failures, timeouts, and
//! oversized output are handled; everything is normalized into an
//! [`Observation`] so the agent loop can feed failures back to the model
//! as correctable turns instead of crashing the run.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::env::SandboxEnvironment;
use crate::tools::Tool;

/// Result of executing one tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub content: String,
    pub success: bool,
}

impl Observation {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: false,
        }
    }
}

/// Adapter between validated tool calls and the sandboxed environment
pub struct ExecutionBridge {
    env: Arc<dyn SandboxEnvironment>,
    timeout: Duration,
    max_output_chars: usize,
}

impl ExecutionBridge {
    pub fn new(env: Arc<dyn SandboxEnvironment>, timeout: Duration, max_output_chars: usize) -> Self {
        Self {
            env,
            timeout,
            max_output_chars,
        }
    }

    /// Execute a tool call; never raises
    ///
    /// The per-tool timeout is enforced here rather than in the
    /// environment so step semantics stay uniform across tools.
    pub async fn execute(&self, tool: &dyn Tool, args: &Map<String, Value>) -> Observation {
        debug!(tool = %tool.name(), "bridge: executing");
        match tokio::time::timeout(self.timeout, tool.run(args, self.env.as_ref())).await {
            Ok(Ok(content)) => Observation::success(self.truncate(content)),
            Ok(Err(e)) => {
                warn!(tool = %tool.name(), error = %e, "bridge: tool failed");
                Observation::failure(self.truncate(format!("Error executing {}: {}", tool.name(), e)))
            }
            Err(_) => {
                warn!(tool = %tool.name(), timeout = ?self.timeout, "bridge: tool timed out");
                Observation::failure(format!(
                    "Error executing {}: timed out after {}ms",
                    tool.name(),
                    self.timeout.as_millis()
                ))
            }
        }
    }

    fn truncate(&self, text: String) -> String {
        if text.len() <= self.max_output_chars {
            return text;
        }
        let mut cut = self.max_output_chars;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...\n[truncated, {} chars total]", &text[..cut], text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{EnvError, ExecOutput};
    use crate::tools::{ParamSpec, ToolError};
    use async_trait::async_trait;

    struct NullEnv;

    #[async_trait]
    impl SandboxEnvironment for NullEnv {
        async fn execute(&self, _command: &str) -> Result<ExecOutput, EnvError> {
            Ok(ExecOutput {
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
            })
        }
    }

    enum Behavior {
        Succeed(String),
        Fail,
        Hang,
    }

    struct FakeTool(Behavior);

    #[async_trait]
    impl Tool for FakeTool {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn description(&self) -> &'static str {
            "test tool"
        }

        fn params(&self) -> Vec<ParamSpec> {
            vec![]
        }

        async fn run(&self, _args: &Map<String, Value>, _env: &dyn SandboxEnvironment) -> Result<String, ToolError> {
            match &self.0 {
                Behavior::Succeed(s) => Ok(s.clone()),
                Behavior::Fail => Err(ToolError::InvalidArgument("bad input".to_string())),
                Behavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok("never".to_string())
                }
            }
        }
    }

    fn bridge(timeout_ms: u64, max_chars: usize) -> ExecutionBridge {
        ExecutionBridge::new(Arc::new(NullEnv), Duration::from_millis(timeout_ms), max_chars)
    }

    #[tokio::test]
    async fn test_success_observation() {
        let obs = bridge(1000, 1000)
            .execute(&FakeTool(Behavior::Succeed("done".to_string())), &Map::new())
            .await;
        assert!(obs.success);
        assert_eq!(obs.content, "done");
    }

    #[tokio::test]
    async fn test_tool_error_normalized() {
        let obs = bridge(1000, 1000).execute(&FakeTool(Behavior::Fail), &Map::new()).await;
        assert!(!obs.success);
        assert!(obs.content.contains("Error executing fake"));
        assert!(obs.content.contains("bad input"));
    }

    #[tokio::test]
    async fn test_timeout_normalized() {
        let obs = bridge(20, 1000).execute(&FakeTool(Behavior::Hang), &Map::new()).await;
        assert!(!obs.success);
        assert!(obs.content.contains("timed out after 20ms"));
    }

    #[tokio::test]
    async fn test_long_output_truncated() {
        let long = "x".repeat(500);
        let obs = bridge(1000, 100)
            .execute(&FakeTool(Behavior::Succeed(long)), &Map::new())
            .await;
        assert!(obs.success);
        assert!(obs.content.contains("[truncated, 500 chars total]"));
        assert!(obs.content.len() < 200);
    }

    #[tokio::test]
    async fn test_truncation_respects_char_boundaries() {
        let long = "é".repeat(100);
        let obs = bridge(1000, 99)
            .execute(&FakeTool(Behavior::Succeed(long)), &Map::new())
            .await;
        assert!(obs.content.contains("[truncated"));
    }
}
