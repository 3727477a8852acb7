//! Sandboxed execution environment abstraction
//!
//! The agent core never touches the repository directly: every tool
//! expresses itself as a shell command executed through a
//! [`SandboxEnvironment`]. The harness owns the environment lifecycle
//! (create, reset, destroy); this crate ships [`LocalEnvironment`] so the
//! binary is runnable against a plain working directory.

use async_trait::async_trait;
use thiserror::Error;

mod local;

pub use local::LocalEnvironment;

/// Errors from the execution environment itself
///
/// A non-zero exit status is not an error at this layer - it is reported
/// through [`ExecOutput::exit_code`] and interpreted by the tool.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("failed to spawn command: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Captured result of one command execution
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Merge stdout and stderr for an observation
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n\nSTDERR:\n{}", self.stdout, self.stderr)
        }
    }
}

/// A sandboxed environment that executes shell commands against a
/// checked-out repository state
#[async_trait]
pub trait SandboxEnvironment: Send + Sync {
    async fn execute(&self, command: &str) -> Result<ExecOutput, EnvError>;
}
