//! Local environment - executes commands in a working directory
//!
//! The unsandboxed counterpart of the benchmark harness's container
//! environment. Used by the CLI for single-task runs and by tests.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use super::{EnvError, ExecOutput, SandboxEnvironment};

/// Executes commands with `sh -c` in a fixed working directory
pub struct LocalEnvironment {
    workdir: PathBuf,
}

impl LocalEnvironment {
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    pub fn workdir(&self) -> &PathBuf {
        &self.workdir
    }
}

#[async_trait]
impl SandboxEnvironment for LocalEnvironment {
    async fn execute(&self, command: &str) -> Result<ExecOutput, EnvError> {
        debug!(%command, workdir = %self.workdir.display(), "LocalEnvironment: executing");
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.workdir)
            .output()
            .await?;

        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
