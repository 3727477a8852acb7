//! Trajectory persistence - full audit record of a run
//!
//! Every terminal state writes the whole message tree, including
//! superseded branches, so a run can be reconstructed exactly as the
//! agent saw it.

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use serde::Serialize;

use crate::agent::{ReactAgent, RunReport};
use crate::tree::{Message, MessageId};

/// Serializable record of one run
#[derive(Debug, Serialize)]
pub struct Trajectory<'a> {
    pub run_id: String,
    pub agent: &'a str,
    pub status: String,
    pub reason: String,
    pub steps: u32,
    pub backtracks: u32,
    pub root: Option<MessageId>,
    pub head: Option<MessageId>,
    pub messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<&'a str>,
}

impl<'a> Trajectory<'a> {
    pub fn new(agent: &'a ReactAgent, report: &'a RunReport) -> Self {
        Self {
            run_id: agent.run_id().to_string(),
            agent: agent.name(),
            status: report.status.to_string(),
            reason: report.reason.to_string(),
            steps: report.steps,
            backtracks: report.backtracks,
            root: agent.tree().root(),
            head: agent.tree().head(),
            messages: agent.tree().messages(),
            patch: report.patch.as_deref(),
        }
    }

    /// Write the trajectory as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create trajectory directory")?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize trajectory")?;
        fs::write(path, json).context(format!("Failed to write trajectory to {}", path.display()))?;
        Ok(())
    }
}
