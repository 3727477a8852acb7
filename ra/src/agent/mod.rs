//! Agent loop - the propose/parse/execute/observe cycle
//!
//! [`ReactAgent`] owns one conversation tree and one run's state; the
//! harness creates a fresh agent (and sandbox) per task instance.

mod context;
mod engine;

pub use context::PromptBuilder;
pub use engine::{AgentRunState, AgentStatus, ReactAgent, RunReport, TerminationReason};
