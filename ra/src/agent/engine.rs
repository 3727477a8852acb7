//! ReactAgent - the propose/parse/execute/observe state machine
//!
//! One step: render the root-to-head context, ask the model for a single
//! function call, execute it through the bridge, append the observation.
//! Recoverable errors (parse failures, rejected finishes, tool failures)
//! become observations the model can correct next step; transport errors
//! and an exhausted backtrack budget are fatal. The step counter bounds
//! every path, so the loop always terminates in a named state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::bridge::{ExecutionBridge, Observation};
use crate::config::{AgentConfig, Config, InstructorVariant};
use crate::env::SandboxEnvironment;
use crate::llm::{CompletionRequest, LlmClient};
use crate::parser::{ParseError, ParsedCall, ResponseParser};
use crate::prompts;
use crate::tools::ToolRegistry;
use crate::tree::{ConversationTree, MessageId, Role, ToolCallRecord};

use super::context::PromptBuilder;

/// Lifecycle states of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentStatus {
    Running,
    /// Transient: auto-backtrack triggered, guidance being injected
    AwaitingBacktrackGuidance,
    Finished,
    StepLimitExceeded,
    Fatal,
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AgentStatus::Running => "running",
            AgentStatus::AwaitingBacktrackGuidance => "awaiting-backtrack-guidance",
            AgentStatus::Finished => "finished",
            AgentStatus::StepLimitExceeded => "step-limit-exceeded",
            AgentStatus::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// Why a run reached its terminal state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    FinishedByTool,
    StepLimitExceeded,
    FatalError(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::FinishedByTool => f.write_str("finished-by-tool"),
            TerminationReason::StepLimitExceeded => f.write_str("step-limit-exceeded"),
            TerminationReason::FatalError(msg) => write!(f, "fatal-error: {}", msg),
        }
    }
}

/// Per-run counters and status; created at run start, frozen at termination
#[derive(Debug, Clone)]
pub struct AgentRunState {
    pub steps: u32,
    pub step_limit: u32,
    pub backtracks: u32,
    pub status: AgentStatus,
    pub reason: Option<TerminationReason>,
}

/// Final report of a run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: AgentStatus,
    pub reason: TerminationReason,
    pub steps: u32,
    pub backtracks: u32,
    /// The diff submitted via finish, present only on `Finished`
    pub patch: Option<String>,
}

/// ReAct agent: message tree + step state machine over an LLM and a sandbox
pub struct ReactAgent {
    name: String,
    run_id: Uuid,
    parser: ResponseParser,
    registry: ToolRegistry,
    llm: Arc<dyn LlmClient>,
    bridge: ExecutionBridge,
    config: AgentConfig,
    max_tokens: u32,
    tree: ConversationTree,
    state: AgentRunState,
    cancel: Arc<AtomicBool>,
    /// Most recent instructor message (anchor for auto-backtracking)
    instructor_id: Option<MessageId>,
    parse_failures: u32,
}

impl ReactAgent {
    pub fn new(
        name: impl Into<String>,
        config: &Config,
        registry: ToolRegistry,
        llm: Arc<dyn LlmClient>,
        env: Arc<dyn SandboxEnvironment>,
    ) -> Self {
        let bridge = ExecutionBridge::new(
            env,
            Duration::from_millis(config.tools.timeout_ms),
            config.tools.max_output_chars,
        );

        Self {
            name: name.into(),
            run_id: Uuid::now_v7(),
            parser: ResponseParser::new(),
            registry,
            llm,
            bridge,
            config: config.agent.clone(),
            max_tokens: config.llm.max_tokens,
            tree: ConversationTree::new(),
            state: AgentRunState {
                steps: 0,
                step_limit: config.agent.max_steps,
                backtracks: 0,
                status: AgentStatus::Running,
                reason: None,
            },
            cancel: Arc::new(AtomicBool::new(false)),
            instructor_id: None,
            parse_failures: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn tree(&self) -> &ConversationTree {
        &self.tree
    }

    pub fn state(&self) -> &AgentRunState {
        &self.state
    }

    /// Cooperative cancellation handle, checked between steps
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Run the loop until a terminal state
    ///
    /// Never returns `Err` for model, parse, or tool trouble - those are
    /// folded into the report; `Err` means the run was set up twice.
    pub async fn run(&mut self, task: &str) -> eyre::Result<RunReport> {
        if !self.tree.is_empty() {
            eyre::bail!("agent already ran; create a fresh agent per task");
        }
        self.seed(task);
        info!(
            run_id = %self.run_id,
            step_limit = self.state.step_limit,
            tools = ?self.registry.names(),
            "agent: starting run"
        );

        let mut patch: Option<String> = None;

        while self.state.status == AgentStatus::Running {
            if self.cancel.load(Ordering::SeqCst) {
                self.fail("cancelled");
                break;
            }
            if self.state.steps >= self.state.step_limit {
                info!(steps = self.state.steps, "agent: step limit reached");
                self.state.status = AgentStatus::StepLimitExceeded;
                self.state.reason = Some(TerminationReason::StepLimitExceeded);
                break;
            }

            let prompt = PromptBuilder::new(&self.registry, &self.parser).render(&self.tree.head_path());
            let raw = match self.llm.complete(CompletionRequest::new(prompt, self.max_tokens)).await {
                Ok(text) => text,
                Err(e) => {
                    self.fail(format!("transport error: {}", e));
                    break;
                }
            };

            let step = self.state.steps + 1;
            match self.parser.parse(&raw, &self.registry) {
                Ok(call) => {
                    self.parse_failures = 0;
                    let record = ToolCallRecord {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    };
                    self.tree.push(Role::Assistant, raw, Some(record), step);
                    debug!(step, tool = %call.name, "agent: action parsed");

                    match call.name.as_str() {
                        "finish" => {
                            if let Some(diff) = self.handle_finish(&call, step) {
                                patch = Some(diff);
                            }
                        }
                        "add_instructions_and_backtrack" => self.handle_backtrack(&call, step),
                        _ => self.handle_tool(&call, step).await,
                    }
                }
                Err(err) => {
                    self.tree.push(Role::Assistant, raw, None, step);
                    warn!(step, kind = err.kind(), "agent: response failed to parse");
                    self.tree.push(Role::Observation, correction_for(&err), None, step);
                    self.state.steps += 1;
                    self.parse_failures += 1;
                    self.maybe_auto_backtrack();
                }
            }
        }

        let reason = self
            .state
            .reason
            .clone()
            .unwrap_or_else(|| TerminationReason::FatalError("terminated without a recorded reason".to_string()));
        info!(
            run_id = %self.run_id,
            status = %self.state.status,
            reason = %reason,
            steps = self.state.steps,
            backtracks = self.state.backtracks,
            "agent: run terminated"
        );

        Ok(RunReport {
            status: self.state.status,
            reason,
            steps: self.state.steps,
            backtracks: self.state.backtracks,
            patch,
        })
    }

    fn seed(&mut self, task: &str) {
        self.tree.push(Role::System, prompts::SYSTEM_PROMPT, None, 0);
        self.tree.push(Role::User, task, None, 0);
        let instructor_text = match self.config.instructor_variant {
            InstructorVariant::Default => prompts::DEFAULT_INSTRUCTOR.to_string(),
            InstructorVariant::Custom => self.config.instructor_text.clone().unwrap_or_default(),
        };
        let id = self.tree.push(Role::Instructor, instructor_text, None, 0);
        self.instructor_id = Some(id);
    }

    /// Terminate finished, or reject an empty diff when guarded
    fn handle_finish(&mut self, call: &ParsedCall, step: u32) -> Option<String> {
        let diff = call
            .arguments
            .get("patch")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        if self.config.guard_empty_diff && diff.trim().is_empty() {
            warn!(step, "agent: finish rejected, empty diff");
            self.tree.push(
                Role::Observation,
                "empty_diff_rejected: finish requires a non-empty patch. Make your edits, run \
                 stage_and_diff, and pass the diff text as the patch argument.",
                None,
                step,
            );
            self.state.steps += 1;
            return None;
        }

        self.tree.push(Role::Observation, "Run finished.", None, step);
        self.state.steps += 1;
        self.state.status = AgentStatus::Finished;
        self.state.reason = Some(TerminationReason::FinishedByTool);
        Some(diff)
    }

    /// Model-invoked backtracking: move the head, inject new instructions
    fn handle_backtrack(&mut self, call: &ParsedCall, step: u32) {
        if self.state.backtracks >= self.config.max_backtracks {
            self.fail(format!("backtrack limit exceeded ({} allowed)", self.config.max_backtracks));
            return;
        }

        let instructions = call
            .arguments
            .get("instructions")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let target = call.arguments.get("at_message_id").and_then(|v| v.as_i64()).unwrap_or(-1);

        if target < 0 {
            self.tree.push(
                Role::Observation,
                "Error executing add_instructions_and_backtrack: at_message_id must be a non-negative message id",
                None,
                step,
            );
            self.state.steps += 1;
            return;
        }

        match self.tree.set_head(MessageId(target as usize)) {
            Err(e) => {
                self.tree.push(
                    Role::Observation,
                    format!("Error executing add_instructions_and_backtrack: {}", e),
                    None,
                    step,
                );
                self.state.steps += 1;
            }
            Ok(()) => {
                info!(step, target, "agent: backtracked");
                let id = self.tree.push(Role::Instructor, instructions, None, step);
                self.instructor_id = Some(id);
                self.tree.push(
                    Role::Observation,
                    format!("Updated instructions and backtracked to message {}.", target),
                    None,
                    step,
                );
                self.state.steps += 1;
                self.state.backtracks += 1;
            }
        }
    }

    /// Fallback after repeated parse failures; model-invoked backtracking
    /// stays authoritative, this only fires when configured
    fn maybe_auto_backtrack(&mut self) {
        let Some(threshold) = self.config.auto_backtrack_after else {
            return;
        };
        if threshold == 0 || self.parse_failures < threshold {
            return;
        }
        if self.state.backtracks >= self.config.max_backtracks {
            self.fail(format!("backtrack limit exceeded ({} allowed)", self.config.max_backtracks));
            return;
        }
        let Some(anchor) = self.instructor_id else {
            return;
        };

        self.state.status = AgentStatus::AwaitingBacktrackGuidance;
        warn!(failures = self.parse_failures, "agent: auto-backtracking after parse failures");

        if let Err(e) = self.tree.set_head(anchor) {
            self.fail(format!("auto-backtrack failed: {}", e));
            return;
        }
        let guidance = format!(
            "Your last {} responses failed to parse. Respond with exactly one function call \
             using the required response format.",
            self.parse_failures
        );
        let id = self.tree.push(Role::Instructor, guidance, None, self.state.steps);
        self.instructor_id = Some(id);
        self.state.backtracks += 1;
        self.parse_failures = 0;
        self.state.status = AgentStatus::Running;
    }

    /// Resolve and execute an ordinary tool via the bridge
    async fn handle_tool(&mut self, call: &ParsedCall, step: u32) {
        let observation = match self.registry.resolve(&call.name) {
            Some(tool) => self.bridge.execute(tool.as_ref(), &call.arguments).await,
            // Parser validation makes this unreachable in the loop
            None => Observation::failure(format!("unknown tool: {}", call.name)),
        };
        debug!(step, tool = %call.name, success = observation.success, "agent: observation recorded");
        self.tree.push(Role::Observation, observation.content, None, step);
        self.state.steps += 1;
    }

    fn fail(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%reason, "agent: fatal");
        self.state.status = AgentStatus::Fatal;
        self.state.reason = Some(TerminationReason::FatalError(reason));
    }
}

/// Pointed correction fed back to the model after a parse failure
fn correction_for(err: &ParseError) -> String {
    match err {
        ParseError::NoToolCallFound => format!(
            "Error parsing your response ({}): no function call found. End your response with \
             exactly one function call using the response format.",
            err.kind()
        ),
        ParseError::MultipleToolCalls => format!(
            "Error parsing your response ({}): emit exactly one action per turn. Re-emit a \
             single well-formed function call.",
            err.kind()
        ),
        ParseError::UnknownTool { name } => format!(
            "Error parsing your response ({}): '{}' is not an available tool. Use one of the \
             functions listed in the system message.",
            err.kind(),
            name
        ),
        ParseError::MalformedArguments { field, reason } => format!(
            "Error parsing your response ({}): argument '{}': {}. Fix that argument and \
             re-emit the call.",
            err.kind(),
            field,
            reason
        ),
    }
}
