//! End-to-end agent runs against a real local sandbox with a scripted model

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::tempdir;

use reagent::agent::{AgentStatus, ReactAgent, TerminationReason};
use reagent::config::Config;
use reagent::env::LocalEnvironment;
use reagent::llm::{CompletionRequest, LlmClient, LlmError};
use reagent::parser::{ARG_SEP, BEGIN_CALL, END_CALL};
use reagent::tools::builtin::standard_registry;
use reagent::trajectory::Trajectory;

/// Replays scripted responses; errors once the script runs out
struct ScriptedLlm {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedLlm {
    fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
        self.responses
            .lock()
            .expect("scripted responses lock")
            .pop_front()
            .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))
    }
}

fn call(name: &str, args: &[(&str, &str)]) -> String {
    let mut out = format!("reasoning...\n{}\n{}\n", BEGIN_CALL, name);
    for (arg_name, arg_value) in args {
        out.push_str(&format!("{}\n{}\n{}\n", ARG_SEP, arg_name, arg_value));
    }
    out.push_str(END_CALL);
    out
}

fn agent_in(
    dir: &std::path::Path,
    responses: Vec<String>,
    mutate: impl FnOnce(&mut Config),
) -> ReactAgent {
    let mut config = Config::default();
    config.agent.max_steps = 10;
    mutate(&mut config);
    let registry = standard_registry(config.agent.backtracking_enabled, config.agent.optional_tools_enabled)
        .expect("builtin registry");
    ReactAgent::new(
        "swe-agent",
        &config,
        registry,
        Arc::new(ScriptedLlm::new(responses)),
        Arc::new(LocalEnvironment::new(dir.to_path_buf())),
    )
}

#[tokio::test]
async fn run_bash_then_finish() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("hello.txt"), "hi\n").unwrap();

    let mut agent = agent_in(
        temp.path(),
        vec![
            call("run_bash_cmd", &[("command", "ls")]),
            call("finish", &[("patch", "diff --git a/hello.txt b/hello.txt")]),
        ],
        |_| {},
    );

    let report = agent.run("list the directory, then finish").await.unwrap();

    assert_eq!(report.status, AgentStatus::Finished);
    assert_eq!(report.steps, 2);
    // The directory listing came back as an observation
    let observations: Vec<&str> = agent
        .tree()
        .messages()
        .iter()
        .filter(|m| m.content.contains("hello.txt"))
        .map(|m| m.content.as_str())
        .collect();
    assert!(!observations.is_empty());
}

#[tokio::test]
async fn failed_command_is_a_correctable_observation() {
    let temp = tempdir().unwrap();
    let mut agent = agent_in(
        temp.path(),
        vec![
            call("run_bash_cmd", &[("command", "cat missing-file.txt")]),
            call("finish", &[("patch", "diff")]),
        ],
        |_| {},
    );

    let report = agent.run("task").await.unwrap();

    // The failure did not kill the run; the model got to correct course
    assert_eq!(report.status, AgentStatus::Finished);
    let contents: Vec<&str> = agent.tree().messages().iter().map(|m| m.content.as_str()).collect();
    assert!(contents.iter().any(|c| c.contains("Error executing run_bash_cmd")));
}

#[tokio::test]
async fn optional_tools_drive_a_file_edit() {
    let temp = tempdir().unwrap();
    std::fs::write(temp.path().join("app.py"), "def f():\n    return 1\n").unwrap();

    let mut agent = agent_in(
        temp.path(),
        vec![
            call("show_file", &[("file_path", "app.py")]),
            call(
                "replace_in_file",
                &[
                    ("file_path", "app.py"),
                    ("from_line", "2"),
                    ("to_line", "2"),
                    ("content", "    return 2"),
                ],
            ),
            call("finish", &[("patch", "diff")]),
        ],
        |c| c.agent.optional_tools_enabled = true,
    );

    let report = agent.run("make f return 2").await.unwrap();

    assert_eq!(report.status, AgentStatus::Finished);
    let edited = std::fs::read_to_string(temp.path().join("app.py")).unwrap();
    assert_eq!(edited, "def f():\n    return 2\n");
}

#[tokio::test]
async fn guard_blocks_empty_patch_until_real_diff() {
    let temp = tempdir().unwrap();
    let mut agent = agent_in(
        temp.path(),
        vec![
            call("finish", &[("patch", "")]),
            call("finish", &[("patch", "diff --git a/x b/x\n+fix")]),
        ],
        |c| c.agent.guard_empty_diff = true,
    );

    let report = agent.run("task").await.unwrap();

    assert_eq!(report.status, AgentStatus::Finished);
    assert_eq!(report.steps, 2);
    assert_eq!(report.patch.as_deref(), Some("diff --git a/x b/x\n+fix"));
}

#[tokio::test]
async fn unparseable_output_exhausts_step_budget() {
    let temp = tempdir().unwrap();
    let noise: Vec<String> = (0..5).map(|i| format!("I am thinking about step {}", i)).collect();
    let mut agent = agent_in(temp.path(), noise, |c| c.agent.max_steps = 4);

    let report = agent.run("task").await.unwrap();

    assert_eq!(report.status, AgentStatus::StepLimitExceeded);
    assert_eq!(report.reason, TerminationReason::StepLimitExceeded);
    assert_eq!(report.steps, 4);
    assert!(report.patch.is_none());
}

#[tokio::test]
async fn backtracking_rewrites_the_live_context() {
    let temp = tempdir().unwrap();
    let mut agent = agent_in(
        temp.path(),
        vec![
            call("run_bash_cmd", &[("command", "echo dead-end")]),
            // Instructor seed is message id 2
            call(
                "add_instructions_and_backtrack",
                &[("instructions", "inspect tests first"), ("at_message_id", "2")],
            ),
            call("finish", &[("patch", "diff")]),
        ],
        |c| c.agent.backtracking_enabled = true,
    );

    let report = agent.run("task").await.unwrap();

    assert_eq!(report.status, AgentStatus::Finished);
    assert_eq!(report.backtracks, 1);

    let live: Vec<&str> = agent.tree().head_path().iter().map(|m| m.content.as_str()).collect();
    assert!(live.iter().any(|c| c.contains("inspect tests first")));
    assert!(!live.iter().any(|c| c.contains("dead-end")));

    // The abandoned branch is preserved and marked
    let dead = agent
        .tree()
        .messages()
        .iter()
        .find(|m| m.content.contains("dead-end"))
        .unwrap();
    assert!(dead.superseded);
}

#[tokio::test]
async fn transport_failure_still_yields_a_trajectory() {
    let temp = tempdir().unwrap();
    let mut agent = agent_in(temp.path(), vec![], |_| {});

    let report = agent.run("task").await.unwrap();
    assert_eq!(report.status, AgentStatus::Fatal);

    let out = tempdir().unwrap();
    let path = out.path().join("run.traj.json");
    Trajectory::new(&agent, &report).save(&path).unwrap();

    let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["status"], "fatal");
    // Seed messages survive even a zero-step run
    assert_eq!(value["messages"].as_array().unwrap().len(), 3);
}
