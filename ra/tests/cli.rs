//! CLI smoke tests

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_describes_the_agent() {
    Command::cargo_bin("ra")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ReAct agent"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("tools"));
}

#[test]
fn tools_lists_mandatory_vocabulary() {
    Command::cargo_bin("ra")
        .unwrap()
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("finish(patch: str)"))
        .stdout(predicate::str::contains("run_bash_cmd"));
}

#[test]
fn tools_with_optional_suite() {
    Command::cargo_bin("ra")
        .unwrap()
        .args(["tools", "--backtrack", "--optional-tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("add_instructions_and_backtrack"))
        .stdout(predicate::str::contains("replace_in_file"))
        .stdout(predicate::str::contains("stage_and_diff"));
}

#[test]
fn run_without_task_fails() {
    Command::cargo_bin("ra")
        .unwrap()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--task"));
}
