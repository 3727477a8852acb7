//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Reagent - ReAct agent for automated software-engineering tasks
#[derive(Parser)]
#[command(
    name = "ra",
    about = "ReAct agent that fixes repository tasks through an LLM tool loop",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Run the agent on a single task
    Run {
        /// Task statement (problem description)
        #[arg(long, conflicts_with = "task_file")]
        task: Option<String>,

        /// Read the task statement from a file
        #[arg(long)]
        task_file: Option<PathBuf>,

        /// Working directory holding the repository under repair
        #[arg(long, default_value = ".")]
        workdir: PathBuf,

        /// Output directory for trajectory and patch
        #[arg(short, long, default_value = "outputs")]
        output: PathBuf,

        /// Override the configured step budget
        #[arg(long)]
        max_steps: Option<u32>,

        /// Enable the add_instructions_and_backtrack tool
        #[arg(long)]
        backtrack: bool,

        /// Enable the optional file/search/test tools
        #[arg(long)]
        optional_tools: bool,

        /// Reject finish calls that carry an empty diff
        #[arg(long)]
        guard_empty_diff: bool,

        /// Custom instructor prompt text (switches to the custom variant)
        #[arg(long)]
        instructor: Option<String>,

        /// Override the configured model
        #[arg(long)]
        model: Option<String>,
    },

    /// List the tool vocabulary for a given configuration
    Tools {
        /// Include the backtracking tool
        #[arg(long)]
        backtrack: bool,

        /// Include the optional file/search/test tools
        #[arg(long)]
        optional_tools: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "ra",
            "run",
            "--task",
            "fix the bug",
            "--max-steps",
            "20",
            "--backtrack",
            "--guard-empty-diff",
        ])
        .unwrap();

        match cli.command {
            Command::Run {
                task,
                max_steps,
                backtrack,
                optional_tools,
                guard_empty_diff,
                ..
            } => {
                assert_eq!(task.as_deref(), Some("fix the bug"));
                assert_eq!(max_steps, Some(20));
                assert!(backtrack);
                assert!(!optional_tools);
                assert!(guard_empty_diff);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_task_conflicts_with_task_file() {
        let result = Cli::try_parse_from(["ra", "run", "--task", "x", "--task-file", "t.md"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parses_tools() {
        let cli = Cli::try_parse_from(["ra", "tools", "--optional-tools"]).unwrap();
        match cli.command {
            Command::Tools {
                backtrack,
                optional_tools,
            } => {
                assert!(!backtrack);
                assert!(optional_tools);
            }
            _ => panic!("expected tools command"),
        }
    }
}
