//! ra - ReAct agent CLI entry point

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use tracing::{debug, info};

use reagent::agent::{AgentStatus, ReactAgent};
use reagent::cli::{Cli, Command};
use reagent::config::{Config, InstructorVariant};
use reagent::env::LocalEnvironment;
use reagent::llm::create_client;
use reagent::tools::{builtin::standard_registry, signature};
use reagent::trajectory::Trajectory;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    let level = match cli_log_level.map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Run {
            task,
            task_file,
            workdir,
            output,
            max_steps,
            backtrack,
            optional_tools,
            guard_empty_diff,
            instructor,
            model,
        } => {
            let mut config = config;
            apply_overrides(
                &mut config,
                max_steps,
                backtrack,
                optional_tools,
                guard_empty_diff,
                instructor,
                model,
            );

            let task_text = resolve_task(task, task_file)?;
            cmd_run(&config, &task_text, &workdir, &output).await
        }
        Command::Tools {
            backtrack,
            optional_tools,
        } => cmd_tools(backtrack, optional_tools),
    }
}

/// Fold CLI flags into the loaded configuration
fn apply_overrides(
    config: &mut Config,
    max_steps: Option<u32>,
    backtrack: bool,
    optional_tools: bool,
    guard_empty_diff: bool,
    instructor: Option<String>,
    model: Option<String>,
) {
    if let Some(steps) = max_steps {
        config.agent.max_steps = steps;
    }
    if backtrack {
        config.agent.backtracking_enabled = true;
    }
    if optional_tools {
        config.agent.optional_tools_enabled = true;
    }
    if guard_empty_diff {
        config.agent.guard_empty_diff = true;
    }
    if let Some(text) = instructor {
        config.agent.instructor_variant = InstructorVariant::Custom;
        config.agent.instructor_text = Some(text);
    }
    if let Some(m) = model {
        config.llm.model = m;
    }
}

fn resolve_task(task: Option<String>, task_file: Option<PathBuf>) -> Result<String> {
    match (task, task_file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => {
            fs::read_to_string(&path).context(format!("Failed to read task file {}", path.display()))
        }
        (None, None) => Err(eyre::eyre!("Provide a task with --task or --task-file")),
    }
}

/// Run the agent on one task and persist its outputs
async fn cmd_run(config: &Config, task: &str, workdir: &PathBuf, output: &PathBuf) -> Result<()> {
    config.validate()?;

    let workdir = workdir
        .canonicalize()
        .context(format!("Working directory not found: {}", workdir.display()))?;
    debug!(workdir = %workdir.display(), "cmd_run: resolved working directory");

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let env = Arc::new(LocalEnvironment::new(workdir));
    let registry = standard_registry(config.agent.backtracking_enabled, config.agent.optional_tools_enabled)?;

    let mut agent = ReactAgent::new("swe-agent", config, registry, llm, env);
    info!(run_id = %agent.run_id(), model = %config.llm.model, "starting agent run");

    println!("Running task ({} step budget)...", config.agent.max_steps);
    let report = agent.run(task).await?;

    // Trajectory is written on every terminal state
    let traj_path = output.join(format!("{}.traj.json", agent.run_id()));
    Trajectory::new(&agent, &report).save(&traj_path)?;
    println!("Trajectory: {}", traj_path.display());

    if let Some(patch) = &report.patch {
        let patch_path = output.join(format!("{}.patch", agent.run_id()));
        fs::write(&patch_path, patch).context("Failed to write patch")?;
        println!("Patch: {}", patch_path.display());
    }

    match report.status {
        AgentStatus::Finished => {
            println!(
                "\n✓ Finished in {} steps ({} backtracks)",
                report.steps, report.backtracks
            );
            Ok(())
        }
        status => {
            println!("\n✗ Run ended without finishing: {} ({})", status, report.reason);
            std::process::exit(1);
        }
    }
}

/// Print the tool vocabulary for the given toggles
fn cmd_tools(backtrack: bool, optional_tools: bool) -> Result<()> {
    let registry = standard_registry(backtrack, optional_tools)?;

    println!("Registered tools:");
    println!();
    for tool in registry.list() {
        println!("  {}", signature(tool.as_ref()));
        println!("    {}", tool.description());
        println!();
    }
    Ok(())
}
