//! Stagehand CLI - routes task descriptions to specialized agents.
#![cfg_attr(
    test,
    allow(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        reason = "Allow for tests"
    )
)]
#![allow(clippy::print_stdout, reason = "CLI report output")]

use anyhow::Result;
use chrono::Utc;
use clap::Parser as _;
use stagehand_core::{DirectorConfig, Error};
use stagehand_routing::{AgentDirector, Direction};
use tracing_subscriber::EnvFilter;

use cli::Cli;

mod cli;
mod lookup;

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let (description, task_id) = resolve_task(&cli, &config)?;

    let mut director = AgentDirector::from_config(&config);
    let direction = director.evaluate_and_direct(&description, &task_id);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&direction)?);
    } else {
        print_report(&direction);
    }

    Ok(())
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration, then applies command-line directory overrides.
fn load_config(cli: &Cli) -> Result<DirectorConfig> {
    let mut config = match &cli.config {
        Some(path) => DirectorConfig::load_from_file(path)?,
        None => DirectorConfig::load_or_create()?,
    };

    if let Some(agents_dir) = &cli.agents_dir {
        config.registry.agents_dir.clone_from(agents_dir);
    }
    if let Some(plans_dir) = &cli.plans_dir {
        config.plans.plans_dir.clone_from(plans_dir);
    }

    Ok(config)
}

/// Resolves the positional arguments into a description and a task id.
///
/// One argument is an ad-hoc request with a synthesized id. Two arguments
/// are either a 4-digit plan id plus a task id to look up, or a custom
/// description plus a task id.
fn resolve_task(cli: &Cli, config: &DirectorConfig) -> Result<(String, String)> {
    let Some(second) = &cli.second else {
        let task_id = format!("adhoc-{}", Utc::now().timestamp_millis());
        tracing::info!("📝 Adhoc request, generated id {task_id}");
        return Ok((cli.first.clone(), task_id));
    };

    if is_plan_id(&cli.first) {
        let Some(description) =
            lookup::lookup_task_description(&config.plans.plans_dir, &cli.first, second)
        else {
            return Err(Error::TaskNotFound {
                task_id: second.clone(),
                plan_id: cli.first.clone(),
            }
            .into());
        };
        tracing::info!("📋 Plan {} task {second}", cli.first);
        return Ok((description, second.clone()));
    }

    Ok((cli.first.clone(), second.clone()))
}

/// Plan ids are exactly four ASCII digits.
fn is_plan_id(value: &str) -> bool {
    value.len() == 4 && value.chars().all(|character| character.is_ascii_digit())
}

fn print_report(direction: &Direction) {
    println!("DIRECTION");
    println!("{}", "=".repeat(50));
    println!("Decision: {}", direction.decision);
    println!("Instructions: {}", direction.instructions);

    if let Some(agent) = &direction.agent {
        println!();
        println!("Agent: {agent}");
        println!("Confidence: {:.1}%", direction.confidence * 100.0);
        if let Some(model) = &direction.model {
            println!("Model: {model}");
        }
        if let Some(optimization) = &direction.context_optimization {
            println!(
                "Context: {} tokens ({})",
                optimization.recommended, optimization.strategy
            );
        }
    }

    if !direction.fallback_options.is_empty() {
        println!();
        println!("Fallback options:");
        for option in &direction.fallback_options {
            println!(
                "  {} ({:.1}%)",
                option.agent,
                option.confidence * 100.0
            );
        }
    }

    if let Some(gap) = &direction.gap_analysis {
        println!();
        println!("Gap analysis:");
        println!("  Suggested agent: {}", gap.suggested_agent);
        println!("  Domains: {}", gap.domains.join(", "));
        println!("  Capabilities: {}", gap.capabilities.join(", "));
        println!("  Reasoning: {}", gap.reasoning);
    }
}
