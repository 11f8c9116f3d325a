use clap::Parser;
use std::path::PathBuf;

const KEYWORD_REFERENCE: &str = "\
ROUTING KEYWORDS:
  eventTypes:      eventTypes, event types, component analysis, workflow orchestration
  react:           react, component, jsx, ui, frontend
  workflows:       workflow, trigger, integration, process
  sql:             sql, schema, database, table
  ui:              layout, design, accessibility, ux
  codeAnalysis:    dead code, dependencies, cleanup, refactor
  infrastructure:  infrastructure, app startup, routing, configuration
  routing:         routing, routes, navigation, router

EXAMPLES:
  stagehand \"validate eventTypes structure\"        # Adhoc request
  stagehand 0041 2.2                               # Plan + task id
  stagehand \"fix the login form\" 2.2               # Description + task id

CONFIDENCE LEVELS:
  >= 60%  execute immediately
  >= 30%  execute with caution, fallbacks listed
  <  30%  suggest creating a new agent";

/// Command-line arguments for the stagehand binary.
#[derive(Debug, Parser)]
#[command(
    name = "stagehand",
    about = "Routes tasks to specialized agents by domain expertise",
    after_help = KEYWORD_REFERENCE
)]
pub struct Cli {
    /// Task description, or a 4-digit plan id when a task id follows.
    pub first: String,

    /// Task id, looked up in the plan when the first argument is a plan id.
    pub second: Option<String>,

    /// Directory of agent definition documents.
    #[arg(long, value_name = "DIR")]
    pub agents_dir: Option<PathBuf>,

    /// Directory containing plan folders with task list documents.
    #[arg(long, value_name = "DIR")]
    pub plans_dir: Option<PathBuf>,

    /// Configuration file path, defaults to ~/.stagehand/config.toml.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the direction as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,
}
