mod config;
mod telemetry;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use stepwise_canvas::CanvasGraph;
use stepwise_config::WorkflowDefinition;
use stepwise_workflow::{CompileError, Compiler, metrics_with, plan, validate};

use crate::config::Config;

/// Stepwise - compile visual workflow graphs into validated execution plans
#[derive(Parser)]
#[command(name = "stepwise")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to a JSON config file (default: <config dir>/stepwise/config.json)
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Treat input files as visual editor graphs instead of definitions
  #[arg(long, global = true)]
  canvas: bool,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Check the workflow structure and list every problem
  Validate {
    /// Path to the workflow file, or `-` for stdin
    workflow_file: PathBuf,
  },

  /// Print the level-ordered execution plan
  Plan {
    /// Path to the workflow file, or `-` for stdin
    workflow_file: PathBuf,
  },

  /// Print complexity and duration estimates
  Metrics {
    /// Path to the workflow file, or `-` for stdin
    workflow_file: PathBuf,
  },

  /// Validate, then print the plan and metrics
  Compile {
    /// Path to the workflow file, or `-` for stdin
    workflow_file: PathBuf,
  },

  /// Print the canonical definition of a workflow
  Import {
    /// Path to the workflow file, or `-` for stdin
    workflow_file: PathBuf,
  },

  /// Print the visual editor graph of a workflow
  Export {
    /// Path to the workflow file, or `-` for stdin
    workflow_file: PathBuf,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  telemetry::init_tracing()?;

  let Some(command) = cli.command else {
    println!("stepwise - use --help to see available commands");
    return Ok(());
  };

  let config = Config::load(cli.config.as_deref())?;
  let durations = config.duration_table()?;

  match command {
    Commands::Validate { workflow_file } => {
      let def = load_definition(&workflow_file, cli.canvas)?;
      let result = validate(&def);
      print_json(&result)?;
      if !result.is_valid() {
        bail!("workflow is invalid ({} issue(s))", result.errors().len());
      }
    }
    Commands::Plan { workflow_file } => {
      let def = load_definition(&workflow_file, cli.canvas)?;
      print_json(&plan(&def))?;
    }
    Commands::Metrics { workflow_file } => {
      let def = load_definition(&workflow_file, cli.canvas)?;
      print_json(&metrics_with(&def, &durations))?;
    }
    Commands::Compile { workflow_file } => {
      let def = load_definition(&workflow_file, cli.canvas)?;
      compile(&def, Compiler::new(durations))?;
    }
    Commands::Import { workflow_file } => {
      let def = load_definition(&workflow_file, cli.canvas)?;
      print_json(&def)?;
    }
    Commands::Export { workflow_file } => {
      let def = load_definition(&workflow_file, cli.canvas)?;
      print_json(&CanvasGraph::from_definition(&def))?;
    }
  }

  Ok(())
}

fn compile(def: &WorkflowDefinition, compiler: Compiler) -> Result<()> {
  match compiler.compile(def) {
    Ok(compiled) => {
      let output = serde_json::json!({
        "plan": compiled.plan,
        "metrics": compiled.metrics,
      });
      print_json(&output)
    }
    Err(CompileError::Invalid { issues }) => {
      for issue in &issues {
        eprintln!("  - {}", issue);
      }
      bail!("workflow failed validation with {} issue(s)", issues.len())
    }
    Err(e) => Err(e).context("failed to compile workflow"),
  }
}

/// Read a definition, or a canvas graph converted to one.
fn load_definition(path: &Path, canvas: bool) -> Result<WorkflowDefinition> {
  let content = read_input(path)?;

  let def = if canvas {
    let graph: CanvasGraph = serde_json::from_str(&content)
      .with_context(|| format!("failed to parse canvas graph: {}", path.display()))?;
    graph
      .into_definition()
      .with_context(|| format!("invalid canvas graph: {}", path.display()))?
  } else {
    WorkflowDefinition::from_json(&content)
      .with_context(|| format!("failed to load workflow file: {}", path.display()))?
  };

  debug!(
    nodes = def.nodes.len(),
    edges = def.edges.len(),
    "loaded workflow definition"
  );
  Ok(def)
}

fn read_input(path: &Path) -> Result<String> {
  if path != Path::new("-") {
    return std::fs::read_to_string(path)
      .with_context(|| format!("failed to read workflow file: {}", path.display()));
  }

  if io::stdin().is_terminal() {
    bail!("no workflow piped on stdin");
  }

  let mut input = String::new();
  io::stdin()
    .read_to_string(&mut input)
    .context("failed to read workflow from stdin")?;
  Ok(input)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
