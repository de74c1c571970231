use serde::Serialize;
use stepwise_config::WorkflowDefinition;
use tracing::{info, instrument, warn};

use crate::error::CompileError;
use crate::graph::Graph;
use crate::metrics::{DurationTable, WorkflowMetrics, metrics_with};
use crate::planner::{ExecutionPlan, plan};
use crate::validator::validate;

/// A validated workflow with its plan and metrics, ready to hand to an executor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledWorkflow {
  pub definition: WorkflowDefinition,
  pub plan: ExecutionPlan,
  pub metrics: WorkflowMetrics,
}

impl CompiledWorkflow {
  /// Build the graph structure for traversal.
  pub fn graph(&self) -> Graph<'_> {
    Graph::new(&self.definition)
  }
}

/// Runs validation as a gate, then planning and metrics.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
  durations: DurationTable,
}

impl Compiler {
  /// Create a compiler that estimates durations with the given table.
  pub fn new(durations: DurationTable) -> Self {
    Self { durations }
  }

  pub fn durations(&self) -> &DurationTable {
    &self.durations
  }

  /// Compile a definition.
  ///
  /// This process:
  /// 1. Rejects duplicate node or edge ids
  /// 2. Validates the graph structure, failing with every issue found
  /// 3. Builds the execution plan and metrics
  #[instrument(
    name = "workflow_compile",
    skip(self, definition),
    fields(nodes = definition.nodes.len(), edges = definition.edges.len())
  )]
  pub fn compile(&self, definition: &WorkflowDefinition) -> Result<CompiledWorkflow, CompileError> {
    definition.check_ids()?;

    let validation = validate(definition);
    if !validation.is_valid() {
      let issues = validation.into_errors();
      warn!(issue_count = issues.len(), "workflow rejected");
      return Err(CompileError::Invalid { issues });
    }

    let plan = plan(definition);
    let metrics = metrics_with(definition, &self.durations);

    info!(
      groups = plan.parallel_groups.len(),
      complexity = metrics.complexity,
      estimated_minutes = metrics.estimated_duration,
      "workflow compiled"
    );

    Ok(CompiledWorkflow {
      definition: definition.clone(),
      plan,
      metrics,
    })
  }
}
