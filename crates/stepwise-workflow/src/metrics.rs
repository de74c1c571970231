use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stepwise_config::{NodeType, WorkflowDefinition};

/// Minutes a node of each type is expected to take, used for
/// [`WorkflowMetrics::estimated_duration`].
#[derive(Debug, Clone, PartialEq)]
pub struct DurationTable {
  minutes: BTreeMap<NodeType, f64>,
  fallback_minutes: f64,
}

impl DurationTable {
  /// Minutes charged for types missing from the table.
  pub const DEFAULT_FALLBACK_MINUTES: f64 = 5.0;

  /// An empty table: every type costs `fallback_minutes`.
  pub fn with_fallback(fallback_minutes: f64) -> Self {
    Self {
      minutes: BTreeMap::new(),
      fallback_minutes,
    }
  }

  /// Set the duration for one node type.
  pub fn set(&mut self, node_type: NodeType, minutes: f64) -> &mut Self {
    self.minutes.insert(node_type, minutes);
    self
  }

  pub fn set_fallback(&mut self, minutes: f64) -> &mut Self {
    self.fallback_minutes = minutes;
    self
  }

  pub fn minutes_for(&self, node_type: NodeType) -> f64 {
    self
      .minutes
      .get(&node_type)
      .copied()
      .unwrap_or(self.fallback_minutes)
  }
}

impl Default for DurationTable {
  fn default() -> Self {
    let mut table = Self::with_fallback(Self::DEFAULT_FALLBACK_MINUTES);
    table
      .set(NodeType::Start, 0.0)
      .set(NodeType::End, 0.0)
      .set(NodeType::Condition, 0.1)
      .set(NodeType::Webhook, 0.5)
      .set(NodeType::ApiCall, 1.0)
      .set(NodeType::AiAgent, 2.0)
      .set(NodeType::Task, 5.0)
      .set(NodeType::HumanTask, 15.0)
      .set(NodeType::Approval, 60.0);
    table
  }
}

/// Structural summary of a definition, for display and sizing only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowMetrics {
  pub total_nodes: usize,
  pub total_edges: usize,
  /// Nodes + edges, with each condition or approval node counted twice more.
  pub complexity: usize,
  /// Rough wall-clock estimate in minutes. A heuristic, not a guarantee:
  /// it sums per-type averages and ignores parallelism.
  pub estimated_duration: f64,
  /// Occurrences of each node type present.
  pub node_types: BTreeMap<NodeType, usize>,
}

/// Compute metrics with the default duration table.
pub fn metrics(definition: &WorkflowDefinition) -> WorkflowMetrics {
  metrics_with(definition, &DurationTable::default())
}

/// Compute metrics with a custom duration table.
pub fn metrics_with(definition: &WorkflowDefinition, durations: &DurationTable) -> WorkflowMetrics {
  let mut node_types = BTreeMap::new();
  let mut decisions = 0;
  let mut estimated_duration = 0.0;

  for node in &definition.nodes {
    *node_types.entry(node.node_type).or_insert(0) += 1;
    if node.node_type.is_decision() {
      decisions += 1;
    }
    estimated_duration += durations.minutes_for(node.node_type);
  }

  let total_nodes = definition.nodes.len();
  let total_edges = definition.edges.len();

  WorkflowMetrics {
    total_nodes,
    total_edges,
    complexity: total_nodes + total_edges + 2 * decisions,
    estimated_duration,
    node_types,
  }
}
