//! Level-ordered execution planning.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use stepwise_config::WorkflowDefinition;
use tracing::{debug, instrument};

use crate::graph::Graph;

/// Order in which an executor may run a workflow's nodes.
///
/// Nodes within one parallel group have all their predecessors in earlier
/// groups and may run concurrently. `execution_order` is the groups flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionPlan {
  pub execution_order: Vec<String>,
  /// node_id -> sources of every edge that targets it, in edge order.
  pub dependencies: BTreeMap<String, Vec<String>>,
  pub parallel_groups: Vec<Vec<String>>,
}

impl ExecutionPlan {
  /// Number of planned nodes.
  pub fn len(&self) -> usize {
    self.execution_order.len()
  }

  pub fn is_empty(&self) -> bool {
    self.execution_order.is_empty()
  }

  /// Index of the parallel group containing the node.
  pub fn group_of(&self, node_id: &str) -> Option<usize> {
    self
      .parallel_groups
      .iter()
      .position(|group| group.iter().any(|id| id == node_id))
  }

  /// Whether every node of the definition was scheduled.
  pub fn is_complete_for(&self, definition: &WorkflowDefinition) -> bool {
    let planned: HashSet<&str> = self.execution_order.iter().map(String::as_str).collect();
    definition
      .nodes
      .iter()
      .all(|n| planned.contains(n.id.as_str()))
  }
}

/// Compute the execution plan with Kahn's algorithm.
///
/// Every node without incoming edges seeds the first group. Within a group,
/// nodes keep their authoring order. Edges with an unknown endpoint are
/// ignored. Nodes on a cycle, or downstream of one, never become ready and
/// are left out of the plan: run [`crate::validate`] first when full coverage
/// matters.
#[instrument(
  name = "workflow_plan",
  skip(definition),
  fields(nodes = definition.nodes.len(), edges = definition.edges.len())
)]
pub fn plan(definition: &WorkflowDefinition) -> ExecutionPlan {
  let graph = Graph::new(definition);

  let mut in_degree: HashMap<&str, usize> = graph
    .node_ids()
    .iter()
    .map(|id| (*id, graph.upstream(id).len()))
    .collect();

  let mut ready: Vec<&str> = graph.entry_points().to_vec();
  let mut execution_order = Vec::with_capacity(graph.node_ids().len());
  let mut parallel_groups = Vec::new();

  while !ready.is_empty() {
    let mut next = Vec::new();
    for node_id in &ready {
      for &down in graph.downstream(node_id) {
        if let Some(degree) = in_degree.get_mut(down) {
          *degree -= 1;
          if *degree == 0 {
            next.push(down);
          }
        }
      }
    }
    next.sort_by_key(|id| graph.position(id));

    let group: Vec<String> = ready.iter().map(|id| id.to_string()).collect();
    execution_order.extend(group.iter().cloned());
    parallel_groups.push(group);
    ready = next;
  }

  let dependencies = dependencies(definition, &graph);

  let planned = execution_order.len();
  let skipped = graph.node_ids().len() - planned;
  if skipped > 0 {
    debug!(planned, skipped, "nodes left unplanned (cycle)");
  }
  debug!(groups = parallel_groups.len(), planned, "execution plan built");

  ExecutionPlan {
    execution_order,
    dependencies,
    parallel_groups,
  }
}

/// Direct predecessors per node, unfiltered: dangling and cyclic sources stay.
fn dependencies(
  definition: &WorkflowDefinition,
  graph: &Graph<'_>,
) -> BTreeMap<String, Vec<String>> {
  let mut dependencies: BTreeMap<String, Vec<String>> = graph
    .node_ids()
    .iter()
    .map(|id| (id.to_string(), Vec::new()))
    .collect();

  for edge in &definition.edges {
    if let Some(sources) = dependencies.get_mut(&edge.target) {
      sources.push(edge.source.clone());
    }
  }

  dependencies
}
