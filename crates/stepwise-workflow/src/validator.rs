//! Structural validation of workflow definitions.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Serialize, Serializer};
use stepwise_config::{NodeType, WorkflowDefinition};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::graph::Graph;

/// A single structural problem. The `Display` text is what users see.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
  #[error("workflow must have at least one start node")]
  MissingStart,

  #[error("workflow can only have one start node (found {count})")]
  MultipleStarts { count: usize },

  #[error("workflow must have at least one end node")]
  MissingEnd,

  /// Non-start/end nodes that no edge touches.
  #[error("orphan nodes found: {}", .labels.join(", "))]
  OrphanNodes { labels: Vec<String> },

  #[error("workflow contains circular dependencies")]
  CircularDependency,

  #[error("edge '{edge_id}' references non-existent {endpoint} node '{node_id}'")]
  DanglingEdge {
    edge_id: String,
    endpoint: EdgeEndpoint,
    node_id: String,
  },

  #[error("start nodes cannot have incoming connections (edge '{edge_id}' into '{node_id}')")]
  IncomingToStart { edge_id: String, node_id: String },

  #[error("end nodes cannot have outgoing connections (edge '{edge_id}' from '{node_id}')")]
  OutgoingFromEnd { edge_id: String, node_id: String },
}

impl Serialize for ValidationIssue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

/// Which end of an edge a dangling reference sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEndpoint {
  Source,
  Target,
}

impl fmt::Display for EdgeEndpoint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EdgeEndpoint::Source => f.write_str("source"),
      EdgeEndpoint::Target => f.write_str("target"),
    }
  }
}

/// Outcome of one validation call. Valid exactly when there are no errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
  is_valid: bool,
  errors: Vec<ValidationIssue>,
}

impl ValidationResult {
  pub fn from_issues(errors: Vec<ValidationIssue>) -> Self {
    Self {
      is_valid: errors.is_empty(),
      errors,
    }
  }

  pub fn is_valid(&self) -> bool {
    self.is_valid
  }

  /// Issues in check order.
  pub fn errors(&self) -> &[ValidationIssue] {
    &self.errors
  }

  pub fn into_errors(self) -> Vec<ValidationIssue> {
    self.errors
  }

  /// Issues rendered as user-facing messages.
  pub fn messages(&self) -> Vec<String> {
    self.errors.iter().map(ToString::to_string).collect()
  }
}

/// Check a definition and report every structural violation found.
///
/// Checks run in a fixed order: entry cardinality, exit cardinality, orphans,
/// cycles, dangling edge endpoints, then edge direction at start/end nodes.
/// Never fails; malformed graphs produce issues, not errors.
#[instrument(
  name = "workflow_validate",
  skip(definition),
  fields(nodes = definition.nodes.len(), edges = definition.edges.len())
)]
pub fn validate(definition: &WorkflowDefinition) -> ValidationResult {
  let graph = Graph::new(definition);
  let mut issues = Vec::new();

  check_entry(definition, &mut issues);
  check_exit(definition, &mut issues);
  check_orphans(definition, &mut issues);
  if graph.has_cycle() {
    issues.push(ValidationIssue::CircularDependency);
  }
  check_edge_endpoints(definition, &graph, &mut issues);
  check_direction(definition, &mut issues);

  let result = ValidationResult::from_issues(issues);
  debug!(
    is_valid = result.is_valid(),
    error_count = result.errors().len(),
    "workflow validated"
  );
  result
}

fn check_entry(definition: &WorkflowDefinition, issues: &mut Vec<ValidationIssue>) {
  match definition.nodes_of_type(NodeType::Start).count() {
    0 => issues.push(ValidationIssue::MissingStart),
    1 => {}
    count => issues.push(ValidationIssue::MultipleStarts { count }),
  }
}

fn check_exit(definition: &WorkflowDefinition, issues: &mut Vec<ValidationIssue>) {
  if definition.nodes_of_type(NodeType::End).next().is_none() {
    issues.push(ValidationIssue::MissingEnd);
  }
}

fn check_orphans(definition: &WorkflowDefinition, issues: &mut Vec<ValidationIssue>) {
  let connected: HashSet<&str> = definition
    .edges
    .iter()
    .flat_map(|e| [e.source.as_str(), e.target.as_str()])
    .collect();

  let labels: Vec<String> = definition
    .nodes
    .iter()
    .filter(|n| !n.node_type.is_boundary() && !connected.contains(n.id.as_str()))
    .map(|n| n.display_name().to_string())
    .collect();

  if !labels.is_empty() {
    issues.push(ValidationIssue::OrphanNodes { labels });
  }
}

fn check_edge_endpoints(
  definition: &WorkflowDefinition,
  graph: &Graph<'_>,
  issues: &mut Vec<ValidationIssue>,
) {
  for edge in &definition.edges {
    for (endpoint, node_id) in [
      (EdgeEndpoint::Source, &edge.source),
      (EdgeEndpoint::Target, &edge.target),
    ] {
      if !graph.contains(node_id) {
        issues.push(ValidationIssue::DanglingEdge {
          edge_id: edge.id.clone(),
          endpoint,
          node_id: node_id.clone(),
        });
      }
    }
  }
}

fn check_direction(definition: &WorkflowDefinition, issues: &mut Vec<ValidationIssue>) {
  let mut types: HashMap<&str, NodeType> = HashMap::with_capacity(definition.nodes.len());
  for node in &definition.nodes {
    types.entry(node.id.as_str()).or_insert(node.node_type);
  }

  for edge in &definition.edges {
    if types.get(edge.target.as_str()) == Some(&NodeType::Start) {
      issues.push(ValidationIssue::IncomingToStart {
        edge_id: edge.id.clone(),
        node_id: edge.target.clone(),
      });
    }
    if types.get(edge.source.as_str()) == Some(&NodeType::End) {
      issues.push(ValidationIssue::OutgoingFromEnd {
        edge_id: edge.id.clone(),
        node_id: edge.source.clone(),
      });
    }
  }
}
