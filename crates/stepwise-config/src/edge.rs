use serde::{Deserialize, Serialize};

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEdge {
  pub id: String,
  pub source: String,
  pub target: String,
  /// Free-form label such as `"default"`. Not interpreted by the core.
  #[serde(rename = "type", default = "default_edge_type")]
  pub edge_type: String,
  /// Branch condition, evaluated by the executor.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub conditions: Option<EdgeConditions>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
}

impl WorkflowEdge {
  /// Create an unconditional `"default"` edge.
  pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      source: source.into(),
      target: target.into(),
      edge_type: default_edge_type(),
      conditions: None,
      label: None,
    }
  }

  /// Attach a condition expression.
  pub fn with_condition(mut self, expression: impl Into<String>) -> Self {
    self.conditions = Some(EdgeConditions {
      expression: expression.into(),
    });
    self
  }

  /// Whether the edge starts or ends at the given node.
  pub fn touches(&self, node_id: &str) -> bool {
    self.source == node_id || self.target == node_id
  }
}

/// Conditions guarding an edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeConditions {
  pub expression: String,
}

fn default_edge_type() -> String {
  "default".to_string()
}
