use std::fmt;

use serde::{Deserialize, Serialize};

/// A single step of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
  pub id: String,
  #[serde(rename = "type")]
  pub node_type: NodeType,
  /// Editor coordinates. Ignored by validation and planning.
  #[serde(default)]
  pub position: Position,
  #[serde(default)]
  pub data: NodeData,
}

impl WorkflowNode {
  /// Create a node with an empty payload at the origin.
  pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      node_type,
      position: Position::default(),
      data: NodeData {
        label: label.into(),
        ..NodeData::default()
      },
    }
  }

  /// Human-readable name, falling back to the id when the label is blank.
  pub fn display_name(&self) -> &str {
    if self.data.label.trim().is_empty() {
      &self.id
    } else {
      &self.data.label
    }
  }
}

/// The closed set of step kinds a workflow can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
  Start,
  End,
  Task,
  Approval,
  Condition,
  AiAgent,
  HumanTask,
  ApiCall,
  Webhook,
}

impl NodeType {
  pub const ALL: [NodeType; 9] = [
    NodeType::Start,
    NodeType::End,
    NodeType::Task,
    NodeType::Approval,
    NodeType::Condition,
    NodeType::AiAgent,
    NodeType::HumanTask,
    NodeType::ApiCall,
    NodeType::Webhook,
  ];

  /// Wire name of the type, e.g. `"human_task"`.
  pub fn as_str(self) -> &'static str {
    match self {
      NodeType::Start => "start",
      NodeType::End => "end",
      NodeType::Task => "task",
      NodeType::Approval => "approval",
      NodeType::Condition => "condition",
      NodeType::AiAgent => "ai_agent",
      NodeType::HumanTask => "human_task",
      NodeType::ApiCall => "api_call",
      NodeType::Webhook => "webhook",
    }
  }

  /// Parse a wire name. Returns `None` for anything outside the closed set.
  pub fn from_wire(name: &str) -> Option<Self> {
    NodeType::ALL.into_iter().find(|ty| ty.as_str() == name)
  }

  /// Start and end nodes delimit the flow and are exempt from orphan checks.
  pub fn is_boundary(self) -> bool {
    matches!(self, NodeType::Start | NodeType::End)
  }

  /// Nodes that introduce a branch or a human decision.
  pub fn is_decision(self) -> bool {
    matches!(self, NodeType::Condition | NodeType::Approval)
  }
}

impl fmt::Display for NodeType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// 2D editor coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
  pub x: f64,
  pub y: f64,
}

/// Node payload. `config`, `inputs` and `outputs` are interpreted by the
/// executor only and are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub config: serde_json::Map<String, serde_json::Value>,
  #[serde(default)]
  pub inputs: serde_json::Map<String, serde_json::Value>,
  #[serde(default)]
  pub outputs: serde_json::Map<String, serde_json::Value>,
}
