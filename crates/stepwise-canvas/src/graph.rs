use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use stepwise_config::{DefinitionError, Position, VariableDef, WorkflowDefinition};

use crate::mapper;

/// A node as the visual editor stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
  pub id: String,
  /// Presentation type, e.g. `"aiAgent"`. Open-ended on purpose.
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(default)]
  pub position: Position,
  #[serde(default)]
  pub data: CanvasNodeData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasNodeData {
  #[serde(default)]
  pub label: String,
  #[serde(default)]
  pub config: serde_json::Map<String, serde_json::Value>,
  #[serde(default)]
  pub inputs: serde_json::Map<String, serde_json::Value>,
  #[serde(default)]
  pub outputs: serde_json::Map<String, serde_json::Value>,
  /// Canonical type recorded on export. Several canonical types share one
  /// visual type, so this is what keeps them apart on the way back.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub workflow_type: Option<String>,
}

/// An edge as the visual editor stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasEdge {
  pub id: String,
  pub source: String,
  pub target: String,
  #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
  pub kind: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<CanvasEdgeData>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasEdgeData {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub condition: Option<String>,
}

/// An editor document: the graph plus declared variables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanvasGraph {
  #[serde(default)]
  pub nodes: Vec<CanvasNode>,
  #[serde(default)]
  pub edges: Vec<CanvasEdge>,
  #[serde(default)]
  pub variables: BTreeMap<String, VariableDef>,
}

impl CanvasGraph {
  /// Convert to a canonical definition, carrying variables across.
  pub fn into_definition(self) -> Result<WorkflowDefinition, DefinitionError> {
    let mut def = mapper::to_definition(&self.nodes, &self.edges)?;
    def.variables = self.variables;
    Ok(def)
  }

  /// Build the editor document for a canonical definition.
  pub fn from_definition(def: &WorkflowDefinition) -> Self {
    let (nodes, edges) = mapper::from_definition(def);
    Self {
      nodes,
      edges,
      variables: def.variables.clone(),
    }
  }
}
