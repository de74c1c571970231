use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::edge::WorkflowEdge;
use crate::error::DefinitionError;
use crate::node::{NodeType, WorkflowNode};
use crate::variable::VariableDef;

/// The canonical description of a workflow graph.
///
/// Node order is authoring order, not execution order. Prefer
/// [`WorkflowDefinition::new`] or [`WorkflowDefinition::from_json`] over
/// building the struct directly: both reject duplicate node and edge ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
  #[serde(default)]
  pub nodes: Vec<WorkflowNode>,
  #[serde(default)]
  pub edges: Vec<WorkflowEdge>,
  #[serde(default)]
  pub variables: BTreeMap<String, VariableDef>,
}

impl WorkflowDefinition {
  /// Build a definition, checking that node and edge ids are unique.
  pub fn new(
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    variables: BTreeMap<String, VariableDef>,
  ) -> Result<Self, DefinitionError> {
    let def = Self {
      nodes,
      edges,
      variables,
    };
    def.check_ids()?;
    Ok(def)
  }

  /// Parse a JSON document and check id uniqueness.
  pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
    let def: Self = serde_json::from_str(json)?;
    def.check_ids()?;
    Ok(def)
  }

  /// Check that no two nodes and no two edges share an id.
  pub fn check_ids(&self) -> Result<(), DefinitionError> {
    let mut node_ids = HashSet::new();
    for node in &self.nodes {
      if !node_ids.insert(node.id.as_str()) {
        return Err(DefinitionError::DuplicateNodeId {
          node_id: node.id.clone(),
        });
      }
    }

    let mut edge_ids = HashSet::new();
    for edge in &self.edges {
      if !edge_ids.insert(edge.id.as_str()) {
        return Err(DefinitionError::DuplicateEdgeId {
          edge_id: edge.id.clone(),
        });
      }
    }

    Ok(())
  }

  /// Get a node by id. With duplicate ids the first match wins.
  pub fn get_node(&self, node_id: &str) -> Option<&WorkflowNode> {
    self.nodes.iter().find(|n| n.id == node_id)
  }

  /// All nodes of the given type, in authoring order.
  pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &WorkflowNode> {
    self.nodes.iter().filter(move |n| n.node_type == node_type)
  }

  /// True when the definition has neither nodes nor edges.
  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty() && self.edges.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn node(id: &str, node_type: NodeType) -> WorkflowNode {
    WorkflowNode::new(id, node_type, id)
  }

  #[test]
  fn test_new_accepts_unique_ids() {
    let def = WorkflowDefinition::new(
      vec![node("start", NodeType::Start), node("end", NodeType::End)],
      vec![WorkflowEdge::new("e1", "start", "end")],
      BTreeMap::new(),
    )
    .unwrap();

    assert_eq!(def.nodes.len(), 2);
    assert_eq!(def.get_node("end").map(|n| n.node_type), Some(NodeType::End));
    assert!(def.get_node("missing").is_none());
  }

  #[test]
  fn test_new_rejects_duplicate_node_id() {
    let result = WorkflowDefinition::new(
      vec![node("a", NodeType::Task), node("a", NodeType::Approval)],
      vec![],
      BTreeMap::new(),
    );
    assert!(matches!(
      result,
      Err(DefinitionError::DuplicateNodeId { node_id }) if node_id == "a"
    ));
  }

  #[test]
  fn test_new_rejects_duplicate_edge_id() {
    let result = WorkflowDefinition::new(
      vec![node("a", NodeType::Task), node("b", NodeType::Task)],
      vec![
        WorkflowEdge::new("e1", "a", "b"),
        WorkflowEdge::new("e1", "b", "a"),
      ],
      BTreeMap::new(),
    );
    assert!(matches!(result, Err(DefinitionError::DuplicateEdgeId { .. })));
  }

  #[test]
  fn test_from_json_empty_document() {
    let def = WorkflowDefinition::from_json("{}").unwrap();
    assert!(def.is_empty());
    assert!(def.variables.is_empty());
  }

  #[test]
  fn test_from_json_rejects_bad_shape() {
    let result = WorkflowDefinition::from_json(r#"{"nodes": {"id": "a"}}"#);
    assert!(matches!(result, Err(DefinitionError::Parse(_))));

    let result = WorkflowDefinition::from_json(r#"{"nodes": [{"id": "a", "type": "loop"}]}"#);
    assert!(matches!(result, Err(DefinitionError::Parse(_))));
  }

  #[test]
  fn test_from_json_rejects_duplicates() {
    let json = r#"{
      "nodes": [
        {"id": "a", "type": "task"},
        {"id": "a", "type": "task"}
      ]
    }"#;
    assert!(matches!(
      WorkflowDefinition::from_json(json),
      Err(DefinitionError::DuplicateNodeId { .. })
    ));
  }

  #[test]
  fn test_nodes_of_type_keeps_order() {
    let def = WorkflowDefinition {
      nodes: vec![
        node("t1", NodeType::Task),
        node("s", NodeType::Start),
        node("t2", NodeType::Task),
      ],
      ..Default::default()
    };
    let ids: Vec<_> = def.nodes_of_type(NodeType::Task).map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["t1", "t2"]);
  }
}
