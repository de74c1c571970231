use stepwise_config::{
  DefinitionError, EdgeConditions, NodeData, NodeType, WorkflowDefinition, WorkflowEdge,
  WorkflowNode,
};
use tracing::debug;

use crate::graph::{CanvasEdge, CanvasEdgeData, CanvasNode, CanvasNodeData};

const DEFAULT_EDGE_TYPE: &str = "default";

/// Map a visual node type to its canonical type. Unknown types become `task`.
pub fn canonical_type(kind: &str) -> NodeType {
  match kind {
    "start" => NodeType::Start,
    "end" => NodeType::End,
    "task" => NodeType::Task,
    "approval" => NodeType::Approval,
    "condition" => NodeType::Condition,
    "aiAgent" | "ai_agent" => NodeType::AiAgent,
    "humanTask" | "human_task" => NodeType::HumanTask,
    "apiCall" | "api_call" => NodeType::ApiCall,
    "webhook" => NodeType::Webhook,
    _ => NodeType::Task,
  }
}

/// Map a canonical type to the visual type the editor renders it with.
pub fn presentation_type(node_type: NodeType) -> &'static str {
  match node_type {
    NodeType::Start => "start",
    NodeType::End => "end",
    NodeType::Approval => "approval",
    NodeType::Condition => "condition",
    NodeType::AiAgent => "aiAgent",
    NodeType::Task | NodeType::HumanTask | NodeType::ApiCall | NodeType::Webhook => "task",
  }
}

/// Convert an editor graph into a canonical definition.
///
/// Fails only on duplicate node or edge ids.
pub fn to_definition(
  nodes: &[CanvasNode],
  edges: &[CanvasEdge],
) -> Result<WorkflowDefinition, DefinitionError> {
  let nodes = nodes.iter().map(node_to_definition).collect();
  let edges = edges.iter().map(edge_to_definition).collect();
  WorkflowDefinition::new(nodes, edges, Default::default())
}

/// Convert a canonical definition into an editor graph.
pub fn from_definition(def: &WorkflowDefinition) -> (Vec<CanvasNode>, Vec<CanvasEdge>) {
  let nodes = def.nodes.iter().map(node_from_definition).collect();
  let edges = def.edges.iter().map(edge_from_definition).collect();
  (nodes, edges)
}

fn node_to_definition(node: &CanvasNode) -> WorkflowNode {
  let node_type = match node.data.workflow_type.as_deref().and_then(NodeType::from_wire) {
    Some(recorded) => recorded,
    None => {
      let mapped = canonical_type(&node.kind);
      if mapped == NodeType::Task && node.kind != "task" {
        debug!(node_id = %node.id, kind = %node.kind, "unknown node kind mapped to task");
      }
      mapped
    }
  };

  WorkflowNode {
    id: node.id.clone(),
    node_type,
    position: node.position,
    data: NodeData {
      label: node.data.label.clone(),
      config: node.data.config.clone(),
      inputs: node.data.inputs.clone(),
      outputs: node.data.outputs.clone(),
    },
  }
}

fn node_from_definition(node: &WorkflowNode) -> CanvasNode {
  CanvasNode {
    id: node.id.clone(),
    kind: presentation_type(node.node_type).to_string(),
    position: node.position,
    data: CanvasNodeData {
      label: node.data.label.clone(),
      config: node.data.config.clone(),
      inputs: node.data.inputs.clone(),
      outputs: node.data.outputs.clone(),
      workflow_type: Some(node.node_type.as_str().to_string()),
    },
  }
}

fn edge_to_definition(edge: &CanvasEdge) -> WorkflowEdge {
  let conditions = edge
    .data
    .as_ref()
    .and_then(|d| d.condition.clone())
    .map(|expression| EdgeConditions { expression });

  WorkflowEdge {
    id: edge.id.clone(),
    source: edge.source.clone(),
    target: edge.target.clone(),
    edge_type: edge
      .kind
      .clone()
      .unwrap_or_else(|| DEFAULT_EDGE_TYPE.to_string()),
    conditions,
    label: edge.label.clone(),
  }
}

fn edge_from_definition(edge: &WorkflowEdge) -> CanvasEdge {
  CanvasEdge {
    id: edge.id.clone(),
    source: edge.source.clone(),
    target: edge.target.clone(),
    kind: Some(edge.edge_type.clone()),
    label: edge.label.clone(),
    data: edge.conditions.as_ref().map(|c| CanvasEdgeData {
      condition: Some(c.expression.clone()),
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use stepwise_config::Position;

  fn canvas_node(id: &str, kind: &str) -> CanvasNode {
    CanvasNode {
      id: id.to_string(),
      kind: kind.to_string(),
      position: Position { x: 1.0, y: 2.0 },
      data: CanvasNodeData {
        label: format!("{} label", id),
        ..Default::default()
      },
    }
  }

  fn canvas_edge(id: &str, source: &str, target: &str) -> CanvasEdge {
    CanvasEdge {
      id: id.to_string(),
      source: source.to_string(),
      target: target.to_string(),
      kind: None,
      label: None,
      data: None,
    }
  }

  #[test]
  fn test_empty_graph_maps_to_empty_definition() {
    let def = to_definition(&[], &[]).unwrap();
    assert_eq!(def, WorkflowDefinition::default());
  }

  #[test]
  fn test_presentation_types_map_to_canonical() {
    let cases = [
      ("start", NodeType::Start),
      ("end", NodeType::End),
      ("task", NodeType::Task),
      ("approval", NodeType::Approval),
      ("condition", NodeType::Condition),
      ("aiAgent", NodeType::AiAgent),
      ("humanTask", NodeType::HumanTask),
      ("apiCall", NodeType::ApiCall),
      ("webhook", NodeType::Webhook),
    ];
    for (kind, expected) in cases {
      assert_eq!(canonical_type(kind), expected, "kind {}", kind);
    }
  }

  #[test]
  fn test_unknown_kind_defaults_to_task() {
    let def = to_definition(&[canvas_node("x", "stickyNote")], &[]).unwrap();
    assert_eq!(def.nodes[0].node_type, NodeType::Task);
    assert_eq!(def.nodes[0].data.label, "x label");
    assert_eq!(def.nodes[0].position, Position { x: 1.0, y: 2.0 });
  }

  #[test]
  fn test_task_like_types_collapse_on_export() {
    for ty in [NodeType::Task, NodeType::HumanTask, NodeType::ApiCall, NodeType::Webhook] {
      assert_eq!(presentation_type(ty), "task");
    }
    assert_eq!(presentation_type(NodeType::AiAgent), "aiAgent");
  }

  #[test]
  fn test_recorded_type_survives_collapse() {
    let def = WorkflowDefinition {
      nodes: vec![
        WorkflowNode::new("h", NodeType::HumanTask, "Review"),
        WorkflowNode::new("w", NodeType::Webhook, "Notify"),
      ],
      ..Default::default()
    };

    let (nodes, edges) = from_definition(&def);
    assert_eq!(nodes[0].kind, "task");
    assert_eq!(nodes[0].data.workflow_type.as_deref(), Some("human_task"));

    assert_eq!(to_definition(&nodes, &edges).unwrap(), def);
  }

  #[test]
  fn test_invalid_recorded_type_falls_back_to_kind() {
    let mut node = canvas_node("a", "approval");
    node.data.workflow_type = Some("mystery".to_string());

    let def = to_definition(&[node], &[]).unwrap();
    assert_eq!(def.nodes[0].node_type, NodeType::Approval);
  }

  #[test]
  fn test_edge_condition_maps_to_expression() {
    let mut edge = canvas_edge("e1", "a", "b");
    edge.label = Some("yes".to_string());
    edge.data = Some(CanvasEdgeData {
      condition: Some("total > 500".to_string()),
    });

    let def = to_definition(
      &[canvas_node("a", "condition"), canvas_node("b", "task")],
      &[edge, canvas_edge("e2", "b", "a")],
    )
    .unwrap();

    let first = &def.edges[0];
    assert_eq!(first.edge_type, "default");
    assert_eq!(first.label.as_deref(), Some("yes"));
    assert_eq!(
      first.conditions.as_ref().map(|c| c.expression.as_str()),
      Some("total > 500")
    );
    assert!(def.edges[1].conditions.is_none());
  }

  #[test]
  fn test_edge_data_without_condition() {
    let mut edge = canvas_edge("e1", "a", "b");
    edge.data = Some(CanvasEdgeData::default());

    let def = to_definition(&[], &[edge]).unwrap();
    assert!(def.edges[0].conditions.is_none());
  }

  #[test]
  fn test_duplicate_ids_fail_mapping() {
    let result = to_definition(&[canvas_node("a", "task"), canvas_node("a", "end")], &[]);
    assert!(matches!(result, Err(DefinitionError::DuplicateNodeId { .. })));

    let result = to_definition(
      &[],
      &[canvas_edge("e", "a", "b"), canvas_edge("e", "b", "c")],
    );
    assert!(matches!(result, Err(DefinitionError::DuplicateEdgeId { .. })));
  }

  mod properties {
    use super::*;
    use proptest::prelude::*;

    const KINDS: [&str; 12] = [
      "start", "end", "task", "approval", "condition", "aiAgent", "humanTask", "apiCall",
      "webhook", "api_call", "group", "",
    ];

    fn arb_graph() -> impl Strategy<Value = (Vec<CanvasNode>, Vec<CanvasEdge>)> {
      let node = (
        prop::sample::select(KINDS.to_vec()),
        "[a-z ]{0,8}",
        prop::option::of(prop::sample::select(vec!["human_task", "webhook", "bogus"])),
      );
      let edge = (0usize..8, 0usize..8, prop::option::of("[a-z<> 0-9]{1,10}"));

      (prop::collection::vec(node, 0..8), prop::collection::vec(edge, 0..10)).prop_map(
        |(nodes, edges)| {
          let nodes: Vec<CanvasNode> = nodes
            .into_iter()
            .enumerate()
            .map(|(i, (kind, label, hint))| CanvasNode {
              id: format!("n{}", i),
              kind: kind.to_string(),
              position: Position::default(),
              data: CanvasNodeData {
                label,
                workflow_type: hint.map(str::to_string),
                ..Default::default()
              },
            })
            .collect();
          let edges = edges
            .into_iter()
            .enumerate()
            .map(|(i, (s, t, condition))| CanvasEdge {
              id: format!("e{}", i),
              source: format!("n{}", s),
              target: format!("n{}", t),
              kind: None,
              label: None,
              data: condition.map(|c| CanvasEdgeData { condition: Some(c) }),
            })
            .collect();
          (nodes, edges)
        },
      )
    }

    proptest! {
      #[test]
      fn canonical_round_trip_is_stable((nodes, edges) in arb_graph()) {
        let first = to_definition(&nodes, &edges).unwrap();
        let (back_nodes, back_edges) = from_definition(&first);
        let second = to_definition(&back_nodes, &back_edges).unwrap();
        prop_assert_eq!(first, second);
      }
    }
  }
}
