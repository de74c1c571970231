//! Property tests over generated workflow graphs.

use std::collections::HashSet;

use proptest::prelude::*;
use stepwise_config::{NodeType, WorkflowDefinition, WorkflowEdge, WorkflowNode};
use stepwise_workflow::{ValidationIssue, metrics, plan, validate};

/// Any graph: random types, edges may dangle or loop.
fn arb_definition() -> impl Strategy<Value = WorkflowDefinition> {
  let types = prop::collection::vec(prop::sample::select(NodeType::ALL.to_vec()), 0..10);
  let edges = prop::collection::vec((0usize..12, 0usize..12), 0..16);

  (types, edges).prop_map(|(types, edges)| WorkflowDefinition {
    nodes: types
      .into_iter()
      .enumerate()
      .map(|(i, ty)| WorkflowNode::new(format!("n{}", i), ty, format!("Node {}", i)))
      .collect(),
    edges: edges
      .into_iter()
      .enumerate()
      .map(|(i, (s, t))| WorkflowEdge::new(format!("e{}", i), format!("n{}", s), format!("n{}", t)))
      .collect(),
    ..Default::default()
  })
}

/// A well-formed DAG: one start, one end, every task on some path between them.
fn arb_dag() -> impl Strategy<Value = WorkflowDefinition> {
  (0usize..8)
    .prop_flat_map(|tasks| {
      let pairs = prop::collection::vec(any::<bool>(), tasks * tasks);
      (Just(tasks), pairs)
    })
    .prop_map(|(tasks, pairs)| {
      let mut nodes = vec![WorkflowNode::new("start", NodeType::Start, "Start")];
      nodes.extend((0..tasks).map(|i| WorkflowNode::new(format!("t{}", i), NodeType::Task, "")));
      nodes.push(WorkflowNode::new("end", NodeType::End, "End"));

      let mut links: Vec<(String, String)> = Vec::new();
      for i in 0..tasks {
        for j in (i + 1)..tasks {
          if pairs[i * tasks + j] {
            links.push((format!("t{}", i), format!("t{}", j)));
          }
        }
      }
      for i in 0..tasks {
        let id = format!("t{}", i);
        if !links.iter().any(|(_, t)| *t == id) {
          links.push(("start".to_string(), id.clone()));
        }
        if !links.iter().any(|(s, _)| *s == id) {
          links.push((id, "end".to_string()));
        }
      }
      if tasks == 0 {
        links.push(("start".to_string(), "end".to_string()));
      }

      WorkflowDefinition {
        nodes,
        edges: links
          .into_iter()
          .enumerate()
          .map(|(i, (s, t))| WorkflowEdge::new(format!("e{}", i), s, t))
          .collect(),
        ..Default::default()
      }
    })
}

proptest! {
  #[test]
  fn valid_iff_no_errors(def in arb_definition()) {
    let result = validate(&def);
    prop_assert_eq!(result.is_valid(), result.errors().is_empty());
  }

  #[test]
  fn well_formed_dags_validate(def in arb_dag()) {
    prop_assert!(validate(&def).is_valid(), "{:?}", validate(&def).messages());
  }

  #[test]
  fn dag_plan_covers_every_node_once(def in arb_dag()) {
    let plan = plan(&def);

    let planned: HashSet<&str> = plan.execution_order.iter().map(String::as_str).collect();
    prop_assert_eq!(planned.len(), plan.execution_order.len());
    prop_assert_eq!(planned.len(), def.nodes.len());

    let flattened: Vec<String> = plan.parallel_groups.iter().flatten().cloned().collect();
    prop_assert_eq!(&flattened, &plan.execution_order);

    for edge in &def.edges {
      let source = plan.group_of(&edge.source).unwrap();
      let target = plan.group_of(&edge.target).unwrap();
      prop_assert!(source < target, "edge {} -> {}", edge.source, edge.target);
    }
  }

  #[test]
  fn cycles_are_always_reported(def in arb_dag(), pick in any::<prop::sample::Index>()) {
    let mut def = def;
    // close a loop from end back into some node on the flow
    let target = def.nodes[pick.index(def.nodes.len())].id.clone();
    def.edges.push(WorkflowEdge::new("loop", "end", target));

    prop_assert!(validate(&def).errors().contains(&ValidationIssue::CircularDependency));
  }

  #[test]
  fn results_are_deterministic(def in arb_definition()) {
    prop_assert_eq!(validate(&def), validate(&def));
    prop_assert_eq!(plan(&def), plan(&def));

    let first = metrics(&def);
    let second = metrics(&def);
    prop_assert_eq!(first.estimated_duration.to_bits(), second.estimated_duration.to_bits());
    prop_assert_eq!(first, second);
  }
}
