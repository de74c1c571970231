use std::collections::HashMap;

use stepwise_config::WorkflowDefinition;

/// Graph structure for traversal and analysis.
///
/// Borrowed from a [`WorkflowDefinition`]. Only edges whose endpoints both
/// exist are indexed; with duplicate node ids the first node wins.
#[derive(Debug, Clone)]
pub struct Graph<'a> {
  /// Unique node ids in authoring order.
  node_ids: Vec<&'a str>,
  /// node_id -> index into `node_ids`.
  positions: HashMap<&'a str, usize>,
  /// Adjacency list: node_id -> list of downstream node_ids, in edge order.
  adjacency: HashMap<&'a str, Vec<&'a str>>,
  /// Reverse adjacency: node_id -> list of upstream node_ids, in edge order.
  reverse_adjacency: HashMap<&'a str, Vec<&'a str>>,
  /// Nodes with no incoming edges.
  entry_points: Vec<&'a str>,
  /// Nodes with no outgoing edges.
  exit_points: Vec<&'a str>,
  /// Nodes with multiple incoming edges.
  join_points: Vec<&'a str>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
  Unvisited,
  InProgress,
  Done,
}

impl<'a> Graph<'a> {
  /// Build a graph from a definition's nodes and edges.
  pub fn new(definition: &'a WorkflowDefinition) -> Self {
    let mut node_ids = Vec::with_capacity(definition.nodes.len());
    let mut positions = HashMap::with_capacity(definition.nodes.len());
    let mut adjacency: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
    let mut reverse_adjacency: HashMap<&'a str, Vec<&'a str>> = HashMap::new();

    // Initialize all nodes
    for node in &definition.nodes {
      let id = node.id.as_str();
      if positions.contains_key(id) {
        continue;
      }
      positions.insert(id, node_ids.len());
      node_ids.push(id);
      adjacency.insert(id, Vec::new());
      reverse_adjacency.insert(id, Vec::new());
    }

    // Build adjacency lists, skipping dangling edges
    for edge in &definition.edges {
      let (from, to) = (edge.source.as_str(), edge.target.as_str());
      if !positions.contains_key(from) || !positions.contains_key(to) {
        continue;
      }
      if let Some(downstream) = adjacency.get_mut(from) {
        downstream.push(to);
      }
      if let Some(upstream) = reverse_adjacency.get_mut(to) {
        upstream.push(from);
      }
    }

    let entry_points = node_ids
      .iter()
      .copied()
      .filter(|id| reverse_adjacency.get(id).is_none_or(|v| v.is_empty()))
      .collect();

    let exit_points = node_ids
      .iter()
      .copied()
      .filter(|id| adjacency.get(id).is_none_or(|v| v.is_empty()))
      .collect();

    let join_points = node_ids
      .iter()
      .copied()
      .filter(|id| reverse_adjacency.get(id).is_some_and(|v| v.len() > 1))
      .collect();

    Self {
      node_ids,
      positions,
      adjacency,
      reverse_adjacency,
      entry_points,
      exit_points,
      join_points,
    }
  }

  /// Unique node ids in authoring order.
  pub fn node_ids(&self) -> &[&'a str] {
    &self.node_ids
  }

  /// Whether a node with this id exists.
  pub fn contains(&self, node_id: &str) -> bool {
    self.positions.contains_key(node_id)
  }

  /// Authoring-order index of a node.
  pub fn position(&self, node_id: &str) -> Option<usize> {
    self.positions.get(node_id).copied()
  }

  /// Get entry points (nodes with no incoming edges).
  pub fn entry_points(&self) -> &[&'a str] {
    &self.entry_points
  }

  /// Get exit points (nodes with no outgoing edges).
  pub fn exit_points(&self) -> &[&'a str] {
    &self.exit_points
  }

  /// Get downstream nodes for a given node.
  pub fn downstream(&self, node_id: &str) -> &[&'a str] {
    self
      .adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Get upstream nodes for a given node.
  pub fn upstream(&self, node_id: &str) -> &[&'a str] {
    self
      .reverse_adjacency
      .get(node_id)
      .map(|v| v.as_slice())
      .unwrap_or(&[])
  }

  /// Check if a node is a join point (has multiple incoming edges).
  pub fn is_join_point(&self, node_id: &str) -> bool {
    self.upstream(node_id).len() > 1
  }

  /// Get all join points.
  pub fn join_points(&self) -> &[&'a str] {
    &self.join_points
  }

  /// Check for cycles, self-loops included.
  ///
  /// Depth-first search from every unvisited node; reaching a node that is
  /// still on the current path is a back edge. The walk keeps an explicit
  /// stack so deep chains cannot overflow the call stack.
  pub fn has_cycle(&self) -> bool {
    let mut state: HashMap<&str, Visit> = self
      .node_ids
      .iter()
      .map(|id| (*id, Visit::Unvisited))
      .collect();

    for &root in &self.node_ids {
      if state.get(root) != Some(&Visit::Unvisited) {
        continue;
      }

      state.insert(root, Visit::InProgress);
      let mut stack: Vec<(&str, usize)> = vec![(root, 0)];

      while let Some(top) = stack.last_mut() {
        let (node, next) = *top;
        let children = self.downstream(node);

        if next < children.len() {
          top.1 += 1;
          let child = children[next];
          match state.get(child) {
            Some(Visit::InProgress) => return true,
            Some(Visit::Unvisited) => {
              state.insert(child, Visit::InProgress);
              stack.push((child, 0));
            }
            _ => {}
          }
        } else {
          state.insert(node, Visit::Done);
          stack.pop();
        }
      }
    }

    false
  }
}
