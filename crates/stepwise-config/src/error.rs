use thiserror::Error;

/// Errors raised while constructing a [`crate::WorkflowDefinition`].
#[derive(Debug, Error)]
pub enum DefinitionError {
  /// Two nodes share the same id.
  #[error("duplicate node id: {node_id}")]
  DuplicateNodeId { node_id: String },

  /// Two edges share the same id.
  #[error("duplicate edge id: {edge_id}")]
  DuplicateEdgeId { edge_id: String },

  /// The document does not match the definition schema.
  #[error("invalid workflow definition document: {0}")]
  Parse(#[from] serde_json::Error),
}
