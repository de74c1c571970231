use stepwise_config::DefinitionError;
use thiserror::Error;

use crate::validator::ValidationIssue;

#[derive(Debug, Error)]
pub enum CompileError {
  /// The definition itself is malformed (duplicate ids).
  #[error(transparent)]
  Definition(#[from] DefinitionError),

  /// The definition failed structural validation.
  #[error("workflow failed validation with {} issue(s)", .issues.len())]
  Invalid { issues: Vec<ValidationIssue> },
}
