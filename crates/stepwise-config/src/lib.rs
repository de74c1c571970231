//! Stepwise Config
//!
//! This crate contains the serializable workflow definition types for Stepwise.
//! A [`WorkflowDefinition`] is the canonical, editor-independent description of
//! a workflow graph: typed nodes, directed edges and declared variables.
//!
//! Definitions can be loaded from:
//! - JSON files (via CLI with `stepwise validate workflow.json`)
//! - Database storage (as JSON documents)
//!
//! Structural validation and execution planning live in `stepwise-workflow`;
//! this crate only guarantees the shape of the document and id uniqueness.

mod edge;
mod error;
mod node;
mod variable;
mod workflow;

pub use edge::{EdgeConditions, WorkflowEdge};
pub use error::DefinitionError;
pub use node::{NodeData, NodeType, Position, WorkflowNode};
pub use variable::{VariableDef, VariableType};
pub use workflow::WorkflowDefinition;
