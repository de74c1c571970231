//! Stepwise Workflow
//!
//! This crate turns a [`stepwise_config::WorkflowDefinition`] into something an
//! executor can run:
//! - [`validate`] checks the graph structure and reports every violation
//! - [`plan`] orders nodes into levels that may run concurrently
//! - [`metrics`] summarizes size, complexity and a rough duration
//! - [`Compiler`] chains the three, refusing definitions that fail validation
//!
//! Everything here is a pure function of the definition. Nothing is cached and
//! no call shares state with another, so definitions can be checked from many
//! threads at once.

mod compile;
mod error;
mod graph;
mod metrics;
mod planner;
mod validator;

pub use compile::{CompiledWorkflow, Compiler};
pub use error::CompileError;
pub use graph::Graph;
pub use metrics::{DurationTable, WorkflowMetrics, metrics, metrics_with};
pub use planner::{ExecutionPlan, plan};
pub use validator::{EdgeEndpoint, ValidationIssue, ValidationResult, validate};
