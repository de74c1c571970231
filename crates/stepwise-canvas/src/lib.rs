//! Stepwise Canvas
//!
//! The visual editor works with its own node vocabulary (`aiAgent`, a generic
//! `task` box for several step kinds, UI-bound edge data). This crate converts
//! between that graph and the canonical [`stepwise_config::WorkflowDefinition`].
//!
//! - [`to_definition`] is lenient: unknown visual types become `task`.
//! - [`from_definition`] is lossy on the visual side but records the canonical
//!   type on each node, so converting back yields the same definition.

mod graph;
mod mapper;

pub use graph::{CanvasEdge, CanvasEdgeData, CanvasGraph, CanvasNode, CanvasNodeData};
pub use mapper::{canonical_type, from_definition, presentation_type, to_definition};
