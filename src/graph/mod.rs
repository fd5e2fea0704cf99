//! Workflow Graph
//!
//! The document model of the canvas: nodes placed by the user or the
//! auto-layout planner, plus directed connections between them.

pub mod layout;
pub mod model;

pub use layout::chain_layout;
pub use model::{CanvasNode, Connection, WorkflowGraph};
