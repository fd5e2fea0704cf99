//! # caseboard
//!
//! Core engine for an investigation workflow canvas: journalists drag
//! analysis tools onto a board, wire them into pipelines, or ask an AI
//! planner to lay out a pipeline from a natural-language command. Tools
//! open in tabs managed alongside the canvas.
//!
//! The crate is the headless core — document model, geometry, gesture
//! state machine, planner boundary, and tab lifecycle. Rendering and
//! transport hosts sit on top of it.
//!
//! ## Quick start
//!
//! ```no_run
//! use caseboard::{
//!     CanvasConfig, CanvasSession, InMemoryCatalog, MockPlanner, Role, Tool,
//!     visible_tools,
//! };
//!
//! # async fn demo() -> caseboard::Result<()> {
//! let catalog = InMemoryCatalog::new(vec![
//!     Tool::new("whisper", "Whisper", "Audio"),
//!     Tool::new("exiftool", "ExifTool", "Forensics"),
//! ]);
//! let config = CanvasConfig::load()?;
//! let tools = visible_tools(&catalog, Role::IndependentJournalist, &config.excluded_set());
//!
//! let mut session = CanvasSession::new(config);
//! let planner = MockPlanner::new(vec!["whisper".into(), "exiftool".into()]);
//! session.build_workflow(&planner, "verify this recording", &tools).await?;
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod catalog;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod planner;
pub mod tabs;

pub use canvas::{BuildError, CanvasSession};
pub use catalog::{categorized, visible_tools, InMemoryCatalog, Role, Tool, ToolCatalog};
pub use config::{CanvasConfig, LayoutSettings};
pub use error::{CaseboardError, FixSuggestion, Result};
pub use event::{Event, EventEmitter, EventKind, EventLog, NoopEmitter};
pub use geometry::{Point, NODE_HEIGHT, NODE_WIDTH};
pub use graph::{CanvasNode, Connection, WorkflowGraph};
pub use interaction::{DragState, InteractionController, PointerTarget};
pub use planner::{HttpPlanner, MockPlanner, PlannedWorkflow, Planner};
pub use tabs::{SharedToolTabs, ToolTabs};
