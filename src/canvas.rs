//! Canvas Session
//!
//! Ties the pieces together: the graph document, the interaction
//! controller, the AI build phase, and the bridge into the tab manager.
//!
//! The build phase is split sans-IO: `begin_build` flips the session into
//! the building state (and clears the canvas), `complete_build` applies the
//! planner outcome. The async `build_workflow` convenience composes the two
//! around an actual planner call; the split is what lets the concurrency
//! rules (double-build rejection, pointer events ignored mid-build) be
//! exercised without a live planner.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::catalog::{Tool, ToolCatalog};
use crate::config::CanvasConfig;
use crate::error::{CaseboardError, Result};
use crate::event::{EventEmitter, EventKind, NoopEmitter};
use crate::geometry::Point;
use crate::graph::{chain_layout, WorkflowGraph};
use crate::interaction::{DragState, InteractionController, PointerTarget};
use crate::planner::{PlannedWorkflow, Planner};
use crate::tabs::ToolTabs;

/// The recorded, dismissible build failure shown in the workflow builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildError {
    pub code: &'static str,
    pub message: String,
}

/// One user's canvas: document, gesture state, and build phase.
pub struct CanvasSession {
    graph: WorkflowGraph,
    interaction: InteractionController,
    config: CanvasConfig,
    emitter: Arc<dyn EventEmitter>,
    building: bool,
    last_error: Option<BuildError>,
}

impl CanvasSession {
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_emitter(config, Arc::new(NoopEmitter))
    }

    pub fn with_emitter(config: CanvasConfig, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            graph: WorkflowGraph::new(),
            interaction: InteractionController::new(),
            config,
            emitter,
            building: false,
            last_error: None,
        }
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn is_building(&self) -> bool {
        self.building
    }

    pub fn last_error(&self) -> Option<&BuildError> {
        self.last_error.as_ref()
    }

    /// Clear the recorded build failure.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    // ═══════════════════════════════════════════
    // POINTER SURFACE
    // ═══════════════════════════════════════════
    // All pointer input is inert while a build is in flight: the canvas is
    // about to be replaced wholesale, so gestures against it are stale by
    // construction.

    pub fn pointer_down(&mut self, target: PointerTarget, point: Point) {
        if self.building {
            return;
        }
        self.interaction.pointer_down(target, point, &self.graph);
    }

    pub fn pointer_move(&mut self, point: Point) {
        if self.building {
            return;
        }
        self.interaction.pointer_move(point, &mut self.graph);
    }

    pub fn pointer_up(&mut self, target: PointerTarget) {
        if self.building {
            return;
        }
        // node moves are coalesced: one event per drag, at release
        let dragged = match self.interaction.state() {
            DragState::DraggingNode { node_id, .. } => Some(node_id.clone()),
            _ => None,
        };
        let before = self.graph.connections().len();
        self.interaction.pointer_up(target, &mut self.graph);
        if let Some(node_id) = dragged {
            self.emitter.emit(EventKind::NodeMoved { node_id });
        }
        if self.graph.connections().len() > before {
            let c = self.graph.connections().last().cloned();
            if let Some(c) = c {
                self.emitter.emit(EventKind::ConnectionAdded {
                    from: c.from,
                    to: c.to,
                });
            }
        }
    }

    pub fn catalog_drag_start(&mut self, tool_id: &str) {
        if self.building {
            return;
        }
        self.interaction.catalog_drag_start(tool_id);
    }

    pub fn catalog_drag_cancel(&mut self) {
        self.interaction.catalog_drag_cancel();
    }

    /// Drop the dragged catalog tool onto the canvas; returns the new
    /// node's id when a drag was in flight.
    pub fn canvas_drop(&mut self, point: Point) -> Option<String> {
        if self.building {
            return None;
        }
        let id = self.interaction.canvas_drop(point, &mut self.graph)?;
        let tool_id = self.graph.node(&id).map(|n| n.tool_id.clone()).unwrap_or_default();
        self.emitter.emit(EventKind::NodeAdded {
            node_id: id.clone(),
            tool_id,
        });
        Some(id)
    }

    /// Remove a node (in-node remove control); cascades its connections.
    pub fn remove_node(&mut self, node_id: &str) {
        if self.building || !self.graph.contains_node(node_id) {
            return;
        }
        let severed = self.graph.remove_node(node_id);
        self.emitter.emit(EventKind::NodeRemoved {
            node_id: node_id.to_string(),
            severed: severed.len(),
        });
    }

    /// Run a node's tool (in-node run control): re-resolves the tool id
    /// against the live catalog and opens its tab.
    pub fn run_node(
        &mut self,
        node_id: &str,
        catalog: &dyn ToolCatalog,
        tabs: &mut ToolTabs,
    ) -> Result<()> {
        let tool_id = self
            .graph
            .node(node_id)
            .map(|n| n.tool_id.clone())
            .ok_or_else(|| CaseboardError::ToolNotFound {
                tool_id: node_id.to_string(),
            })?;
        tabs.run_tool(catalog, &tool_id, self.emitter.as_ref())
    }

    // ═══════════════════════════════════════════
    // AI BUILD PHASE
    // ═══════════════════════════════════════════

    /// Enter the build phase for `command`.
    ///
    /// Rejects with `BuildInProgress` when a build is already in flight,
    /// leaving graph and error state untouched. Otherwise the previous
    /// failure is dismissed, any gesture is cancelled, and the canvas is
    /// cleared up front so the user sees the build replacing it.
    pub fn begin_build(&mut self, command: &str) -> Result<()> {
        if self.building {
            return Err(CaseboardError::BuildInProgress);
        }
        self.building = true;
        self.last_error = None;
        self.interaction.reset();
        if !self.graph.is_empty() || !self.graph.connections().is_empty() {
            self.graph.clear();
            self.emitter.emit(EventKind::GraphCleared);
        }
        self.emitter.emit(EventKind::BuildStarted {
            command: command.to_string(),
        });
        Ok(())
    }

    /// Leave the build phase with the planner's outcome.
    ///
    /// On success the plan is laid out against `visible` (unknown ids are
    /// dropped by the layout stage) and replaces the document. On failure
    /// the error is recorded as the dismissible build failure and also
    /// propagated to the caller. Either way the building flag clears.
    pub fn complete_build(
        &mut self,
        outcome: Result<PlannedWorkflow>,
        visible: &[Tool],
    ) -> Result<()> {
        self.building = false;
        match outcome {
            Ok(plan) => {
                let (nodes, connections) =
                    chain_layout(&plan.tool_ids, visible, &self.config.layout).into_parts();
                let (n, c) = (nodes.len(), connections.len());
                self.graph.replace_all(nodes, connections);
                self.emitter.emit(EventKind::GraphReplaced {
                    nodes: n,
                    connections: c,
                });
                self.emitter.emit(EventKind::BuildCompleted { nodes: n });
                debug!(nodes = n, connections = c, "workflow build completed");
                Ok(())
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "workflow build failed");
                self.last_error = Some(BuildError {
                    code: err.code(),
                    message: err.to_string(),
                });
                self.emitter.emit(EventKind::BuildFailed {
                    code: err.code().to_string(),
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Full AI build: clear, plan, lay out, replace.
    #[instrument(skip(self, planner, visible), fields(planner = planner.name()))]
    pub async fn build_workflow(
        &mut self,
        planner: &dyn Planner,
        command: &str,
        visible: &[Tool],
    ) -> Result<()> {
        self.begin_build(command)?;
        let outcome = planner.plan(command, visible).await;
        self.complete_build(outcome, visible)
    }
}
