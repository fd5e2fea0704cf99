//! Interaction Controller
//!
//! Pointer-driven state machine for the canvas. The controller owns three
//! concerns:
//!   1. classifying what a pointer event landed on and whether it starts a
//!      gesture,
//!   2. carrying the gesture (node drag with grab offset, live connection
//!      preview) across move events,
//!   3. the document-listener lifecycle: global move/up listeners are
//!      installed exactly while a pointer-captured gesture is in flight.
//!
//! Catalog drags ride the host's native drag-and-drop and therefore never
//! install document listeners; they end in `canvas_drop` or are abandoned
//! by the host without the controller seeing an up event.

use crate::geometry::{self, CubicCurve, Point};
use crate::graph::WorkflowGraph;

/// What a pointer event hit.
///
/// `Control` covers in-node buttons (run, remove): pressing one must never
/// start a drag, so the controller treats it like empty canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerTarget {
    Canvas,
    NodeBody { node_id: String },
    OutputAnchor { node_id: String },
    InputAnchor { node_id: String },
    Control,
}

/// Current gesture
#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    /// Moving an existing node; `grab_offset` is pointer minus node
    /// top-left at press time, so the node does not jump under the cursor.
    DraggingNode { node_id: String, grab_offset: Point },
    /// Native drag from the tool palette, resolved by `canvas_drop`
    DraggingFromCatalog { tool_id: String },
    /// Drawing a connection out of a node's output anchor
    DrawingConnection { source_id: String },
}

#[derive(Debug)]
pub struct InteractionController {
    state: DragState,
    listeners_installed: bool,
    preview: Option<CubicCurve>,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
            listeners_installed: false,
            preview: None,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Whether global document move/up listeners should currently exist.
    /// Holds `installed ⟺ a pointer-captured gesture is in flight`;
    /// catalog drags do not count.
    pub fn listeners_installed(&self) -> bool {
        self.listeners_installed
    }

    /// The in-flight connection curve, anchored at the source output and
    /// following the pointer. `None` outside `DrawingConnection`.
    pub fn connection_preview(&self) -> Option<&CubicCurve> {
        self.preview.as_ref()
    }

    /// Pointer pressed on `target` at `point`.
    ///
    /// Only node bodies and output anchors start gestures; canvas, input
    /// anchors, and controls are inert on press. A press while a gesture is
    /// already in flight is ignored (multi-touch, or an up event the host
    /// swallowed).
    pub fn pointer_down(&mut self, target: PointerTarget, point: Point, graph: &WorkflowGraph) {
        if self.state != DragState::Idle {
            return;
        }
        match target {
            PointerTarget::NodeBody { node_id } => {
                let Some(node) = graph.node(&node_id) else {
                    return;
                };
                self.state = DragState::DraggingNode {
                    grab_offset: Point::new(point.x - node.position.x, point.y - node.position.y),
                    node_id,
                };
                self.listeners_installed = true;
            }
            PointerTarget::OutputAnchor { node_id } => {
                let Some(node) = graph.node(&node_id) else {
                    return;
                };
                let anchor = geometry::output_anchor(node.position);
                self.preview = Some(geometry::path_between(anchor, point));
                self.state = DragState::DrawingConnection { source_id: node_id };
                self.listeners_installed = true;
            }
            PointerTarget::Canvas | PointerTarget::InputAnchor { .. } | PointerTarget::Control => {}
        }
    }

    /// Pointer moved to `point` (document-level listener).
    pub fn pointer_move(&mut self, point: Point, graph: &mut WorkflowGraph) {
        match &self.state {
            DragState::DraggingNode { node_id, grab_offset } => {
                let position = Point::new(point.x - grab_offset.x, point.y - grab_offset.y);
                graph.move_node(node_id, position);
            }
            DragState::DrawingConnection { source_id } => {
                // the source can vanish mid-gesture; keep the last preview
                // until the up event tears the gesture down
                if let Some(node) = graph.node(source_id) {
                    let anchor = geometry::output_anchor(node.position);
                    self.preview = Some(geometry::path_between(anchor, point));
                }
            }
            DragState::Idle | DragState::DraggingFromCatalog { .. } => {}
        }
    }

    /// Pointer released on `target` (document-level listener).
    ///
    /// A connection gesture released on an input anchor commits the edge;
    /// the graph applies its own validity rules, so a release on the source
    /// node's own input or onto a removed node falls through silently.
    /// Every release returns the controller to `Idle` and uninstalls the
    /// document listeners.
    pub fn pointer_up(&mut self, target: PointerTarget, graph: &mut WorkflowGraph) {
        if let DragState::DrawingConnection { source_id } = &self.state {
            if let PointerTarget::InputAnchor { node_id } = &target {
                graph.add_connection(source_id, node_id);
            }
        }
        if !matches!(self.state, DragState::DraggingFromCatalog { .. }) {
            self.state = DragState::Idle;
            self.listeners_installed = false;
            self.preview = None;
        }
    }

    /// Native drag out of the tool palette started.
    pub fn catalog_drag_start(&mut self, tool_id: &str) {
        if self.state != DragState::Idle {
            return;
        }
        self.state = DragState::DraggingFromCatalog {
            tool_id: tool_id.to_string(),
        };
    }

    /// Native drop onto the canvas at `point`.
    ///
    /// Places a node for the dragged tool centered under the drop point and
    /// returns its id; `None` when no catalog drag was in flight.
    pub fn canvas_drop(&mut self, point: Point, graph: &mut WorkflowGraph) -> Option<String> {
        let DragState::DraggingFromCatalog { tool_id } = std::mem::replace(&mut self.state, DragState::Idle)
        else {
            return None;
        };
        Some(graph.add_node(&tool_id, geometry::centered_drop(point)))
    }

    /// The host abandoned a native catalog drag (drop outside the canvas).
    pub fn catalog_drag_cancel(&mut self) {
        if matches!(self.state, DragState::DraggingFromCatalog { .. }) {
            self.state = DragState::Idle;
        }
    }

    /// Forcibly end any gesture (used when the canvas enters a build phase).
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.listeners_installed = false;
        self.preview = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup() -> (InteractionController, WorkflowGraph, String, String) {
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node("whisper", Point::new(100.0, 100.0));
        let b = graph.add_node("exiftool", Point::new(500.0, 100.0));
        (InteractionController::new(), graph, a, b)
    }

    #[test]
    fn test_node_drag_preserves_grab_offset() {
        let (mut ctl, mut graph, a, _) = setup();
        // grab 30,20 inside the node box
        ctl.pointer_down(
            PointerTarget::NodeBody { node_id: a.clone() },
            Point::new(130.0, 120.0),
            &graph,
        );
        assert!(ctl.listeners_installed());

        ctl.pointer_move(Point::new(330.0, 220.0), &mut graph);
        assert_eq!(graph.node(&a).unwrap().position, Point::new(300.0, 200.0));

        ctl.pointer_up(PointerTarget::Canvas, &mut graph);
        assert_eq!(*ctl.state(), DragState::Idle);
        assert!(!ctl.listeners_installed());
    }

    #[test]
    fn test_control_press_never_starts_a_gesture() {
        let (mut ctl, graph, _, _) = setup();
        ctl.pointer_down(PointerTarget::Control, Point::new(110.0, 110.0), &graph);
        assert_eq!(*ctl.state(), DragState::Idle);
        assert!(!ctl.listeners_installed());
    }

    #[test]
    fn test_input_anchor_press_is_inert() {
        let (mut ctl, graph, a, _) = setup();
        ctl.pointer_down(
            PointerTarget::InputAnchor { node_id: a },
            Point::new(100.0, 136.0),
            &graph,
        );
        assert_eq!(*ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_connection_gesture_commits_on_input_anchor() {
        let (mut ctl, mut graph, a, b) = setup();
        ctl.pointer_down(
            PointerTarget::OutputAnchor { node_id: a.clone() },
            Point::new(340.0, 136.0),
            &graph,
        );
        assert!(matches!(ctl.state(), DragState::DrawingConnection { .. }));
        assert!(ctl.connection_preview().is_some());

        ctl.pointer_move(Point::new(480.0, 130.0), &mut graph);
        let preview = ctl.connection_preview().unwrap();
        assert_eq!(preview.from, Point::new(340.0, 136.0));
        assert_eq!(preview.to, Point::new(480.0, 130.0));

        ctl.pointer_up(PointerTarget::InputAnchor { node_id: b.clone() }, &mut graph);
        assert_eq!(graph.connections().len(), 1);
        assert_eq!(graph.connections()[0].from, a);
        assert_eq!(graph.connections()[0].to, b);
        assert!(ctl.connection_preview().is_none());
        assert!(!ctl.listeners_installed());
    }

    #[test]
    fn test_connection_released_on_canvas_commits_nothing() {
        let (mut ctl, mut graph, a, _) = setup();
        ctl.pointer_down(
            PointerTarget::OutputAnchor { node_id: a },
            Point::new(340.0, 136.0),
            &graph,
        );
        ctl.pointer_up(PointerTarget::Canvas, &mut graph);
        assert!(graph.connections().is_empty());
        assert_eq!(*ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_connection_to_own_input_falls_through() {
        let (mut ctl, mut graph, a, _) = setup();
        ctl.pointer_down(
            PointerTarget::OutputAnchor { node_id: a.clone() },
            Point::new(340.0, 136.0),
            &graph,
        );
        ctl.pointer_up(PointerTarget::InputAnchor { node_id: a }, &mut graph);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_press_on_removed_node_is_inert() {
        let (mut ctl, mut graph, a, _) = setup();
        graph.remove_node(&a);
        ctl.pointer_down(
            PointerTarget::NodeBody { node_id: a },
            Point::new(110.0, 110.0),
            &graph,
        );
        assert_eq!(*ctl.state(), DragState::Idle);
        assert!(!ctl.listeners_installed());
    }

    #[test]
    fn test_catalog_drag_installs_no_listeners() {
        let (mut ctl, mut graph, _, _) = setup();
        ctl.catalog_drag_start("archivebox");
        assert!(!ctl.listeners_installed());

        let id = ctl.canvas_drop(Point::new(400.0, 300.0), &mut graph).unwrap();
        let node = graph.node(&id).unwrap();
        // centered under the drop point
        assert_eq!(node.position, Point::new(280.0, 264.0));
        assert_eq!(node.tool_id, "archivebox");
        assert_eq!(*ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_without_drag_returns_none() {
        let (mut ctl, mut graph, _, _) = setup();
        assert!(ctl.canvas_drop(Point::new(0.0, 0.0), &mut graph).is_none());
        assert_eq!(graph.nodes().len(), 2);
    }

    #[test]
    fn test_catalog_drag_cancel() {
        let (mut ctl, mut graph, _, _) = setup();
        ctl.catalog_drag_start("archivebox");
        ctl.catalog_drag_cancel();
        assert_eq!(*ctl.state(), DragState::Idle);
        assert!(ctl.canvas_drop(Point::new(0.0, 0.0), &mut graph).is_none());
    }

    #[test]
    fn test_second_press_during_gesture_ignored() {
        let (mut ctl, mut graph, a, b) = setup();
        ctl.pointer_down(
            PointerTarget::NodeBody { node_id: a.clone() },
            Point::new(110.0, 110.0),
            &graph,
        );
        ctl.pointer_down(
            PointerTarget::OutputAnchor { node_id: b },
            Point::new(740.0, 136.0),
            &graph,
        );
        assert!(matches!(
            ctl.state(),
            DragState::DraggingNode { node_id, .. } if *node_id == a
        ));
        ctl.pointer_up(PointerTarget::Canvas, &mut graph);
    }

    #[test]
    fn test_listener_invariant_across_transitions() {
        let (mut ctl, mut graph, a, _) = setup();
        let captured = |s: &DragState| {
            matches!(
                s,
                DragState::DraggingNode { .. } | DragState::DrawingConnection { .. }
            )
        };

        assert_eq!(ctl.listeners_installed(), captured(ctl.state()));
        ctl.pointer_down(
            PointerTarget::NodeBody { node_id: a },
            Point::new(110.0, 110.0),
            &graph,
        );
        assert_eq!(ctl.listeners_installed(), captured(ctl.state()));
        ctl.pointer_move(Point::new(200.0, 200.0), &mut graph);
        assert_eq!(ctl.listeners_installed(), captured(ctl.state()));
        ctl.pointer_up(PointerTarget::Canvas, &mut graph);
        assert_eq!(ctl.listeners_installed(), captured(ctl.state()));

        ctl.catalog_drag_start("archivebox");
        assert_eq!(ctl.listeners_installed(), captured(ctl.state()));
    }
}
