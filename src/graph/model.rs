//! Graph Document Model
//!
//! Mutation rules: structurally invalid requests (self-loops, duplicate
//! connections, endpoints that are not on the canvas, moves or removals of
//! unknown nodes) are absorbed as silent no-ops. These arrive through
//! ordinary UI races — a pointer-up on a node that another event already
//! removed — and are not worth an error channel.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::geometry::Point;

/// A tool instance placed on the canvas.
///
/// `id` is unique within the session; `tool_id` references the catalog and
/// is intentionally NOT validated here — the catalog is live, and stale
/// references are handled at run time, not at placement time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasNode {
    pub id: String,
    pub tool_id: String,
    pub position: Point,
}

/// Directed edge between two canvas nodes, held by node id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

/// The canvas document: nodes in placement order plus their connections.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WorkflowGraph {
    nodes: Vec<CanvasNode>,
    connections: Vec<Connection>,
    #[serde(skip)]
    id_seq: u64,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[CanvasNode] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn node(&self, node_id: &str) -> Option<&CanvasNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn contains_node(&self, node_id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == node_id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Place a new node for `tool_id` at `position` and return its id.
    ///
    /// Ids follow `{tool_id}-{millis}-{seq}`: the wall-clock part keeps ids
    /// recognizable in logs, the per-graph sequence makes them unique even
    /// when several nodes land within the same millisecond.
    pub fn add_node(&mut self, tool_id: &str, position: Point) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let id = format!("{}-{}-{}", tool_id, millis, self.id_seq);
        self.id_seq += 1;
        self.nodes.push(CanvasNode {
            id: id.clone(),
            tool_id: tool_id.to_string(),
            position,
        });
        id
    }

    /// Move a node to an absolute position; no-op when the id is unknown.
    pub fn move_node(&mut self, node_id: &str, position: Point) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == node_id) {
            node.position = position;
        }
    }

    /// Remove a node and every connection touching it.
    ///
    /// Returns the severed connections so callers can report what the
    /// cascade took with it; empty when the id was unknown.
    pub fn remove_node(&mut self, node_id: &str) -> SmallVec<[Connection; 4]> {
        if !self.contains_node(node_id) {
            return SmallVec::new();
        }
        self.nodes.retain(|n| n.id != node_id);

        let mut severed: SmallVec<[Connection; 4]> = SmallVec::new();
        self.connections.retain(|c| {
            let touches = c.from == node_id || c.to == node_id;
            if touches {
                severed.push(c.clone());
            }
            !touches
        });
        severed
    }

    /// Connect `from` to `to`. Silent no-op for self-loops, unknown
    /// endpoints, and duplicates of an existing connection.
    pub fn add_connection(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        if !self.contains_node(from) || !self.contains_node(to) {
            return;
        }
        if self.connections.iter().any(|c| c.from == from && c.to == to) {
            return;
        }
        self.connections.push(Connection {
            from: from.to_string(),
            to: to.to_string(),
        });
    }

    /// Replace the whole document with a planner-produced graph.
    ///
    /// The incoming connections are revalidated against the incoming node
    /// set; the id sequence keeps counting so ids never repeat within a
    /// session even across replacements.
    pub fn replace_all(&mut self, nodes: Vec<CanvasNode>, connections: Vec<Connection>) {
        let ids: FxHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        self.connections = connections
            .into_iter()
            .filter(|c| c.from != c.to && ids.contains(c.from.as_str()) && ids.contains(c.to.as_str()))
            .collect();
        self.nodes = nodes;
    }

    /// Decompose into node and connection lists, dropping the id sequence.
    pub fn into_parts(self) -> (Vec<CanvasNode>, Vec<Connection>) {
        (self.nodes, self.connections)
    }

    /// Drop every node and connection. The id sequence is not reset.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph_with_two_nodes() -> (WorkflowGraph, String, String) {
        let mut graph = WorkflowGraph::new();
        let a = graph.add_node("whisper", Point::new(0.0, 0.0));
        let b = graph.add_node("exiftool", Point::new(320.0, 0.0));
        (graph, a, b)
    }

    #[test]
    fn test_add_node_ids_unique_within_same_millisecond() {
        let mut graph = WorkflowGraph::new();
        let ids: Vec<String> = (0..50)
            .map(|_| graph.add_node("whisper", Point::new(0.0, 0.0)))
            .collect();
        let unique: FxHashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_node_id_shape() {
        let mut graph = WorkflowGraph::new();
        let id = graph.add_node("sherlock-maigret", Point::new(0.0, 0.0));
        assert!(id.starts_with("sherlock-maigret-"));
        assert!(id.ends_with("-0"));
    }

    #[test]
    fn test_move_unknown_node_is_noop() {
        let (mut graph, a, _) = graph_with_two_nodes();
        let before = graph.node(&a).unwrap().position;
        graph.move_node("ghost", Point::new(999.0, 999.0));
        assert_eq!(graph.node(&a).unwrap().position, before);
        assert_eq!(graph.nodes().len(), 2);
    }

    #[test]
    fn test_remove_node_cascades_connections() {
        let (mut graph, a, b) = graph_with_two_nodes();
        let c = graph.add_node("archivebox", Point::new(640.0, 0.0));
        graph.add_connection(&a, &b);
        graph.add_connection(&b, &c);
        graph.add_connection(&a, &c);

        let severed = graph.remove_node(&b);
        assert_eq!(severed.len(), 2);
        assert_eq!(graph.connections().len(), 1);
        assert_eq!(graph.connections()[0], Connection { from: a, to: c });
    }

    #[test]
    fn test_remove_unknown_node_is_noop() {
        let (mut graph, a, b) = graph_with_two_nodes();
        graph.add_connection(&a, &b);
        let severed = graph.remove_node("ghost");
        assert!(severed.is_empty());
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn test_self_loop_rejected_silently() {
        let (mut graph, a, _) = graph_with_two_nodes();
        graph.add_connection(&a, &a);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_duplicate_connection_rejected_silently() {
        let (mut graph, a, b) = graph_with_two_nodes();
        graph.add_connection(&a, &b);
        graph.add_connection(&a, &b);
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn test_reverse_direction_is_not_a_duplicate() {
        let (mut graph, a, b) = graph_with_two_nodes();
        graph.add_connection(&a, &b);
        graph.add_connection(&b, &a);
        assert_eq!(graph.connections().len(), 2);
    }

    #[test]
    fn test_connection_to_unknown_endpoint_rejected() {
        let (mut graph, a, _) = graph_with_two_nodes();
        graph.add_connection(&a, "ghost");
        graph.add_connection("ghost", &a);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_replace_all_filters_dangling_connections() {
        let (mut graph, a, b) = graph_with_two_nodes();
        graph.add_connection(&a, &b);

        let nodes = vec![CanvasNode {
            id: "n1".into(),
            tool_id: "whisper".into(),
            position: Point::new(0.0, 0.0),
        }];
        let connections = vec![
            Connection { from: "n1".into(), to: "ghost".into() },
            Connection { from: "n1".into(), to: "n1".into() },
        ];
        graph.replace_all(nodes, connections);

        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_id_seq_survives_clear_and_replace() {
        let mut graph = WorkflowGraph::new();
        let first = graph.add_node("whisper", Point::new(0.0, 0.0));
        graph.clear();
        let second = graph.add_node("whisper", Point::new(0.0, 0.0));
        assert_ne!(first, second);
        assert!(second.ends_with("-1"));
    }

    #[test]
    fn test_clear_empties_everything() {
        let (mut graph, a, b) = graph_with_two_nodes();
        graph.add_connection(&a, &b);
        graph.clear();
        assert!(graph.is_empty());
        assert!(graph.connections().is_empty());
    }
}
