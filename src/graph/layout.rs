//! Auto-Layout Planner
//!
//! Turns an ordered list of tool ids (as produced by the AI planner) into a
//! fully laid-out graph: nodes on a left-to-right, top-to-bottom grid, with
//! a linear chain of connections in list order.

use rustc_hash::FxHashSet;

use crate::catalog::Tool;
use crate::config::LayoutSettings;
use crate::geometry::{Point, NODE_HEIGHT, NODE_WIDTH};

use super::model::WorkflowGraph;

/// Grid position for slot `i`: rows of `row_width` nodes, filled
/// left to right. Cell size is the fixed node box plus the configured
/// gaps, so grid placement and anchor math share one box size.
fn grid_position(i: usize, cfg: &LayoutSettings) -> Point {
    let col = (i % cfg.row_width) as f64;
    let row = (i / cfg.row_width) as f64;
    Point::new(
        col * (NODE_WIDTH + cfg.h_spacing) + cfg.margin,
        row * (NODE_HEIGHT + cfg.v_spacing) + cfg.margin,
    )
}

/// Build a chained grid layout from planner output.
///
/// Ids not present in `visible` are dropped before placement, so the grid
/// renumbers around them and the chain stays contiguous — a plan of five
/// ids with the middle one unknown yields four nodes and three connections.
/// Duplicate ids are legitimate (a plan may use the same tool twice) and
/// each occurrence gets its own node.
pub fn chain_layout(
    tool_ids: &[String],
    visible: &[Tool],
    cfg: &LayoutSettings,
) -> WorkflowGraph {
    let known: FxHashSet<&str> = visible.iter().map(|t| t.id.as_str()).collect();

    let mut graph = WorkflowGraph::new();
    let mut placed: Vec<String> = Vec::new();
    for tool_id in tool_ids.iter().filter(|id| known.contains(id.as_str())) {
        let position = grid_position(placed.len(), cfg);
        placed.push(graph.add_node(tool_id, position));
    }
    for pair in placed.windows(2) {
        graph.add_connection(&pair[0], &pair[1]);
    }
    graph
}
