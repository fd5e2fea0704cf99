//! Tool Tab Lifecycle
//!
//! Manages the sequence of open tool tabs and which one is active. Tabs are
//! keyed by tool id: running a tool that is already open refocuses the
//! existing tab instead of opening a second one.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::{Tool, ToolCatalog};
use crate::error::{CaseboardError, Result};
use crate::event::{EventEmitter, EventKind};

/// Open tabs in opening order plus the active tool id.
#[derive(Debug, Default)]
pub struct ToolTabs {
    open: Vec<Tool>,
    active: Option<String>,
}

/// Process-wide handle shared between the canvas and the tab bar.
pub type SharedToolTabs = Arc<Mutex<ToolTabs>>;

impl ToolTabs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_tabs(&self) -> &[Tool] {
        &self.open
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The tool to render, or `None` when the active id does not refer to
    /// an open tab. This is the render guard that makes an unvalidated
    /// `select_tab` safe.
    pub fn active_tool(&self) -> Option<&Tool> {
        let active = self.active.as_deref()?;
        self.open.iter().find(|t| t.id == active)
    }

    /// Open (or refocus) the tab for `tool_id`, resolving it live against
    /// the catalog. Fails with `ToolNotFound` when the catalog no longer
    /// knows the id or the tool was deactivated.
    pub fn run_tool(
        &mut self,
        catalog: &dyn ToolCatalog,
        tool_id: &str,
        emitter: &dyn EventEmitter,
    ) -> Result<()> {
        let tool = catalog
            .find(tool_id)
            .filter(|t| t.is_active)
            .ok_or_else(|| CaseboardError::ToolNotFound {
                tool_id: tool_id.to_string(),
            })?;

        if !self.open.iter().any(|t| t.id == tool_id) {
            self.open.push(tool);
            emitter.emit(EventKind::ToolOpened {
                tool_id: tool_id.to_string(),
            });
        }
        self.active = Some(tool_id.to_string());
        emitter.emit(EventKind::TabSelected {
            tool_id: tool_id.to_string(),
        });
        Ok(())
    }

    /// Make `tool_id` the active tab. Not validated against the open list;
    /// rendering goes through `active_tool` which returns `None` for ids
    /// that are not open.
    pub fn select_tab(&mut self, tool_id: &str, emitter: &dyn EventEmitter) {
        self.active = Some(tool_id.to_string());
        emitter.emit(EventKind::TabSelected {
            tool_id: tool_id.to_string(),
        });
    }

    /// Close the tab for `tool_id`; silent no-op when it is not open.
    ///
    /// When the closed tab was active, focus moves to its left neighbor in
    /// the remaining list; closing the leftmost tab focuses the new
    /// leftmost. Closing a non-active tab leaves focus untouched.
    pub fn close_tab(&mut self, tool_id: &str, emitter: &dyn EventEmitter) {
        let Some(index) = self.open.iter().position(|t| t.id == tool_id) else {
            return;
        };
        self.open.remove(index);

        let was_active = self.active.as_deref() == Some(tool_id);
        if was_active {
            self.active = if self.open.is_empty() {
                None
            } else {
                let neighbor = if index > 0 { index - 1 } else { 0 };
                Some(self.open[neighbor].id.clone())
            };
        }
        emitter.emit(EventKind::TabClosed {
            tool_id: tool_id.to_string(),
            new_active: self.active.clone(),
        });
    }
}
