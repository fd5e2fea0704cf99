//! Canvas Event Log
//!
//! Append-only record of what happened on the canvas and in the tab
//! manager. State changes are dispatched explicitly through an
//! [`EventEmitter`] rather than observed through ambient reactive state,
//! which keeps consumers (persistence, audit, UI sync) decoupled from the
//! core structs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    NodeAdded { node_id: String, tool_id: String },
    NodeMoved { node_id: String },
    NodeRemoved { node_id: String, severed: usize },
    ConnectionAdded { from: String, to: String },
    GraphReplaced { nodes: usize, connections: usize },
    GraphCleared,
    BuildStarted { command: String },
    BuildCompleted { nodes: usize },
    BuildFailed { code: String, message: String },
    ToolOpened { tool_id: String },
    TabSelected { tool_id: String },
    TabClosed { tool_id: String, new_active: Option<String> },
}

/// A logged event with a monotonic id and a milliseconds-since-start stamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub timestamp_ms: u64,
    pub kind: EventKind,
}

/// Sink for canvas events.
///
/// Implementations must tolerate being called from any thread.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, kind: EventKind);
}

/// Emitter that drops everything; the default when no consumer is wired up.
#[derive(Debug, Default)]
pub struct NoopEmitter;

impl EventEmitter for NoopEmitter {
    fn emit(&self, _kind: EventKind) {}
}

/// In-memory append-only log with monotonic event ids.
#[derive(Debug)]
pub struct EventLog {
    next_id: AtomicU64,
    started: Instant,
    events: RwLock<Vec<Event>>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            started: Instant::now(),
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Snapshot of all events in append order
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    /// Events matching a predicate on the kind
    pub fn filtered(&self, pred: impl Fn(&EventKind) -> bool) -> Vec<Event> {
        self.events
            .read()
            .iter()
            .filter(|e| pred(&e.kind))
            .cloned()
            .collect()
    }
}

impl EventEmitter for EventLog {
    fn emit(&self, kind: EventKind) {
        let event = Event {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            timestamp_ms: self.started.elapsed().as_millis() as u64,
            kind,
        };
        self.events.write().push(event);
    }
}
