//! Tool Catalog
//!
//! The catalog is an external collaborator from the canvas core's point of
//! view: it owns the set of available tools and their visibility policy.
//! The core consumes it through the [`ToolCatalog`] trait and only ever
//! builds canvas nodes from the already-filtered view returned by
//! [`visible_tools`], which is what keeps node → tool references from
//! dangling at creation time.

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// User roles recognized by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    SuperAdmin,
    InstitutionJournalist,
    IndependentJournalist,
    Guest,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::SuperAdmin => "super-admin",
            Role::InstitutionJournalist => "institution-journalist",
            Role::IndependentJournalist => "independent-journalist",
            Role::Guest => "guest",
        };
        f.write_str(name)
    }
}

/// A catalog-described analysis capability.
///
/// Identity is `id`; everything else is display/policy metadata. The canvas
/// holds tools by id only and re-resolves through the catalog on every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub allowed_roles: Vec<Role>,
}

impl Tool {
    /// Convenience constructor for tests and fixtures
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: String::new(),
            is_active: true,
            allowed_roles: vec![
                Role::InstitutionJournalist,
                Role::IndependentJournalist,
            ],
        }
    }

    /// Whether `role` may see this tool. Super-admin bypasses the role list
    /// but not the active flag (checked by the caller).
    pub fn allows(&self, role: Role) -> bool {
        role == Role::SuperAdmin || self.allowed_roles.contains(&role)
    }
}

/// Live source of the tool set.
///
/// Must be callable synchronously; the core treats the result as a snapshot
/// of a live, filterable set and never caches it across events.
pub trait ToolCatalog: Send + Sync {
    /// All tools currently known, active or not
    fn tools(&self) -> Vec<Tool>;

    /// Resolve a single tool by id
    fn find(&self, tool_id: &str) -> Option<Tool> {
        self.tools().into_iter().find(|t| t.id == tool_id)
    }
}

/// In-memory catalog with interior mutability.
///
/// The write surface (`upsert`, `set_active`) models the admin side:
/// a tool can be deactivated while it sits on someone's canvas, which is
/// exactly the referential-integrity case `run_node` must survive.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Vec<Tool>>,
}

impl InMemoryCatalog {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self {
            inner: RwLock::new(tools),
        }
    }

    /// Insert or replace a tool (matched by id)
    pub fn upsert(&self, tool: Tool) {
        let mut tools = self.inner.write();
        match tools.iter_mut().find(|t| t.id == tool.id) {
            Some(slot) => *slot = tool,
            None => tools.push(tool),
        }
    }

    /// Flip a tool's active flag; no-op when the id is unknown
    pub fn set_active(&self, tool_id: &str, active: bool) {
        let mut tools = self.inner.write();
        if let Some(tool) = tools.iter_mut().find(|t| t.id == tool_id) {
            tool.is_active = active;
        }
    }

    /// Remove a tool entirely; no-op when the id is unknown
    pub fn remove(&self, tool_id: &str) {
        self.inner.write().retain(|t| t.id != tool_id);
    }
}

impl ToolCatalog for InMemoryCatalog {
    fn tools(&self) -> Vec<Tool> {
        self.inner.read().clone()
    }
}

/// The canvas-visible view: active tools the role may use, minus the
/// configured canvas exclusions. Nodes are only ever constructed from
/// entries of this list.
pub fn visible_tools(
    catalog: &dyn ToolCatalog,
    role: Role,
    excluded_ids: &FxHashSet<String>,
) -> Vec<Tool> {
    catalog
        .tools()
        .into_iter()
        .filter(|tool| {
            tool.is_active && tool.allows(role) && !excluded_ids.contains(&tool.id)
        })
        .collect()
}

/// Group tools by category, categories sorted lexicographically.
/// Within a category the catalog order is preserved.
pub fn categorized(tools: &[Tool]) -> BTreeMap<String, Vec<Tool>> {
    let mut map: BTreeMap<String, Vec<Tool>> = BTreeMap::new();
    for tool in tools {
        map.entry(tool.category.clone()).or_default().push(tool.clone());
    }
    map
}
