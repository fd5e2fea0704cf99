//! Caseboard Error Types with Error Codes
//!
//! Error code ranges:
//! - CB-000-009: Catalog/tool resolution errors
//! - CB-010-019: AI planner errors
//! - CB-020-029: Config errors
//! - CB-030-039: IO/JSON errors
//!
//! Invalid graph mutations (self-loops, duplicate connections, moves of
//! removed nodes, closing a tab that is not open) are deliberately NOT
//! errors: they are reachable through ordinary UI races and are absorbed as
//! silent no-ops by the graph and tab models.

use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CaseboardError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// All error variants are part of the public API.
///
/// Implements both `thiserror::Error` for std error compatibility
/// and `miette::Diagnostic` for fancy terminal error display.
#[derive(Error, Debug, Diagnostic)]
#[diagnostic(url(docsrs))]
pub enum CaseboardError {
    // ═══════════════════════════════════════════
    // CATALOG ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[CB-001] Tool '{tool_id}' not found in catalog")]
    #[diagnostic(
        code(caseboard::tool_not_found),
        help("The tool may have been deactivated or removed while it was on the canvas")
    )]
    ToolNotFound { tool_id: String },

    // ═══════════════════════════════════════════
    // PLANNER ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[CB-010] Workflow planning failed: {reason}")]
    #[diagnostic(
        code(caseboard::plan_rejected),
        help("Retry the command or rephrase it; check planner endpoint availability")
    )]
    PlanRejected { reason: String },

    #[error("[CB-011] Planner returned a malformed response: {reason}")]
    #[diagnostic(
        code(caseboard::plan_malformed),
        help("The planner must answer with a JSON object carrying a 'toolIds' string array")
    )]
    PlanMalformed { reason: String },

    #[error("[CB-012] Planner request timed out after {timeout_secs}s")]
    PlanTimeout { timeout_secs: u64 },

    #[error("[CB-013] A workflow build is already in progress")]
    #[diagnostic(
        code(caseboard::build_in_progress),
        help("Wait for the pending build to finish; concurrent builds are rejected")
    )]
    BuildInProgress,

    // ═══════════════════════════════════════════
    // CONFIG ERRORS (020-029)
    // ═══════════════════════════════════════════
    #[error("[CB-020] Config error: {reason}")]
    ConfigError { reason: String },

    // ═══════════════════════════════════════════
    // IO / JSON ERRORS (030-039)
    // ═══════════════════════════════════════════
    #[error("[CB-030] IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("[CB-031] JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CaseboardError {
    /// Get the error code (e.g., "CB-001")
    pub fn code(&self) -> &'static str {
        match self {
            Self::ToolNotFound { .. } => "CB-001",
            Self::PlanRejected { .. } => "CB-010",
            Self::PlanMalformed { .. } => "CB-011",
            Self::PlanTimeout { .. } => "CB-012",
            Self::BuildInProgress => "CB-013",
            Self::ConfigError { .. } => "CB-020",
            Self::IoError(_) => "CB-030",
            Self::JsonError(_) => "CB-031",
        }
    }

    /// True for failures of the AI planning path.
    ///
    /// Callers surface these as the dismissible workflow-builder error,
    /// which must stay visually distinct from the per-node "tool not found"
    /// condition raised when a catalog entry vanishes under a live node.
    pub fn is_planning_error(&self) -> bool {
        matches!(
            self,
            Self::PlanRejected { .. }
                | Self::PlanMalformed { .. }
                | Self::PlanTimeout { .. }
                | Self::BuildInProgress
        )
    }
}

impl FixSuggestion for CaseboardError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            CaseboardError::ToolNotFound { .. } => {
                Some("Verify the tool is active and visible to the current role")
            }
            CaseboardError::PlanRejected { .. } => {
                Some("Check planner endpoint availability and try again")
            }
            CaseboardError::PlanMalformed { .. } => {
                Some("The planner response must be {\"toolIds\": [..]} with string ids")
            }
            CaseboardError::PlanTimeout { .. } => {
                Some("Increase the planner timeout or simplify the command")
            }
            CaseboardError::BuildInProgress => Some("Wait for the pending build to finish"),
            CaseboardError::ConfigError { .. } => {
                Some("Check ~/.config/caseboard/config.toml for syntax errors")
            }
            CaseboardError::IoError(_) => Some("Check file path and permissions"),
            CaseboardError::JsonError(_) => Some("Check JSON syntax"),
        }
    }
}
