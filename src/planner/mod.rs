//! AI Planner Boundary
//!
//! The planner turns a natural-language command plus the caller's visible
//! tool list into an ordered list of tool ids. The core treats it as an
//! untrusted oracle: the response contract is validated here, and unknown
//! ids in an otherwise valid plan are left for the layout stage to drop.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog::Tool;
use crate::error::{CaseboardError, Result};

pub use http::HttpPlanner;

/// An ordered pipeline plan. Order is meaningful: the auto-layout stage
/// chains node `i` into node `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedWorkflow {
    pub tool_ids: Vec<String>,
}

/// Trait abstracting workflow planners
#[async_trait]
pub trait Planner: Send + Sync {
    /// Plan a pipeline for `command`, choosing only from `tools`.
    async fn plan(&self, command: &str, tools: &[Tool]) -> Result<PlannedWorkflow>;

    /// Planner name for logging
    fn name(&self) -> &str;
}

/// Validate a raw planner response against the wire contract:
/// a JSON object carrying a `toolIds` array of strings.
///
/// An empty array is a valid plan (the command matched no tools);
/// anything else — missing key, wrong type, non-string element — is
/// `PlanMalformed`.
pub fn parse_plan_response(value: &Value) -> Result<PlannedWorkflow> {
    let ids = value
        .get("toolIds")
        .ok_or_else(|| CaseboardError::PlanMalformed {
            reason: "response has no 'toolIds' field".to_string(),
        })?
        .as_array()
        .ok_or_else(|| CaseboardError::PlanMalformed {
            reason: "'toolIds' is not an array".to_string(),
        })?;

    let tool_ids = ids
        .iter()
        .map(|v| {
            v.as_str().map(String::from).ok_or_else(|| CaseboardError::PlanMalformed {
                reason: format!("'toolIds' contains a non-string element: {}", v),
            })
        })
        .collect::<Result<Vec<String>>>()?;

    Ok(PlannedWorkflow { tool_ids })
}

/// Mock planner for testing: returns a fixed plan regardless of command.
pub struct MockPlanner {
    plan: Vec<String>,
}

impl MockPlanner {
    pub fn new(tool_ids: Vec<String>) -> Self {
        Self { plan: tool_ids }
    }
}

#[async_trait]
impl Planner for MockPlanner {
    async fn plan(&self, _command: &str, _tools: &[Tool]) -> Result<PlannedWorkflow> {
        Ok(PlannedWorkflow {
            tool_ids: self.plan.clone(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Mock planner that always fails, for error-path testing.
pub struct FailingPlanner;

#[async_trait]
impl Planner for FailingPlanner {
    async fn plan(&self, _command: &str, _tools: &[Tool]) -> Result<PlannedWorkflow> {
        Err(CaseboardError::PlanRejected {
            reason: "mock planner always fails".to_string(),
        })
    }

    fn name(&self) -> &str {
        "failing-mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_response() {
        let value = json!({"toolIds": ["whisper", "exiftool"]});
        let plan = parse_plan_response(&value).unwrap();
        assert_eq!(plan.tool_ids, vec!["whisper", "exiftool"]);
    }

    #[test]
    fn test_parse_empty_plan_is_valid() {
        let value = json!({"toolIds": []});
        let plan = parse_plan_response(&value).unwrap();
        assert!(plan.tool_ids.is_empty());
    }

    #[test]
    fn test_parse_missing_field_is_malformed() {
        let value = json!({"tools": ["whisper"]});
        let err = parse_plan_response(&value).unwrap_err();
        assert_eq!(err.code(), "CB-011");
    }

    #[test]
    fn test_parse_wrong_type_is_malformed() {
        let value = json!({"toolIds": "whisper"});
        assert_eq!(parse_plan_response(&value).unwrap_err().code(), "CB-011");
    }

    #[test]
    fn test_parse_non_string_element_is_malformed() {
        let value = json!({"toolIds": ["whisper", 42]});
        let err = parse_plan_response(&value).unwrap_err();
        assert_eq!(err.code(), "CB-011");
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let value = json!({"toolIds": ["whisper"], "confidence": 0.9});
        assert!(parse_plan_response(&value).is_ok());
    }

    #[tokio::test]
    async fn test_mock_planner_returns_fixed_plan() {
        let planner = MockPlanner::new(vec!["whisper".to_string()]);
        let plan = planner.plan("transcribe this", &[]).await.unwrap();
        assert_eq!(plan.tool_ids, vec!["whisper"]);
        assert_eq!(planner.name(), "mock");
    }

    #[tokio::test]
    async fn test_failing_planner_rejects() {
        let planner = FailingPlanner;
        let err = planner.plan("anything", &[]).await.unwrap_err();
        assert_eq!(err.code(), "CB-010");
        assert!(err.is_planning_error());
    }

    #[test]
    fn test_planner_trait_is_object_safe() {
        let planners: Vec<Box<dyn Planner>> = vec![
            Box::new(MockPlanner::new(vec![])),
            Box::new(FailingPlanner),
        ];
        assert_eq!(planners.len(), 2);
    }
}
