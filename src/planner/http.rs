//! HTTP Planner Transport
//!
//! JSON-over-HTTP implementation of the [`Planner`] trait. The request
//! carries the user command plus a serialized view of the visible tools;
//! the service answers `{"toolIds": [...]}`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::catalog::Tool;
use crate::error::{CaseboardError, Result};

use super::{parse_plan_response, PlannedWorkflow, Planner};

const DEFAULT_ENDPOINT: &str = "http://localhost:8800/v1/plan";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct ToolSummary<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct PlanRequest<'a> {
    command: &'a str,
    tools: Vec<ToolSummary<'a>>,
    instructions: String,
}

/// Planner backed by an HTTP planning service.
pub struct HttpPlanner {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpPlanner {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// One line per tool so the planning model can only pick real ids.
    fn instruction_block(tools: &[Tool]) -> String {
        let mut out = String::from(
            "Select tools for the investigation pipeline, in execution order. \
             Answer with a JSON object {\"toolIds\": [..]} using only ids from this list:\n",
        );
        for tool in tools {
            out.push_str(&format!(
                "- {} (id: {}): {}\n",
                tool.name, tool.id, tool.description
            ));
        }
        out
    }
}

impl Default for HttpPlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Planner for HttpPlanner {
    #[instrument(skip(self, tools), fields(endpoint = %self.endpoint, tool_count = tools.len()))]
    async fn plan(&self, command: &str, tools: &[Tool]) -> Result<PlannedWorkflow> {
        let request = PlanRequest {
            command,
            tools: tools
                .iter()
                .map(|t| ToolSummary {
                    id: &t.id,
                    name: &t.name,
                    category: &t.category,
                    description: &t.description,
                })
                .collect(),
            instructions: Self::instruction_block(tools),
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = tokio::time::timeout(self.timeout, builder.send())
            .await
            .map_err(|_| CaseboardError::PlanTimeout {
                timeout_secs: self.timeout.as_secs(),
            })?
            .map_err(|e| CaseboardError::PlanRejected {
                reason: format!("request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "planner returned non-success status");
            return Err(CaseboardError::PlanRejected {
                reason: format!("planner answered with status {}", status),
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CaseboardError::PlanMalformed {
                reason: format!("response body is not JSON: {}", e),
            })?;

        let plan = parse_plan_response(&body)?;
        debug!(tool_ids = ?plan.tool_ids, "planner produced a plan");
        Ok(plan)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let planner = HttpPlanner::new();
        assert_eq!(planner.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(planner.timeout, Duration::from_secs(30));
        assert!(planner.api_key.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let planner = HttpPlanner::new()
            .with_endpoint("https://plan.example/v2")
            .with_api_key("sk-test")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(planner.endpoint, "https://plan.example/v2");
        assert_eq!(planner.api_key.as_deref(), Some("sk-test"));
        assert_eq!(planner.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_instruction_block_lists_each_tool() {
        let tools = vec![
            Tool {
                description: "Speech to text".into(),
                ..Tool::new("whisper", "Whisper", "Audio")
            },
            Tool::new("exiftool", "ExifTool", "Forensics"),
        ];
        let block = HttpPlanner::instruction_block(&tools);
        assert!(block.contains("- Whisper (id: whisper): Speech to text"));
        assert!(block.contains("- ExifTool (id: exiftool):"));
        assert!(block.contains("toolIds"));
    }
}
