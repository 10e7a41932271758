//! Learning-resource lookup for one task.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{RelayError, build_prompt, log_fallback, request_json};
use crate::model::GenerativeModel;

const RESOURCES_INSTRUCTION: &str = r#"Provide 2-3 high-quality learning resources (documentation, tutorials, or articles) for the given task.
Return ONLY valid JSON.
Structure: { "resources": [{ "title": "Resource Name", "url": "Link" }, ...] }"#;

/// Resources for one task. Entries normally carry `title` and `url` but
/// are passed through unchecked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceResult {
    #[serde(default)]
    pub resources: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResourceResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Handles `resources` requests.
#[derive(Clone)]
pub struct ResourceLookupHandler {
    model: Arc<dyn GenerativeModel>,
}

impl ResourceLookupHandler {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn request_resources(&self, task_text: &str) -> Result<ResourceResult, RelayError> {
        let prompt = build_prompt(RESOURCES_INSTRUCTION, "Task", task_text);
        request_json(self.model.as_ref(), &prompt).await
    }

    /// Never fails; any error yields an empty resource list.
    pub async fn handle(&self, task_text: &str) -> ResourceResult {
        match self.request_resources(task_text).await {
            Ok(result) => {
                info!(resources = result.resources.len(), "resources found by model");
                result
            }
            Err(err) => {
                log_fallback("resources", self.model.as_ref(), &err);
                ResourceResult::empty()
            }
        }
    }
}
