//! Break one task into subtasks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{RelayError, build_prompt, log_fallback, request_json};
use crate::model::GenerativeModel;

const ATOMIZE_INSTRUCTION: &str = r#"Break down the given task into 3-5 small, actionable sub-tasks.
Return ONLY valid JSON.
Structure: { "subtasks": ["subtask 1", "subtask 2", ...] }"#;

/// Subtasks for one task. Entries are passed through as the model sent
/// them; the count is not clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtomizeResult {
    #[serde(default)]
    pub subtasks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AtomizeResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Handles `atomize` requests.
#[derive(Clone)]
pub struct TaskAtomizationHandler {
    model: Arc<dyn GenerativeModel>,
}

impl TaskAtomizationHandler {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn request_subtasks(&self, task_text: &str) -> Result<AtomizeResult, RelayError> {
        let prompt = build_prompt(ATOMIZE_INSTRUCTION, "Task", task_text);
        request_json(self.model.as_ref(), &prompt).await
    }

    /// Never fails; any error yields an empty subtask list.
    pub async fn handle(&self, task_text: &str) -> AtomizeResult {
        match self.request_subtasks(task_text).await {
            Ok(result) => {
                info!(subtasks = result.subtasks.len(), "task atomized by model");
                result
            }
            Err(err) => {
                log_fallback("atomize", self.model.as_ref(), &err);
                AtomizeResult::empty()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_serializes_as_empty_array() {
        assert_eq!(
            serde_json::to_value(AtomizeResult::empty()).unwrap(),
            serde_json::json!({"subtasks": []})
        );
    }

    #[test]
    fn missing_subtasks_field_defaults_to_empty() {
        let result: AtomizeResult =
            serde_json::from_value(serde_json::json!({"note": "nothing to split"})).unwrap();
        assert!(result.subtasks.is_empty());
        assert_eq!(result.extra["note"], "nothing to split");
    }

    #[test]
    fn entries_are_not_validated() {
        let result: AtomizeResult = serde_json::from_value(serde_json::json!({
            "subtasks": ["a", 2, {"text": "c"}, "d", "e", "f", "g"]
        }))
        .unwrap();
        assert_eq!(result.subtasks.len(), 7);
    }
}
