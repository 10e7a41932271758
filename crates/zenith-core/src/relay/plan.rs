//! Full-plan generation with synthetic fallback.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::{RelayError, build_prompt, log_fallback, request_json};
use crate::model::GenerativeModel;
use crate::synthetic::{self, SyntheticPlan};

/// Instruction sent ahead of the user's goal.
const PLAN_INSTRUCTION: &str = r#"You are an expert study planner.
Create a detailed task list based on the user's goal and duration.

CRITICAL: Return ONLY valid JSON. No markdown, no explanations, no code blocks.

Structure:
{
  "durationDays": NUMBER (total days for the plan),
  "tasks": [
    { "id": "t1", "text": "Specific actionable task", "done": false },
    { "id": "t2", "text": "Another specific task", "done": false }
  ]
}

Generate enough tasks to fill the duration. For example:
- 7 days = 14-21 tasks (2-3 per day)
- 30 days = 30-60 tasks (1-2 per day)

DO NOT use "Week 1", "Week 2" in task text. Make each task standalone and actionable."#;

/// A plan as returned by the model.
///
/// Only the top-level `tasks` array is checked. Task entries and every
/// other field (normally `durationDays`) pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPlan {
    pub tasks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GeneratedPlan {
    /// The model's `durationDays`, if it sent an integer.
    pub fn duration_days(&self) -> Option<i64> {
        self.extra.get("durationDays").and_then(Value::as_i64)
    }
}

/// Result of a plan request.
///
/// Serialized untagged: the response body has the same shape whichever
/// path produced it, with no provenance marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlanResponse {
    Generated(GeneratedPlan),
    Synthetic(SyntheticPlan),
}

impl PlanResponse {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }

    pub fn task_count(&self) -> usize {
        match self {
            Self::Generated(plan) => plan.tasks.len(),
            Self::Synthetic(plan) => plan.tasks.len(),
        }
    }
}

/// Handles `generate-plan` requests.
#[derive(Clone)]
pub struct PlanRequestHandler {
    model: Arc<dyn GenerativeModel>,
}

impl PlanRequestHandler {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Ask the model for a plan, without any fallback.
    pub async fn request_plan(&self, raw_prompt: &str) -> Result<GeneratedPlan, RelayError> {
        let prompt = build_prompt(PLAN_INSTRUCTION, "User Goal", raw_prompt);
        request_json(self.model.as_ref(), &prompt).await
    }

    /// Produce a plan for `raw_prompt`. Never fails: any model-path error
    /// yields [`synthetic::generate`] for the same prompt.
    pub async fn handle(&self, raw_prompt: &str) -> PlanResponse {
        match self.request_plan(raw_prompt).await {
            Ok(plan) => {
                info!(
                    model = self.model.name(),
                    tasks = plan.tasks.len(),
                    duration_days = plan.duration_days(),
                    "plan generated by model"
                );
                PlanResponse::Generated(plan)
            }
            Err(err) => {
                log_fallback("generate-plan", self.model.as_ref(), &err);
                PlanResponse::Synthetic(synthetic::generate(raw_prompt))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_demands_bare_json_and_standalone_tasks() {
        assert!(PLAN_INSTRUCTION.contains("Return ONLY valid JSON"));
        assert!(PLAN_INSTRUCTION.contains("\"durationDays\""));
        assert!(PLAN_INSTRUCTION.contains("7 days = 14-21 tasks"));
        assert!(PLAN_INSTRUCTION.contains("DO NOT use \"Week 1\""));
    }

    #[test]
    fn generated_plan_requires_task_array() {
        let ok: Result<GeneratedPlan, _> =
            serde_json::from_value(serde_json::json!({"durationDays": 3, "tasks": []}));
        assert!(ok.is_ok());

        let missing: Result<GeneratedPlan, _> =
            serde_json::from_value(serde_json::json!({"durationDays": 3}));
        assert!(missing.is_err());

        let wrong_type: Result<GeneratedPlan, _> =
            serde_json::from_value(serde_json::json!({"tasks": "read the book"}));
        assert!(wrong_type.is_err());
    }

    #[test]
    fn generated_plan_round_trips_unknown_fields() {
        let input = serde_json::json!({
            "durationDays": 7,
            "tasks": [{"id": "t1", "text": "Read docs", "done": false, "priority": "high"}],
            "title": "Go basics"
        });
        let plan: GeneratedPlan = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(plan.duration_days(), Some(7));
        assert_eq!(serde_json::to_value(&plan).unwrap(), input);
    }

    #[test]
    fn synthetic_response_serializes_without_tag() {
        let response = PlanResponse::Synthetic(synthetic::generate("1 month"));
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("Synthetic").is_none());
        assert_eq!(value["meta"]["months"], 1);
        assert!(response.is_synthetic());
        assert_eq!(response.task_count(), 12);
    }
}
