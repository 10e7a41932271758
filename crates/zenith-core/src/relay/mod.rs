//! Request handlers that relay plan, atomize, and resource requests to a
//! [`GenerativeModel`] and absorb every failure into a fallback result.
//!
//! ```text
//! handle(input)
//!     |
//!     +-- model unavailable? ------------------------------> fallback
//!     |
//!     +-- submit(instruction + input) --err----------------> fallback
//!     |        |
//!     |   extract_json_object --None-----------------------> fallback
//!     |        |
//!     |   serde_json::from_str --err-----------------------> fallback
//!     |        |
//!     |   from_value::<Shape> --err------------------------> fallback
//!     |        |
//!     +------> parsed result
//! ```

pub mod atomize;
pub mod error;
pub mod plan;
pub mod resources;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::model::GenerativeModel;
use crate::sanitize::extract_json_object;

pub use atomize::{AtomizeResult, TaskAtomizationHandler};
pub use error::RelayError;
pub use plan::{GeneratedPlan, PlanRequestHandler, PlanResponse};
pub use resources::{ResourceLookupHandler, ResourceResult};

/// Join a fixed instruction with the caller's input.
fn build_prompt(instruction: &str, label: &str, input: &str) -> String {
    format!("{instruction}\n\n{label}: {input}")
}

/// One model round-trip: availability check, submit, sanitize, parse,
/// shape check.
async fn request_json<T: DeserializeOwned>(
    model: &dyn GenerativeModel,
    prompt: &str,
) -> Result<T, RelayError> {
    if !model.is_available() {
        return Err(RelayError::MissingCredential);
    }

    let raw = model.submit(prompt).await?;
    let candidate = extract_json_object(&raw).ok_or(RelayError::NoJsonObject)?;
    let value: serde_json::Value =
        serde_json::from_str(&candidate).map_err(RelayError::Unparsable)?;
    serde_json::from_value(value).map_err(RelayError::InvalidShape)
}

/// Log a relay failure at the level its kind deserves.
fn log_fallback(operation: &str, model: &dyn GenerativeModel, err: &RelayError) {
    if err.is_expected() {
        debug!(operation, "no model credential configured, using fallback");
    } else {
        warn!(
            operation,
            model = model.name(),
            kind = err.kind(),
            error = %err,
            "model request failed, using fallback"
        );
    }
}

/// The three handlers bundled around one shared model.
#[derive(Clone)]
pub struct Relay {
    pub plan: PlanRequestHandler,
    pub atomize: TaskAtomizationHandler,
    pub resources: ResourceLookupHandler,
}

impl Relay {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            plan: PlanRequestHandler::new(model.clone()),
            atomize: TaskAtomizationHandler::new(model.clone()),
            resources: ResourceLookupHandler::new(model),
        }
    }
}

impl std::fmt::Debug for Relay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Relay")
            .field("model", &self.plan.model_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_puts_input_after_instruction() {
        assert_eq!(
            build_prompt("Do the thing.", "Task", "write tests"),
            "Do the thing.\n\nTask: write tests"
        );
    }
}
