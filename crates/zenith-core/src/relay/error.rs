//! Failure kinds of the model-call-and-parse step.
//!
//! Handlers never return these to their callers. They pick the fallback
//! result and use the variant only to decide how loudly to log.

use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("no model credential configured")]
    MissingCredential,

    #[error("model call failed: {0}")]
    ModelCall(#[from] ModelError),

    #[error("model response contains no JSON object")]
    NoJsonObject,

    #[error("model response is not valid JSON: {0}")]
    Unparsable(#[source] serde_json::Error),

    #[error("model response has an invalid shape: {0}")]
    InvalidShape(#[source] serde_json::Error),
}

impl RelayError {
    /// Short, stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::ModelCall(_) => "model_call_failure",
            Self::NoJsonObject | Self::Unparsable(_) => "unparsable_response",
            Self::InvalidShape(_) => "invalid_shape",
        }
    }

    /// Missing credentials are an expected configuration, not a fault.
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}
