//! The `GenerativeModel` trait -- the capability the relay handlers call.
//!
//! Handlers receive an `Arc<dyn GenerativeModel>` at construction time, so
//! credential presence is an injected fact rather than an environment
//! lookup. Tests substitute a scripted implementation.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from a single model call.
///
/// The relay handlers treat every variant the same way (fallback), but the
/// variants are kept apart so logs say what actually went wrong.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no API key configured")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model API response could not be decoded")]
    Decode(#[source] serde_json::Error),

    #[error("model returned no text")]
    EmptyResponse,
}

impl ModelError {
    /// HTTP status code reported by the API, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A text-in, text-out generative model.
///
/// `submit` is a single-shot request: no retries, no streaming. Any
/// timeout is whatever the implementation's transport enforces.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier, used in logs (e.g. "gemini-2.0-flash").
    fn name(&self) -> &str;

    /// Whether a credential is configured. Handlers skip the network call
    /// entirely when this returns `false`.
    fn is_available(&self) -> bool;

    /// Send a prompt and return the model's raw text reply.
    async fn submit(&self, prompt: &str) -> Result<String, ModelError>;
}

// Compile-time assertion: GenerativeModel must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn GenerativeModel) {}
};
