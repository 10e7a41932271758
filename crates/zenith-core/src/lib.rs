//! Core logic for the Zenith plan relay.
//!
//! - [`model`]: the [`GenerativeModel`](model::GenerativeModel) capability and
//!   the Gemini REST adapter.
//! - [`sanitize`]: narrows raw model output to a JSON object candidate.
//! - [`synthetic`]: the deterministic fallback planner.
//! - [`relay`]: the three request handlers (plan, atomize, resources).

pub mod model;
pub mod relay;
pub mod sanitize;
pub mod synthetic;
