//! Generative-model capability and adapters.
//!
//! ```text
//! relay handler --is_available()--> bool (false: skip the call, fall back)
//!       |
//!       +--submit(prompt)--> Result<String, ModelError>
//!                                  |
//!                            GeminiClient (reqwest, generateContent)
//! ```

pub mod gemini;
pub mod trait_def;

pub use gemini::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiClient, GeminiConfig, mask_api_key,
    normalize_api_key,
};
pub use trait_def::{GenerativeModel, ModelError};
