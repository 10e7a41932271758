//! `zenith check-model`: a connectivity check against the configured model.
//!
//! Prints the masked key, sends a trivial prompt, and prints the reply or a
//! diagnosis of the failure.

use anyhow::{Result, bail};

use zenith_core::model::{GeminiClient, GenerativeModel, ModelError, mask_api_key};

const PROBE_PROMPT: &str = "Hello?";

/// Hint for failures with a recognizable cause.
fn diagnose(err: &ModelError, model: &str) -> Option<String> {
    match err.status() {
        Some(404) => Some(format!(
            "the API key may be valid but the model alias {model:?} is not reachable; \
             try a different --model"
        )),
        Some(400) | Some(401) | Some(403) => {
            Some("the API key was rejected; check GEMINI_API_KEY or model.api_key".to_string())
        }
        Some(429) => Some("quota or rate limit exceeded for this key".to_string()),
        _ => None,
    }
}

pub async fn run_check(client: &GeminiClient) -> Result<()> {
    let config = client.config();
    let Some(key) = config.api_key.as_deref() else {
        bail!("no API key configured; set GEMINI_API_KEY or model.api_key in the config file");
    };

    println!("Key: {}", mask_api_key(key));
    println!("Sending request to {} at {}...", client.name(), config.base_url);

    match client.submit(PROBE_PROMPT).await {
        Ok(reply) => {
            println!("SUCCESS!");
            println!("{reply}");
            Ok(())
        }
        Err(err) => {
            eprintln!("Model error: {err}");
            if let Some(hint) = diagnose(&err, client.name()) {
                eprintln!("SUGGESTION: {hint}");
            }
            bail!("model check failed")
        }
    }
}
