//! Configuration file management for zenith.
//!
//! Provides a TOML-based config file at `~/.config/zenith/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use zenith_core::model::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiConfig, normalize_api_key,
};

/// Address the server binds to when nothing else is configured.
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Port the server listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 4000;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelSection {
    /// Generative Language API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the zenith config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/zenith` or `~/.config/zenith`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("zenith");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("zenith")
}

/// Return the path to the zenith config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since the file may hold an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line, which win over everything else.
#[derive(Debug, Default)]
pub struct CliOverrides<'a> {
    pub model: Option<&'a str>,
    pub bind: Option<&'a str>,
    pub port: Option<u16>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct ZenithConfig {
    pub model: GeminiConfig,
    pub bind: String,
    pub port: u16,
}

impl ZenithConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `GEMINI_API_KEY` env > `model.api_key` > none (model unavailable)
    /// - Model: `--model` > `ZENITH_MODEL` env > `model.name` > `DEFAULT_MODEL`
    /// - Base URL: `ZENITH_MODEL_BASE_URL` env > `model.base_url` > `DEFAULT_BASE_URL`
    /// - Timeout: `model.timeout_secs` > `DEFAULT_TIMEOUT`
    /// - Bind: `--bind` > `server.bind` > `DEFAULT_BIND`
    /// - Port: `--port` > `PORT` env > `server.port` > `DEFAULT_PORT`
    ///
    /// A missing config file is not an error; a malformed one is.
    pub fn resolve(cli: &CliOverrides<'_>) -> Result<Self> {
        let file_config = if config_path().exists() {
            load_config()?
        } else {
            ConfigFile::default()
        };
        Self::resolve_with(cli, file_config)
    }

    fn resolve_with(cli: &CliOverrides<'_>, file: ConfigFile) -> Result<Self> {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        // An env key that is only whitespace counts as unset, so the file
        // key still applies.
        let api_key = env("GEMINI_API_KEY")
            .and_then(|k| normalize_api_key(&k))
            .or_else(|| file.model.api_key.as_deref().and_then(normalize_api_key));

        let model_name = cli
            .model
            .map(str::to_string)
            .or_else(|| env("ZENITH_MODEL"))
            .or(file.model.name)
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url = env("ZENITH_MODEL_BASE_URL")
            .or(file.model.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = file
            .model
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        let bind = cli
            .bind
            .map(str::to_string)
            .or(file.server.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let port = match cli.port {
            Some(port) => port,
            None => match env("PORT") {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("PORT env var is not a valid port: {raw:?}"))?,
                None => file.server.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let model = GeminiConfig::new(api_key.as_deref())
            .with_model(model_name)
            .with_base_url(base_url)
            .with_timeout(timeout);

        Ok(Self { model, bind, port })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
