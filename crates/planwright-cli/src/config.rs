//! Runtime configuration for planwright.
//!
//! Everything comes from the environment, optionally seeded from a dotenv
//! file (`key.env` by default). Resolution chain: CLI flag > env var >
//! default. Only the listening port has a default, and it is resolved
//! separately since only `serve` listens.

use std::path::Path;

use anyhow::{Context, Result};

use planwright_core::completion::OpenAiClient;
use planwright_core::completion::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use planwright_db::config::DbConfig;

pub const DEFAULT_PORT: u16 = 3000;

pub const DEFAULT_ENV_FILE: &str = "key.env";

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const PORT_VAR: &str = "PORT";
pub const FRONTEND_URL_VAR: &str = "FRONTEND_URL";

// -----------------------------------------------------------------------
// Env file
// -----------------------------------------------------------------------

/// Load `path` into the process environment without overriding variables
/// that are already set.
///
/// Returns `Ok(false)` when the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    dotenv::from_path(path)
        .with_context(|| format!("failed to load env file {}", path.display()))?;
    Ok(true)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Resolve the listening port: `cli_port` > `PORT` > 3000.
pub fn resolve_port(cli_port: Option<u16>) -> Result<u16> {
    if let Some(port) = cli_port {
        return Ok(port);
    }
    match non_empty_var(PORT_VAR) {
        Some(raw) => raw
            .parse::<u16>()
            .with_context(|| format!("{PORT_VAR} must be a port number, got {raw:?}")),
        None => Ok(DEFAULT_PORT),
    }
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Absence is logged at startup but is not fatal.
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    /// `None` disables persistence.
    pub db_config: Option<DbConfig>,
    /// The single front-end origin allowed to make cross-origin requests.
    pub allowed_origin: Option<String>,
}

impl ServerConfig {
    /// Resolve configuration from CLI overrides and the environment.
    ///
    /// DB URL: `cli_db_url` > `DATABASE_URL` > none.
    pub fn resolve(cli_db_url: Option<&str>) -> Self {
        let db_config = match cli_db_url {
            Some(url) => Some(DbConfig::new(url)),
            None => DbConfig::from_env(),
        };

        let allowed_origin =
            non_empty_var(FRONTEND_URL_VAR).map(|url| url.trim_end_matches('/').to_string());

        Self {
            openai_api_key: non_empty_var(API_KEY_VAR),
            openai_model: non_empty_var(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_base_url: non_empty_var(BASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            db_config,
            allowed_origin,
        }
    }

    /// Build the completion client described by this config.
    pub fn completion_client(&self) -> OpenAiClient {
        OpenAiClient::new(self.openai_api_key.clone())
            .with_model(&self.openai_model)
            .with_base_url(&self.openai_base_url)
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
