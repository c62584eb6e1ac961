//! Gateway configuration
//!
//! Credentials and the root folder id come from the environment. A missing
//! required variable is a startup failure: the service refuses to serve
//! rather than fail every request later.

use secrecy::SecretString;

use studydrive_store::StoreError;

/// Default store API endpoint
const DEFAULT_API_BASE: &str = "https://api.studydrive.example/v1";

/// Gateway configuration resolved at startup
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Service account identity presented to the store
    pub account_id: String,
    /// Credential key material for the store
    pub account_key: SecretString,
    /// Real id of the top-level folder the tree is rooted at
    pub root_folder_id: String,
    /// Store API base URL
    pub api_base: String,
    pub bind: String,
    pub port: u16,
}

impl GatewayConfig {
    /// Load configuration from process environment variables
    ///
    /// Required: `STUDYDRIVE_ACCOUNT_ID`, `STUDYDRIVE_ACCOUNT_KEY`,
    /// `STUDYDRIVE_ROOT_FOLDER`. Optional with defaults:
    /// `STUDYDRIVE_API_BASE`, `STUDYDRIVE_BIND`, `STUDYDRIVE_PORT`.
    pub fn from_env() -> Result<Self, StoreError> {
        let account_id = require("STUDYDRIVE_ACCOUNT_ID")?;
        let account_key = SecretString::new(require("STUDYDRIVE_ACCOUNT_KEY")?);
        let root_folder_id = require("STUDYDRIVE_ROOT_FOLDER")?;

        let api_base = std::env::var("STUDYDRIVE_API_BASE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let bind = std::env::var("STUDYDRIVE_BIND")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = std::env::var("STUDYDRIVE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080);

        Ok(Self {
            account_id,
            account_key,
            root_folder_id,
            api_base,
            bind,
            port,
        })
    }
}

fn require(key: &str) -> Result<String, StoreError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StoreError::NotConfigured(format!("environment variable {key} is not set")))
}
