//! Configuration loader
//!
//! Loads the provider configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the customer id is not set there, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `GOOGLEWORKSPACE_CUSTOMER_ID`: Workspace customer id (required)
//! - `GOOGLEWORKSPACE_IMPERSONATED_USER_EMAIL`: user to act on behalf of
//! - `GOOGLEWORKSPACE_CREDENTIALS`, `GOOGLEWORKSPACE_CLOUD_KEYFILE_JSON`,
//!   `GOOGLE_CREDENTIALS`: credential JSON or a path to it (first set wins)
//! - `GOOGLEWORKSPACE_ACCESS_TOKEN`: pre-minted bearer token
//! - `MAILROUTE_API_BASE_URL`: Admin Settings API base
//! - `MAILROUTE_TIMEOUT_SECONDS`: request timeout in seconds
//! - `MAILROUTE_VERIFY_AFTER_CREATE`: read back after create (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./mailroute.json` or `./mailroute.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. `<config dir>/mailroute/config.{json,toml}`

use std::path::{Path, PathBuf};

use mailroute_domain::{MailrouteError, ProviderConfig, Result};

pub const CUSTOMER_ID_ENV: &str = "GOOGLEWORKSPACE_CUSTOMER_ID";
pub const IMPERSONATED_USER_EMAIL_ENV: &str = "GOOGLEWORKSPACE_IMPERSONATED_USER_EMAIL";
pub const ACCESS_TOKEN_ENV: &str = "GOOGLEWORKSPACE_ACCESS_TOKEN";
pub const API_BASE_URL_ENV: &str = "MAILROUTE_API_BASE_URL";
pub const TIMEOUT_SECONDS_ENV: &str = "MAILROUTE_TIMEOUT_SECONDS";
pub const VERIFY_AFTER_CREATE_ENV: &str = "MAILROUTE_VERIFY_AFTER_CREATE";

/// Credential variables, in precedence order.
pub const CREDENTIALS_ENV: &[&str] =
    &["GOOGLEWORKSPACE_CREDENTIALS", "GOOGLEWORKSPACE_CLOUD_KEYFILE_JSON", "GOOGLE_CREDENTIALS"];

const CONFIG_FILE_NAMES: &[&str] =
    &["mailroute.json", "mailroute.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Loads from environment variables when the customer id is set there, and
/// from a config file otherwise. Invalid environment values are reported,
/// never masked by the file fallback.
///
/// # Errors
/// Returns `MailrouteError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<ProviderConfig> {
    if env_opt(CUSTOMER_ID_ENV).is_none() {
        tracing::debug!("Customer id not set in environment, trying file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// Only the customer id is required; everything else falls back to the
/// defaults of [`ProviderConfig::new`].
///
/// # Errors
/// Returns `MailrouteError::Config` if the customer id is missing or a
/// numeric variable cannot be parsed.
pub fn load_from_env() -> Result<ProviderConfig> {
    let mut config = ProviderConfig::new(env_var(CUSTOMER_ID_ENV)?);

    config.impersonated_user_email = env_opt(IMPERSONATED_USER_EMAIL_ENV);
    config.credentials = CREDENTIALS_ENV.iter().find_map(|key| env_opt(key));
    config.access_token = env_opt(ACCESS_TOKEN_ENV);

    if let Some(base_url) = env_opt(API_BASE_URL_ENV) {
        config.api_base_url = base_url;
    }

    if let Some(timeout) = env_opt(TIMEOUT_SECONDS_ENV) {
        config.timeout_seconds = timeout.parse::<u64>().map_err(|e| {
            MailrouteError::Config(format!("Invalid {TIMEOUT_SECONDS_ENV}: {e}"))
        })?;
    }

    config.verify_after_create = env_bool(VERIFY_AFTER_CREATE_ENV, false);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MailrouteError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<ProviderConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MailrouteError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MailrouteError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MailrouteError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ProviderConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| MailrouteError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| MailrouteError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(MailrouteError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        for dir in cwd.ancestors().take(3) {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| dir.join(name)));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let dir = config_dir.join("mailroute");
        candidates.push(dir.join("config.json"));
        candidates.push(dir.join("config.toml"));
    }

    candidates.into_iter().find(|path| path.is_file())
}

/// Get required environment variable
///
/// # Errors
/// Returns `MailrouteError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        MailrouteError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
