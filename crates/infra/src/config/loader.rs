//! Configuration loader
//!
//! Loads [`GraphConfig`] from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If credentials are missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `GOPLAY_PUBLISHER_ID`: Publisher id (required)
//! - `GOPLAY_SECRET`: Publisher secret (required)
//! - `GOPLAY_TEST_MODE`: Use the test graph host (true/false)
//! - `GOPLAY_BASE_URL`: Explicit graph host, overrides test mode
//! - `GOPLAY_MAX_TOKEN_FAILURES`: Expired-token retries per identity
//! - `GOPLAY_AUTH_ERROR_CODE`: Error code that marks an expired token
//! - `GOPLAY_CONNECT_TIMEOUT_SECS`: Connect timeout in seconds
//! - `GOPLAY_REQUEST_TIMEOUT_SECS`: Total request timeout in seconds
//! - `GOPLAY_SESSION_TTL_SECS`: Token-state lifetime in seconds
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./goplay.json` or `./goplay.toml` (current working directory)
//! 2. `../goplay.json` or `../goplay.toml` (parent directory)
//! 3. Relative to executable location
//!
//! A file may omit `secret`; `GOPLAY_SECRET` then supplies it so the secret
//! never has to live on disk.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use goplay_domain::{GraphConfig, GraphError, Result};

const FILE_STEMS: [&str; 2] = ["goplay.json", "goplay.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the credentials
/// are missing there, falls back to loading from a config file.
///
/// # Errors
/// Returns `GraphError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load() -> Result<GraphConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `GOPLAY_PUBLISHER_ID` and `GOPLAY_SECRET` are required; every other
/// variable falls back to its default.
///
/// # Errors
/// Returns `GraphError::Config` if required variables are missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<GraphConfig> {
    let mut config = GraphConfig::new(env_var("GOPLAY_PUBLISHER_ID")?, env_var("GOPLAY_SECRET")?)
        .with_test_mode(env_bool("GOPLAY_TEST_MODE", false));
    config.base_url = std::env::var("GOPLAY_BASE_URL").ok().filter(|url| !url.trim().is_empty());

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Environment overrides are applied on top of the file contents.
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `GraphError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The loaded configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<GraphConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GraphError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            GraphError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GraphError::Config(format!("Failed to read config file: {e}")))?;

    let mut config = parse_config(&contents, &config_path)?;
    if config.secret.is_empty() {
        if let Ok(secret) = std::env::var("GOPLAY_SECRET") {
            config.secret = secret;
        }
    }
    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `GraphError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<GraphConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GraphError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GraphError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(GraphError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.clone());
        dirs.push(cwd.join(".."));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
            dirs.push(exe_dir.join(".."));
        }
    }

    dirs.iter()
        .flat_map(|dir| FILE_STEMS.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Apply the optional tuning variables on top of `config`.
fn apply_env_overrides(config: &mut GraphConfig) -> Result<()> {
    if let Some(value) = env_parse("GOPLAY_MAX_TOKEN_FAILURES")? {
        config.retry.max_token_failures = value;
    }
    if let Some(value) = env_parse("GOPLAY_AUTH_ERROR_CODE")? {
        config.retry.auth_error_code = value;
    }
    if let Some(value) = env_parse("GOPLAY_CONNECT_TIMEOUT_SECS")? {
        config.http.connect_timeout_secs = value;
    }
    if let Some(value) = env_parse("GOPLAY_REQUEST_TIMEOUT_SECS")? {
        config.http.request_timeout_secs = value;
    }
    if let Some(value) = env_parse("GOPLAY_SESSION_TTL_SECS")? {
        config.session.ttl_seconds = value;
    }
    Ok(())
}

/// Get required environment variable
///
/// # Errors
/// Returns `GraphError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| GraphError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional numeric environment variable
///
/// # Errors
/// Returns `GraphError::Config` if the variable is set but does not parse.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| GraphError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
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
