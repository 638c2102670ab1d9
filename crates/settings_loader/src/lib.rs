//! # Settings Loader
//!
//! Centralized settings loading for the sahayak client. Settings live in a JSON
//! file (`sahayak.json` by default) whose sections are all optional; anything
//! missing takes the value from `Settings::default()`.
//!
//! After the file is read, a handful of environment variables (also picked up
//! from a `.env` file via `dotenvy`) override individual values:
//!
//! - `SAHAYAK_API_BASE_URL`
//! - `SAHAYAK_API_TIMEOUT_SECS`
//! - `SAHAYAK_SESSION_PATH`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! // Load settings from a specific path
//! let settings = settings_loader::load_settings("config/sahayak.json")?;
//!
//! // Optional path, default location, then built-in defaults, then env
//! let path = Some(PathBuf::from("sahayak.json"));
//! let settings = settings_loader::load_with_env(path.as_ref())?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

pub const DEFAULT_SETTINGS_FILE: &str = "sahayak.json";

pub const ENV_BASE_URL: &str = "SAHAYAK_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "SAHAYAK_API_TIMEOUT_SECS";
pub const ENV_SESSION_PATH: &str = "SAHAYAK_SESSION_PATH";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the default location (sahayak.json in the current directory)
pub fn load_default_settings() -> Result<Settings> {
    load_settings(DEFAULT_SETTINGS_FILE)
}

/// Loads settings from an optional path, returning None if no path is provided
pub fn load_optional_settings(path: Option<&PathBuf>) -> Result<Option<Settings>> {
    match path {
        Some(settings_path) => Ok(Some(load_settings(settings_path)?)),
        None => Ok(None),
    }
}

/// Tries the provided path, then the default location, then built-in defaults.
///
/// A file that exists but does not parse is an error; a missing file is not.
pub fn load_settings_with_fallback(path: Option<&PathBuf>) -> Result<Settings> {
    if let Some(settings_path) = path {
        if settings_file_exists(settings_path) {
            return load_settings(settings_path);
        }
        tracing::warn!(
            "settings file {} not found, trying {}",
            settings_path.display(),
            DEFAULT_SETTINGS_FILE
        );
    }

    if default_settings_exist() {
        return load_default_settings();
    }

    tracing::debug!("no settings file found, using defaults");
    Ok(Settings::default())
}

/// Applies overrides from an arbitrary lookup (the environment in production).
pub fn apply_overrides<F>(mut settings: Settings, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
        settings.api.base_url = base_url.trim().to_string();
    }

    if let Some(raw) = lookup(ENV_TIMEOUT_SECS).filter(|v| !v.trim().is_empty()) {
        let secs: u64 = raw
            .trim()
            .parse()
            .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))?;
        settings.api.timeout_secs = Some(secs);
    }

    if let Some(path) = lookup(ENV_SESSION_PATH).filter(|v| !v.trim().is_empty()) {
        settings.session_path = PathBuf::from(path);
    }

    Ok(settings)
}

/// Applies `SAHAYAK_*` environment overrides, reading `.env` first if present.
pub fn apply_env_overrides(settings: Settings) -> Result<Settings> {
    // Missing .env is the normal case
    let _ = dotenvy::dotenv();
    apply_overrides(settings, |key| std::env::var(key).ok())
}

/// File (with fallback) plus environment overrides.
pub fn load_with_env(path: Option<&PathBuf>) -> Result<Settings> {
    let settings = load_settings_with_fallback(path)?;
    apply_env_overrides(settings)
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

/// Checks if the default settings file (sahayak.json) exists
pub fn default_settings_exist() -> bool {
    settings_file_exists(DEFAULT_SETTINGS_FILE)
}
