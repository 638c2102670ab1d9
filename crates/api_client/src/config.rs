use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::Url;

use models::ApiSettings;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Where the backend lives and how long to wait for it.
///
/// The base URL is fixed for the lifetime of an [`crate::ApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClientConfig {
    pub base_url: String,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ApiClientConfig {
    /// Environment overrides are applied to the settings beforehand, by
    /// `settings_loader`.
    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            timeout: settings.timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Checks the base URL and returns it without a trailing slash, ready for
/// endpoint paths to be appended verbatim.
pub(crate) fn validate_base_url(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url).with_context(|| format!("Invalid API base URL: {base_url}"))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(anyhow!(
                "Unsupported scheme '{other}' for API base URL (use http:// or https://)"
            ))
        }
    }

    if url.host_str().is_none() {
        return Err(anyhow!("API base URL is missing a host"));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(anyhow!(
            "API base URL must not carry a query string or fragment: {base_url}"
        ));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(
            validate_base_url("http://127.0.0.1:8000/").unwrap(),
            "http://127.0.0.1:8000"
        );
        assert_eq!(
            validate_base_url("https://api.example.in/v1/").unwrap(),
            "https://api.example.in/v1"
        );
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let err = validate_base_url("ftp://127.0.0.1").unwrap_err();
        assert!(err.to_string().contains("Unsupported scheme"));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("http://host:8000/?x=1").is_err());
    }

    #[test]
    fn test_from_settings_maps_timeout() {
        let settings = ApiSettings {
            base_url: "http://backend:8000".into(),
            timeout_secs: Some(12),
        };
        let config = ApiClientConfig::from_settings(&settings);
        assert_eq!(config.base_url, "http://backend:8000");
        assert_eq!(config.timeout, Some(Duration::from_secs(12)));
        assert_eq!(ApiClientConfig::default().timeout, None);
    }
}
