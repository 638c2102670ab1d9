use anyhow::{Context, Result as AnyResult};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::config::{validate_base_url, ApiClientConfig};
use crate::error::{ApiError, Result};
use crate::request::ApiRequest;

/// JSON-over-HTTP client for the business backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: ApiClientConfig) -> AnyResult<Self> {
        let base_url = validate_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `request`: base URL, path appended verbatim, then the
    /// query pairs in order.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, request.path);
        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::transport(format!("Invalid request URL {raw}: {e}")))?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Sends `request` and decodes a successful JSON body into `T`.
    ///
    /// Any non-2xx status becomes [`ApiError::RequestFailed`] with the
    /// server's `detail` message, or `HTTP error <status>` without one.
    pub async fn fetch_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let url = self.url_for(&request)?;
        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %request.method, %url, "request failed: {e}");
            ApiError::transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = ApiError::from_response(status.as_u16(), &body);
            tracing::warn!(method = %request.method, %url, status = status.as_u16(), "{err}");
            return Err(err);
        }

        response.json::<T>().await.map_err(|e| {
            tracing::warn!(%url, "undecodable response body: {e}");
            ApiError::transport(format!("Failed to parse JSON response from {url}: {e}"))
        })
    }
}
