use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use models::ProfileId;

use crate::error::{ApiError, Result};
use crate::session::Session;

/// A request before it is dispatched: method, path relative to the base URL,
/// query pairs, optional JSON body and any extra headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST with `body` serialised to JSON.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::transport(format!("Failed to serialise request body: {e}")))?;
        Ok(Self::new(Method::POST, path).with_body(body))
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Adds `profile_id=<id>` when the session has an active profile;
    /// otherwise leaves the query untouched.
    pub fn scoped_to(self, session: &Session) -> Self {
        match session.read_scope() {
            Some(id) => self.with_query("profile_id", id),
            None => self,
        }
    }

    /// Extra header; overrides the client's defaults for this request only.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A mutation payload with the active profile merged in.
///
/// The profile key is always part of the payload. With no active profile it
/// is `None`, which is left out of the serialised JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScopedPayload<T> {
    #[serde(flatten)]
    pub body: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub startup_profile_id: Option<ProfileId>,
}

/// Merges the session's current profile id into `body`.
pub fn scoped<T>(session: &Session, body: T) -> ScopedPayload<T> {
    ScopedPayload {
        body,
        startup_profile_id: session.profile_id(),
    }
}
