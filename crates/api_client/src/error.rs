use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Every failure the client reports. Callers show the message as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{message}")]
    RequestFailed {
        /// HTTP status when the server answered; `None` for transport and
        /// decoding failures.
        status: Option<u16>,
        message: String,
    },
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::RequestFailed { message, .. } => message,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => *status,
        }
    }

    /// Failure before or after the server produced a status we could act on.
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ApiError::RequestFailed {
            status: None,
            message: message.into(),
        }
    }

    /// Builds the error for a non-2xx response from its raw body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        ApiError::RequestFailed {
            status: Some(status),
            message: ErrorBody::parse(body).into_message(status),
        }
    }
}

/// What the server told us about a failed request.
///
/// The backend contract is `{ "detail": string }`; FastAPI request
/// validation sends `detail` as a list of `{ "msg": ... }` objects instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    Detail(String),
    Absent,
}

impl ErrorBody {
    pub fn parse(body: &[u8]) -> Self {
        let Ok(value) = serde_json::from_slice::<Value>(body) else {
            return ErrorBody::Absent;
        };

        match value.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => ErrorBody::Detail(detail.clone()),
            Some(Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if messages.is_empty() {
                    ErrorBody::Absent
                } else {
                    ErrorBody::Detail(messages.join("; "))
                }
            }
            _ => ErrorBody::Absent,
        }
    }

    pub fn into_message(self, status: u16) -> String {
        match self {
            ErrorBody::Detail(detail) => detail,
            ErrorBody::Absent => format!("HTTP error {status}"),
        }
    }
}
