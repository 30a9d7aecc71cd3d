/// Errors that can occur while talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The API answered with a non-2xx status.
    #[error("{method} {endpoint} failed with {status} {status_text}")]
    Status {
        method: String,
        endpoint: String,
        status: u16,
        status_text: String,
        /// Raw response body, verbatim.
        body: String,
    },

    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// A request or response body could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// HTTP status of a `Status` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The response body parsed as JSON, when it is JSON.
    pub fn body_json(&self) -> Option<serde_json::Value> {
        match self {
            TransportError::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
