//! HTTP requests and responses as plain data.
//!
//! A [`Transport`](crate::Transport) executes an [`HttpRequest`] and hands
//! back an [`HttpResponse`]. Building requests and interpreting responses
//! happens here, independent of the HTTP library in use.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Result, TransportError};

pub const API_KEY_HEADER: &str = "apikey";
pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL: base URL joined with the endpoint.
    pub url: String,
    /// Endpoint relative to the base URL, kept for error reporting.
    pub endpoint: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Build a request for `endpoint` with JSON `body` and the API key header.
    pub fn build(
        config: &ClientConfig,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Self> {
        let body = body.map(serde_json::to_string).transpose()?;
        Ok(Self {
            method,
            url: config.endpoint_url(endpoint),
            endpoint: endpoint.to_string(),
            headers: vec![
                ("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string()),
                (API_KEY_HEADER.to_string(), config.api_key().to_string()),
            ],
            body,
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case(API_KEY_HEADER) {
                    (name.as_str(), "<redacted>")
                } else {
                    (name.as_str(), value.as_str())
                }
            })
            .collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|value| value.to_ascii_lowercase().contains("json"))
    }
}

/// A successful API answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    /// JSON body when the response declares JSON, the raw text otherwise,
    /// `null` when the body is empty.
    pub data: Value,
}

impl ApiResponse {
    /// Decode `data` into a typed value.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.data)?)
    }
}

/// Map a response for `request` onto an [`ApiResponse`] or a
/// [`TransportError::Status`].
pub fn interpret(request: &HttpRequest, response: HttpResponse) -> Result<ApiResponse> {
    debug!(
        method = %request.method,
        endpoint = %request.endpoint,
        status = response.status,
        "received response"
    );

    if !response.is_success() {
        return Err(TransportError::Status {
            method: request.method.to_string(),
            endpoint: request.endpoint.clone(),
            status: response.status,
            status_text: response.status_text,
            body: response.body,
        });
    }

    let data = if response.body.trim().is_empty() {
        Value::Null
    } else if response.is_json() {
        serde_json::from_str(&response.body)?
    } else {
        Value::String(response.body)
    };

    Ok(ApiResponse {
        status: response.status,
        status_text: response.status_text,
        data,
    })
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("secret-key")
    }

    fn response(status: u16, content_type: Option<&str>, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: "Status".to_string(),
            headers: content_type
                .map(|value| vec![("Content-Type".to_string(), value.to_string())])
                .unwrap_or_default(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_sets_json_and_api_key_headers() {
        let body = json!({ "to": "B" });
        let request = HttpRequest::build(&config(), HttpMethod::Post, "/messages", Some(&body)).unwrap();
        assert_eq!(request.url, "https://api.tyntec.com/conversations/v3/messages");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("APIKEY"), Some("secret-key"));
        assert_eq!(request.body.as_deref(), Some(r#"{"to":"B"}"#));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let request = HttpRequest::build(&config(), HttpMethod::Get, "/x", None).unwrap();
        let rendered = format!("{request:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn json_body_is_parsed() {
        let request = HttpRequest::build(&config(), HttpMethod::Post, "/messages", None).unwrap();
        let answer = interpret(
            &request,
            response(202, Some("application/json; charset=utf-8"), r#"{"messageId":"m-1"}"#),
        )
        .unwrap();
        assert_eq!(answer.status, 202);
        assert_eq!(answer.data, json!({ "messageId": "m-1" }));
    }

    #[test]
    fn text_and_empty_bodies() {
        let request = HttpRequest::build(&config(), HttpMethod::Delete, "/t", None).unwrap();
        let answer = interpret(&request, response(200, Some("text/plain"), "done")).unwrap();
        assert_eq!(answer.data, json!("done"));

        let answer = interpret(&request, response(204, None, "")).unwrap();
        assert_eq!(answer.data, Value::Null);
    }

    #[test]
    fn non_success_keeps_status_and_raw_body() {
        let request = HttpRequest::build(&config(), HttpMethod::Post, "/messages", None).unwrap();
        let err = interpret(
            &request,
            response(400, Some("application/problem+json"), r#"{"title":"Bad Request"}"#),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(400));
        let TransportError::Status {
            method,
            endpoint,
            status_text,
            body,
            ..
        } = &err
        else {
            panic!("expected status error, got {err:?}");
        };
        assert_eq!(method, "POST");
        assert_eq!(endpoint, "/messages");
        assert_eq!(status_text, "Status");
        assert_eq!(body, r#"{"title":"Bad Request"}"#);
        assert_eq!(err.body_json(), Some(json!({ "title": "Bad Request" })));
    }

    #[test]
    fn parse_decodes_typed_data() {
        #[derive(Debug, Deserialize, PartialEq)]
        #[serde(rename_all = "camelCase")]
        struct Accepted {
            message_id: String,
        }

        let answer = ApiResponse {
            status: 202,
            status_text: "Accepted".to_string(),
            data: json!({ "messageId": "m-1" }),
        };
        let accepted: Accepted = answer.parse().unwrap();
        assert_eq!(accepted.message_id, "m-1");
        assert!(answer.parse::<Vec<String>>().is_err());
    }

    #[test]
    fn malformed_json_body_is_json_error() {
        let request = HttpRequest::build(&config(), HttpMethod::Get, "/x", None).unwrap();
        let err = interpret(&request, response(200, Some("application/json"), "{oops")).unwrap_err();
        assert!(matches!(err, TransportError::Json(_)));
    }
}
