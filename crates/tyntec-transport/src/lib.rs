//! HTTP transport for the tyntec Conversations API.
//!
//! Requests and responses are plain data ([`HttpRequest`], [`HttpResponse`]).
//! A [`Transport`] performs the network I/O; [`UreqTransport`] is the blocking
//! default. Non-2xx answers surface as [`TransportError::Status`] carrying the
//! status, status text and raw body.

pub mod config;
pub mod error;
pub mod http;
pub mod traits;

#[cfg(feature = "ureq")]
pub mod blocking;

pub use config::{ClientConfig, RetryConfig, DEFAULT_BASE_URL};
pub use error::{Result, TransportError};
pub use http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse};
pub use traits::Transport;

#[cfg(feature = "ureq")]
pub use blocking::UreqTransport;
