//! Validating SDK for the tyntec Conversations API (WhatsApp channel).
//!
//! Outbound messages are checked against a schema registry before any HTTP
//! request is made, so only well-formed payloads reach the API.
//!
//! # Crate Structure
//!
//! - [`schema`]: message model, discriminated unions, registry and validation (no I/O)
//! - [`transport`]: HTTP request/response types and the blocking `ureq` transport
//! - [`client`]: `send_*_message` helpers and template endpoints
//!
//! ```
//! use serde_json::json;
//!
//! let message = tyntec::validate_message(&json!({
//!     "from": "4923147790",
//!     "to": "4917612345678",
//!     "channel": "whatsapp",
//!     "content": { "contentType": "text", "text": "hello" }
//! }))
//! .expect("message should validate");
//! assert_eq!(message.content_type().as_str(), "text");
//! ```

/// Re-export schema types.
pub mod schema {
    pub use tyntec_schema::*;
}

/// Re-export transport types.
pub mod transport {
    pub use tyntec_transport::*;
}

/// Re-export client types.
pub mod client {
    pub use tyntec_client::*;
}

pub use tyntec_client::{Client, ClientError};
pub use tyntec_schema::{validate_message, Message, SchemaRegistry, ValidationError};
pub use tyntec_transport::ClientConfig;
