//! Typed message model and schema validation for the tyntec Conversations API.
//!
//! Candidate messages arrive as untyped JSON. Validation walks the whole
//! document once, dispatching on the `channel` and `contentType`
//! discriminators, and returns either a typed [`Message`] or a
//! [`ValidationError`] listing every problem with its field path.
//!
//! This crate performs no I/O. Messages that pass validation serialize
//! directly into the provider's wire format.

pub mod checker;
pub mod config;
pub mod content;
pub mod envelope;
pub mod error;
pub mod management;
pub mod path;
pub mod registry;
pub mod union;
pub mod validator;

pub use checker::Checker;
pub use config::RegistryConfig;
pub use content::{Content, ContentType};
pub use envelope::{Channel, Message, MessageSchema};
pub use error::{Issue, IssueKind, Result, SchemaError, ValidationError, ValidationResult};
pub use path::{FieldPath, Segment};
pub use registry::{Schema, SchemaRegistry, ValidationOutcome};
pub use union::DiscriminatedUnion;
pub use validator::{validate_message, validate_message_with};
