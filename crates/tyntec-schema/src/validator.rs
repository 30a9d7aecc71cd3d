use std::sync::OnceLock;

use serde_json::Value;
use tracing::debug;

use crate::config::RegistryConfig;
use crate::envelope::{Message, MessageSchema};
use crate::error::ValidationResult;
use crate::registry::Schema;

fn message_schema() -> &'static MessageSchema {
    static SCHEMA: OnceLock<MessageSchema> = OnceLock::new();
    SCHEMA.get_or_init(MessageSchema::whatsapp)
}

/// Validate an untyped candidate message with the default configuration.
///
/// Never panics on malformed input. On failure the error lists every issue
/// found, each with its field path.
pub fn validate_message(candidate: &Value) -> ValidationResult<Message> {
    validate_message_with(candidate, RegistryConfig::default())
}

/// Validate an untyped candidate message with explicit configuration.
pub fn validate_message_with(candidate: &Value, config: RegistryConfig) -> ValidationResult<Message> {
    let result = Schema::validate(message_schema(), candidate, config);
    if let Err(err) = &result {
        debug!(issues = err.issues().len(), "candidate message rejected");
    }
    result
}
