use tyntec_schema::{SchemaError, ValidationError};
use tyntec_transport::TransportError;

/// Errors that can occur in client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The payload was rejected before any request was made, or the schema
    /// name is unknown.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The request failed or the API answered with a non-2xx status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A template endpoint needs an account id and none is configured.
    #[error("no WhatsApp account id given and none configured")]
    MissingAccount,

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Schema(SchemaError::Invalid(err))
    }
}

impl ClientError {
    /// Issues of a payload that failed validation.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            ClientError::Schema(SchemaError::Invalid(err)) => Some(err),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.validation().is_some()
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
