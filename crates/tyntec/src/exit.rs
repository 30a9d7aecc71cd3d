use std::fmt;
use std::io;

use tyntec_client::ClientError;
use tyntec_schema::SchemaError;

// Exit code constants aligned with sysexits-style semantics.
pub const SUCCESS: i32 = 0;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Unreadable input is a usage problem, not a data problem.
pub fn io_error(context: &str, err: io::Error) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::NotFound { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        SchemaError::Invalid(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

pub fn client_error(context: &str, err: ClientError) -> CliError {
    match err {
        ClientError::Schema(err) => schema_error(context, err),
        ClientError::Transport(err) => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        ClientError::MissingAccount => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}
