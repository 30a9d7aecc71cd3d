//! Validating client for the tyntec Conversations API.
//!
//! Messages are checked against the schema registry before any request is
//! built. Validation failures come back as [`ClientError::Schema`] and never
//! touch the network; HTTP failures come back as [`ClientError::Transport`].

pub mod client;
pub mod error;
pub mod templates;

pub use client::{Client, GENERIC_SCHEMA, MESSAGES_ENDPOINT};
pub use error::{ClientError, Result};
