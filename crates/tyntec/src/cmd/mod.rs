use std::fs;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use serde_json::Value;
use tyntec_client::GENERIC_SCHEMA;
use tyntec_schema::{RegistryConfig, SchemaRegistry};
use tyntec_transport::DEFAULT_BASE_URL;

use crate::exit::{io_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod schemas;
pub mod send;
pub mod validate;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate a message without sending it.
    Validate(ValidateArgs),
    /// List the registered message schemas.
    Schemas(SchemasArgs),
    /// Validate a message and post it to the Conversations API.
    Send(SendArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Validate(args) => validate::run(args, format),
        Command::Schemas(args) => schemas::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where the candidate message comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct InputArgs {
    /// Message as inline JSON.
    #[arg(long)]
    pub json: Option<String>,
    /// Read the message from a JSON file.
    #[arg(long)]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> CliResult<Value> {
        if let Some(json) = &self.json {
            return serde_json::from_str(json)
                .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
        }
        if let Some(path) = &self.file {
            let text = fs::read_to_string(path)
                .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
            return serde_json::from_str(&text).map_err(|err| {
                CliError::new(USAGE, format!("{} is not valid JSON: {err}", path.display()))
            });
        }
        Err(CliError::new(USAGE, "one of --json or --file is required"))
    }
}

/// Schema selection shared by `validate` and `send`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Registry schema to validate against.
    #[arg(long, default_value = GENERIC_SCHEMA)]
    pub schema: String,
    /// Reject fields the schema does not declare instead of dropping them.
    #[arg(long)]
    pub strict: bool,
}

impl SchemaArgs {
    pub fn registry(&self) -> SchemaRegistry {
        SchemaRegistry::with_builtin_schemas(RegistryConfig {
            strict_mode: self.strict,
            ..RegistryConfig::default()
        })
    }
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub schema: SchemaArgs,
}

#[derive(Args, Debug, Default)]
pub struct SchemasArgs {}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub schema: SchemaArgs,
    /// API key sent in the `apikey` header.
    #[arg(long, env = "TYNTEC_API_KEY", hide_env_values = true)]
    pub api_key: String,
    /// Conversations API base URL.
    #[arg(long, env = "TYNTEC_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
    /// Default WhatsApp account id.
    #[arg(long, env = "TYNTEC_WHATSAPP_ACCOUNT")]
    pub whatsapp_account: Option<String>,
    /// Request timeout (e.g. 30s, 500ms).
    #[arg(long, default_value = "30s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
