mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "tyntec", version, about = "tyntec Conversations API CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    match cmd::run(cli.command, format) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_validate_subcommand() {
        let cli = Cli::try_parse_from([
            "tyntec",
            "validate",
            "--json",
            "{}",
            "--schema",
            "whatsapp.text",
        ])
        .expect("validate args should parse");

        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema.schema, "whatsapp.text");
        assert!(!args.schema.strict);
    }

    #[test]
    fn validate_defaults_to_generic_schema() {
        let cli = Cli::try_parse_from(["tyntec", "validate", "--file", "m.json"])
            .expect("validate args should parse");
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema.schema, "whatsapp.message");
    }

    #[test]
    fn rejects_conflicting_inputs() {
        let err = Cli::try_parse_from([
            "tyntec",
            "validate",
            "--json",
            "{}",
            "--file",
            "m.json",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn requires_an_input() {
        let err = Cli::try_parse_from(["tyntec", "validate"]).expect_err("input is required");
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parses_send_with_api_key() {
        let cli = Cli::try_parse_from([
            "tyntec",
            "--format",
            "json",
            "send",
            "--json",
            "{}",
            "--api-key",
            "k",
            "--base-url",
            "http://127.0.0.1:9",
        ])
        .expect("send args should parse");

        assert_eq!(cli.format, Some(OutputFormat::Json));
        let Command::Send(args) = cli.command else {
            panic!("expected send");
        };
        assert_eq!(args.api_key, "k");
        assert_eq!(args.timeout, "30s");
    }
}
