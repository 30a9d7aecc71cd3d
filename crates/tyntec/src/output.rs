use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use serde_json::Value;
use tyntec_schema::{Issue, Message, SchemaError, ValidationOutcome};
use tyntec_transport::ApiResponse;

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

pub fn print_outcome(outcome: &ValidationOutcome, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(outcome)),
        OutputFormat::Table | OutputFormat::Pretty => match outcome {
            ValidationOutcome::Valid(message) => print_message(message, format),
            ValidationOutcome::Invalid(SchemaError::Invalid(err)) => {
                print_issues(err.issues(), format)
            }
            ValidationOutcome::Invalid(err) => println!("{err}"),
        },
    }
}

fn print_message(message: &Message, format: OutputFormat) {
    if format == OutputFormat::Pretty {
        println!("{}", to_pretty_json(message));
        return;
    }

    let mut table = table(vec!["FIELD", "VALUE"]);
    if let Value::Object(fields) = serde_json::to_value(message).unwrap_or_default() {
        for (field, value) in fields {
            let rendered = match value {
                Value::String(text) => text,
                other => to_json(&other),
            };
            table.add_row(vec![field, rendered]);
        }
    }
    println!("{table}");
}

pub fn print_issues(issues: &[Issue], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(issues)),
        OutputFormat::Table => {
            let mut table = table(vec!["PATH", "CODE", "EXPECTED", "RECEIVED"]);
            for issue in issues {
                table.add_row(vec![
                    display_path(issue),
                    issue.kind.code().to_string(),
                    issue.expected.clone(),
                    issue.received.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for issue in issues {
                println!("{issue}");
            }
        }
    }
}

fn display_path(issue: &Issue) -> String {
    if issue.path.is_root() {
        "<root>".to_string()
    } else {
        issue.path.to_string()
    }
}

#[derive(Serialize)]
pub struct SchemaRow {
    pub name: String,
    pub content_types: Vec<&'static str>,
}

pub fn print_schemas(rows: &[SchemaRow], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(rows)),
        OutputFormat::Table => {
            let mut table = table(vec!["SCHEMA", "CONTENT TYPES"]);
            for row in rows {
                table.add_row(vec![row.name.clone(), row.content_types.join(", ")]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!("{:<22} {}", row.name, row.content_types.join(", "));
            }
        }
    }
}

pub fn print_response(response: &ApiResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", to_json(response)),
        OutputFormat::Table => {
            let mut table = table(vec!["STATUS", "DATA"]);
            table.add_row(vec![
                format!("{} {}", response.status, response.status_text),
                to_json(&response.data),
            ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{} {}", response.status, response.status_text);
            if !response.data.is_null() {
                println!("{}", to_pretty_json(&response.data));
            }
        }
    }
}
