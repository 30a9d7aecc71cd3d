use tyntec_schema::SchemaRegistry;

use crate::cmd::SchemasArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_schemas, OutputFormat, SchemaRow};

pub fn run(_args: SchemasArgs, format: OutputFormat) -> CliResult<i32> {
    print_schemas(&rows(SchemaRegistry::builtin()), format);
    Ok(SUCCESS)
}

fn rows(registry: &SchemaRegistry) -> Vec<SchemaRow> {
    registry
        .snapshot()
        .into_iter()
        .map(|(name, schema)| SchemaRow {
            name,
            content_types: schema.content_types(),
        })
        .collect()
}
