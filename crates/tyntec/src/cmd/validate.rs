use tracing::debug;
use tyntec_schema::{SchemaError, ValidationOutcome};

use crate::cmd::ValidateArgs;
use crate::exit::{schema_error, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_outcome, OutputFormat};

pub fn run(args: ValidateArgs, format: OutputFormat) -> CliResult<i32> {
    let candidate = args.input.read()?;
    let registry = args.schema.registry();

    match registry.safe_validate(&args.schema.schema, &candidate) {
        ValidationOutcome::Invalid(err @ SchemaError::NotFound { .. }) => {
            Err(schema_error("validate", err))
        }
        outcome => {
            if let Some(message) = outcome.data() {
                debug!(schema = %args.schema.schema, content_type = %message.content_type(), "message is valid");
            }
            print_outcome(&outcome, format);
            Ok(if outcome.is_ok() { SUCCESS } else { DATA_INVALID })
        }
    }
}
