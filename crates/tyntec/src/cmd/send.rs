use std::sync::Arc;
use std::time::Duration;

use tyntec_client::Client;
use tyntec_transport::ClientConfig;

use crate::cmd::SendArgs;
use crate::exit::{client_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_response, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    let candidate = args.input.read()?;
    let config = client_config(&args)?;
    let client =
        Client::new(config).with_schema_registry(Arc::new(args.schema.registry()));

    let response = client
        .send_validated(&args.schema.schema, &candidate)
        .map_err(|err| client_error("send failed", err))?;
    print_response(&response, format);

    Ok(SUCCESS)
}

fn client_config(args: &SendArgs) -> CliResult<ClientConfig> {
    let mut config = ClientConfig::new(args.api_key.clone())
        .with_base_url(&args.base_url)
        .map_err(|err| CliError::new(USAGE, err.to_string()))?
        .with_timeout(parse_duration(&args.timeout)?);
    if let Some(account) = &args.whatsapp_account {
        config = config.with_whatsapp_account(account.clone());
    }
    Ok(config)
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, millis) = if let Some(num) = input.strip_suffix("ms") {
        (num, true)
    } else if let Some(num) = input.strip_suffix('s') {
        (num, false)
    } else {
        (input, false)
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(if millis {
        Duration::from_millis(value)
    } else {
        Duration::from_secs(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
    }
}
