use std::{path::PathBuf, time::Duration};

use alloy_primitives::Address;
use clap::Parser;
use procyon_driver::config::DriverConfig;
use procyon_execution_engine::config::{DEFAULT_ENGINE_URL, ExecutionEngineConfig};
use procyon_retry::BackoffConfig;
use url::Url;

pub const DEFAULT_REQUEST_TIMEOUT: &str = "10";
pub const DEFAULT_BLOCK_TIME: &str = "1";
pub const DEFAULT_FEE_RECIPIENT: &str = "0x0000000000000000000000000000000000000000";
pub const DEFAULT_RETRY_INITIAL_INTERVAL: &str = "500";
pub const DEFAULT_RETRY_MAX_INTERVAL: &str = "60000";
pub const DEFAULT_RETRY_RESET_CEILING: &str = "60000";

#[derive(Debug, Parser)]
pub struct NodeConfig {
    #[arg(long, env = "PROCYON_ENGINE_URL", help = "Set the authenticated engine API endpoint", default_value = DEFAULT_ENGINE_URL)]
    pub engine_url: Url,

    #[arg(long, env = "PROCYON_JWT_SECRET", help = "Path to the hex encoded JWT secret shared with the execution engine")]
    pub jwt_secret: PathBuf,

    #[arg(long, help = "Set HTTP request timeout for engine API calls, in seconds", default_value = DEFAULT_REQUEST_TIMEOUT, value_parser = duration_parser)]
    pub request_timeout: Duration,

    #[arg(long, env = "PROCYON_FEE_RECIPIENT", help = "Suggested fee recipient for built payloads", default_value = DEFAULT_FEE_RECIPIENT, value_parser = address_parser)]
    pub fee_recipient: Address,

    #[arg(long, help = "Time between local consensus rounds, in seconds", default_value = DEFAULT_BLOCK_TIME, value_parser = duration_parser)]
    pub block_time: Duration,

    #[arg(long, help = "First retry delay for finalize-stage engine calls, in milliseconds", default_value = DEFAULT_RETRY_INITIAL_INTERVAL, value_parser = millis_parser)]
    pub retry_initial_interval: Duration,

    #[arg(long, help = "Largest single retry delay, in milliseconds", default_value = DEFAULT_RETRY_MAX_INTERVAL, value_parser = millis_parser)]
    pub retry_max_interval: Duration,

    #[arg(long, help = "Retry delays restart from the initial interval once they would grow past this, in milliseconds", default_value = DEFAULT_RETRY_RESET_CEILING, value_parser = millis_parser)]
    pub retry_reset_ceiling: Duration,

    #[arg(long, help = "Reject proposals that do not carry exactly one decodable execution payload")]
    pub strict_proposals: bool,
}

impl NodeConfig {
    pub fn execution_engine_config(&self) -> ExecutionEngineConfig {
        ExecutionEngineConfig::new(self.engine_url.clone(), self.jwt_secret.clone())
            .with_request_timeout(self.request_timeout)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            fee_recipient: self.fee_recipient,
            strict_proposal_validation: self.strict_proposals,
            backoff: BackoffConfig {
                initial_interval: self.retry_initial_interval,
                max_interval: self.retry_max_interval,
                reset_ceiling: self.retry_reset_ceiling,
                ..BackoffConfig::default()
            },
        }
    }
}

pub fn duration_parser(duration_string: &str) -> Result<Duration, String> {
    Ok(Duration::from_secs(duration_string.parse().map_err(
        |err| format!("Could not parse the duration: {err:?}"),
    )?))
}

pub fn millis_parser(duration_string: &str) -> Result<Duration, String> {
    Ok(Duration::from_millis(duration_string.parse().map_err(
        |err| format!("Could not parse the interval: {err:?}"),
    )?))
}

pub fn address_parser(address_string: &str) -> Result<Address, String> {
    address_string
        .parse()
        .map_err(|err| format!("Invalid address provided: {err:?}"))
}
