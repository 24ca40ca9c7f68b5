use alloy_primitives::B256;
use procyon_execution_engine::{errors::EngineError, rpc_types::payload_status::PayloadStatusKind};
use procyon_storage::errors::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Execution engine returned {status}: {validation_error}")]
    Validation {
        status: PayloadStatusKind,
        validation_error: String,
    },

    #[error("Execution payload {block_hash} rejected as {status}: {validation_error}")]
    InvalidPayload {
        block_hash: B256,
        status: PayloadStatusKind,
        validation_error: String,
    },

    #[error("Execution engine returned VALID without a latest valid hash")]
    MissingLatestValidHash,

    #[error("Block {height} carries no execution payload")]
    MissingPayload { height: u64 },

    #[error("Could not decode execution payload: {0}")]
    PayloadDecode(#[source] serde_json::Error),

    #[error("Height {height} is not ahead of committed height {committed}")]
    StaleHeight { height: u64, committed: u64 },

    #[error("Height {height} skips ahead of the next height {expected}")]
    HeightGap { height: u64, expected: u64 },

    #[error("Could not persist consensus state: {0}")]
    Persistence(#[from] StoreError),
}

impl DriverError {
    pub fn validation(status: PayloadStatusKind, validation_error: Option<String>) -> Self {
        DriverError::Validation {
            status,
            validation_error: validation_error.unwrap_or_else(|| "no validation error".to_string()),
        }
    }
}
