use std::fmt;

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayloadStatusKind {
    Valid,
    Invalid,
    Syncing,
    Accepted,
    InvalidBlockHash,
}

impl PayloadStatusKind {
    /// Statuses that reject this exact payload. Resubmitting it cannot change the answer.
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            PayloadStatusKind::Invalid | PayloadStatusKind::InvalidBlockHash
        )
    }
}

impl fmt::Display for PayloadStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            PayloadStatusKind::Valid => "VALID",
            PayloadStatusKind::Invalid => "INVALID",
            PayloadStatusKind::Syncing => "SYNCING",
            PayloadStatusKind::Accepted => "ACCEPTED",
            PayloadStatusKind::InvalidBlockHash => "INVALID_BLOCK_HASH",
        };
        f.write_str(status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadStatus {
    pub status: PayloadStatusKind,
    #[serde(default)]
    pub latest_valid_hash: Option<B256>,
    #[serde(default)]
    pub validation_error: Option<String>,
}

impl PayloadStatus {
    pub fn new(status: PayloadStatusKind, latest_valid_hash: Option<B256>) -> Self {
        Self {
            status,
            latest_valid_hash,
            validation_error: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == PayloadStatusKind::Valid
    }

    /// `latestValidHash` of a VALID response, if the engine reported a non-zero one.
    pub fn valid_hash(&self) -> Option<B256> {
        match self.latest_valid_hash {
            Some(hash) if self.is_valid() && !hash.is_zero() => Some(hash),
            _ => None,
        }
    }
}
