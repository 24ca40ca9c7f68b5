use alloy_primitives::Address;
use procyon_retry::BackoffConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Suggested fee recipient for every payload this node builds.
    pub fee_recipient: Address,
    /// Reject proposals that do not carry exactly one decodable execution payload.
    pub strict_proposal_validation: bool,
    pub backoff: BackoffConfig,
}
