use alloy_primitives::{B256, U64};
use serde::{Deserialize, Serialize};

/// The subset of an `eth_getBlockByNumber` result the driver needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionBlock {
    pub number: U64,
    pub hash: B256,
    pub timestamp: U64,
}
