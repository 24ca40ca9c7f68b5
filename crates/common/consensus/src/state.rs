use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use ssz_derive::{Decode, Encode};
use tree_hash::TreeHash;
use tree_hash_derive::TreeHash;

/// The durable progress record persisted once per committed block.
///
/// `height` advances by exactly one per committed block. Every block carries a single
/// logical transaction (the execution payload), so `num_txs` tracks `height`.
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Hash,
    Serialize,
    Deserialize,
    Encode,
    Decode,
    TreeHash,
)]
pub struct ConsensusState {
    pub height: u64,
    pub num_txs: u64,
}

impl ConsensusState {
    pub fn new(height: u64, num_txs: u64) -> Self {
        Self { height, num_txs }
    }

    /// State after committing the block at `height`.
    pub fn at_height(height: u64) -> Self {
        Self {
            height,
            num_txs: height,
        }
    }

    /// Deterministic application-state digest reported back to the consensus engine.
    pub fn app_hash(&self) -> B256 {
        self.tree_hash_root()
    }
}
