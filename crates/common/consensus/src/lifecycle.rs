//! Requests and responses exchanged between the consensus engine and the application
//! at each step of a block's lifecycle.

use alloy_primitives::{B256, Bytes};

/// Asks the proposer to build the transaction list for a new block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrepareProposalRequest {
    pub height: u64,
    /// Block time in unix seconds, when the consensus engine supplies one.
    pub time: Option<u64>,
    /// Mempool transactions offered by the consensus engine. Ignored by the bridge.
    pub txs: Vec<Bytes>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrepareProposalResponse {
    pub txs: Vec<Bytes>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessProposalRequest {
    pub height: u64,
    pub txs: Vec<Bytes>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    Accept,
    Reject,
}

impl ProposalStatus {
    pub fn is_accept(&self) -> bool {
        matches!(self, ProposalStatus::Accept)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FinalizeBlockRequest {
    pub height: u64,
    pub txs: Vec<Bytes>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FinalizeBlockResponse {
    pub app_hash: B256,
}
