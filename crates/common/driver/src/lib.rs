//! Sequences engine API calls against the consensus engine's block lifecycle.
//!
//! Rounds run strictly one at a time: Propose(h), Validate(h), Finalize(h), Commit(h),
//! then Propose(h + 1). Propose and Validate failures abort the round. Finalize retries
//! until the execution engine accepts the block, unless the payload itself is rejected.
//! A Commit failure leaves consensus and execution state diverged and must stop the node.

pub mod config;
pub mod driver;
pub mod errors;

use async_trait::async_trait;
use procyon_consensus::{
    lifecycle::{
        FinalizeBlockRequest, FinalizeBlockResponse, PrepareProposalRequest,
        PrepareProposalResponse, ProcessProposalRequest, ProposalStatus,
    },
    state::ConsensusState,
};

use crate::errors::DriverError;

/// Hooks invoked by the consensus engine, in order, once per height.
#[async_trait]
pub trait BlockLifecycle {
    async fn prepare_proposal(
        &mut self,
        request: PrepareProposalRequest,
    ) -> Result<PrepareProposalResponse, DriverError>;

    async fn process_proposal(&mut self, request: ProcessProposalRequest) -> ProposalStatus;

    async fn finalize_block(
        &mut self,
        request: FinalizeBlockRequest,
    ) -> Result<FinalizeBlockResponse, DriverError>;

    /// Persists the state computed by the last finalize. Errors are fatal to the node.
    async fn commit(&mut self) -> Result<ConsensusState, DriverError>;
}
