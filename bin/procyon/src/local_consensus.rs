//! Single-node stand-in for the external consensus engine.
//!
//! Every tick runs one full round against a [`BlockLifecycle`]. A round that fails
//! before commit is abandoned and retried at the same height on the next tick. A
//! commit failure stops the loop.

use std::{future::Future, time::Duration};

use procyon_consensus::{
    lifecycle::{FinalizeBlockRequest, PrepareProposalRequest, ProcessProposalRequest},
    state::ConsensusState,
};
use procyon_driver::{BlockLifecycle, errors::DriverError};
use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

#[derive(Debug)]
pub enum RoundError {
    /// The round did not reach commit. Nothing was persisted.
    Aborted(DriverError),
    /// The proposal was rejected at validation.
    Rejected { height: u64 },
    /// Commit failed. Consensus and execution state may have diverged.
    Fatal(DriverError),
}

/// Lower bound for the round interval.
pub const MIN_BLOCK_TIME: Duration = Duration::from_millis(1);

pub struct LocalConsensus<L> {
    lifecycle: L,
    block_time: Duration,
    next_height: u64,
}

impl<L: BlockLifecycle + Send> LocalConsensus<L> {
    pub fn new(lifecycle: L, block_time: Duration, committed_height: u64) -> Self {
        Self {
            lifecycle,
            block_time,
            next_height: committed_height + 1,
        }
    }

    pub fn next_height(&self) -> u64 {
        self.next_height
    }

    /// Runs Propose, Validate, Finalize and Commit for the next height.
    pub async fn run_round(&mut self) -> Result<ConsensusState, RoundError> {
        let height = self.next_height;
        let proposal = self
            .lifecycle
            .prepare_proposal(PrepareProposalRequest {
                height,
                ..Default::default()
            })
            .await
            .map_err(RoundError::Aborted)?;

        let status = self
            .lifecycle
            .process_proposal(ProcessProposalRequest {
                height,
                txs: proposal.txs.clone(),
            })
            .await;
        if !status.is_accept() {
            return Err(RoundError::Rejected { height });
        }

        self.lifecycle
            .finalize_block(FinalizeBlockRequest {
                height,
                txs: proposal.txs,
            })
            .await
            .map_err(RoundError::Aborted)?;

        let committed = self.lifecycle.commit().await.map_err(RoundError::Fatal)?;
        self.next_height = committed.height + 1;
        Ok(committed)
    }

    /// Drives rounds every `block_time` until `shutdown` resolves or a commit fails.
    ///
    /// Returns the lifecycle so the caller can release its resources.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<L, DriverError> {
        tokio::pin!(shutdown);
        let mut ticker = time::interval(self.block_time.max(MIN_BLOCK_TIME));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(height = self.next_height, block_time = ?self.block_time, "Starting local consensus");

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            let outcome = tokio::select! {
                biased;
                _ = &mut shutdown => break,
                outcome = self.run_round() => outcome,
            };
            match outcome {
                Ok(state) => info!(height = state.height, "Round complete"),
                Err(RoundError::Aborted(err)) => {
                    warn!(height = self.next_height, error = %err, "Round aborted, retrying next tick");
                }
                Err(RoundError::Rejected { height }) => {
                    warn!(height, "Proposal rejected, retrying next tick");
                }
                Err(RoundError::Fatal(err)) => return Err(err),
            }
        }

        info!(height = self.next_height, "Local consensus stopped");
        Ok(self.lifecycle)
    }
}
