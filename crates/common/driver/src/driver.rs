use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{B256, Bytes, U64};
use async_trait::async_trait;
use procyon_consensus::{
    lifecycle::{
        FinalizeBlockRequest, FinalizeBlockResponse, PrepareProposalRequest,
        PrepareProposalResponse, ProcessProposalRequest, ProposalStatus,
    },
    state::ConsensusState,
};
use procyon_execution_engine::{
    EngineApi,
    errors::EngineError,
    rpc_types::{
        execution_payload::ExecutionPayload,
        forkchoice_update::{ForkchoiceState, PayloadAttributes, Withdrawal},
        payload_status::PayloadStatus,
    },
};
use procyon_retry::{RetryError, RetryPolicy};
use procyon_storage::tables::consensus_state::ConsensusStateStore;
use tracing::{debug, info, warn};

use crate::{BlockLifecycle, config::DriverConfig, errors::DriverError};

/// Drives one execution engine through the consensus block lifecycle.
///
/// Besides the committed [`ConsensusState`] the driver carries two values between
/// hooks: the state computed by the last finalize, waiting for commit, and the parent
/// hash finalized by that block, used as the finalized hash of the next proposal.
pub struct Driver<E, S> {
    engine: E,
    store: S,
    retry_policy: RetryPolicy,
    config: DriverConfig,
    committed: ConsensusState,
    pending: Option<ConsensusState>,
    last_finalized: B256,
}

impl<E, S> Driver<E, S>
where
    E: EngineApi,
    S: ConsensusStateStore + Send + Sync,
{
    /// Loads the committed state from `store`.
    pub fn new(engine: E, store: S, config: DriverConfig) -> Result<Self, DriverError> {
        let committed = store.get()?;
        info!(
            height = committed.height,
            num_txs = committed.num_txs,
            "Loaded consensus state"
        );
        Ok(Self {
            engine,
            store,
            retry_policy: RetryPolicy::new(config.backoff),
            config,
            committed,
            pending: None,
            last_finalized: B256::ZERO,
        })
    }

    pub fn committed_state(&self) -> ConsensusState {
        self.committed
    }

    pub fn pending_state(&self) -> Option<ConsensusState> {
        self.pending
    }

    /// Parent hash of the last finalized block, zero until the first finalize.
    pub fn last_finalized(&self) -> B256 {
        self.last_finalized
    }

    /// Hands back the engine client so the caller can close it.
    pub fn into_engine(self) -> E {
        self.engine
    }

    fn payload_attributes(&self, parent_timestamp: u64, requested: Option<u64>) -> PayloadAttributes {
        let now = requested.unwrap_or_else(unix_timestamp);
        PayloadAttributes {
            timestamp: U64::from(now.max(parent_timestamp.saturating_add(1))),
            prev_randao: B256::ZERO,
            suggested_fee_recipient: self.config.fee_recipient,
            withdrawals: vec![Withdrawal::placeholder()],
            parent_beacon_block_root: None,
        }
    }

    async fn submit_payload(&self, payload: &ExecutionPayload) -> Result<B256, DriverError> {
        self.retry_policy
            .retry("newPayload", || async move {
                let status = self
                    .engine
                    .new_payload(payload)
                    .await
                    .map_err(|err| RetryError::Transient(err.into()))?;
                accepted_hash(status, payload.block_hash)
            })
            .await
    }

    async fn advance_forkchoice(
        &self,
        state: ForkchoiceState,
        parent_timestamp: u64,
    ) -> Result<(), DriverError> {
        self.retry_policy
            .retry("forkchoiceUpdated", || async move {
                let attributes = self.payload_attributes(parent_timestamp, None);
                let response = self
                    .engine
                    .forkchoice_updated(state, Some(attributes))
                    .await
                    .map_err(|err| RetryError::Transient(err.into()))?;
                let status = response.payload_status;
                if status.is_valid() {
                    return Ok(());
                }
                Err(classify_rejection(status, state.head_block_hash))
            })
            .await
    }
}

/// Unwraps the `latestValidHash` of a VALID `newPayload` response.
fn accepted_hash(status: PayloadStatus, block_hash: B256) -> Result<B256, RetryError<DriverError>> {
    if let Some(hash) = status.valid_hash() {
        return Ok(hash);
    }
    if status.is_valid() {
        return Err(RetryError::Transient(DriverError::MissingLatestValidHash));
    }
    Err(classify_rejection(status, block_hash))
}

/// INVALID and INVALID_BLOCK_HASH reject the payload itself. Anything else may clear up.
fn classify_rejection(status: PayloadStatus, block_hash: B256) -> RetryError<DriverError> {
    if status.status.is_invalid() {
        return RetryError::Permanent(DriverError::InvalidPayload {
            block_hash,
            status: status.status,
            validation_error: status
                .validation_error
                .unwrap_or_else(|| "no validation error".to_string()),
        });
    }
    RetryError::Transient(DriverError::validation(
        status.status,
        status.validation_error,
    ))
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or_default()
}

fn decode_payload(tx: &Bytes) -> Result<ExecutionPayload, DriverError> {
    serde_json::from_slice(tx).map_err(DriverError::PayloadDecode)
}

#[async_trait]
impl<E, S> BlockLifecycle for Driver<E, S>
where
    E: EngineApi,
    S: ConsensusStateStore + Send + Sync,
{
    async fn prepare_proposal(
        &mut self,
        request: PrepareProposalRequest,
    ) -> Result<PrepareProposalResponse, DriverError> {
        let head = self.engine.latest_block().await?;
        let state = ForkchoiceState::new(head.hash, head.hash, self.last_finalized);
        let attributes = self.payload_attributes(head.timestamp.to::<u64>(), request.time);
        debug!(
            height = request.height,
            head = %head.hash,
            timestamp = %attributes.timestamp,
            "Requesting payload build"
        );

        let response = self
            .engine
            .forkchoice_updated(state, Some(attributes))
            .await?;
        let status = response.payload_status;
        if !status.is_valid() {
            warn!(height = request.height, status = %status.status, "Execution engine refused to build");
            return Err(DriverError::validation(status.status, status.validation_error));
        }
        let payload_id = response.payload_id.ok_or_else(|| {
            EngineError::Protocol("forkchoiceUpdated returned VALID without a payload id".to_string())
        })?;

        let payload = self.engine.get_payload(&payload_id).await?.execution_payload;
        let tx = serde_json::to_vec(&payload).map_err(|err| {
            EngineError::Protocol(format!("Could not encode execution payload: {err}"))
        })?;
        info!(
            height = request.height,
            block_number = %payload.block_number,
            block_hash = %payload.block_hash,
            transactions = payload.transactions.len(),
            "Prepared proposal"
        );

        Ok(PrepareProposalResponse {
            txs: vec![Bytes::from(tx)],
        })
    }

    async fn process_proposal(&mut self, request: ProcessProposalRequest) -> ProposalStatus {
        if !self.config.strict_proposal_validation {
            return ProposalStatus::Accept;
        }

        match request.txs.as_slice() {
            [tx] => match decode_payload(tx) {
                Ok(_) => ProposalStatus::Accept,
                Err(err) => {
                    warn!(height = request.height, error = %err, "Rejecting proposal");
                    ProposalStatus::Reject
                }
            },
            txs => {
                warn!(
                    height = request.height,
                    txs = txs.len(),
                    "Rejecting proposal without exactly one execution payload"
                );
                ProposalStatus::Reject
            }
        }
    }

    async fn finalize_block(
        &mut self,
        request: FinalizeBlockRequest,
    ) -> Result<FinalizeBlockResponse, DriverError> {
        if request.height <= self.committed.height {
            return Err(DriverError::StaleHeight {
                height: request.height,
                committed: self.committed.height,
            });
        }
        let expected = self.committed.height + 1;
        if request.height != expected {
            return Err(DriverError::HeightGap {
                height: request.height,
                expected,
            });
        }
        let tx = request.txs.first().ok_or(DriverError::MissingPayload {
            height: request.height,
        })?;
        let payload = decode_payload(tx)?;

        let latest_valid_hash = self.submit_payload(&payload).await?;
        let state = ForkchoiceState::new(latest_valid_hash, latest_valid_hash, payload.parent_hash);
        self.advance_forkchoice(state, payload.timestamp.to::<u64>())
            .await?;

        let next = ConsensusState::at_height(request.height);
        self.last_finalized = payload.parent_hash;
        self.pending = Some(next);
        info!(
            height = request.height,
            head = %latest_valid_hash,
            finalized = %payload.parent_hash,
            "Finalized block"
        );

        Ok(FinalizeBlockResponse {
            app_hash: next.app_hash(),
        })
    }

    async fn commit(&mut self) -> Result<ConsensusState, DriverError> {
        let Some(state) = self.pending.take() else {
            warn!(height = self.committed.height, "Commit without a finalized block");
            return Ok(self.committed);
        };
        self.store.set(state)?;
        self.committed = state;
        info!(height = state.height, app_hash = %state.app_hash(), "Committed consensus state");
        Ok(state)
    }
}
