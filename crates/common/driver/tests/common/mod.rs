//! Test doubles for the execution engine and the state store.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use alloy_primitives::{Address, B256, Bloom, Bytes, U64, U256};
use async_trait::async_trait;
use procyon_consensus::state::ConsensusState;
use procyon_driver::config::DriverConfig;
use procyon_execution_engine::{
    EngineApi,
    capabilities::REQUIRED_CAPABILITIES,
    errors::EngineError,
    rpc_types::{
        block::ExecutionBlock,
        execution_payload::{ExecutionPayload, GetPayloadResponse},
        forkchoice_update::{ForkchoiceState, ForkchoiceUpdateResult, PayloadAttributes, PayloadId},
        payload_status::{PayloadStatus, PayloadStatusKind},
    },
};
use procyon_retry::BackoffConfig;
use procyon_storage::{errors::StoreError, tables::consensus_state::ConsensusStateStore};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    LatestBlock,
    ForkchoiceUpdated(ForkchoiceState, Option<PayloadAttributes>),
    GetPayload(PayloadId),
    NewPayload(B256),
}

/// Scripted reply for one `newPayload` or `forkchoiceUpdated` call.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Status(PayloadStatusKind),
    /// JSON-RPC error envelope from the engine.
    RpcFailure,
    /// Refused connection, surfaced as [`EngineError::Transport`].
    TransportFailure,
}

struct MockEngineInner {
    head: ExecutionBlock,
    calls: Vec<EngineCall>,
    forkchoice_replies: VecDeque<Reply>,
    new_payload_replies: VecDeque<Reply>,
    next_payload: Option<ExecutionPayload>,
}

/// Execution engine double that records every call.
///
/// Unscripted calls answer VALID. Built payloads extend the current head by one block,
/// and a VALID `newPayload` makes the submitted block the new head.
#[derive(Clone)]
pub struct MockEngine {
    inner: Arc<Mutex<MockEngineInner>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockEngineInner {
                head: ExecutionBlock {
                    number: U64::ZERO,
                    hash: block_hash(0),
                    timestamp: U64::ZERO,
                },
                calls: Vec::new(),
                forkchoice_replies: VecDeque::new(),
                new_payload_replies: VecDeque::new(),
                next_payload: None,
            })),
        }
    }
}

impl MockEngine {
    pub fn with_forkchoice_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.inner.lock().unwrap().forkchoice_replies.extend(replies);
        self
    }

    pub fn with_new_payload_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.inner.lock().unwrap().new_payload_replies.extend(replies);
        self
    }

    pub fn with_head_timestamp(self, timestamp: u64) -> Self {
        self.inner.lock().unwrap().head.timestamp = U64::from(timestamp);
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    pub fn forkchoice_calls(&self) -> Vec<(ForkchoiceState, Option<PayloadAttributes>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EngineCall::ForkchoiceUpdated(state, attributes) => Some((state, attributes)),
                _ => None,
            })
            .collect()
    }

    pub fn head(&self) -> ExecutionBlock {
        self.inner.lock().unwrap().head
    }

    /// Records `call` and pops the scripted reply, failing early on transport failures.
    async fn record(
        &self,
        call: EngineCall,
        pop: impl FnOnce(&mut MockEngineInner) -> Option<Reply>,
    ) -> Result<Option<Reply>, EngineError> {
        let reply = {
            let mut inner = self.inner.lock().unwrap();
            inner.calls.push(call);
            pop(&mut *inner)
        };
        if let Some(Reply::TransportFailure) = reply {
            return Err(refused_connection().await);
        }
        Ok(reply)
    }

    fn reply(reply: Option<Reply>, latest_valid_hash: B256) -> Result<PayloadStatus, EngineError> {
        match reply.unwrap_or(Reply::Status(PayloadStatusKind::Valid)) {
            Reply::Status(PayloadStatusKind::Valid) => Ok(PayloadStatus::new(
                PayloadStatusKind::Valid,
                Some(latest_valid_hash),
            )),
            Reply::Status(kind) => Ok(PayloadStatus {
                status: kind,
                latest_valid_hash: None,
                validation_error: Some(format!("mock {kind}")),
            }),
            Reply::RpcFailure | Reply::TransportFailure => Err(EngineError::Rpc {
                code: -32000,
                message: "internal error".to_string(),
            }),
        }
    }
}

async fn refused_connection() -> EngineError {
    match reqwest::Client::new().post("http://127.0.0.1:1").send().await {
        Err(err) => EngineError::Transport(err),
        Ok(response) => EngineError::Protocol(format!("unexpected listener: {}", response.status())),
    }
}

pub fn block_hash(number: u64) -> B256 {
    B256::from(U256::from(0xb10c_0000 + number))
}

pub fn payload(parent: &ExecutionBlock, timestamp: U64) -> ExecutionPayload {
    let number = parent.number.to::<u64>() + 1;
    ExecutionPayload {
        parent_hash: parent.hash,
        fee_recipient: Address::ZERO,
        state_root: B256::repeat_byte(0x5a),
        receipts_root: B256::ZERO,
        logs_bloom: Bloom::ZERO,
        prev_randao: B256::ZERO,
        block_number: U64::from(number),
        gas_limit: U64::from(30_000_000),
        gas_used: U64::ZERO,
        timestamp,
        extra_data: Bytes::new(),
        base_fee_per_gas: U256::from(7),
        block_hash: block_hash(number),
        transactions: vec![],
        withdrawals: Some(vec![]),
    }
}

#[async_trait]
impl EngineApi for MockEngine {
    async fn forkchoice_updated(
        &self,
        state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceUpdateResult, EngineError> {
        let reply = self
            .record(
                EngineCall::ForkchoiceUpdated(state, payload_attributes.clone()),
                |inner| inner.forkchoice_replies.pop_front(),
            )
            .await?;
        let mut inner = self.inner.lock().unwrap();
        let payload_status = Self::reply(reply, state.head_block_hash)?;

        let payload_id = match (&payload_attributes, payload_status.is_valid()) {
            (Some(attributes), true) => {
                let head = inner.head;
                inner.next_payload = Some(payload(&head, attributes.timestamp));
                Some(PayloadId::new(format!("0x{:x}", head.number.to::<u64>() + 1))?)
            }
            _ => None,
        };
        Ok(ForkchoiceUpdateResult {
            payload_status,
            payload_id,
        })
    }

    async fn get_payload(&self, payload_id: &PayloadId) -> Result<GetPayloadResponse, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(EngineCall::GetPayload(payload_id.clone()));
        let execution_payload = inner
            .next_payload
            .clone()
            .ok_or_else(|| EngineError::Protocol(format!("unknown payload id {payload_id}")))?;
        Ok(GetPayloadResponse {
            execution_payload,
            block_value: U256::ZERO,
        })
    }

    async fn new_payload(&self, payload: &ExecutionPayload) -> Result<PayloadStatus, EngineError> {
        let reply = self
            .record(EngineCall::NewPayload(payload.block_hash), |inner| {
                inner.new_payload_replies.pop_front()
            })
            .await?;
        let mut inner = self.inner.lock().unwrap();
        let status = Self::reply(reply, payload.block_hash)?;
        if status.is_valid() {
            inner.head = ExecutionBlock {
                number: payload.block_number,
                hash: payload.block_hash,
                timestamp: payload.timestamp,
            };
        }
        Ok(status)
    }

    async fn exchange_capabilities(&self, _methods: &[&str]) -> Result<Vec<String>, EngineError> {
        Ok(REQUIRED_CAPABILITIES
            .iter()
            .map(|method| method.to_string())
            .collect())
    }

    async fn latest_block(&self) -> Result<ExecutionBlock, EngineError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(EngineCall::LatestBlock);
        Ok(inner.head)
    }
}

/// In-memory store recording every write.
#[derive(Clone, Default)]
pub struct MemoryStore {
    writes: Arc<Mutex<Vec<ConsensusState>>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryStore {
    pub fn writes(&self) -> Vec<ConsensusState> {
        self.writes.lock().unwrap().clone()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }
}

impl ConsensusStateStore for MemoryStore {
    fn get(&self) -> Result<ConsensusState, StoreError> {
        Ok(self.writes.lock().unwrap().last().copied().unwrap_or_default())
    }

    fn set(&self, state: ConsensusState) -> Result<(), StoreError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.writes.lock().unwrap().push(state);
        Ok(())
    }
}

pub fn fast_config() -> DriverConfig {
    DriverConfig {
        fee_recipient: Address::repeat_byte(0x42),
        strict_proposal_validation: false,
        backoff: BackoffConfig {
            initial_interval: Duration::from_millis(1),
            multiplier: 2.0,
            randomization_factor: 0.5,
            max_interval: Duration::from_millis(8),
            reset_ceiling: Duration::from_millis(8),
        },
    }
}
