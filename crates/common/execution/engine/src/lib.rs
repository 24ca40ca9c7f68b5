pub mod auth;
pub mod capabilities;
pub mod client;
pub mod config;
pub mod errors;
pub mod rpc_types;

use async_trait::async_trait;
use tracing::info;

use crate::{
    capabilities::first_missing,
    errors::EngineError,
    rpc_types::{
        block::ExecutionBlock,
        execution_payload::{ExecutionPayload, GetPayloadResponse},
        forkchoice_update::{ForkchoiceState, ForkchoiceUpdateResult, PayloadAttributes, PayloadId},
        payload_status::PayloadStatus,
    },
};

/// The engine API surface the consensus side drives.
#[async_trait]
pub trait EngineApi: Send + Sync {
    /// `attributes` is omitted from the wire when `None`.
    async fn forkchoice_updated(
        &self,
        state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceUpdateResult, EngineError>;

    async fn get_payload(&self, payload_id: &PayloadId) -> Result<GetPayloadResponse, EngineError>;

    async fn new_payload(&self, payload: &ExecutionPayload) -> Result<PayloadStatus, EngineError>;

    async fn exchange_capabilities(&self, methods: &[&str]) -> Result<Vec<String>, EngineError>;

    /// Head of the execution chain.
    async fn latest_block(&self) -> Result<ExecutionBlock, EngineError>;

    /// Fails with [`EngineError::Capability`] naming the first method in `required` the
    /// engine does not declare.
    async fn check_capabilities(&self, required: &[&str]) -> Result<(), EngineError> {
        let supported = self.exchange_capabilities(required).await?;
        if let Some(method) = first_missing(required, &supported) {
            return Err(EngineError::Capability(method.to_string()));
        }
        info!(methods = ?required, "Execution engine supports required methods");
        Ok(())
    }
}
