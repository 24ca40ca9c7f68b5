use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;
use url::Url;

use crate::{
    EngineApi,
    auth::{AuthTransport, JwtSecret},
    capabilities::{
        ENGINE_EXCHANGE_CAPABILITIES, ENGINE_FORKCHOICE_UPDATED_V2, ENGINE_GET_PAYLOAD_V2,
        ENGINE_NEW_PAYLOAD_V2, ETH_GET_BLOCK_BY_NUMBER,
    },
    config::{ExecutionEngineConfig, POOL_IDLE_TIMEOUT},
    errors::EngineError,
    rpc_types::{
        block::ExecutionBlock,
        execution_payload::{ExecutionPayload, GetPayloadResponse},
        forkchoice_update::{ForkchoiceState, ForkchoiceUpdateResult, PayloadAttributes, PayloadId},
        json_rpc::{JsonRpcRequest, JsonRpcResponse},
        payload_status::PayloadStatus,
    },
};

/// JSON-RPC error code for `engine_getPayload*` with a payload id the engine does not know.
pub const UNKNOWN_PAYLOAD_ERROR_CODE: i64 = -38001;

/// Authenticated engine API client.
///
/// One instance owns one connection pool and one request id counter. Ids start at 0
/// and are not persisted.
pub struct ExecutionEngine {
    transport: AuthTransport,
    engine_url: Url,
    request_id: AtomicU64,
}

impl ExecutionEngine {
    pub fn new(config: ExecutionEngineConfig) -> Result<Self, EngineError> {
        let secret = JwtSecret::from_file(&config.jwt_secret_path)?;
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build()
            .map_err(|err| EngineError::Config(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self::with_transport(
            AuthTransport::new(http_client, &secret),
            config.engine_url,
        ))
    }

    pub fn with_transport(transport: AuthTransport, engine_url: Url) -> Self {
        Self {
            transport,
            engine_url,
            request_id: AtomicU64::new(0),
        }
    }

    /// Drops the client and every pooled connection it holds.
    pub fn close(self) {
        debug!(engine_url = %self.engine_url, "Closing execution engine client");
    }

    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Sends one JSON-RPC call and decodes its `result`.
    pub async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<R, EngineError> {
        let request = JsonRpcRequest::new(self.next_request_id(), method, params);
        debug!(method, id = request.id, "Sending engine request");

        let response = self.transport.post(self.engine_url.clone(), &request).await?;
        let envelope = response.json::<JsonRpcResponse>().await.map_err(|err| {
            EngineError::Protocol(format!("Malformed JSON-RPC response to {method}: {err}"))
        })?;

        if let Some(error) = envelope.error {
            return Err(EngineError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        serde_json::from_value(envelope.result).map_err(|err| {
            EngineError::Protocol(format!("Unexpected {method} result: {err}"))
        })
    }
}

fn to_param(value: impl serde::Serialize) -> Result<Value, EngineError> {
    serde_json::to_value(value)
        .map_err(|err| EngineError::Protocol(format!("Could not encode request params: {err}")))
}

#[async_trait]
impl EngineApi for ExecutionEngine {
    async fn forkchoice_updated(
        &self,
        state: ForkchoiceState,
        payload_attributes: Option<PayloadAttributes>,
    ) -> Result<ForkchoiceUpdateResult, EngineError> {
        self.request(
            ENGINE_FORKCHOICE_UPDATED_V2,
            vec![to_param(state)?, to_param(payload_attributes)?],
        )
        .await
    }

    async fn get_payload(&self, payload_id: &PayloadId) -> Result<GetPayloadResponse, EngineError> {
        if payload_id.as_str().is_empty() {
            return Err(EngineError::Protocol("empty payload id".to_string()));
        }
        match self
            .request(ENGINE_GET_PAYLOAD_V2, vec![to_param(payload_id)?])
            .await
        {
            Err(EngineError::Rpc { code, message }) if code == UNKNOWN_PAYLOAD_ERROR_CODE => Err(
                EngineError::Protocol(format!("unknown payload id {payload_id}: {message}")),
            ),
            result => result,
        }
    }

    async fn new_payload(&self, payload: &ExecutionPayload) -> Result<PayloadStatus, EngineError> {
        self.request(ENGINE_NEW_PAYLOAD_V2, vec![to_param(payload)?])
            .await
    }

    async fn exchange_capabilities(&self, methods: &[&str]) -> Result<Vec<String>, EngineError> {
        self.request(ENGINE_EXCHANGE_CAPABILITIES, vec![to_param(methods)?])
            .await
    }

    async fn latest_block(&self) -> Result<ExecutionBlock, EngineError> {
        let block: Option<ExecutionBlock> = self
            .request(ETH_GET_BLOCK_BY_NUMBER, vec![json!("latest"), json!(false)])
            .await?;
        block.ok_or_else(|| EngineError::Protocol("execution engine has no latest block".to_string()))
    }
}
