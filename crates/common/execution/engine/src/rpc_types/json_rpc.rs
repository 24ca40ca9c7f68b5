use serde::{Deserialize, Serialize};

pub const JSON_RPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub id: u64,
    pub jsonrpc: String,
    pub method: String,
    pub params: Vec<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Builds a request, dropping `null` params.
    pub fn new(id: u64, method: &str, params: Vec<serde_json::Value>) -> Self {
        Self {
            id,
            jsonrpc: JSON_RPC_VERSION.to_string(),
            method: method.to_string(),
            params: params.into_iter().filter(|param| !param.is_null()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// `Value::Null` when the engine answered `null` or sent no result at all.
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}
