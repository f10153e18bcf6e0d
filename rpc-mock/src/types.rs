/// JSON-RPC wire types and admin request bodies
///
/// Hex quantities and data stay as strings; the mock never decodes ABI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Incoming JSON-RPC 2.0 request
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    pub fn from_result(id: Value, result: Result<Value, RpcError>) -> Self {
        match result {
            Ok(value) => Self {
                jsonrpc: "2.0",
                id,
                result: Some(value),
                error: None,
            },
            Err(error) => Self {
                jsonrpc: "2.0",
                id,
                result: None,
                error: Some(error),
            },
        }
    }
}

/// JSON-RPC error object
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{message} (code {code})")]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(-32601, format!("the method {} does not exist/is not available", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(-32602, message)
    }
}

/// Event log as returned by `eth_getLogs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockLog {
    pub address: String,
    pub topics: Vec<String>,
    #[serde(default = "empty_data")]
    pub data: String,
    pub block_number: u64,
}

fn empty_data() -> String {
    "0x".to_string()
}

/// POST /mock/call
///
/// `data` may be full calldata or just the 4-byte selector (`0x70a08231`).
/// Exactly one of `result` / `error` is expected.
#[derive(Debug, Clone, Deserialize)]
pub struct CallStub {
    pub to: String,
    pub data: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// POST /mock/block
#[derive(Debug, Clone, Deserialize)]
pub struct BlockStub {
    pub number: u64,
    pub timestamp: u64,
}

/// Transaction accepted by `eth_sendTransaction`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentTransaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub data: String,
    pub block_number: u64,
}
