// JSON-RPC over HTTP
//
// Talks to a node that manages unlocked accounts (dev nodes, signer proxies).
// Wallet-only methods are emulated so the connector flow works unchanged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use super::{ProviderEvent, WalletProvider};
use crate::error::{ProviderError, UNRECOGNIZED_CHAIN, UNSUPPORTED_METHOD};

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

pub struct HttpProvider {
    client: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
    events: broadcast::Sender<ProviderEvent>,
}

impl HttpProvider {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            client: reqwest::Client::new(),
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
            events,
        }
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Publish an account/chain change to subscribers
    pub fn notify(&self, event: ProviderEvent) {
        log::debug!("Provider event: {:?}", event);
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    async fn rpc(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        log::debug!("→ {} {}", method, request.params);

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::internal(format!("RPC request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::internal(format!(
                "RPC endpoint returned HTTP {}",
                response.status()
            )));
        }

        let body: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::internal(format!("Invalid RPC response: {}", e)))?;

        if let Some(error) = body.error {
            log::debug!("← {} error {}: {}", method, error.code, error.message);
            let mut err = ProviderError::new(error.code, error.message);
            err.data = error.data;
            return Err(err);
        }

        Ok(body.result.unwrap_or(Value::Null))
    }

    async fn switch_chain(&self, params: &Value) -> Result<Value, ProviderError> {
        let requested = params
            .get(0)
            .and_then(|p| p.get("chainId"))
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::new(-32602, "Missing chainId parameter"))?;

        let current = self.rpc("eth_chainId", json!([])).await?;
        let current = current.as_str().unwrap_or_default();

        match (parse_chain_id(current), parse_chain_id(requested)) {
            (Some(served), Some(wanted)) if served == wanted => Ok(Value::Null),
            _ => Err(ProviderError::new(
                UNRECOGNIZED_CHAIN,
                format!("Unrecognized chain ID \"{}\"", requested),
            )),
        }
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        match method {
            "eth_requestAccounts" => self.rpc("eth_accounts", json!([])).await,
            "wallet_switchEthereumChain" => self.switch_chain(&params).await,
            "wallet_addEthereumChain" => Err(ProviderError::new(
                UNSUPPORTED_METHOD,
                "wallet_addEthereumChain is not supported by an HTTP node",
            )),
            _ => self.rpc(method, params).await,
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

fn parse_chain_id(raw: &str) -> Option<u64> {
    u64::from_str_radix(raw.trim_start_matches("0x").trim_start_matches("0X"), 16).ok()
}
