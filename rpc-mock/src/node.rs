/// In-memory EVM node state
///
/// Serves the JSON-RPC subset a dApp client needs from scripted data:
/// `eth_call` results keyed by target and calldata, event logs, block
/// timestamps. Sent transactions are recorded and mined instantly, one block
/// each.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::types::{MockLog, RpcError, SentTransaction};

/// Timestamp of block 0 when no timestamp was scripted
pub const GENESIS_TIMESTAMP: u64 = 1_735_689_600;

/// Seconds between unscripted blocks
pub const BLOCK_TIME: u64 = 2;

/// Selector prefix length in hex calldata (`0x` + 8 digits)
const SELECTOR_LEN: usize = 10;

pub type SharedNode = Arc<MockNode>;

#[derive(Debug)]
struct NodeState {
    chain_id: u64,
    accounts: Vec<String>,
    gas_estimate: u64,
    gas_price: u64,
    block_number: u64,
    calls: HashMap<(String, String), Result<String, RpcError>>,
    logs: Vec<MockLog>,
    block_timestamps: HashMap<u64, u64>,
    sent: Vec<SentTransaction>,
    reverting: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct MockNode {
    state: Mutex<NodeState>,
}

impl MockNode {
    pub fn new(chain_id: u64, accounts: Vec<String>) -> Self {
        Self {
            state: Mutex::new(NodeState {
                chain_id,
                accounts: accounts.into_iter().map(|a| a.to_lowercase()).collect(),
                gas_estimate: 100_000,
                gas_price: 1_000_000_000,
                block_number: 100,
                calls: HashMap::new(),
                logs: Vec::new(),
                block_timestamps: HashMap::new(),
                sent: Vec::new(),
                reverting: Vec::new(),
            }),
        }
    }

    pub fn shared(chain_id: u64, accounts: Vec<String>) -> SharedNode {
        Arc::new(Self::new(chain_id, accounts))
    }

    fn state(&self) -> MutexGuard<'_, NodeState> {
        // State stays consistent even if a handler panicked mid-request
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ========================================================================
    // Scripting
    // ========================================================================

    pub fn set_chain_id(&self, chain_id: u64) {
        self.state().chain_id = chain_id;
    }

    pub fn set_accounts(&self, accounts: Vec<String>) {
        self.state().accounts = accounts.into_iter().map(|a| a.to_lowercase()).collect();
    }

    pub fn set_gas(&self, gas_estimate: u64, gas_price: u64) {
        let mut state = self.state();
        state.gas_estimate = gas_estimate;
        state.gas_price = gas_price;
    }

    /// Answer `eth_call` to `to` whose calldata starts with `data`
    pub fn set_call_result(&self, to: &str, data: &str, result: impl Into<String>) {
        self.state().calls.insert(call_key(to, data), Ok(result.into()));
    }

    /// Fail `eth_call`, `eth_estimateGas` and `eth_sendTransaction` for a target
    pub fn set_call_error(&self, to: &str, data: &str, error: RpcError) {
        self.state().calls.insert(call_key(to, data), Err(error));
    }

    /// Mine matching transactions with status 0
    pub fn set_reverting(&self, to: &str, data: &str) {
        self.state().reverting.push(call_key(to, data));
    }

    pub fn add_log(&self, log: MockLog) {
        self.state().logs.push(log);
    }

    pub fn set_block_timestamp(&self, number: u64, timestamp: u64) {
        self.state().block_timestamps.insert(number, timestamp);
    }

    pub fn sent_transactions(&self) -> Vec<SentTransaction> {
        self.state().sent.clone()
    }

    pub fn block_number(&self) -> u64 {
        self.state().block_number
    }

    // ========================================================================
    // JSON-RPC
    // ========================================================================

    /// Dispatch one JSON-RPC method
    pub fn handle(&self, method: &str, params: &Value) -> Result<Value, RpcError> {
        log::debug!("{} {}", method, params);
        match method {
            "eth_chainId" => Ok(json!(quantity(self.state().chain_id))),
            "net_version" => Ok(json!(self.state().chain_id.to_string())),
            "eth_accounts" | "eth_requestAccounts" => Ok(json!(self.state().accounts)),
            "eth_blockNumber" => Ok(json!(quantity(self.state().block_number))),
            "eth_gasPrice" => Ok(json!(quantity(self.state().gas_price))),
            "eth_call" => self.eth_call(params),
            "eth_estimateGas" => self.eth_estimate_gas(params),
            "eth_sendTransaction" => self.eth_send_transaction(params),
            "eth_getTransactionReceipt" => self.eth_get_transaction_receipt(params),
            "eth_getLogs" => self.eth_get_logs(params),
            "eth_getBlockByNumber" => self.eth_get_block_by_number(params),
            other => Err(RpcError::method_not_found(other)),
        }
    }

    fn lookup_call(&self, to: &str, data: &str) -> Option<Result<String, RpcError>> {
        let state = self.state();
        let data = data.to_lowercase();
        let found = state
            .calls
            .get(&call_key(to, &data))
            .or_else(|| {
                data.get(..SELECTOR_LEN)
                    .and_then(|selector| state.calls.get(&call_key(to, selector)))
            })
            .cloned();
        found
    }

    fn eth_call(&self, params: &Value) -> Result<Value, RpcError> {
        let (to, data) = tx_target(params)?;
        match self.lookup_call(&to, &data) {
            Some(Ok(result)) => Ok(json!(result)),
            Some(Err(error)) => Err(error),
            None => Err(RpcError::new(3, "execution reverted")),
        }
    }

    fn eth_estimate_gas(&self, params: &Value) -> Result<Value, RpcError> {
        let (to, data) = tx_target(params)?;
        if let Some(Err(error)) = self.lookup_call(&to, &data) {
            return Err(error);
        }
        Ok(json!(quantity(self.state().gas_estimate)))
    }

    fn eth_send_transaction(&self, params: &Value) -> Result<Value, RpcError> {
        let (to, data) = tx_target(params)?;
        if let Some(Err(error)) = self.lookup_call(&to, &data) {
            return Err(error);
        }
        let from = params
            .get(0)
            .and_then(|tx| tx.get("from"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();

        let mut state = self.state();
        state.block_number += 1;
        let hash = format!("0x{:064x}", state.sent.len() + 1);
        let tx = SentTransaction {
            hash: hash.clone(),
            from,
            to,
            data,
            block_number: state.block_number,
        };
        log::info!("⛏️  Mined {} in block {}", tx.hash, tx.block_number);
        state.sent.push(tx);
        Ok(json!(hash))
    }

    fn eth_get_transaction_receipt(&self, params: &Value) -> Result<Value, RpcError> {
        let hash = params
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("missing transaction hash"))?
            .to_lowercase();

        let state = self.state();
        let Some(tx) = state.sent.iter().find(|tx| tx.hash == hash) else {
            return Ok(Value::Null);
        };
        let reverted = state
            .reverting
            .iter()
            .any(|(to, prefix)| *to == tx.to && tx.data.starts_with(prefix.as_str()));
        let status = if reverted { "0x0" } else { "0x1" };

        Ok(json!({
            "transactionHash": tx.hash,
            "blockNumber": quantity(tx.block_number),
            "from": tx.from,
            "to": tx.to,
            "status": status,
            "logs": [],
        }))
    }

    fn eth_get_logs(&self, params: &Value) -> Result<Value, RpcError> {
        let filter = params
            .get(0)
            .ok_or_else(|| RpcError::invalid_params("missing filter"))?;
        let address = filter
            .get("address")
            .and_then(Value::as_str)
            .map(str::to_lowercase);
        let topics: Vec<Option<String>> = match filter.get("topics") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|t| t.as_str().map(str::to_lowercase))
                .collect(),
            _ => Vec::new(),
        };

        let state = self.state();
        let matching: Vec<Value> = state
            .logs
            .iter()
            .filter(|entry| {
                address
                    .as_ref()
                    .map_or(true, |a| entry.address.to_lowercase() == *a)
            })
            .filter(|entry| topics_match(&topics, &entry.topics))
            .enumerate()
            .map(|(index, entry)| {
                json!({
                    "address": entry.address,
                    "topics": entry.topics,
                    "data": entry.data,
                    "blockNumber": quantity(entry.block_number),
                    "transactionHash": format!("0x{:064x}", 0xbeef_0000u64 + index as u64),
                    "logIndex": quantity(index as u64),
                    "removed": false,
                })
            })
            .collect();
        Ok(Value::Array(matching))
    }

    fn eth_get_block_by_number(&self, params: &Value) -> Result<Value, RpcError> {
        let tag = params
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("missing block number"))?;

        let state = self.state();
        let number = match tag {
            "latest" | "pending" => state.block_number,
            "earliest" => 0,
            hex => parse_quantity(hex)
                .ok_or_else(|| RpcError::invalid_params(format!("bad block number {}", hex)))?,
        };
        if number > state.block_number {
            return Ok(Value::Null);
        }
        let timestamp = state
            .block_timestamps
            .get(&number)
            .copied()
            .unwrap_or(GENESIS_TIMESTAMP + number * BLOCK_TIME);

        Ok(json!({
            "number": quantity(number),
            "timestamp": quantity(timestamp),
            "transactions": [],
        }))
    }
}

fn call_key(to: &str, data: &str) -> (String, String) {
    (to.to_lowercase(), data.to_lowercase())
}

/// `to` and `data` of the transaction object in `params[0]`
fn tx_target(params: &Value) -> Result<(String, String), RpcError> {
    let tx = params
        .get(0)
        .ok_or_else(|| RpcError::invalid_params("missing transaction object"))?;
    let to = tx
        .get("to")
        .and_then(Value::as_str)
        .ok_or_else(|| RpcError::invalid_params("missing 'to'"))?;
    let data = tx
        .get("data")
        .or_else(|| tx.get("input"))
        .and_then(Value::as_str)
        .unwrap_or("0x");
    Ok((to.to_lowercase(), data.to_lowercase()))
}

fn topics_match(filter: &[Option<String>], topics: &[String]) -> bool {
    filter.iter().enumerate().all(|(i, wanted)| match wanted {
        None => true,
        Some(wanted) => topics
            .get(i)
            .map_or(false, |topic| topic.to_lowercase() == *wanted),
    })
}

pub fn quantity(value: u64) -> String {
    format!("0x{:x}", value)
}

fn parse_quantity(raw: &str) -> Option<u64> {
    u64::from_str_radix(raw.trim_start_matches("0x"), 16).ok()
}
