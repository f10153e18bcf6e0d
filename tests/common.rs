//! Common test utilities for locker client integration tests
//!
//! This module provides shared test infrastructure including:
//! - `ScriptedWallet`, an in-process wallet backed by the rpc-mock node
//! - Contract call stubbing with ABI encoded return values
//! - Recording share sink and beneficiary prompt doubles

#![allow(dead_code)]

use alloy_sol_types::SolCall;
use async_trait::async_trait;
use rpc_mock::{MockLog, MockNode, RpcError};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use vinuhub_locker::views::ViewContext;
use vinuhub_locker::{
    Address, BeneficiaryPrompt, ChainClient, LockerConfig, ProviderError, ProviderEvent, ShareSink,
    SharedProvider, WalletProvider, WalletSession, B256,
};

pub const VINUCHAIN: u64 = 207;

pub const USER: Address = Address::repeat_byte(0x11);
pub const OWNER: Address = Address::repeat_byte(0x22);
pub const TOKEN: Address = Address::repeat_byte(0x33);
pub const OTHER: Address = Address::repeat_byte(0x44);

/// Initialize test logging
pub fn init_logger() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .is_test(true)
        .try_init()
        .ok();
}

/// Production config with fast receipt polling
pub fn test_config() -> LockerConfig {
    LockerConfig {
        receipt_poll_interval: Duration::from_millis(5),
        ..LockerConfig::default()
    }
}

pub fn locker_address() -> Address {
    test_config().locker_address
}

pub fn hex_string(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// ============================================================================
// Scripted wallet
// ============================================================================

/// In-process wallet provider
///
/// Chain reads and writes go to a `MockNode`; the wallet-only methods keep a
/// set of chains the wallet knows. Every request is recorded, and a method
/// can be given one-shot canned responses with [`ScriptedWallet::respond`].
pub struct ScriptedWallet {
    pub node: MockNode,
    known_chains: Mutex<HashSet<u64>>,
    requests: Mutex<Vec<(String, Value)>>,
    canned: Mutex<HashMap<String, VecDeque<Result<Value, ProviderError>>>>,
    events: broadcast::Sender<ProviderEvent>,
}

impl ScriptedWallet {
    /// Wallet on VinuChain with `account` unlocked
    pub fn new(account: Address) -> Arc<Self> {
        Self::on_chain(VINUCHAIN, vec![account])
    }

    pub fn on_chain(chain_id: u64, accounts: Vec<Address>) -> Arc<Self> {
        let accounts = accounts.iter().map(|a| a.to_string()).collect();
        let (events, _) = broadcast::channel(16);
        Arc::new(Self {
            node: MockNode::new(chain_id, accounts),
            known_chains: Mutex::new(HashSet::from([chain_id])),
            requests: Mutex::new(Vec::new()),
            canned: Mutex::new(HashMap::new()),
            events,
        })
    }

    /// Let the wallet switch to `chain_id` without adding it first
    pub fn know_chain(&self, chain_id: u64) {
        self.known_chains.lock().unwrap().insert(chain_id);
    }

    /// Queue a one-shot response for `method`
    pub fn respond(&self, method: &str, response: Result<Value, ProviderError>) {
        self.canned
            .lock()
            .unwrap()
            .entry(method.to_string())
            .or_default()
            .push_back(response);
    }

    /// Params of every request for `method`, in order
    pub fn requests(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.requests(method).len()
    }

    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn emit(&self, event: ProviderEvent) {
        self.events.send(event).ok();
    }

    fn switch_chain(&self, params: &Value) -> Result<Value, ProviderError> {
        let requested = chain_param(params)?;
        if self.known_chains.lock().unwrap().contains(&requested) {
            self.node.set_chain_id(requested);
            Ok(Value::Null)
        } else {
            Err(ProviderError::new(4902, format!("Unrecognized chain ID \"0x{:x}\"", requested)))
        }
    }

    fn add_chain(&self, params: &Value) -> Result<Value, ProviderError> {
        let requested = chain_param(params)?;
        self.known_chains.lock().unwrap().insert(requested);
        self.node.set_chain_id(requested);
        Ok(Value::Null)
    }
}

fn chain_param(params: &Value) -> Result<u64, ProviderError> {
    params[0]["chainId"]
        .as_str()
        .and_then(|raw| u64::from_str_radix(raw.trim_start_matches("0x"), 16).ok())
        .ok_or_else(|| ProviderError::new(-32602, "Missing chainId parameter"))
}

#[async_trait]
impl WalletProvider for ScriptedWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), params.clone()));

        let canned = self
            .canned
            .lock()
            .unwrap()
            .get_mut(method)
            .and_then(VecDeque::pop_front);
        if let Some(response) = canned {
            return response;
        }

        match method {
            "wallet_switchEthereumChain" => self.switch_chain(&params),
            "wallet_addEthereumChain" => self.add_chain(&params),
            _ => self.node.handle(method, &params).map_err(|e| ProviderError {
                code: e.code,
                message: e.message,
                data: e.data,
            }),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent> {
        self.events.subscribe()
    }
}

/// The wallet as the trait object the library expects
pub fn shared(wallet: &Arc<ScriptedWallet>) -> SharedProvider {
    wallet.clone()
}

// ============================================================================
// Contract stubs
// ============================================================================

/// Answer `call` (exact calldata) on `to` with ABI encoded `returns`
pub fn stub_call<C: SolCall>(wallet: &ScriptedWallet, to: Address, call: &C, returns: Vec<u8>) {
    wallet
        .node
        .set_call_result(&to.to_string(), &hex_string(&call.abi_encode()), hex_string(&returns));
}

/// Answer any call of `C` on `to`, whatever the arguments
pub fn stub_selector<C: SolCall>(wallet: &ScriptedWallet, to: Address, returns: Vec<u8>) {
    wallet
        .node
        .set_call_result(&to.to_string(), &hex_string(&C::SELECTOR), hex_string(&returns));
}

/// Fail every call, estimate and send of `C` on `to`
pub fn fail_selector<C: SolCall>(wallet: &ScriptedWallet, to: Address, error: RpcError) {
    wallet
        .node
        .set_call_error(&to.to_string(), &hex_string(&C::SELECTOR), error);
}

/// Fail calls of `C` with these exact arguments
pub fn fail_call<C: SolCall>(wallet: &ScriptedWallet, to: Address, call: &C, error: RpcError) {
    wallet
        .node
        .set_call_error(&to.to_string(), &hex_string(&call.abi_encode()), error);
}

/// `execution reverted` carrying an `Error(string)` payload
pub fn revert_error(reason: &str) -> RpcError {
    let payload = alloy_sol_types::Revert {
        reason: reason.to_string(),
    };
    RpcError {
        code: 3,
        message: "execution reverted".to_string(),
        data: Some(json!(hex_string(&alloy_sol_types::SolError::abi_encode(&payload)))),
    }
}

pub fn add_log(wallet: &ScriptedWallet, topics: Vec<B256>, data: Vec<u8>, block_number: u64) {
    wallet.node.add_log(MockLog {
        address: locker_address().to_string(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        data: hex_string(&data),
        block_number,
    });
}

/// Decode the calldata of a transaction the node accepted
pub fn decode_sent<C: SolCall>(data: &str) -> C {
    let bytes = hex::decode(data.trim_start_matches("0x")).unwrap();
    C::abi_decode(&bytes, true).unwrap()
}

pub fn selector_of(data: &str) -> String {
    data[..10].to_string()
}

pub fn selector_hex<C: SolCall>() -> String {
    hex_string(&C::SELECTOR)
}

// ============================================================================
// UI doubles
// ============================================================================

/// Share sink that keeps every opened URL
#[derive(Default)]
pub struct RecordingShareSink {
    opened: Mutex<Vec<String>>,
}

impl RecordingShareSink {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    /// Decoded `text` parameter of each opened intent
    pub fn texts(&self) -> Vec<String> {
        self.opened()
            .iter()
            .filter_map(|u| url::Url::parse(u).ok())
            .filter_map(|u| u.query_pairs().find(|(k, _)| k == "text").map(|(_, v)| v.into_owned()))
            .collect()
    }
}

impl ShareSink for RecordingShareSink {
    fn open(&self, url: &str) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

/// Prompt with a fixed answer that records what it was asked
pub struct ScriptedPrompt {
    answer: Option<String>,
    asked: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn cancelled() -> Self {
        Self {
            answer: None,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

#[async_trait]
impl BeneficiaryPrompt for ScriptedPrompt {
    async fn ask(&self, message: &str) -> Option<String> {
        self.asked.lock().unwrap().push(message.to_string());
        self.answer.clone()
    }
}

/// View context over a scripted wallet, with a recording share sink
pub fn view_context(wallet: &Arc<ScriptedWallet>) -> (ViewContext, Arc<RecordingShareSink>) {
    let config = test_config();
    let client = ChainClient::new(wallet.clone(), config.receipt_poll_interval);
    let share = Arc::new(RecordingShareSink::default());
    (ViewContext::new(client, config, share.clone()), share)
}

pub fn user_session() -> WalletSession {
    WalletSession::connected(USER, false)
}

pub fn admin_session() -> WalletSession {
    WalletSession::connected(USER, true)
}
