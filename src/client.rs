//! Chain client
//!
//! Thin typed layer over a [`WalletProvider`]: ABI encoded calls, gas
//! estimation, transaction submission, receipt polling and log queries.
//! Every method maps to one or two provider requests; nothing is cached.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use crate::error::{LockerError, ProviderError};
use crate::network::NetworkDescriptor;
use crate::provider::SharedProvider;
use crate::units;
use crate::Result;

/// Confirmed transaction receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub success: bool,
}

/// Log entry returned by `eth_getLogs`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcLog {
    #[serde(default)]
    pub address: Option<Address>,
    pub topics: Vec<B256>,
    pub data: Bytes,
    #[serde(deserialize_with = "quantity_u64")]
    pub block_number: u64,
    #[serde(default)]
    pub transaction_hash: Option<B256>,
}

/// `eth_getLogs` filter over the full chain history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogFilter {
    pub address: Address,
    pub from_block: String,
    pub to_block: String,
    /// Positional topics; `None` matches anything
    pub topics: Vec<Option<B256>>,
}

impl LogFilter {
    pub fn new(address: Address, topics: Vec<Option<B256>>) -> Self {
        Self {
            address,
            from_block: "earliest".to_string(),
            to_block: "latest".to_string(),
            topics,
        }
    }
}

#[derive(Clone)]
pub struct ChainClient {
    provider: SharedProvider,
    poll_interval: Duration,
}

impl ChainClient {
    pub fn new(provider: SharedProvider, poll_interval: Duration) -> Self {
        Self {
            provider,
            poll_interval,
        }
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    // ============================================================================
    // Wallet
    // ============================================================================

    /// `eth_requestAccounts`
    pub async fn request_accounts(&self) -> Result<Vec<String>> {
        let value = self.provider.request("eth_requestAccounts", json!([])).await?;
        serde_json::from_value(value)
            .map_err(|e| LockerError::invalid_response(format!("accounts: {}", e)))
    }

    /// `eth_chainId` as a number
    pub async fn chain_id(&self) -> Result<u64> {
        let value = self.provider.request("eth_chainId", json!([])).await?;
        let raw = value
            .as_str()
            .ok_or_else(|| LockerError::invalid_response("eth_chainId is not a string"))?;
        u64::from_str_radix(raw.trim_start_matches("0x"), 16)
            .map_err(|e| LockerError::invalid_response(format!("eth_chainId '{}': {}", raw, e)))
    }

    /// `wallet_switchEthereumChain`; the raw provider error is returned so the
    /// caller can branch on its code
    pub async fn switch_chain(&self, network: &NetworkDescriptor) -> std::result::Result<(), ProviderError> {
        self.provider
            .request(
                "wallet_switchEthereumChain",
                json!([{ "chainId": network.chain_id }]),
            )
            .await
            .map(|_| ())
    }

    /// `wallet_addEthereumChain` with the full descriptor
    pub async fn add_chain(&self, network: &NetworkDescriptor) -> Result<()> {
        let descriptor = serde_json::to_value(network)
            .map_err(|e| LockerError::invalid_response(format!("network descriptor: {}", e)))?;
        self.provider
            .request("wallet_addEthereumChain", json!([descriptor]))
            .await?;
        Ok(())
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// `eth_call` against the latest block, decoding the return tuple
    pub async fn call<C: SolCall>(&self, to: Address, call: &C) -> Result<C::Return> {
        let params = json!([{ "to": to, "data": encode_calldata(call) }, "latest"]);
        let value = self.provider.request("eth_call", params).await?;
        let data = decode_hex_value(&value)?;
        Ok(C::abi_decode_returns(&data, true)?)
    }

    pub async fn gas_price(&self) -> Result<U256> {
        let value = self.provider.request("eth_gasPrice", json!([])).await?;
        parse_quantity(&value)
    }

    pub async fn block_timestamp(&self, block_number: u64) -> Result<u64> {
        let params = json!([format!("0x{:x}", block_number), false]);
        let block = self.provider.request("eth_getBlockByNumber", params).await?;
        let timestamp = block
            .get("timestamp")
            .ok_or_else(|| LockerError::invalid_response(format!("block {} not found", block_number)))?;
        let timestamp = parse_quantity(timestamp)?;
        u64::try_from(timestamp)
            .map_err(|_| LockerError::invalid_response("block timestamp out of range"))
    }

    pub async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RpcLog>> {
        let value = self.provider.request("eth_getLogs", json!([filter])).await?;
        serde_json::from_value(value)
            .map_err(|e| LockerError::invalid_response(format!("logs: {}", e)))
    }

    // ============================================================================
    // Writes
    // ============================================================================

    pub async fn estimate_gas<C: SolCall>(&self, from: Address, to: Address, call: &C) -> Result<U256> {
        let params = json!([{ "from": from, "to": to, "data": encode_calldata(call) }]);
        let value = self.provider.request("eth_estimateGas", params).await?;
        parse_quantity(&value)
    }

    /// Estimated cost of `call` as display text (`"0.0001 VC"`)
    pub async fn estimate_fee<C: SolCall>(&self, from: Address, to: Address, call: &C) -> Result<String> {
        let (gas, gas_price) = futures::try_join!(self.estimate_gas(from, to, call), self.gas_price())?;
        Ok(units::format_fee(gas, gas_price))
    }

    /// `eth_sendTransaction`; returns the transaction hash once the wallet
    /// has accepted it
    pub async fn send_transaction<C: SolCall>(&self, from: Address, to: Address, call: &C) -> Result<B256> {
        let params = json!([{ "from": from, "to": to, "data": encode_calldata(call) }]);
        let value = self.provider.request("eth_sendTransaction", params).await?;
        let raw = value
            .as_str()
            .ok_or_else(|| LockerError::invalid_response("transaction hash is not a string"))?;
        raw.parse::<B256>()
            .map_err(|e| LockerError::invalid_response(format!("transaction hash '{}': {}", raw, e)))
    }

    /// Poll until the transaction is mined
    ///
    /// There is no timeout: a stalled node keeps the caller waiting.
    pub async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt> {
        loop {
            let value = self
                .provider
                .request("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;

            if !value.is_null() {
                let receipt = parse_receipt(tx_hash, &value)?;
                if !receipt.success {
                    return Err(LockerError::Reverted(tx_hash));
                }
                log::debug!("Transaction {} mined in block {}", tx_hash, receipt.block_number);
                return Ok(receipt);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Submit and wait for confirmation
    pub async fn send_and_confirm<C: SolCall>(&self, from: Address, to: Address, call: &C) -> Result<TxReceipt> {
        let tx_hash = self.send_transaction(from, to, call).await?;
        log::info!("Submitted transaction {}", tx_hash);
        self.wait_for_receipt(tx_hash).await
    }
}

fn encode_calldata<C: SolCall>(call: &C) -> String {
    format!("0x{}", hex::encode(call.abi_encode()))
}

fn decode_hex_value(value: &Value) -> Result<Vec<u8>> {
    let raw = value
        .as_str()
        .ok_or_else(|| LockerError::invalid_response("expected hex string"))?;
    hex::decode(raw.trim_start_matches("0x"))
        .map_err(|e| LockerError::invalid_response(format!("bad hex '{}': {}", raw, e)))
}

/// Parse a JSON-RPC quantity (`"0x1a"`)
pub fn parse_quantity(value: &Value) -> Result<U256> {
    let raw = value
        .as_str()
        .ok_or_else(|| LockerError::invalid_response(format!("expected quantity, got {}", value)))?;
    let digits = raw.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| LockerError::invalid_response(format!("quantity '{}': {}", raw, e)))
}

fn parse_receipt(tx_hash: B256, value: &Value) -> Result<TxReceipt> {
    let block_number = value
        .get("blockNumber")
        .filter(|v| !v.is_null())
        .map(parse_quantity)
        .transpose()?
        .unwrap_or(U256::ZERO);
    // Pre-Byzantium receipts have no status field; treat them as success
    let success = match value.get("status").filter(|v| !v.is_null()) {
        Some(status) => parse_quantity(status)? == U256::from(1u64),
        None => true,
    };

    Ok(TxReceipt {
        transaction_hash: tx_hash,
        block_number: u64::try_from(block_number).unwrap_or(u64::MAX),
        success,
    })
}

fn quantity_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    u64::from_str_radix(raw.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
}
