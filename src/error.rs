//! Error types for locker client operations
//!
//! Covers the wallet environment, user input validation, chain switching and
//! failures reported by the provider or the contracts behind it.

use alloy_primitives::B256;
use alloy_sol_types::{Revert, SolError};
use serde_json::Value;
use thiserror::Error;

/// EIP-1193 code for a chain the wallet does not know about
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// EIP-1193 code for a method the provider does not support
pub const UNSUPPORTED_METHOD: i64 = 4200;

/// JSON-RPC code for an internal/transport failure
pub const INTERNAL_ERROR: i64 = -32603;

/// Error returned by a wallet provider `request`
///
/// Mirrors the `{ code, message, data }` shape of EIP-1193 / JSON-RPC errors.
#[derive(Error, Clone, Debug, PartialEq)]
#[error("{message}")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Transport-level failure (connection refused, bad JSON, ...)
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN
    }

    /// Revert reason carried in `data` as an ABI encoded `Error(string)`
    pub fn revert_reason(&self) -> Option<String> {
        let data = match self.data.as_ref()? {
            Value::String(s) => s.as_str(),
            Value::Object(map) => map.get("data")?.as_str()?,
            _ => return None,
        };
        let bytes = hex::decode(data.trim_start_matches("0x")).ok()?;
        Revert::abi_decode(&bytes, true).ok().map(|r| r.reason)
    }
}

/// Input rejected before any network call
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Connect your wallet first.")]
    WalletNotConnected,

    #[error("Invalid token address.")]
    InvalidTokenAddress,

    #[error("Invalid lock amount.")]
    InvalidAmount,

    #[error("Please select a start date.")]
    MissingStartDate,

    #[error("Invalid start date.")]
    InvalidStartDate,

    #[error("Invalid beneficiary address.")]
    InvalidBeneficiary,

    #[error("Cliff duration cannot exceed vesting duration.")]
    CliffExceedsVesting,

    #[error("Invalid price.")]
    InvalidPrice,

    #[error("Only the contract owner can set token prices.")]
    NotAdmin,
}

/// Core error type for locker client operations
#[derive(Error, Debug)]
pub enum LockerError {
    #[error("Wallet provider not detected. Please install MetaMask.")]
    NoProvider,

    #[error("No accounts found. Please unlock MetaMask.")]
    NoAccounts,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to switch to VinuChain: {0}")]
    ChainSwitch(ProviderError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Unit conversion error: {0}")]
    Units(String),

    #[error("Invalid response from provider: {0}")]
    InvalidResponse(String),

    #[error("Transaction reverted: {0}")]
    Reverted(B256),
}

impl LockerError {
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Contract-reported reason when available, else the plain message
    pub fn reason(&self) -> String {
        match self {
            Self::Provider(err) | Self::ChainSwitch(err) => {
                err.revert_reason().unwrap_or_else(|| err.message.clone())
            }
            other => other.to_string(),
        }
    }
}

impl From<alloy_primitives::utils::UnitsError> for LockerError {
    fn from(err: alloy_primitives::utils::UnitsError) -> Self {
        Self::Units(err.to_string())
    }
}
