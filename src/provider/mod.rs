//! Wallet provider abstraction
//!
//! - `WalletProvider` trait (EIP-1193 `request` + account/chain events)
//! - `HttpProvider` JSON-RPC implementation for nodes with unlocked accounts
//!
//! The provider is obtained once at the application root and shared with
//! every component as a [`SharedProvider`].

mod http;

pub use http::HttpProvider;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::error::ProviderError;

/// Event emitted by a wallet when the user changes account or network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// `chainChanged` with the new hex chain id
    ChainChanged(String),
    /// `accountsChanged` with the new account list
    AccountsChanged(Vec<String>),
}

/// EIP-1193 style wallet provider
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Send a JSON-RPC request through the wallet
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Subscribe to `chainChanged` / `accountsChanged`
    fn subscribe(&self) -> broadcast::Receiver<ProviderEvent>;
}

pub type SharedProvider = Arc<dyn WalletProvider>;
