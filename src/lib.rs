//! VinuHub Locker: token and liquidity locks on VinuChain
//!
//! This crate is the client side of the VinuHub locker dApp. It talks to a
//! wallet provider (the EIP-1193 `request` surface), keeps the wallet on
//! VinuChain, and drives the locker contract: creating vesting locks,
//! releasing and transferring them, and replaying their history.
//!
//! # Architecture
//!
//! - **Provider**: `WalletProvider` trait plus an HTTP JSON-RPC implementation
//! - **Chain client**: ABI encoded calls, gas estimates, receipts and logs
//! - **Connector**: account access, network switching, owner detection
//! - **Views**: state of each screen section (create, locks, history, analytics)
//! - **App**: owns everything and rebuilds it on wallet events
//!
//! All vesting math and custody live in the locker contract; this crate
//! only orchestrates calls to it.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use vinuhub_locker::{HttpProvider, LockerApp, LockerConfig, LogShareSink};
//!
//! let config = LockerConfig::from_env();
//! let provider = Arc::new(HttpProvider::new(&config.rpc_url));
//! let mut app = LockerApp::new(Some(provider), config, Arc::new(LogShareSink));
//!
//! app.mount().await;
//! let session = app.connect().await;
//! println!("{:?}", app.connector().status().text());
//! ```

// Public modules
pub mod app;
pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod network;
pub mod provider;
pub mod session;
pub mod share;
pub mod status;
pub mod units;
pub mod views;

// Re-exports for convenience
pub use app::{LockerApp, Views};
pub use client::{ChainClient, LogFilter, RpcLog, TxReceipt};
pub use config::{LockerConfig, LOCKER_CONTRACT_ADDRESS};
pub use contracts::{CreateLockParams, Erc20, LockRecord, Locker, IERC20, ILocker};
pub use error::{LockerError, ProviderError, ValidationError};
pub use network::{NetworkDescriptor, VINUCHAIN_ID};
pub use provider::{HttpProvider, ProviderEvent, SharedProvider, WalletProvider};
pub use session::{WalletConnector, WalletSession};
pub use share::{share_intent_url, LogShareSink, ShareSink};
pub use status::{StatusBoard, StatusKind, StatusMessage};
pub use views::{
    AnalyticsSnapshot, AnalyticsView, BeneficiaryPrompt, CreateLockForm, HistoryEntry, LockFilter, LockHistoryView,
    LockView, TokenDetails, UserLocksView, ViewContext,
};

// Re-export the EVM primitive types used across the API
pub use alloy_primitives::{Address, B256, U256};

// Common result type
pub type Result<T> = std::result::Result<T, LockerError>;
