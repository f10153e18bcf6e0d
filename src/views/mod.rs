//! Screen state for the locker dApp
//!
//! Each view holds the inputs and derived display state of one screen
//! section and queries the chain on its own. Views never talk to each
//! other; the app root hands them the wallet session.

pub mod analytics;
pub mod create_lock;
pub mod history;
pub mod static_content;
pub mod token_details;
pub mod user_locks;

pub use analytics::{AnalyticsSnapshot, AnalyticsView};
pub use create_lock::CreateLockForm;
pub use history::{HistoryEntry, HistoryEvent, LockHistoryView};
pub use token_details::TokenDetails;
pub use user_locks::{BeneficiaryPrompt, LockFilter, LockView, UserLocksView};

use alloy_primitives::{Address, B256};
use std::sync::Arc;

use crate::client::ChainClient;
use crate::config::LockerConfig;
use crate::contracts::{Erc20, Locker};
use crate::share::{share_intent_url, ShareSink};
use crate::status::StatusBoard;

/// Collaborators every view needs
#[derive(Clone)]
pub struct ViewContext {
    pub client: ChainClient,
    pub config: LockerConfig,
    pub share: Arc<dyn ShareSink>,
}

impl ViewContext {
    pub fn new(client: ChainClient, config: LockerConfig, share: Arc<dyn ShareSink>) -> Self {
        Self {
            client,
            config,
            share,
        }
    }

    pub fn locker(&self) -> Locker<'_> {
        Locker::new(&self.client, self.config.locker_address)
    }

    pub fn erc20(&self, token: Address) -> Erc20<'_> {
        Erc20::new(&self.client, token)
    }

    pub fn status_board(&self) -> StatusBoard {
        StatusBoard::new(self.config.status_ttl)
    }

    pub fn tx_url(&self, tx_hash: B256) -> String {
        self.config.network.tx_url(&tx_hash.to_string())
    }

    /// Open a share intent linking the transaction, or the site when there is none
    ///
    /// Transactions link to their block explorer page, not to
    /// `<share_origin>/tx/<hash>`.
    pub fn share(&self, message: &str, tx_hash: Option<B256>) {
        let link = match tx_hash {
            Some(hash) => self.tx_url(hash),
            None => self.config.share_origin.clone(),
        };
        self.share.open(&share_intent_url(message, &link));
    }
}

/// Block or lock time as `YYYY-MM-DD HH:MM:SS UTC`
pub fn format_timestamp(unix_seconds: u64) -> String {
    i64::try_from(unix_seconds)
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| unix_seconds.to_string())
}
