//! Lock history feed
//!
//! Replays the locker's `LockCreated`, `TokensReleased` and `LockTransferred`
//! events for the connected wallet, newest block first.

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolEvent;

use super::{format_timestamp, ViewContext};
use crate::client::{LogFilter, RpcLog};
use crate::contracts::{address_topic, ILocker};
use crate::session::WalletSession;
use crate::Result;

pub const EMPTY_HISTORY: &str = "No lock history found.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEvent {
    Created { id: U256, token: Address },
    Released { id: U256 },
    Transferred { id: U256, new_beneficiary: Address },
}

/// Decoded event and the block it was emitted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub block_number: u64,
    pub event: HistoryEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub block_number: u64,
    /// Block time, unix seconds
    pub timestamp: u64,
    pub description: String,
}

impl HistoryEntry {
    pub fn line(&self) -> String {
        format!("{}: {}", format_timestamp(self.timestamp), self.description)
    }
}

/// Concatenate created, released and transferred records and order them by
/// block number, newest first. Records in the same block keep their
/// concatenation order.
pub fn merge_events(
    created: Vec<HistoryRecord>,
    released: Vec<HistoryRecord>,
    transferred: Vec<HistoryRecord>,
) -> Vec<HistoryRecord> {
    let mut all: Vec<HistoryRecord> = created
        .into_iter()
        .chain(released)
        .chain(transferred)
        .collect();
    all.sort_by(|a, b| b.block_number.cmp(&a.block_number));
    all
}

fn decode_created(log: &RpcLog) -> Result<HistoryEvent> {
    let event = ILocker::LockCreated::decode_raw_log(log.topics.iter().copied(), &log.data, true)?;
    Ok(HistoryEvent::Created {
        id: event.id,
        token: event.token,
    })
}

fn decode_released(log: &RpcLog) -> Result<HistoryEvent> {
    let event = ILocker::TokensReleased::decode_raw_log(log.topics.iter().copied(), &log.data, true)?;
    Ok(HistoryEvent::Released { id: event.id })
}

fn decode_transferred(log: &RpcLog) -> Result<HistoryEvent> {
    let event = ILocker::LockTransferred::decode_raw_log(log.topics.iter().copied(), &log.data, true)?;
    Ok(HistoryEvent::Transferred {
        id: event.id,
        new_beneficiary: event.newBeneficiary,
    })
}

/// Decode a batch of logs, skipping entries that do not match the ABI
fn decode_logs(logs: Vec<RpcLog>, decode: fn(&RpcLog) -> Result<HistoryEvent>) -> Vec<HistoryRecord> {
    logs.iter()
        .filter_map(|entry| match decode(entry) {
            Ok(event) => Some(HistoryRecord {
                block_number: entry.block_number,
                event,
            }),
            Err(e) => {
                log::warn!("Skipping undecodable log in block {}: {}", entry.block_number, e);
                None
            }
        })
        .collect()
}

pub struct LockHistoryView {
    ctx: ViewContext,
    session: WalletSession,
    entries: Vec<HistoryEntry>,
}

impl LockHistoryView {
    pub fn new(ctx: ViewContext, session: WalletSession) -> Self {
        Self {
            ctx,
            session,
            entries: Vec::new(),
        }
    }

    pub async fn set_session(&mut self, session: WalletSession) {
        self.session = session;
        self.load().await;
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Feed lines, or the empty-state text
    pub fn render(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![EMPTY_HISTORY.to_string()];
        }
        self.entries.iter().map(HistoryEntry::line).collect()
    }

    /// Reload the feed; on failure the previous feed stays
    pub async fn load(&mut self) {
        let Some(address) = self.session.address else {
            return;
        };

        log::debug!("Loading lock history...");
        match self.fetch_history(address).await {
            Ok(entries) => {
                log::info!("Loaded {} history entries", entries.len());
                self.entries = entries;
            }
            Err(e) => log::error!("Lock history error: {}", e),
        }
    }

    async fn fetch_history(&self, address: Address) -> Result<Vec<HistoryEntry>> {
        let locker = self.ctx.config.locker_address;
        let wallet_topic = Some(address_topic(address));

        let created = LogFilter::new(locker, vec![Some(ILocker::LockCreated::SIGNATURE_HASH), None, wallet_topic]);
        let released = LogFilter::new(locker, vec![Some(ILocker::TokensReleased::SIGNATURE_HASH), None, wallet_topic]);
        let transferred = LogFilter::new(locker, vec![Some(ILocker::LockTransferred::SIGNATURE_HASH), None, wallet_topic]);

        let client = &self.ctx.client;
        let (created, released, transferred) = futures::try_join!(
            client.get_logs(&created),
            client.get_logs(&released),
            client.get_logs(&transferred)
        )?;

        let records = merge_events(
            decode_logs(created, decode_created),
            decode_logs(released, decode_released),
            decode_logs(transferred, decode_transferred),
        );

        futures::future::try_join_all(records.into_iter().map(|record| self.describe(record))).await
    }

    async fn describe(&self, record: HistoryRecord) -> Result<HistoryEntry> {
        let timestamp = self.ctx.client.block_timestamp(record.block_number).await?;
        let description = match record.event {
            HistoryEvent::Created { id, token } => {
                let symbol = self
                    .ctx
                    .erc20(token)
                    .symbol()
                    .await
                    .unwrap_or_else(|_| "Unknown".to_string());
                format!("Created lock #{} for {}", id, symbol)
            }
            HistoryEvent::Released { id } => format!("Released lock #{}", id),
            HistoryEvent::Transferred { id, new_beneficiary } => {
                format!("Transferred lock #{} to {}", id, new_beneficiary)
            }
        };

        Ok(HistoryEntry {
            block_number: record.block_number,
            timestamp,
            description,
        })
    }
}
