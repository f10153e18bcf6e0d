//! Locks owned by the connected wallet
//!
//! Loads the wallet's locks, decorates each with token metadata, the
//! currently releasable amount and a release fee estimate, and runs single
//! or batched release/transfer transactions.

use alloy_primitives::{Address, U256};
use async_trait::async_trait;

use super::{format_timestamp, ViewContext};
use crate::client::TxReceipt;
use crate::contracts::{ILocker, LockRecord};
use crate::error::ValidationError;
use crate::session::WalletSession;
use crate::status::StatusBoard;
use crate::units::{self, SECONDS_PER_DAY};
use crate::Result;

pub const TRANSFER_PROMPT: &str = "Enter new beneficiary address:";
pub const BATCH_TRANSFER_PROMPT: &str = "Enter new beneficiary address for batch transfer:";
pub const NO_RELEASABLE_LOCKS: &str = "No locks eligible for release.";
pub const NO_TRANSFERABLE_LOCKS: &str = "No locks eligible for transfer.";

/// Locks with a cliff of at least this long get the trusted badge
pub const TRUSTED_CLIFF_SECONDS: u64 = 30 * SECONDS_PER_DAY;

/// Asks the user for a new beneficiary address
///
/// Only the action that asked waits for the answer. `None` means cancelled.
#[async_trait]
pub trait BeneficiaryPrompt: Send + Sync {
    async fn ask(&self, message: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LockFilter {
    #[default]
    All,
    Active,
    Vested,
    Revoked,
}

impl LockFilter {
    pub fn matches(&self, lock: &LockRecord) -> bool {
        match self {
            LockFilter::All => true,
            LockFilter::Active => lock.is_active(),
            LockFilter::Vested => lock.is_fully_vested(),
            LockFilter::Revoked => lock.revoked,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LockFilter::All => "All Locks",
            LockFilter::Active => "Active",
            LockFilter::Vested => "Fully Vested",
            LockFilter::Revoked => "Revoked",
        }
    }
}

/// A lock with its display-only decorations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockView {
    pub lock: LockRecord,
    pub symbol: String,
    pub decimals: u8,
    pub releasable: U256,
    /// Release fee estimate: `"<x> VC"`, `"N/A"` or `"-"` when nothing is releasable
    pub gas_text: String,
}

impl LockView {
    pub fn can_release(&self) -> bool {
        self.releasable > U256::ZERO
    }

    pub fn can_transfer(&self) -> bool {
        self.lock.is_active()
    }

    pub fn is_trusted(&self) -> bool {
        self.lock.cliff_duration >= TRUSTED_CLIFF_SECONDS
    }

    pub fn status_label(&self) -> &'static str {
        if self.lock.revoked {
            "Revoked"
        } else if self.can_release() {
            "Releasable"
        } else if self.lock.released >= self.lock.amount {
            "Fully Vested"
        } else {
            "Locked/Vesting"
        }
    }

    pub fn render(&self) -> Vec<String> {
        let badge = if self.is_trusted() { " [Trusted Lock]" } else { "" };
        vec![
            format!("Lock ID: {}{}", self.lock.id, badge),
            format!("Token: {} ({})", self.lock.token, self.symbol),
            format!("Amount: {}", units::format_units(self.lock.amount, self.decimals)),
            format!("Released: {}", units::format_units(self.lock.released, self.decimals)),
            format!("Releasable: {}", units::format_units(self.releasable, self.decimals)),
            format!("Start: {}", format_timestamp(self.lock.start_time)),
            format!("Cliff: {} days", days(self.lock.cliff_duration)),
            format!("Vesting: {} days", days(self.lock.vesting_duration)),
            format!("Status: {}", self.status_label()),
        ]
    }
}

fn days(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_DAY as f64
}

pub struct UserLocksView {
    ctx: ViewContext,
    session: WalletSession,
    status: StatusBoard,
    filter: LockFilter,
    locks: Vec<LockView>,
    has_releasable: bool,
    has_transferable: bool,
}

impl UserLocksView {
    pub fn new(ctx: ViewContext, session: WalletSession) -> Self {
        let status = ctx.status_board();
        Self {
            ctx,
            session,
            status,
            filter: LockFilter::All,
            locks: Vec::new(),
            has_releasable: false,
            has_transferable: false,
        }
    }

    pub async fn set_session(&mut self, session: WalletSession) {
        self.session = session;
        self.load().await;
    }

    pub async fn set_filter(&mut self, filter: LockFilter) {
        self.filter = filter;
        self.load().await;
    }

    pub fn filter(&self) -> LockFilter {
        self.filter
    }

    pub fn locks(&self) -> &[LockView] {
        &self.locks
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Gates the batch release button
    pub fn has_releasable(&self) -> bool {
        self.has_releasable
    }

    /// Gates the batch transfer button
    pub fn has_transferable(&self) -> bool {
        self.has_transferable
    }

    pub fn empty_text(&self) -> &'static str {
        if self.session.is_connected() {
            "No locks found."
        } else {
            "Connect wallet to load locks"
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Reload the wallet's locks under the current filter
    pub async fn load(&mut self) {
        let Some(owner) = self.session.address else {
            return;
        };

        log::debug!("Loading user locks...");
        match self.fetch_locks(owner).await {
            Ok(locks) => {
                self.has_releasable = locks.iter().any(LockView::can_release);
                self.has_transferable = locks.iter().any(LockView::can_transfer);
                log::info!("Loaded {} locks", locks.len());
                self.locks = locks;
            }
            Err(e) => {
                log::error!("Load locks error: {}", e);
                self.status.error(format!("Failed to load locks: {}", e));
            }
        }
    }

    async fn fetch_locks(&self, owner: Address) -> Result<Vec<LockView>> {
        let records = self.ctx.locker().locks_for_user(owner).await?;
        let lookups = records
            .into_iter()
            .filter(|lock| self.filter.matches(lock))
            .map(|lock| self.describe_lock(owner, lock));
        futures::future::try_join_all(lookups).await
    }

    async fn describe_lock(&self, wallet: Address, lock: LockRecord) -> Result<LockView> {
        let erc20 = self.ctx.erc20(lock.token);
        let locker = self.ctx.locker();
        let (symbol, decimals, releasable) = futures::join!(
            erc20.symbol(),
            erc20.decimals(),
            locker.releasable_amount(lock.id)
        );
        let releasable = releasable?;

        let gas_text = if releasable > U256::ZERO {
            match locker.estimate_fee(wallet, &ILocker::releaseCall { id: lock.id }).await {
                Ok(fee) => fee,
                Err(e) => {
                    log::warn!("Release estimate for lock {} failed: {}", lock.id, e);
                    "N/A".to_string()
                }
            }
        } else {
            "-".to_string()
        };

        Ok(LockView {
            symbol: symbol.unwrap_or_else(|_| "Unknown".to_string()),
            decimals: decimals.unwrap_or(18),
            releasable,
            gas_text,
            lock,
        })
    }

    // ========================================================================
    // Actions
    // ========================================================================

    fn wallet(&mut self) -> Option<Address> {
        if self.session.address.is_none() {
            self.status.error(ValidationError::WalletNotConnected.to_string());
        }
        self.session.address
    }

    /// Release the vested part of one lock
    pub async fn release(&mut self, id: U256) -> Option<TxReceipt> {
        let wallet = self.wallet()?;

        log::debug!("Releasing lock {}", id);
        self.status.success("Releasing tokens...");
        let result = self.ctx.locker().release(wallet, id).await;

        match result {
            Ok(receipt) => {
                let tx_url = self.ctx.tx_url(receipt.transaction_hash);
                self.status.success(format!("Released tokens! View Tx: {}", tx_url));
                log::info!("✅ Released lock {}, tx: {}", id, receipt.transaction_hash);
                self.load().await;
                Some(receipt)
            }
            Err(e) => {
                log::error!("Release error: {}", e);
                self.status.error(format!("Failed to release: {}", e.reason()));
                None
            }
        }
    }

    /// Move one lock to a beneficiary supplied by `prompt`
    pub async fn transfer(&mut self, id: U256, prompt: &dyn BeneficiaryPrompt) -> Option<TxReceipt> {
        let wallet = self.wallet()?;
        let new_beneficiary = self.ask_beneficiary(prompt, TRANSFER_PROMPT).await?;

        log::debug!("Transferring lock {}", id);
        self.status.success("Transferring lock...");
        let call = ILocker::transferLockCall {
            id,
            newBeneficiary: new_beneficiary,
        };
        let result = self.estimate_and_execute(wallet, &call, "Transferring lock").await;

        match result {
            Ok(receipt) => {
                let tx_url = self.ctx.tx_url(receipt.transaction_hash);
                self.status.success(format!("Lock transferred! View Tx: {}", tx_url));
                log::info!("✅ Transferred lock {}, tx: {}", id, receipt.transaction_hash);
                self.load().await;
                Some(receipt)
            }
            Err(e) => {
                log::error!("Transfer error: {}", e);
                self.status.error(format!("Failed to transfer: {}", e.reason()));
                None
            }
        }
    }

    /// Release every loaded lock that has something releasable
    pub async fn batch_release(&mut self) -> Option<TxReceipt> {
        let ids: Vec<U256> = self
            .locks
            .iter()
            .filter(|view| !view.lock.revoked && view.can_release())
            .map(|view| view.lock.id)
            .collect();
        if ids.is_empty() {
            self.status.error(NO_RELEASABLE_LOCKS);
            return None;
        }
        let wallet = self.wallet()?;

        let label = format!("Releasing {} locks", ids.len());
        self.status.success(format!("{}...", label));
        let call = ILocker::batchReleaseCall { ids };
        let result = self.estimate_and_execute(wallet, &call, &label).await;

        match result {
            Ok(receipt) => {
                let tx_url = self.ctx.tx_url(receipt.transaction_hash);
                self.status.success(format!("Batch released! View Tx: {}", tx_url));
                log::info!("✅ Batch released, tx: {}", receipt.transaction_hash);
                self.load().await;
                Some(receipt)
            }
            Err(e) => {
                log::error!("Batch release error: {}", e);
                self.status.error(format!("Batch release failed: {}", e.reason()));
                None
            }
        }
    }

    /// Move every loaded active lock to one beneficiary
    pub async fn batch_transfer(&mut self, prompt: &dyn BeneficiaryPrompt) -> Option<TxReceipt> {
        let ids: Vec<U256> = self
            .locks
            .iter()
            .filter(|view| view.can_transfer())
            .map(|view| view.lock.id)
            .collect();
        if ids.is_empty() {
            self.status.error(NO_TRANSFERABLE_LOCKS);
            return None;
        }
        let wallet = self.wallet()?;
        let new_beneficiary = self.ask_beneficiary(prompt, BATCH_TRANSFER_PROMPT).await?;

        let label = format!("Transferring {} locks", ids.len());
        self.status.success(format!("{}...", label));
        let call = ILocker::batchTransferCall {
            ids,
            newBeneficiary: new_beneficiary,
        };
        let result = self.estimate_and_execute(wallet, &call, &label).await;

        match result {
            Ok(receipt) => {
                let tx_url = self.ctx.tx_url(receipt.transaction_hash);
                self.status.success(format!("Batch transferred! View Tx: {}", tx_url));
                log::info!("✅ Batch transferred, tx: {}", receipt.transaction_hash);
                self.load().await;
                Some(receipt)
            }
            Err(e) => {
                log::error!("Batch transfer error: {}", e);
                self.status.error(format!("Batch transfer failed: {}", e.reason()));
                None
            }
        }
    }

    /// Open a share intent for one lock
    pub fn share_lock(&self, id: U256) {
        self.ctx.share(&format!("Check out my lock #{} on VinuHub!", id), None);
    }

    async fn ask_beneficiary(&mut self, prompt: &dyn BeneficiaryPrompt, message: &str) -> Option<Address> {
        let answer = prompt.ask(message).await;
        let address = answer.as_deref().and_then(|a| units::parse_address(a.trim()));
        if address.is_none() {
            self.status.error(ValidationError::InvalidBeneficiary.to_string());
        }
        address
    }

    /// Show the fee estimate as progress, then submit and wait
    async fn estimate_and_execute<C: alloy_sol_types::SolCall>(
        &mut self,
        wallet: Address,
        call: &C,
        label: &str,
    ) -> Result<TxReceipt> {
        let locker = self.ctx.locker();
        let fee = locker.estimate_fee(wallet, call).await?;
        self.status.success(format!("{} (Est. Gas: {})...", label, fee));
        locker.execute(wallet, call).await
    }
}
