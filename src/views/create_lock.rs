//! Lock creation form
//!
//! Resolves ERC20 metadata for the entered token, keeps a live gas estimate
//! for the lock, and submits approve + createLock. Owners of the locker also
//! get a token price form.

use alloy_primitives::{Address, U256};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::token_details::{TokenDetails, UNKNOWN};
use super::ViewContext;
use crate::client::TxReceipt;
use crate::contracts::{CreateLockParams, ILocker};
use crate::error::ValidationError;
use crate::session::WalletSession;
use crate::status::StatusBoard;
use crate::units::{self, SECONDS_PER_DAY};
use crate::Result;

pub const INVALID_TOKEN_TEXT: &str = "Invalid token address";
pub const ENTER_AMOUNT_TEXT: &str = "Enter a valid amount to estimate gas";

/// Validated inputs of a lock submission
#[derive(Debug, Clone, PartialEq, Eq)]
struct LockRequest {
    wallet: Address,
    token: Address,
    amount: U256,
    start_time: u64,
    cliff_days: u64,
    vesting_days: u64,
    beneficiary: Address,
}

pub struct CreateLockForm {
    ctx: ViewContext,
    session: WalletSession,
    status: StatusBoard,

    token_address: String,
    amount: String,
    start_date: String,
    cliff_days: String,
    vesting_days: String,
    beneficiary: String,
    token_details: TokenDetails,
    gas_text: String,

    price_token_address: String,
    price_amount: String,
    price_gas_text: String,
}

impl CreateLockForm {
    pub fn new(ctx: ViewContext, session: WalletSession) -> Self {
        let status = ctx.status_board();
        Self {
            ctx,
            session,
            status,
            token_address: String::new(),
            amount: String::new(),
            start_date: String::new(),
            cliff_days: String::new(),
            vesting_days: String::new(),
            beneficiary: String::new(),
            token_details: TokenDetails::unresolved(),
            gas_text: String::new(),
            price_token_address: String::new(),
            price_amount: String::new(),
            price_gas_text: String::new(),
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    pub async fn set_session(&mut self, session: WalletSession) {
        self.session = session;
        self.refresh_token_details().await;
    }

    pub async fn set_token_address(&mut self, value: impl Into<String>) {
        self.token_address = value.into();
        self.refresh_token_details().await;
    }

    pub async fn set_amount(&mut self, value: impl Into<String>) {
        self.amount = value.into();
        self.refresh_token_details().await;
    }

    /// `YYYY-MM-DDTHH:MM` (UTC), a plain date, or RFC 3339
    pub fn set_start_date(&mut self, value: impl Into<String>) {
        self.start_date = value.into();
    }

    pub fn set_cliff_days(&mut self, value: impl Into<String>) {
        self.cliff_days = value.into();
    }

    pub fn set_vesting_days(&mut self, value: impl Into<String>) {
        self.vesting_days = value.into();
    }

    /// Empty means the connected wallet
    pub fn set_beneficiary(&mut self, value: impl Into<String>) {
        self.beneficiary = value.into();
    }

    pub fn set_price_token_address(&mut self, value: impl Into<String>) {
        self.price_token_address = value.into();
    }

    pub fn set_price_amount(&mut self, value: impl Into<String>) {
        self.price_amount = value.into();
    }

    /// Copy the resolved wallet balance into the amount field
    pub async fn fill_max_amount(&mut self) {
        if units::parse_positive(&self.token_details.balance).is_none() {
            return;
        }
        let balance = self.token_details.balance.clone();
        self.set_amount(balance).await;
    }

    // ========================================================================
    // Display state
    // ========================================================================

    pub fn token_address(&self) -> &str {
        &self.token_address
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn start_date(&self) -> &str {
        &self.start_date
    }

    pub fn cliff_days(&self) -> &str {
        &self.cliff_days
    }

    pub fn vesting_days(&self) -> &str {
        &self.vesting_days
    }

    pub fn beneficiary(&self) -> &str {
        &self.beneficiary
    }

    pub fn token_details(&self) -> &TokenDetails {
        &self.token_details
    }

    pub fn gas_text(&self) -> &str {
        &self.gas_text
    }

    pub fn price_token_address(&self) -> &str {
        &self.price_token_address
    }

    pub fn price_amount(&self) -> &str {
        &self.price_amount
    }

    pub fn price_gas_text(&self) -> &str {
        &self.price_gas_text
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    pub fn admin_panel_visible(&self) -> bool {
        self.session.is_admin
    }

    /// The Max button is usable once a non-zero balance is known
    pub fn max_enabled(&self) -> bool {
        units::parse_positive(&self.token_details.balance).is_some()
    }

    // ========================================================================
    // Token metadata and gas estimate
    // ========================================================================

    /// Re-resolve token metadata and the lock gas estimate
    ///
    /// Does nothing while the token address field is empty.
    pub async fn refresh_token_details(&mut self) {
        if self.token_address.is_empty() {
            return;
        }

        let (wallet, token) = match (self.session.address, units::parse_address(&self.token_address)) {
            (Some(wallet), Some(token)) => (wallet, token),
            _ => {
                log::debug!("Invalid token address or no wallet");
                self.gas_text = INVALID_TOKEN_TEXT.to_string();
                self.token_details = TokenDetails::unresolved();
                return;
            }
        };

        log::debug!("Fetching token details for {}", token);
        self.token_details = self.fetch_token_details(wallet, token).await;

        let Some(amount) = units::parse_amount(&self.amount, self.token_details.decimals) else {
            self.gas_text = ENTER_AMOUNT_TEXT.to_string();
            return;
        };

        self.gas_text = match self.estimate_lock_fee(wallet, token, amount).await {
            Ok(fee) => format!("Est. Gas: {}", fee),
            Err(e) => {
                log::warn!("Gas estimation failed: {}", e);
                format!("Gas estimation failed: {}", e.reason())
            }
        };
    }

    async fn fetch_token_details(&self, wallet: Address, token: Address) -> TokenDetails {
        let erc20 = self.ctx.erc20(token);
        let (name, symbol, decimals, balance) = futures::join!(
            erc20.name(),
            erc20.symbol(),
            erc20.decimals(),
            erc20.balance_of(wallet)
        );

        let decimals = decimals.unwrap_or(18);
        let details = TokenDetails {
            name: name.unwrap_or_else(|_| UNKNOWN.to_string()),
            symbol: symbol.unwrap_or_else(|_| UNKNOWN.to_string()),
            decimals,
            balance: units::format_units(balance.unwrap_or(U256::ZERO), decimals),
        };
        log::debug!(
            "Token details: name={}, symbol={}, decimals={}, balance={}",
            details.name,
            details.symbol,
            details.decimals,
            details.balance
        );
        details
    }

    /// Estimate for a lock starting one day from now, paid to the wallet
    async fn estimate_lock_fee(&self, wallet: Address, token: Address, amount: U256) -> Result<String> {
        let params = CreateLockParams {
            token,
            amount,
            start_time: unix_now().saturating_add(SECONDS_PER_DAY),
            cliff_seconds: units::days_to_seconds(units::parse_days(&self.cliff_days)),
            vesting_seconds: units::days_to_seconds(units::parse_days(&self.vesting_days)),
            beneficiary: wallet,
        };
        self.ctx.locker().estimate_fee(wallet, &params.to_call()).await
    }

    // ========================================================================
    // Create lock
    // ========================================================================

    fn validate(&self) -> std::result::Result<LockRequest, ValidationError> {
        let wallet = self.session.address.ok_or(ValidationError::WalletNotConnected)?;
        let token = units::parse_address(&self.token_address).ok_or(ValidationError::InvalidTokenAddress)?;
        let amount = units::parse_amount(&self.amount, self.token_details.decimals)
            .ok_or(ValidationError::InvalidAmount)?;

        if self.start_date.trim().is_empty() {
            return Err(ValidationError::MissingStartDate);
        }
        let start_time = parse_start_date(&self.start_date).ok_or(ValidationError::InvalidStartDate)?;

        let beneficiary = if self.beneficiary.trim().is_empty() {
            wallet
        } else {
            units::parse_address(self.beneficiary.trim()).ok_or(ValidationError::InvalidBeneficiary)?
        };

        let cliff_days = units::parse_days(&self.cliff_days);
        let vesting_days = units::parse_days(&self.vesting_days);
        if vesting_days > 0 && cliff_days > vesting_days {
            return Err(ValidationError::CliffExceedsVesting);
        }

        Ok(LockRequest {
            wallet,
            token,
            amount,
            start_time,
            cliff_days,
            vesting_days,
            beneficiary,
        })
    }

    /// Validate, approve if needed, create the lock and wait for it
    pub async fn submit(&mut self) -> Option<TxReceipt> {
        let request = match self.validate() {
            Ok(request) => request,
            Err(e) => {
                self.status.error(e.to_string());
                return None;
            }
        };

        log::debug!("Creating lock...");
        match self.execute_create(&request).await {
            Ok((receipt, amount)) => {
                let tx_url = self.ctx.tx_url(receipt.transaction_hash);
                self.status.success(format!("Lock created! View Tx: {}", tx_url));
                log::info!("✅ Lock created, tx: {}", receipt.transaction_hash);

                let message = format!(
                    "Created a lock for {} {} on VinuHub!",
                    units::format_units(amount, self.token_details.decimals),
                    self.token_details.symbol
                );
                self.ctx.share(&message, Some(receipt.transaction_hash));
                self.clear();
                Some(receipt)
            }
            Err(e) => {
                log::error!("Create lock error: {}", e);
                self.status.error(format!("Failed to create lock: {}", e.reason()));
                None
            }
        }
    }

    async fn execute_create(&mut self, request: &LockRequest) -> Result<(TxReceipt, U256)> {
        let amount = request.amount;
        let token = self.ctx.erc20(request.token);
        let locker = self.ctx.locker();

        self.status.success("Approving tokens...");
        let allowance = token.allowance(request.wallet, locker.address()).await?;
        if allowance < amount {
            let approval = token.approve(request.wallet, locker.address(), amount).await?;
            log::info!("Tokens approved, tx: {}", approval.transaction_hash);
        }

        self.status.success("Creating lock...");
        let params = CreateLockParams {
            token: request.token,
            amount,
            start_time: request.start_time,
            cliff_seconds: units::days_to_seconds(request.cliff_days),
            vesting_seconds: units::days_to_seconds(request.vesting_days),
            beneficiary: request.beneficiary,
        };
        let receipt = locker.create_lock(request.wallet, &params).await?;
        Ok((receipt, amount))
    }

    fn clear(&mut self) {
        self.token_address.clear();
        self.amount.clear();
        self.start_date.clear();
        self.cliff_days.clear();
        self.vesting_days.clear();
        self.beneficiary.clear();
        self.token_details = TokenDetails::unresolved();
        self.gas_text.clear();
    }

    // ========================================================================
    // Token price (owner only)
    // ========================================================================

    fn validate_price(&self) -> std::result::Result<(Address, Address, U256), ValidationError> {
        let wallet = self.session.address.ok_or(ValidationError::WalletNotConnected)?;
        let token = units::parse_address(&self.price_token_address).ok_or(ValidationError::InvalidTokenAddress)?;
        let price = units::parse_amount(&self.price_amount, 18).ok_or(ValidationError::InvalidPrice)?;
        if !self.session.is_admin {
            return Err(ValidationError::NotAdmin);
        }
        Ok((wallet, token, price))
    }

    /// Set the USD price (18 decimals) the locker uses for a token
    pub async fn set_token_price(&mut self) -> Option<TxReceipt> {
        let (wallet, token, price) = match self.validate_price() {
            Ok(inputs) => inputs,
            Err(e) => {
                self.status.error(e.to_string());
                return None;
            }
        };

        log::debug!("Setting token price...");
        match self.execute_set_price(wallet, token, price).await {
            Ok(receipt) => {
                let tx_url = self.ctx.tx_url(receipt.transaction_hash);
                self.status.success(format!("Token price set! View Tx: {}", tx_url));
                log::info!("✅ Token price set, tx: {}", receipt.transaction_hash);
                self.price_token_address.clear();
                self.price_amount.clear();
                Some(receipt)
            }
            Err(e) => {
                log::error!("Set token price error: {}", e);
                self.status.error(format!("Failed to set token price: {}", e.reason()));
                None
            }
        }
    }

    async fn execute_set_price(&mut self, wallet: Address, token: Address, price: U256) -> Result<TxReceipt> {
        let call = ILocker::setTokenPriceCall { token, price };
        let locker = self.ctx.locker();
        let fee = locker.estimate_fee(wallet, &call).await?;
        self.price_gas_text = format!("Est. Gas: {}", fee);
        locker.execute(wallet, &call).await
    }
}

fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or_default()
}

/// Unix seconds for a start date input; naive values are read as UTC
pub fn parse_start_date(input: &str) -> Option<u64> {
    let input = input.trim();
    let timestamp = if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        dt.timestamp()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M") {
        dt.and_utc().timestamp()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S") {
        dt.and_utc().timestamp()
    } else {
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp()
    };
    u64::try_from(timestamp).ok()
}
