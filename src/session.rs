//! Wallet connector
//!
//! Requests account access, puts the wallet on the target network (switching,
//! or adding the network when the wallet does not know it), resolves the
//! signer address and checks it against the locker owner.
//!
//! The connector owns the resolved session; views receive copies of it.

use alloy_primitives::Address;

use crate::client::ChainClient;
use crate::config::LockerConfig;
use crate::contracts::Locker;
use crate::error::LockerError;
use crate::provider::SharedProvider;
use crate::status::StatusBoard;
use crate::units;
use crate::Result;

/// Connected wallet state shared with the views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Option<Address>,
    pub is_admin: bool,
}

impl WalletSession {
    pub fn connected(address: Address, is_admin: bool) -> Self {
        Self {
            address: Some(address),
            is_admin,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }
}

pub struct WalletConnector {
    client: Option<ChainClient>,
    config: LockerConfig,
    session: WalletSession,
    status: StatusBoard,
}

impl WalletConnector {
    /// `provider` is `None` when no wallet was detected
    pub fn new(provider: Option<SharedProvider>, config: LockerConfig) -> Self {
        let client = provider.map(|p| ChainClient::new(p, config.receipt_poll_interval));
        let status = StatusBoard::new(config.status_ttl);
        Self {
            client,
            config,
            session: WalletSession::default(),
            status,
        }
    }

    pub fn session(&self) -> WalletSession {
        self.session
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Address shown next to the connect button
    pub fn display_address(&self) -> String {
        self.session
            .address
            .map(|a| a.to_string())
            .unwrap_or_default()
    }

    /// Connect the wallet; every outcome ends up as a status message
    pub async fn connect(&mut self) -> WalletSession {
        log::debug!("Connect wallet requested");

        match self.try_connect().await {
            Ok(session) => {
                self.session = session;
                let address = session.address.unwrap_or_default();
                let suffix = if session.is_admin { " (Admin)" } else { "" };
                self.status.success(format!("Connected: {}{}", address, suffix));
            }
            Err(err @ (LockerError::NoProvider | LockerError::NoAccounts | LockerError::ChainSwitch(_))) => {
                self.status.error(err.to_string());
            }
            Err(err) => {
                log::error!("Wallet connection failed: {}", err);
                self.status.error(format!("Failed to connect: {}", err.reason()));
            }
        }

        self.session
    }

    async fn try_connect(&self) -> Result<WalletSession> {
        let client = self.client.as_ref().ok_or(LockerError::NoProvider)?;

        let accounts = client.request_accounts().await?;
        let first = accounts.first().ok_or(LockerError::NoAccounts)?;

        self.ensure_network(client).await?;

        let address = units::parse_address(first)
            .ok_or_else(|| LockerError::invalid_response(format!("malformed account '{}'", first)))?;

        let owner = Locker::new(client, self.config.locker_address).owner().await?;
        // Address equality is byte equality, so hex case does not matter
        let is_admin = owner == address;
        log::info!(
            "✅ Wallet connected: {} (owner: {}, admin: {})",
            address,
            owner,
            is_admin
        );

        Ok(WalletSession::connected(address, is_admin))
    }

    async fn ensure_network(&self, client: &ChainClient) -> Result<()> {
        let network = &self.config.network;
        let current = client.chain_id().await?;
        if current == self.config.chain_id() {
            return Ok(());
        }

        log::info!(
            "Wallet on chain {}, switching to {} ({})",
            current,
            network.chain_name,
            network.chain_id
        );

        match client.switch_chain(network).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_unrecognized_chain() => {
                log::info!("{} unknown to wallet, adding it", network.chain_name);
                client.add_chain(network).await
            }
            Err(err) => Err(LockerError::ChainSwitch(err)),
        }
    }

    /// Forget the session (account or chain changed)
    pub fn reset(&mut self) {
        self.session = WalletSession::default();
        self.status.clear();
    }
}
