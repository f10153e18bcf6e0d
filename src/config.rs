/// Locker client configuration from environment variables
///
/// Controls the JSON-RPC endpoint, the locker contract address and the
/// links handed out in status messages and share intents.
/// Defaults to VinuChain mainnet.
use alloy_primitives::Address;
use std::env;
use std::time::Duration;

use crate::network::NetworkDescriptor;

/// Locker contract deployed on VinuChain
pub const LOCKER_CONTRACT_ADDRESS: &str = "0x44C91d977ebCe321c4f878ee508Fb3C809160549";

const DEFAULT_SHARE_ORIGIN: &str = "https://vinuhub.io";
const DEFAULT_STATUS_TTL_SECS: u64 = 5;
const DEFAULT_RECEIPT_POLL_MS: u64 = 1000;

#[derive(Clone, Debug)]
pub struct LockerConfig {
    /// Network the wallet must be on (switched to or added on connect)
    pub network: NetworkDescriptor,
    /// JSON-RPC endpoint used by `HttpProvider`
    pub rpc_url: String,
    /// Locker contract address
    pub locker_address: Address,
    /// Origin used in share links when there is no transaction to point at
    pub share_origin: String,
    /// How long a status message stays visible
    pub status_ttl: Duration,
    /// Interval between receipt polls while waiting for confirmation
    pub receipt_poll_interval: Duration,
}

impl LockerConfig {
    /// Load configuration from environment variables (and `.env` if present)
    ///
    /// Environment variables:
    /// - `VINUHUB_RPC_URL`: JSON-RPC endpoint (default: first VinuChain RPC)
    /// - `LOCKER_CONTRACT_ADDRESS`: locker address override
    /// - `VINUHUB_EXPLORER_URL`: block explorer base URL
    /// - `VINUHUB_SHARE_ORIGIN`: origin used in share links
    /// - `STATUS_TTL_SECS`: status message lifetime (default 5)
    /// - `RECEIPT_POLL_MS`: receipt polling interval (default 1000)
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Local node started by rpc-mock
    /// VINUHUB_RPC_URL=http://localhost:8545 cargo test
    /// ```
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::default();

        if let Ok(url) = env::var("VINUHUB_RPC_URL") {
            config.rpc_url = url;
        }
        log::info!("📡 RPC URL: {}", config.rpc_url);

        if let Ok(raw) = env::var("LOCKER_CONTRACT_ADDRESS") {
            match raw.parse::<Address>() {
                Ok(address) => config.locker_address = address,
                Err(e) => log::warn!(
                    "⚠️  Invalid LOCKER_CONTRACT_ADDRESS '{}' ({}), using default",
                    raw,
                    e
                ),
            }
        }
        log::info!("🔒 Locker contract: {}", config.locker_address);

        if let Ok(explorer) = env::var("VINUHUB_EXPLORER_URL") {
            config.network.block_explorer_urls = vec![explorer];
        }

        if let Ok(origin) = env::var("VINUHUB_SHARE_ORIGIN") {
            config.share_origin = origin;
        }

        config.status_ttl =
            Duration::from_secs(env_u64("STATUS_TTL_SECS", DEFAULT_STATUS_TTL_SECS));
        config.receipt_poll_interval =
            Duration::from_millis(env_u64("RECEIPT_POLL_MS", DEFAULT_RECEIPT_POLL_MS));

        config
    }

    pub fn chain_id(&self) -> u64 {
        self.network
            .chain_id_number()
            .unwrap_or(crate::network::VINUCHAIN_ID)
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("⚠️  Invalid {} '{}', defaulting to {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

impl Default for LockerConfig {
    /// Default configuration (VinuChain mainnet)
    fn default() -> Self {
        let network = NetworkDescriptor::vinuchain();
        let rpc_url = network.rpc_urls[0].clone();
        Self {
            network,
            rpc_url,
            locker_address: LOCKER_CONTRACT_ADDRESS
                .parse()
                .unwrap_or(Address::ZERO),
            share_origin: DEFAULT_SHARE_ORIGIN.to_string(),
            status_ttl: Duration::from_secs(DEFAULT_STATUS_TTL_SECS),
            receipt_poll_interval: Duration::from_millis(DEFAULT_RECEIPT_POLL_MS),
        }
    }
}
