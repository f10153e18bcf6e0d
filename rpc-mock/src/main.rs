/// RPC Mock Node
///
/// A lightweight JSON-RPC node with scripted state for exercising dApp
/// clients without a chain. Designed for local development and tests.

use anyhow::{Context, Result};
use std::env;

use rpc_mock::{run_server, MockNode};

/// Hardhat's first dev account
const DEFAULT_ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

#[derive(Debug)]
struct Config {
    // Chain
    chain_id: u64,
    accounts: Vec<String>,

    // Server
    server_host: String,
    server_port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let chain_id = env::var("MOCK_CHAIN_ID")
            .unwrap_or_else(|_| "207".to_string())
            .parse()
            .context("Invalid MOCK_CHAIN_ID")?;

        let accounts = env::var("MOCK_ACCOUNTS")
            .unwrap_or_else(|_| DEFAULT_ACCOUNT.to_string())
            .split(',')
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        let server_host = env::var("SERVER_HOST")
            .unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8545".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            chain_id,
            accounts,
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting RPC Mock Node...");

    // Load configuration
    let config = Config::from_env()
        .context("Failed to load configuration")?;

    log::info!("Chain ID: {}", config.chain_id);
    log::info!("Accounts: {}", config.accounts.join(", "));
    log::info!("Server will listen on {}:{}", config.server_host, config.server_port);

    let node = MockNode::shared(config.chain_id, config.accounts);

    // Run server
    run_server(node, config.server_host, config.server_port)
        .await
        .context("Server error")?;

    Ok(())
}
