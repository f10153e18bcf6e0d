//! Wallet Connector Integration Tests
//!
//! Drives `WalletConnector` against a scripted wallet and checks the exact
//! provider requests issued for each network situation, the resolved
//! session, and the status message left behind.
//!
//! Run with: cargo test --test connect_test -- --nocapture

mod common;

use alloy_sol_types::SolCall;
use common::*;
use std::sync::Arc;
use std::time::Duration;
use vinuhub_locker::contracts::ILocker;
use vinuhub_locker::{Address, ProviderError, StatusKind, WalletConnector};

fn stub_owner(wallet: &ScriptedWallet, owner: Address) {
    stub_call(
        wallet,
        locker_address(),
        &ILocker::ownerCall {},
        ILocker::ownerCall::abi_encode_returns(&(owner,)),
    );
}

fn connector(wallet: &Arc<ScriptedWallet>) -> WalletConnector {
    WalletConnector::new(Some(shared(wallet)), test_config())
}

// ============================================================================
// Environment failures
// ============================================================================

#[tokio::test]
async fn test_connect_without_provider() {
    init_logger();

    let mut connector = WalletConnector::new(None, test_config());
    let session = connector.connect().await;

    assert!(!session.is_connected());
    let status = connector.status().current().unwrap();
    assert_eq!(status.kind, StatusKind::Error);
    assert_eq!(status.text, "Wallet provider not detected. Please install MetaMask.");
}

#[tokio::test]
async fn test_connect_with_no_accounts() {
    init_logger();

    let wallet = ScriptedWallet::on_chain(VINUCHAIN, vec![]);
    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert!(!session.is_connected());
    assert_eq!(
        connector.status().text(),
        Some("No accounts found. Please unlock MetaMask.")
    );
    assert_eq!(wallet.count("eth_chainId"), 0);
}

// ============================================================================
// Network switching
// ============================================================================

#[tokio::test]
async fn test_connect_on_target_chain_skips_switch() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_owner(&wallet, OWNER);

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert_eq!(session.address, Some(USER));
    assert!(!session.is_admin);
    assert_eq!(wallet.count("wallet_switchEthereumChain"), 0);
    assert_eq!(wallet.count("wallet_addEthereumChain"), 0);

    let status = connector.status().current().unwrap();
    assert_eq!(status.kind, StatusKind::Success);
    assert_eq!(status.text, format!("Connected: {}", USER));
    log::info!("✅ {}", status.text);
}

#[tokio::test]
async fn test_wrong_chain_switches_exactly_once() {
    init_logger();

    let wallet = ScriptedWallet::on_chain(1, vec![USER]);
    wallet.know_chain(VINUCHAIN);
    stub_owner(&wallet, OWNER);

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert!(session.is_connected());
    let switches = wallet.requests("wallet_switchEthereumChain");
    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0][0]["chainId"], "0xCF");
    assert_eq!(wallet.count("wallet_addEthereumChain"), 0);
}

#[tokio::test]
async fn test_unknown_chain_is_added_exactly_once() {
    init_logger();

    let wallet = ScriptedWallet::on_chain(1, vec![USER]);
    stub_owner(&wallet, OWNER);

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert!(session.is_connected());
    assert_eq!(wallet.count("wallet_switchEthereumChain"), 1);

    let adds = wallet.requests("wallet_addEthereumChain");
    assert_eq!(adds.len(), 1);
    let descriptor = &adds[0][0];
    assert_eq!(descriptor["chainId"], "0xCF");
    assert_eq!(descriptor["chainName"], "VinuChain");
    assert_eq!(descriptor["nativeCurrency"]["symbol"], "VC");
    assert_eq!(descriptor["rpcUrls"][1], "https://vinuchain-rpc.com");
    assert_eq!(descriptor["blockExplorerUrls"][0], "https://vinuexplorer.org");
}

#[tokio::test]
async fn test_switch_rejection_aborts_connect() {
    init_logger();

    let wallet = ScriptedWallet::on_chain(1, vec![USER]);
    wallet.respond(
        "wallet_switchEthereumChain",
        Err(ProviderError::new(4001, "User rejected the request.")),
    );

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert!(!session.is_connected());
    assert_eq!(wallet.count("wallet_addEthereumChain"), 0);
    assert_eq!(wallet.count("eth_call"), 0);
    assert_eq!(
        connector.status().text(),
        Some("Failed to switch to VinuChain: User rejected the request.")
    );
}

// ============================================================================
// Owner detection
// ============================================================================

#[tokio::test]
async fn test_owner_gets_admin_flag() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_owner(&wallet, USER);

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert!(session.is_admin);
    assert_eq!(
        connector.status().text().map(str::to_string),
        Some(format!("Connected: {} (Admin)", USER))
    );
}

#[tokio::test]
async fn test_admin_match_ignores_hex_case() {
    init_logger();

    let account = Address::repeat_byte(0xab);
    let wallet = ScriptedWallet::new(account);
    // Wallet reports the account upper-cased, owner() returns it as bytes
    wallet.respond(
        "eth_requestAccounts",
        Ok(serde_json::json!([format!("0x{}", "AB".repeat(20))])),
    );
    stub_owner(&wallet, account);

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert_eq!(session.address, Some(account));
    assert!(session.is_admin);
}

#[tokio::test]
async fn test_owner_read_failure_reports_reason() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    fail_selector::<ILocker::ownerCall>(&wallet, locker_address(), revert_error("Locker not initialized"));

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert!(!session.is_connected());
    assert_eq!(
        connector.status().text(),
        Some("Failed to connect: Locker not initialized")
    );
}

#[tokio::test]
async fn test_account_with_bad_checksum_is_rejected() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_owner(&wallet, USER);
    // EIP-55 reference address with the last letter's case flipped
    let account = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD";
    wallet.respond("eth_requestAccounts", Ok(serde_json::json!([account])));

    let mut connector = connector(&wallet);
    let session = connector.connect().await;

    assert!(!session.is_connected());
    assert_eq!(wallet.count("eth_call"), 0);
    assert_eq!(
        connector.status().text().map(str::to_string),
        Some(format!(
            "Failed to connect: Invalid response from provider: malformed account '{}'",
            account
        ))
    );
}

// ============================================================================
// Status lifetime and reset
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_status_expires_after_ttl() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_owner(&wallet, OWNER);

    let mut connector = connector(&wallet);
    connector.connect().await;
    assert!(connector.status().current().is_some());

    tokio::time::advance(Duration::from_secs(4)).await;
    assert!(connector.status().current().is_some());

    tokio::time::advance(Duration::from_secs(2)).await;
    assert!(connector.status().current().is_none());
    // The session outlives the notification
    assert!(connector.session().is_connected());
}

#[tokio::test]
async fn test_reset_forgets_session() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_owner(&wallet, USER);

    let mut connector = connector(&wallet);
    connector.connect().await;
    assert_eq!(connector.display_address(), USER.to_string());

    connector.reset();
    assert!(!connector.session().is_connected());
    assert!(!connector.session().is_admin);
    assert_eq!(connector.display_address(), "");
    assert!(connector.status().current().is_none());
}
