//! Lock History Integration Tests
//!
//! Scripts locker event logs on the mock node and checks the merged feed:
//! ordering, descriptions, address scoping and failure handling.
//!
//! Run with: cargo test --test history_test -- --nocapture

mod common;

use alloy_sol_types::{SolCall, SolEvent};
use common::*;
use std::sync::Arc;
use vinuhub_locker::contracts::{address_topic, IERC20, ILocker};
use vinuhub_locker::views::history::EMPTY_HISTORY;
use vinuhub_locker::views::LockHistoryView;
use vinuhub_locker::{Address, ProviderError, WalletSession, B256, U256};

fn id_topic(id: u64) -> B256 {
    B256::from(U256::from(id))
}

fn created(wallet: &ScriptedWallet, id: u64, beneficiary: Address, block: u64) {
    let event = ILocker::LockCreated {
        id: U256::from(id),
        beneficiary,
        token: TOKEN,
        amount: U256::from(1000u64),
        startTime: U256::from(1_735_689_600u64),
        cliffDuration: U256::ZERO,
        vestingDuration: U256::from(86_400u64),
    };
    add_log(
        wallet,
        vec![ILocker::LockCreated::SIGNATURE_HASH, id_topic(id), address_topic(beneficiary)],
        event.encode_data(),
        block,
    );
}

fn released(wallet: &ScriptedWallet, id: u64, beneficiary: Address, block: u64) {
    let event = ILocker::TokensReleased {
        id: U256::from(id),
        beneficiary,
        token: TOKEN,
        amount: U256::from(10u64),
    };
    add_log(
        wallet,
        vec![ILocker::TokensReleased::SIGNATURE_HASH, id_topic(id), address_topic(beneficiary)],
        event.encode_data(),
        block,
    );
}

fn transferred(wallet: &ScriptedWallet, id: u64, from: Address, to: Address, block: u64) {
    add_log(
        wallet,
        vec![
            ILocker::LockTransferred::SIGNATURE_HASH,
            id_topic(id),
            address_topic(from),
            address_topic(to),
        ],
        Vec::new(),
        block,
    );
}

fn stub_symbol(wallet: &ScriptedWallet) {
    stub_selector::<IERC20::symbolCall>(
        wallet,
        TOKEN,
        IERC20::symbolCall::abi_encode_returns(&("VINU".to_string(),)),
    );
}

async fn loaded_view(wallet: &Arc<ScriptedWallet>) -> LockHistoryView {
    let (ctx, _) = view_context(wallet);
    let mut view = LockHistoryView::new(ctx, WalletSession::default());
    view.set_session(user_session()).await;
    view
}

/// Unscripted block n is stamped genesis + 2n
fn block_time(block: u64) -> u64 {
    rpc_mock::node::GENESIS_TIMESTAMP + block * rpc_mock::node::BLOCK_TIME
}

#[tokio::test]
async fn test_feed_is_newest_block_first() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_symbol(&wallet);
    created(&wallet, 1, USER, 5);
    created(&wallet, 2, USER, 2);
    released(&wallet, 1, USER, 8);
    transferred(&wallet, 2, USER, OTHER, 3);

    let view = loaded_view(&wallet).await;

    let blocks: Vec<u64> = view.entries().iter().map(|e| e.block_number).collect();
    assert_eq!(blocks, vec![8, 5, 3, 2]);

    let descriptions: Vec<String> = view.entries().iter().map(|e| e.description.clone()).collect();
    assert_eq!(
        descriptions,
        vec![
            "Released lock #1".to_string(),
            "Created lock #1 for VINU".to_string(),
            format!("Transferred lock #2 to {}", OTHER),
            "Created lock #2 for VINU".to_string(),
        ]
    );
    assert_eq!(view.entries()[0].timestamp, block_time(8));
    assert_eq!(wallet.count("eth_getLogs"), 3);
    log::info!("✅ History: {:?}", view.render());
}

#[tokio::test]
async fn test_entries_use_block_timestamps() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    released(&wallet, 4, USER, 12);
    wallet.node.set_block_timestamp(12, 1_735_689_600);

    let view = loaded_view(&wallet).await;

    assert_eq!(view.render(), vec!["2025-01-01 00:00:00 UTC: Released lock #4"]);
}

#[tokio::test]
async fn test_unknown_symbol_falls_back() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    created(&wallet, 3, USER, 10);

    let view = loaded_view(&wallet).await;

    assert_eq!(view.entries()[0].description, "Created lock #3 for Unknown");
}

#[tokio::test]
async fn test_other_wallets_are_excluded() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_symbol(&wallet);
    created(&wallet, 1, OTHER, 4);
    released(&wallet, 1, OTHER, 6);
    // Transfers into the wallet are indexed under the previous owner
    transferred(&wallet, 1, OTHER, USER, 7);
    created(&wallet, 2, USER, 9);

    let view = loaded_view(&wallet).await;

    assert_eq!(view.entries().len(), 1);
    assert_eq!(view.entries()[0].description, "Created lock #2 for VINU");
}

#[tokio::test]
async fn test_empty_history_renders_placeholder() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    let view = loaded_view(&wallet).await;

    assert!(view.entries().is_empty());
    assert_eq!(view.render(), vec![EMPTY_HISTORY]);
}

#[tokio::test]
async fn test_disconnected_history_makes_no_requests() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    let (ctx, _) = view_context(&wallet);
    let mut view = LockHistoryView::new(ctx, WalletSession::default());

    view.load().await;

    assert_eq!(wallet.total_requests(), 0);
    assert_eq!(view.render(), vec![EMPTY_HISTORY]);
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_feed() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    released(&wallet, 1, USER, 8);
    let mut view = loaded_view(&wallet).await;
    assert_eq!(view.entries().len(), 1);

    released(&wallet, 2, USER, 9);
    wallet.respond("eth_getLogs", Err(ProviderError::new(-32005, "query returned more than 10000 results")));
    view.load().await;

    assert_eq!(view.entries().len(), 1);
    assert_eq!(view.entries()[0].description, "Released lock #1");

    view.load().await;
    assert_eq!(view.entries().len(), 2);
}

#[tokio::test]
async fn test_missing_block_fails_load() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    // Beyond the node's head: eth_getBlockByNumber returns null
    released(&wallet, 1, USER, 5_000);

    let view = loaded_view(&wallet).await;

    assert!(view.entries().is_empty());
}
