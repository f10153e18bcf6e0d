//! Platform Analytics Integration Tests
//!
//! Run with: cargo test --test analytics_test -- --nocapture

mod common;

use alloy_sol_types::SolCall;
use common::*;
use vinuhub_locker::contracts::ILocker;
use vinuhub_locker::views::AnalyticsView;
use vinuhub_locker::U256;

#[tokio::test]
async fn test_loads_all_counters() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_selector::<ILocker::totalLockedCall>(
        &wallet,
        locker_address(),
        ILocker::totalLockedCall::abi_encode_returns(&(U256::from(1_500_000_000_000_000_000u64),)),
    );
    stub_selector::<ILocker::uniqueTokensCall>(
        &wallet,
        locker_address(),
        ILocker::uniqueTokensCall::abi_encode_returns(&(U256::from(12u64),)),
    );
    stub_selector::<ILocker::activeLocksCall>(
        &wallet,
        locker_address(),
        ILocker::activeLocksCall::abi_encode_returns(&(U256::from(34u64),)),
    );
    stub_selector::<ILocker::totalValueUSDCall>(
        &wallet,
        locker_address(),
        ILocker::totalValueUSDCall::abi_encode_returns(&(U256::from(2_250_000_000_000_000_000u64),)),
    );

    let (ctx, _) = view_context(&wallet);
    let mut view = AnalyticsView::new(ctx);
    view.load().await;

    let rendered = view.snapshot().render();
    assert_eq!(
        rendered,
        vec![
            ("1.5".to_string(), "Total Tokens Locked (VC)"),
            ("12".to_string(), "Unique Tokens"),
            ("34".to_string(), "Active Locks"),
            ("$2.25".to_string(), "Total Value (USD)"),
        ]
    );
    assert_eq!(wallet.count("eth_call"), 4);
}

#[tokio::test]
async fn test_failed_reads_show_zero() {
    init_logger();

    let wallet = ScriptedWallet::new(USER);
    stub_selector::<ILocker::activeLocksCall>(
        &wallet,
        locker_address(),
        ILocker::activeLocksCall::abi_encode_returns(&(U256::from(3u64),)),
    );

    let (ctx, _) = view_context(&wallet);
    let mut view = AnalyticsView::new(ctx);
    view.load().await;

    let snapshot = view.snapshot();
    assert_eq!(snapshot.total_locked, U256::ZERO);
    assert_eq!(snapshot.unique_tokens, U256::ZERO);
    assert_eq!(snapshot.active_locks, U256::from(3u64));
    assert_eq!(snapshot.total_value_usd, U256::ZERO);
    assert_eq!(snapshot.render()[0].0, "0.0");
}
