//! Application root
//!
//! Owns the wallet provider, the connector and every view. The provider is
//! injected once here and shared with the views through a [`ViewContext`].
//! A `chainChanged` or `accountsChanged` event throws all of it away and
//! rebuilds from scratch, the same as reloading the page.

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::client::ChainClient;
use crate::config::LockerConfig;
use crate::provider::{ProviderEvent, SharedProvider};
use crate::session::{WalletConnector, WalletSession};
use crate::share::ShareSink;
use crate::views::{AnalyticsView, CreateLockForm, LockHistoryView, UserLocksView, ViewContext};

/// All chain-backed screen sections
pub struct Views {
    pub create_lock: CreateLockForm,
    pub user_locks: UserLocksView,
    pub history: LockHistoryView,
    pub analytics: AnalyticsView,
}

impl Views {
    fn new(ctx: ViewContext) -> Self {
        let session = WalletSession::default();
        Self {
            create_lock: CreateLockForm::new(ctx.clone(), session),
            user_locks: UserLocksView::new(ctx.clone(), session),
            history: LockHistoryView::new(ctx.clone(), session),
            analytics: AnalyticsView::new(ctx),
        }
    }

    async fn set_session(&mut self, session: WalletSession) {
        self.create_lock.set_session(session).await;
        self.user_locks.set_session(session).await;
        self.history.set_session(session).await;
    }
}

pub struct LockerApp {
    provider: Option<SharedProvider>,
    config: LockerConfig,
    share: Arc<dyn ShareSink>,
    connector: WalletConnector,
    views: Option<Views>,
    events: Option<broadcast::Receiver<ProviderEvent>>,
}

impl LockerApp {
    /// `provider` is `None` when no wallet is available; only the connector
    /// (which reports the missing wallet) and static content work then
    pub fn new(provider: Option<SharedProvider>, config: LockerConfig, share: Arc<dyn ShareSink>) -> Self {
        let events = provider.as_ref().map(|p| p.subscribe());
        let connector = WalletConnector::new(provider.clone(), config.clone());
        let mut app = Self {
            provider,
            config,
            share,
            connector,
            views: None,
            events,
        };
        app.views = app.build_views();
        app
    }

    fn build_views(&self) -> Option<Views> {
        let provider = self.provider.clone()?;
        let client = ChainClient::new(provider, self.config.receipt_poll_interval);
        let ctx = ViewContext::new(client, self.config.clone(), self.share.clone());
        Some(Views::new(ctx))
    }

    pub fn connector(&self) -> &WalletConnector {
        &self.connector
    }

    pub fn session(&self) -> WalletSession {
        self.connector.session()
    }

    pub fn views(&self) -> Option<&Views> {
        self.views.as_ref()
    }

    pub fn views_mut(&mut self) -> Option<&mut Views> {
        self.views.as_mut()
    }

    /// Initial load of the sections that need no wallet
    pub async fn mount(&mut self) {
        if let Some(views) = self.views.as_mut() {
            views.analytics.load().await;
        }
    }

    /// Connect the wallet and hand the session to every view
    pub async fn connect(&mut self) -> WalletSession {
        let session = self.connector.connect().await;
        if session.is_connected() {
            if let Some(views) = self.views.as_mut() {
                views.set_session(session).await;
            }
        }
        session
    }

    /// Drop the session and all view state
    pub fn reset(&mut self) {
        log::info!("🔄 Resetting session and views");
        self.connector.reset();
        self.views = self.build_views();
    }

    /// Reset and mount again
    pub async fn reload(&mut self) {
        self.reset();
        self.mount().await;
    }

    /// Apply any wallet events received so far; returns whether a reload happened
    pub async fn handle_pending_events(&mut self) -> bool {
        let Some(events) = self.events.as_mut() else {
            return false;
        };

        let mut changed = false;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    log::info!("Wallet event: {:?}", event);
                    changed = true;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("Missed {} wallet events", skipped);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }

        if changed {
            self.reload().await;
        }
        changed
    }

    /// Wait for the next wallet event and reload; `None` once the provider is gone
    pub async fn next_event(&mut self) -> Option<ProviderEvent> {
        let events = self.events.as_mut()?;
        let event = loop {
            match events.recv().await {
                Ok(event) => break event,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("Missed {} wallet events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        };

        log::info!("Wallet event: {:?}", event);
        self.reload().await;
        Some(event)
    }
}
