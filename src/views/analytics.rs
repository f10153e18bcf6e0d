//! Platform-wide counters read from the locker

use alloy_primitives::U256;

use super::ViewContext;
use crate::units;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalyticsSnapshot {
    pub total_locked: U256,
    pub unique_tokens: U256,
    pub active_locks: U256,
    pub total_value_usd: U256,
}

impl AnalyticsSnapshot {
    /// `(value, caption)` pairs in display order
    pub fn render(&self) -> Vec<(String, &'static str)> {
        vec![
            (units::format_ether(self.total_locked), "Total Tokens Locked (VC)"),
            (self.unique_tokens.to_string(), "Unique Tokens"),
            (self.active_locks.to_string(), "Active Locks"),
            (format!("${}", units::format_units(self.total_value_usd, 18)), "Total Value (USD)"),
        ]
    }
}

pub struct AnalyticsView {
    ctx: ViewContext,
    snapshot: AnalyticsSnapshot,
}

impl AnalyticsView {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            snapshot: AnalyticsSnapshot::default(),
        }
    }

    pub fn snapshot(&self) -> &AnalyticsSnapshot {
        &self.snapshot
    }

    /// Read all four counters; any failed read shows as zero
    pub async fn load(&mut self) {
        let locker = self.ctx.locker();
        let (total_locked, unique_tokens, active_locks, total_value_usd) = futures::join!(
            locker.total_locked(),
            locker.unique_tokens(),
            locker.active_locks(),
            locker.total_value_usd()
        );

        let snapshot = AnalyticsSnapshot {
            total_locked: or_zero("totalLocked", total_locked),
            unique_tokens: or_zero("uniqueTokens", unique_tokens),
            active_locks: or_zero("activeLocks", active_locks),
            total_value_usd: or_zero("totalValueUSD", total_value_usd),
        };
        log::debug!("Analytics: {:?}", snapshot);
        self.snapshot = snapshot;
    }
}

fn or_zero(name: &str, value: crate::Result<U256>) -> U256 {
    value.unwrap_or_else(|e| {
        log::warn!("Analytics read {} failed: {}", name, e);
        U256::ZERO
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats_amounts() {
        let wei = U256::from(10u64).pow(U256::from(18u64));
        let snapshot = AnalyticsSnapshot {
            total_locked: U256::from(1500u64) * wei,
            unique_tokens: U256::from(4u64),
            active_locks: U256::from(12u64),
            total_value_usd: U256::from(25u64) * wei / U256::from(10u64),
        };
        let cells = snapshot.render();
        assert_eq!(cells[0].0, "1500.0");
        assert_eq!(cells[1].0, "4");
        assert_eq!(cells[2].0, "12");
        assert_eq!(cells[3].0, "$2.5");
    }

    #[test]
    fn test_default_is_zero() {
        let cells = AnalyticsSnapshot::default().render();
        assert_eq!(cells[0].0, "0.0");
        assert_eq!(cells[3].0, "$0.0");
    }
}
