//! Address checks and token amount conversions
//!
//! Amounts typed by users are decimal strings; on chain they are `U256`
//! scaled by the token's decimals. Formatting follows the usual wallet
//! convention of trimming trailing zeros while keeping one fractional digit
//! (`1000.0`, `0.25`).

use alloy_primitives::utils::{format_units as alloy_format_units, parse_units as alloy_parse_units};
use alloy_primitives::{Address, U256};

use crate::error::LockerError;

pub const SECONDS_PER_DAY: u64 = 86_400;

/// Native currency ticker used in gas estimates
pub const NATIVE_SYMBOL: &str = "VC";

/// Whether `input` is a syntactically valid EVM address
///
/// Accepts `0x` followed by 40 hex digits. All-lowercase and all-uppercase
/// forms are accepted as-is; mixed case must carry a valid EIP-55 checksum.
pub fn is_address(input: &str) -> bool {
    parse_address(input).is_some()
}

/// Parse an address with the same rules as [`is_address`]
pub fn parse_address(input: &str) -> Option<Address> {
    let hex_part = input.strip_prefix("0x")?;
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(input, None).ok();
    }

    input.parse::<Address>().ok()
}

/// Parse a user-entered decimal amount as a strictly positive number
pub fn parse_positive(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Scale a decimal string by `decimals` (`"1.5"`, 18 → 1.5e18)
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, LockerError> {
    let parsed = alloy_parse_units(amount.trim(), decimals)?;
    Ok(parsed.get_absolute())
}

/// Scale a user-entered amount to a strictly positive token quantity
///
/// More fractional digits than the token carries are rejected instead of
/// truncated, so an amount can never scale down to zero.
pub fn parse_amount(input: &str, decimals: u8) -> Option<U256> {
    parse_positive(input)?;
    let input = input.trim();
    let normalized = match input.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.len() > usize::from(decimals) {
                return None;
            }
            if fraction.is_empty() {
                whole.to_string()
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => input.to_string(),
    };
    parse_units(&normalized, decimals).ok().filter(|amount| !amount.is_zero())
}

/// Render a scaled integer as a decimal string (`1000e18`, 18 → `"1000.0"`)
pub fn format_units(amount: U256, decimals: u8) -> String {
    match alloy_format_units(amount, decimals) {
        Ok(raw) => trim_fraction(&raw),
        Err(e) => {
            log::warn!("Failed to format {} with {} decimals: {}", amount, decimals, e);
            amount.to_string()
        }
    }
}

pub fn format_ether(amount: U256) -> String {
    format_units(amount, 18)
}

/// Fee text for a gas estimate: cost in VC, cut to six characters
pub fn format_fee(gas: U256, gas_price: U256) -> String {
    let cost = format_ether(gas.saturating_mul(gas_price));
    let short: String = cost.chars().take(6).collect();
    format!("{} {}", short, NATIVE_SYMBOL)
}

/// Whole days entered in a duration field; anything unparsable counts as 0
pub fn parse_days(input: &str) -> u64 {
    let digits: String = input
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Duration in seconds for `days` whole days
pub fn days_to_seconds(days: u64) -> U256 {
    U256::from(days) * U256::from(SECONDS_PER_DAY)
}

fn trim_fraction(raw: &str) -> String {
    match raw.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => format!("{}.0", raw),
    }
}
