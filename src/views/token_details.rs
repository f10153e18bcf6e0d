//! Token detail card shown under the token address input

/// Placeholder for name and symbol before a token is resolved
pub const UNRESOLVED: &str = "N/A";

/// Fallback for metadata reads that failed on a valid address
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDetails {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Balance of the connected wallet, already formatted with `decimals`
    pub balance: String,
}

impl TokenDetails {
    pub fn unresolved() -> Self {
        Self {
            name: UNRESOLVED.to_string(),
            symbol: UNRESOLVED.to_string(),
            decimals: 18,
            balance: "0".to_string(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !(self.name == UNRESOLVED && self.symbol == UNRESOLVED)
    }

    /// Card lines; empty while the token is unresolved
    pub fn render(&self) -> Vec<String> {
        if !self.is_resolved() {
            return Vec::new();
        }
        vec![
            format!("Token Name: {}", self.name),
            format!("Symbol: {}", self.symbol),
            format!("Decimals: {}", self.decimals),
            format!("Balance: {}", self.balance),
        ]
    }
}

impl Default for TokenDetails {
    fn default() -> Self {
        Self::unresolved()
    }
}
