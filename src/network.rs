//! Target network descriptor (VinuChain)

use serde::{Deserialize, Serialize};

pub const VINUCHAIN_ID: u64 = 207;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain parameters in the shape `wallet_addEthereumChain` expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl NetworkDescriptor {
    pub fn vinuchain() -> Self {
        Self {
            chain_id: format!("0x{:X}", VINUCHAIN_ID),
            chain_name: "VinuChain".to_string(),
            native_currency: NativeCurrency {
                name: "VinuCoin".to_string(),
                symbol: "VC".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![
                "https://rpc.vinuchain.org".to_string(),
                "https://vinuchain-rpc.com".to_string(),
            ],
            block_explorer_urls: vec!["https://vinuexplorer.org".to_string()],
        }
    }

    /// Numeric chain id parsed from the hex form
    pub fn chain_id_number(&self) -> Option<u64> {
        u64::from_str_radix(self.chain_id.trim_start_matches("0x"), 16).ok()
    }

    pub fn explorer_url(&self) -> &str {
        self.block_explorer_urls
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Explorer link for a transaction hash
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url().trim_end_matches('/'), tx_hash)
    }
}

impl Default for NetworkDescriptor {
    fn default() -> Self {
        Self::vinuchain()
    }
}
