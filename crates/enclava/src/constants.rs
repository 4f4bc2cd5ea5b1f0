use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Hedera Testnet chain ID.
pub const HEDERA_TESTNET_CHAIN_ID: u64 = 296;

/// Default JSON-RPC relay for Hedera Testnet.
pub const RPC_URL: &str = "https://testnet.hashio.io/api";

/// HashScan explorer base URL for Hedera Testnet.
pub const EXPLORER_BASE: &str = "https://hashscan.io/testnet";

/// Deployed dataset NFT contract on Hedera Testnet.
pub const DATASET_CONTRACT: Address = address!("0xc409d09c1b5be78ffb344fbaa70901caeb79458b");

/// Contract function used for batched dataset purchases.
pub const PAY_FUNCTION: &str = "payForMultipleDatasets";

/// Per-dataset amounts are passed to the contract in tinybars (8 decimals).
pub const AMOUNT_DECIMALS: u8 = 8;

/// The attached value goes through the JSON-RPC relay, which expects weibars
/// (18 decimals). Tinybars are lifted by the remaining 10 digits.
pub const VALUE_DECIMALS: u8 = 10;

/// Native currency metadata as the EVM relay reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Immutable network description, built once at startup and passed to
/// whatever needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    /// Short label used in page copy ("Built on Hedera").
    pub display_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub explorer_name: String,
    pub explorer_url: String,
    pub testnet: bool,
}

impl Default for ChainConfig {
    /// Defaults to Hedera Testnet.
    fn default() -> Self {
        Self {
            chain_id: HEDERA_TESTNET_CHAIN_ID,
            name: "Hedera Testnet".to_string(),
            display_name: "Hedera".to_string(),
            native_currency: NativeCurrency {
                name: "HBAR".to_string(),
                symbol: "HBAR".to_string(),
                decimals: 18,
            },
            rpc_urls: vec![RPC_URL.to_string()],
            explorer_name: "HashScan".to_string(),
            explorer_url: EXPLORER_BASE.to_string(),
            testnet: true,
        }
    }
}

impl ChainConfig {
    /// First configured RPC endpoint, falling back to the public relay.
    pub fn primary_rpc_url(&self) -> &str {
        self.rpc_urls.first().map(String::as_str).unwrap_or(RPC_URL)
    }

    /// Explorer link for a transaction hash.
    pub fn tx_url(&self, hash: impl std::fmt::Display) -> String {
        format!("{}/transaction/{hash}", self.explorer_url.trim_end_matches('/'))
    }

    /// Explorer link for an account or contract address.
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{address}", self.explorer_url.trim_end_matches('/'))
    }
}
