//! Process configuration, read once from the environment (and `.env`).
//!
//! | Variable                   | Default                           |
//! |----------------------------|-----------------------------------|
//! | `RPC_URL`                  | `https://testnet.hashio.io/api`   |
//! | `CHAIN_ID`                 | `296`                             |
//! | `EXPLORER_URL`             | `https://hashscan.io/testnet`     |
//! | `DATASET_CONTRACT`         | deployed testnet contract         |
//! | `EVM_PRIVATE_KEY`          | unset (read-only mode)            |
//! | `WALLETCONNECT_PROJECT_ID` | Enclava's public project id       |
//! | `WATCH_POLL_SECS`          | `10`                              |
//! | `RECEIPT_TIMEOUT_SECS`     | `60`                              |

use std::time::Duration;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::connectors::DEFAULT_PROJECT_ID;
use crate::{ChainConfig, PaymentError, WalletConfig, DATASET_CONTRACT};

#[derive(Clone)]
pub struct AppConfig {
    pub chain: ChainConfig,
    pub wallet: WalletConfig,
    pub contract: Address,
    private_key: Option<String>,
    pub poll_interval: Duration,
    pub receipt_timeout: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("chain", &self.chain)
            .field("wallet", &self.wallet)
            .field("contract", &self.contract)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("poll_interval", &self.poll_interval)
            .field("receipt_timeout", &self.receipt_timeout)
            .finish()
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PaymentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut chain = ChainConfig::default();
        if let Some(rpc_url) = get("RPC_URL") {
            chain.rpc_urls = vec![rpc_url];
        }
        if let Some(chain_id) = get("CHAIN_ID") {
            chain.chain_id = chain_id
                .parse()
                .map_err(|e| PaymentError::Config(format!("invalid CHAIN_ID '{chain_id}': {e}")))?;
        }
        if let Some(explorer) = get("EXPLORER_URL") {
            chain.explorer_url = explorer;
        }

        let contract = match get("DATASET_CONTRACT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| PaymentError::Config(format!("invalid DATASET_CONTRACT '{raw}': {e}")))?,
            None => DATASET_CONTRACT,
        };

        let project_id = get("WALLETCONNECT_PROJECT_ID").unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());

        let poll_interval = Duration::from_secs(parse_secs(get("WATCH_POLL_SECS"), "WATCH_POLL_SECS", 10)?);
        let receipt_timeout =
            Duration::from_secs(parse_secs(get("RECEIPT_TIMEOUT_SECS"), "RECEIPT_TIMEOUT_SECS", 60)?);

        Ok(Self {
            chain,
            wallet: WalletConfig::with_project_id(&project_id),
            contract,
            private_key: get("EVM_PRIVATE_KEY"),
            poll_interval,
            receipt_timeout,
        })
    }

    /// Whether a signing key is configured.
    pub fn has_signer(&self) -> bool {
        self.private_key.is_some()
    }

    /// Parse the configured signing key.
    pub fn signer(&self) -> Result<PrivateKeySigner, PaymentError> {
        let key = self
            .private_key
            .as_deref()
            .ok_or_else(|| PaymentError::Config("EVM_PRIVATE_KEY is not set".to_string()))?;
        key.parse()
            .map_err(|e| PaymentError::Config(format!("invalid EVM_PRIVATE_KEY: {e}")))
    }
}

fn parse_secs(raw: Option<String>, key: &str, default: u64) -> Result<u64, PaymentError> {
    match raw {
        None => Ok(default),
        Some(v) => match v.parse::<u64>() {
            Ok(0) => Err(PaymentError::Config(format!("{key} must be greater than zero"))),
            Ok(secs) => Ok(secs),
            Err(e) => Err(PaymentError::Config(format!("invalid {key} '{v}': {e}"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    // Hardhat account #0, publicly documented.
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, PaymentError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.chain, ChainConfig::default());
        assert_eq!(config.contract, DATASET_CONTRACT);
        assert_eq!(config.wallet.project_id, DEFAULT_PROJECT_ID);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.receipt_timeout, Duration::from_secs(60));
        assert!(!config.has_signer());
        assert!(config.signer().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("RPC_URL", "http://localhost:7546"),
            ("CHAIN_ID", "298"),
            ("DATASET_CONTRACT", "0x0000000000000000000000000000000000000abc"),
            ("WATCH_POLL_SECS", "3"),
            ("EVM_PRIVATE_KEY", TEST_KEY),
        ])
        .unwrap();
        assert_eq!(config.chain.primary_rpc_url(), "http://localhost:7546");
        assert_eq!(config.chain.chain_id, 298);
        assert_eq!(
            config.contract,
            "0x0000000000000000000000000000000000000abc".parse::<Address>().unwrap()
        );
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert!(config.signer().is_ok());
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("RPC_URL", "  "), ("EVM_PRIVATE_KEY", "")]).unwrap();
        assert_eq!(config.chain.primary_rpc_url(), crate::RPC_URL);
        assert!(!config.has_signer());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            config_from(&[("CHAIN_ID", "hedera")]),
            Err(PaymentError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("DATASET_CONTRACT", "0x123")]),
            Err(PaymentError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("WATCH_POLL_SECS", "0")]),
            Err(PaymentError::Config(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = config_from(&[("EVM_PRIVATE_KEY", TEST_KEY)]).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("ac0974"));
        assert!(debug.contains("<redacted>"));
    }
}
