//! Wallet connectors offered to buyers.
//!
//! The list is fixed at startup and rendered by the wallet picker; the
//! connectors themselves (signing, session handshake) live in the browser
//! wallet and are never implemented here.

use serde::{Deserialize, Serialize};

/// Application name shown by wallets during the connection prompt.
pub const APP_NAME: &str = "Enclava";

/// WalletConnect cloud project id used when none is configured.
pub const DEFAULT_PROJECT_ID: &str = "8d0f880bcadda7b5b3fa580f76de67da";

/// A wallet the buyer can connect with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletConnector {
    Injected,
    Rainbow,
    MetaMask,
    Coinbase,
    WalletConnect,
}

impl WalletConnector {
    pub fn label(&self) -> &'static str {
        match self {
            WalletConnector::Injected => "Browser Wallet",
            WalletConnector::Rainbow => "Rainbow",
            WalletConnector::MetaMask => "MetaMask",
            WalletConnector::Coinbase => "Coinbase Wallet",
            WalletConnector::WalletConnect => "WalletConnect",
        }
    }

    /// Connectors that relay through WalletConnect and need a project id.
    pub fn needs_project_id(&self) -> bool {
        matches!(
            self,
            WalletConnector::Rainbow | WalletConnector::WalletConnect | WalletConnector::MetaMask
        )
    }
}

/// A titled group of connectors in the wallet picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorGroup {
    pub group_name: String,
    pub wallets: Vec<WalletConnector>,
}

/// Wallet connection settings: app identity plus the ordered connector groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConfig {
    pub app_name: String,
    pub project_id: String,
    pub groups: Vec<ConnectorGroup>,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self::with_project_id(DEFAULT_PROJECT_ID)
    }
}

impl WalletConfig {
    /// The "Recommended" group with every supported connector.
    pub fn with_project_id(project_id: &str) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            project_id: project_id.to_string(),
            groups: vec![ConnectorGroup {
                group_name: "Recommended".to_string(),
                wallets: vec![
                    WalletConnector::Injected,
                    WalletConnector::Rainbow,
                    WalletConnector::MetaMask,
                    WalletConnector::Coinbase,
                    WalletConnector::WalletConnect,
                ],
            }],
        }
    }

    /// All connectors in display order, across groups.
    pub fn connectors(&self) -> impl Iterator<Item = WalletConnector> + '_ {
        self.groups.iter().flat_map(|g| g.wallets.iter().copied())
    }

    /// Connectors that can actually be offered. Without a project id the
    /// WalletConnect-relayed ones are left out.
    pub fn available_connectors(&self) -> impl Iterator<Item = WalletConnector> + '_ {
        let has_project = !self.project_id.trim().is_empty();
        self.connectors()
            .filter(move |c| has_project || !c.needs_project_id())
    }
}
