//! Dataset payments for the Enclava data marketplace.
//!
//! A buyer selects one or more dataset tokens; the selection is turned into a
//! single batched `payForMultipleDatasets` call on the dataset NFT contract,
//! dispatched through a wallet and tracked until a receipt is available.
//!
//! # Pieces
//!
//! - **Assembler** ([`payment::assemble`]): validates the selection and
//!   converts HBAR amounts into fixed-point units
//! - **Sender** ([`TransactionSender`]): the wallet capability that signs,
//!   broadcasts and waits for receipts
//! - **Session** ([`PaymentSession`]): submission state machine observed by
//!   the caller (Idle, Pending, Confirming, Succeeded, Failed)
//!
//! # Quick example
//!
//! ```no_run
//! use alloy::network::EthereumWallet;
//! use alloy::providers::ProviderBuilder;
//! use alloy::signers::local::PrivateKeySigner;
//! use enclava::{PaymentData, PaymentSession, ProviderSender, DATASET_CONTRACT};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let signer: PrivateKeySigner = "0xYOUR_KEY".parse().unwrap();
//! let provider = ProviderBuilder::new()
//!     .wallet(EthereumWallet::from(signer))
//!     .connect_http(enclava::RPC_URL.parse().unwrap());
//!
//! let session = PaymentSession::new(ProviderSender::new(provider), DATASET_CONTRACT);
//! session
//!     .pay_for_datasets(&PaymentData::new(vec![1, 2], vec![1.5, 2.5]))
//!     .unwrap();
//! let settled = session.wait_settled().await;
//! # }
//! ```

// Chain and wallet metadata
pub mod connectors;
pub mod constants;
pub mod error;
pub mod units;

// Payment assembly
pub mod payment;

// Submission and monitoring
#[cfg(feature = "full")]
pub mod config;
#[cfg(feature = "full")]
pub mod events;
#[cfg(feature = "full")]
pub mod sender;
#[cfg(feature = "full")]
pub mod session;

use alloy::sol;

// Dataset NFT contract: batched purchase entry point and the events the
// marketplace backend indexes.
sol! {
    #[sol(rpc)]
    interface DatasetNFT {
        function payForMultipleDatasets(uint256[] tokenIds, uint256[] amounts) external payable;

        event DatasetNFTMinted(address indexed to, uint256 indexed tokenId, string datasetId);
        event DatasetUsed(uint256 indexed tokenId, address indexed user, uint256 amount);
        event AmountClaimed(uint256 indexed tokenId, address indexed owner, uint256 amount);
    }
}

// Re-exports
pub use connectors::{ConnectorGroup, WalletConfig, WalletConnector};
pub use constants::*;
pub use error::PaymentError;
pub use payment::*;

#[cfg(feature = "full")]
pub use config::AppConfig;
#[cfg(feature = "full")]
pub use events::{DatasetEvent, EventWatcher};
#[cfg(feature = "full")]
pub use sender::{PaymentReceipt, ProviderSender, TransactionSender};
#[cfg(feature = "full")]
pub use session::{PaymentSession, SubmissionSnapshot, SubmissionState};
