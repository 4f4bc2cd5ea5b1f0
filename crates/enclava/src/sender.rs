//! The wallet capability: signs and broadcasts a composed call, then waits
//! for it to be included.

use std::time::Duration;

use alloy::primitives::TxHash;
use alloy::providers::Provider;
use serde::{Deserialize, Serialize};

use crate::{ContractCall, DatasetNFT, PaymentError};

/// Confirmation record for an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

/// Something that can put a [`ContractCall`] on chain.
///
/// Implemented over an alloy provider by [`ProviderSender`]; tests plug in
/// their own.
pub trait TransactionSender: Send + Sync {
    /// Sign and broadcast the call, returning its transaction hash.
    fn write_contract(
        &self,
        call: &ContractCall,
    ) -> impl std::future::Future<Output = Result<TxHash, PaymentError>> + Send;

    /// Wait until the transaction is included. A reverted transaction is an
    /// error.
    fn wait_for_receipt(
        &self,
        hash: TxHash,
    ) -> impl std::future::Future<Output = Result<PaymentReceipt, PaymentError>> + Send;
}

/// [`TransactionSender`] backed by a wallet-enabled alloy provider.
pub struct ProviderSender<P> {
    provider: P,
    send_timeout: Duration,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl<P> ProviderSender<P> {
    /// Wrap a provider built with `.wallet(...)`. Broadcast is bounded at 30s
    /// and the receipt wait at 60s; receipts are polled every 2s.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            send_timeout: Duration::from_secs(30),
            receipt_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(2),
        }
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

}

impl<P> TransactionSender for ProviderSender<P>
where
    P: Provider + Send + Sync,
{
    async fn write_contract(&self, call: &ContractCall) -> Result<TxHash, PaymentError> {
        let contract = DatasetNFT::new(call.contract, &self.provider);
        let pending = tokio::time::timeout(
            self.send_timeout,
            contract
                .payForMultipleDatasets(call.token_ids.clone(), call.amounts.clone())
                .value(call.value)
                .send(),
        )
        .await
        .map_err(|_| {
            PaymentError::DispatchFailure(format!(
                "{} send timed out after {}s",
                call.function_name,
                self.send_timeout.as_secs()
            ))
        })?
        .map_err(|e| PaymentError::DispatchFailure(format!("{} send failed: {e}", call.function_name)))?;

        Ok(*pending.tx_hash())
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<PaymentReceipt, PaymentError> {
        let poll = async {
            let mut interval = tokio::time::interval(self.poll_interval);
            loop {
                interval.tick().await;
                let receipt = self
                    .provider
                    .get_transaction_receipt(hash)
                    .await
                    .map_err(|e| PaymentError::ReceiptFailure(format!("receipt lookup failed: {e}")))?;
                if let Some(receipt) = receipt {
                    return Ok::<_, PaymentError>(receipt);
                }
                tracing::debug!(tx = %hash, "receipt not available yet");
            }
        };

        let receipt = tokio::time::timeout(self.receipt_timeout, poll)
            .await
            .map_err(|_| {
                PaymentError::ReceiptFailure(format!(
                    "receipt timed out after {}s",
                    self.receipt_timeout.as_secs()
                ))
            })??;

        if !receipt.status() {
            return Err(PaymentError::ReceiptFailure(format!(
                "transaction {hash} reverted"
            )));
        }

        Ok(PaymentReceipt {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;
    use alloy::providers::ProviderBuilder;
    use alloy::transports::mock::Asserter;
    use serde_json::json;

    const HASH: TxHash = TxHash::repeat_byte(0x01);

    fn mocked_sender(asserter: &Asserter) -> ProviderSender<impl Provider> {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_mocked_client(asserter.clone());
        ProviderSender::new(provider)
    }

    fn receipt_json(status: &str) -> serde_json::Value {
        json!({
            "type": "0x2",
            "status": status,
            "cumulativeGasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "00".repeat(256)),
            "transactionHash": HASH,
            "transactionIndex": "0x0",
            "blockHash": TxHash::repeat_byte(0x11),
            "blockNumber": "0x4d2",
            "gasUsed": "0x5208",
            "effectiveGasPrice": "0x1",
            "from": Address::repeat_byte(0x22),
            "to": crate::DATASET_CONTRACT,
            "contractAddress": null
        })
    }

    fn call() -> ContractCall {
        crate::assemble(
            crate::DATASET_CONTRACT,
            &crate::PaymentData::new(vec![1], vec![1.0]),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_write_contract_returns_node_hash() {
        let asserter = Asserter::new();
        asserter.push_success(&HASH);
        let sender = mocked_sender(&asserter);

        assert_eq!(sender.write_contract(&call()).await.unwrap(), HASH);
    }

    #[tokio::test]
    async fn test_write_contract_maps_rpc_error() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("user rejected the request");
        let sender = mocked_sender(&asserter);

        let err = sender.write_contract(&call()).await.unwrap_err();
        assert!(matches!(err, PaymentError::DispatchFailure(ref msg) if msg.contains("payForMultipleDatasets")));
    }

    #[tokio::test]
    async fn test_wait_for_receipt_success() {
        let asserter = Asserter::new();
        asserter.push_success(&receipt_json("0x1"));
        let sender = mocked_sender(&asserter);

        let receipt = sender.wait_for_receipt(HASH).await.unwrap();
        assert_eq!(receipt.transaction_hash, HASH);
        assert_eq!(receipt.block_number, Some(1234));
        assert_eq!(receipt.gas_used, 21_000);
    }

    #[tokio::test]
    async fn test_wait_for_receipt_reverted() {
        let asserter = Asserter::new();
        asserter.push_success(&receipt_json("0x0"));
        let sender = mocked_sender(&asserter);

        let err = sender.wait_for_receipt(HASH).await.unwrap_err();
        assert_eq!(
            err,
            PaymentError::ReceiptFailure(format!("transaction {HASH} reverted"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_receipt_polls_until_available() {
        let asserter = Asserter::new();
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&receipt_json("0x1"));
        let sender = mocked_sender(&asserter);

        let receipt = sender.wait_for_receipt(HASH).await.unwrap();
        assert_eq!(receipt.block_number, Some(1234));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_receipt_times_out() {
        let asserter = Asserter::new();
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&serde_json::Value::Null);
        let sender = mocked_sender(&asserter).with_receipt_timeout(Duration::from_secs(3));

        let err = sender.wait_for_receipt(HASH).await.unwrap_err();
        assert!(matches!(err, PaymentError::ReceiptFailure(ref msg) if msg.contains("timed out after 3s")));
    }

    #[test]
    fn test_receipt_serializes_camel_case() {
        let receipt = PaymentReceipt {
            transaction_hash: HASH,
            block_number: Some(7),
            gas_used: 21_000,
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["blockNumber"], 7);
        assert_eq!(json["gasUsed"], 21_000);
    }
}
