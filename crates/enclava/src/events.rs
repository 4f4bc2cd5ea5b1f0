//! Dataset contract events: decoding and a polling watcher.
//!
//! The watcher polls `eth_getLogs` rather than subscribing, since the Hedera
//! JSON-RPC relay does not keep websocket subscriptions alive reliably.

use std::future::Future;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::Provider;
use alloy::rpc::types::{Filter, Log};
use alloy::sol_types::SolEvent;
use serde::Serialize;

use crate::DatasetNFT::{AmountClaimed, DatasetNFTMinted, DatasetUsed};
use crate::PaymentError;

/// First restart delay after a watcher failure.
pub const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Restart delays never exceed this.
pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(5 * 60);

/// Decoded dataset contract event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum DatasetEvent {
    #[serde(rename_all = "camelCase")]
    Minted {
        to: Address,
        token_id: U256,
        dataset_id: String,
        tx_hash: Option<TxHash>,
        block_number: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    Used {
        token_id: U256,
        user: Address,
        amount: U256,
        tx_hash: Option<TxHash>,
        block_number: Option<u64>,
    },
    #[serde(rename_all = "camelCase")]
    Claimed {
        token_id: U256,
        owner: Address,
        amount: U256,
        tx_hash: Option<TxHash>,
        block_number: Option<u64>,
    },
}

impl DatasetEvent {
    /// Decode a log emitted by the dataset contract. Logs for other events,
    /// or that fail to decode, yield `None`.
    pub fn decode_log(log: &Log) -> Option<Self> {
        let topic0 = *log.topics().first()?;
        let tx_hash = log.transaction_hash;
        let block_number = log.block_number;

        if topic0 == DatasetNFTMinted::SIGNATURE_HASH {
            let event = DatasetNFTMinted::decode_log_data(log.data()).ok()?;
            Some(DatasetEvent::Minted {
                to: event.to,
                token_id: event.tokenId,
                dataset_id: event.datasetId,
                tx_hash,
                block_number,
            })
        } else if topic0 == DatasetUsed::SIGNATURE_HASH {
            let event = DatasetUsed::decode_log_data(log.data()).ok()?;
            Some(DatasetEvent::Used {
                token_id: event.tokenId,
                user: event.user,
                amount: event.amount,
                tx_hash,
                block_number,
            })
        } else if topic0 == AmountClaimed::SIGNATURE_HASH {
            let event = AmountClaimed::decode_log_data(log.data()).ok()?;
            Some(DatasetEvent::Claimed {
                token_id: event.tokenId,
                owner: event.owner,
                amount: event.amount,
                tx_hash,
                block_number,
            })
        } else {
            None
        }
    }

    pub fn token_id(&self) -> U256 {
        match self {
            DatasetEvent::Minted { token_id, .. }
            | DatasetEvent::Used { token_id, .. }
            | DatasetEvent::Claimed { token_id, .. } => *token_id,
        }
    }
}

/// Polls the dataset contract for new events.
pub struct EventWatcher<P> {
    provider: P,
    contract: Address,
    poll_interval: Duration,
}

impl<P> EventWatcher<P>
where
    P: Provider + Send + Sync,
{
    pub fn new(provider: P, contract: Address) -> Self {
        Self {
            provider,
            contract,
            poll_interval: Duration::from_secs(10),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Fetch and decode events from `from_block` up to the current head.
    /// Returns the events and the block to start the next poll from.
    pub async fn poll_once(&self, from_block: u64) -> Result<(Vec<DatasetEvent>, u64), PaymentError> {
        let head = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| PaymentError::Rpc(format!("block number lookup failed: {e}")))?;

        if head < from_block {
            return Ok((vec![], from_block));
        }

        let filter = Filter::new()
            .address(self.contract)
            .from_block(from_block)
            .to_block(head);

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| PaymentError::Rpc(format!("get_logs failed: {e}")))?;

        let events = logs.iter().filter_map(DatasetEvent::decode_log).collect();
        Ok((events, head + 1))
    }

    /// Poll forever, handing each decoded event to `handler`. Only returns on
    /// an RPC error.
    pub async fn run<F>(&self, mut handler: F) -> Result<(), PaymentError>
    where
        F: FnMut(DatasetEvent),
    {
        let mut next_block = self
            .provider
            .get_block_number()
            .await
            .map_err(|e| PaymentError::Rpc(format!("block number lookup failed: {e}")))?;

        tracing::info!(contract = %self.contract, from_block = next_block, "event watcher started");

        let mut interval = tokio::time::interval(self.poll_interval);
        loop {
            interval.tick().await;
            let (events, next) = self.poll_once(next_block).await?;
            tracing::debug!(from_block = next_block, events = events.len(), "polled dataset events");
            for event in events {
                handler(event);
            }
            next_block = next;
        }
    }
}

/// Restart delay for the given 1-based attempt: 10s doubling per attempt,
/// capped at five minutes.
pub fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    INITIAL_RETRY_DELAY
        .saturating_mul(1u32 << exponent)
        .min(MAX_RETRY_DELAY)
}

/// Keep a watcher alive: whenever `start` fails, wait [`backoff_delay`] and
/// start it again. A clean exit resets the attempt counter. Never returns.
pub async fn run_with_backoff<F, Fut>(mut start: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), PaymentError>>,
{
    let mut attempt = 0u32;
    loop {
        tracing::info!(attempt = attempt + 1, "starting dataset event watcher");
        match start().await {
            Ok(()) => {
                tracing::warn!("event watcher exited unexpectedly, restarting");
                attempt = 0;
            }
            Err(e) => {
                attempt = attempt.saturating_add(1);
                let delay = backoff_delay(attempt);
                tracing::error!(
                    attempt,
                    error = %e,
                    retry_in_secs = delay.as_secs(),
                    "event watcher failed"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Log as PrimitiveLog, LogData};
    use alloy::providers::ProviderBuilder;
    use alloy::transports::mock::Asserter;
    use std::sync::{Arc, Mutex};

    fn rpc_log(data: LogData) -> Log {
        Log {
            inner: PrimitiveLog {
                address: crate::DATASET_CONTRACT,
                data,
            },
            block_number: Some(42),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_minted() {
        let event = DatasetNFTMinted {
            to: Address::repeat_byte(0x11),
            tokenId: U256::from(7u64),
            datasetId: "weather-2024".to_string(),
        };
        let log = rpc_log(event.encode_log_data());

        match DatasetEvent::decode_log(&log) {
            Some(DatasetEvent::Minted {
                to,
                token_id,
                dataset_id,
                block_number,
                ..
            }) => {
                assert_eq!(to, Address::repeat_byte(0x11));
                assert_eq!(token_id, U256::from(7u64));
                assert_eq!(dataset_id, "weather-2024");
                assert_eq!(block_number, Some(42));
            }
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn test_decode_used_and_claimed() {
        let used = DatasetUsed {
            tokenId: U256::from(3u64),
            user: Address::repeat_byte(0x22),
            amount: U256::from(150_000_000u64),
        };
        let decoded = DatasetEvent::decode_log(&rpc_log(used.encode_log_data())).unwrap();
        assert_eq!(decoded.token_id(), U256::from(3u64));
        assert!(matches!(decoded, DatasetEvent::Used { amount, .. } if amount == U256::from(150_000_000u64)));

        let claimed = AmountClaimed {
            tokenId: U256::from(4u64),
            owner: Address::repeat_byte(0x33),
            amount: U256::from(1u64),
        };
        let decoded = DatasetEvent::decode_log(&rpc_log(claimed.encode_log_data())).unwrap();
        assert!(matches!(decoded, DatasetEvent::Claimed { owner, .. } if owner == Address::repeat_byte(0x33)));
    }

    #[test]
    fn test_decode_ignores_unknown_topics() {
        let data = LogData::new_unchecked(vec![alloy::primitives::B256::repeat_byte(0xaa)], Default::default());
        assert!(DatasetEvent::decode_log(&rpc_log(data)).is_none());

        let empty = LogData::new_unchecked(vec![], Default::default());
        assert!(DatasetEvent::decode_log(&rpc_log(empty)).is_none());
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(10));
        assert_eq!(backoff_delay(2), Duration::from_secs(20));
        assert_eq!(backoff_delay(3), Duration::from_secs(40));
        assert_eq!(backoff_delay(5), Duration::from_secs(160));
        assert_eq!(backoff_delay(6), Duration::from_secs(300));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(300));
    }

    fn mocked_watcher(asserter: &Asserter) -> EventWatcher<impl Provider> {
        let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
        EventWatcher::new(provider, crate::DATASET_CONTRACT)
    }

    #[tokio::test]
    async fn test_poll_once_decodes_logs_and_advances() {
        let used = DatasetUsed {
            tokenId: U256::from(9u64),
            user: Address::repeat_byte(0x44),
            amount: U256::from(250_000_000u64),
        };
        let mut log = rpc_log(used.encode_log_data());
        log.transaction_hash = Some(TxHash::repeat_byte(0x55));
        let unknown = rpc_log(LogData::new_unchecked(
            vec![alloy::primitives::B256::repeat_byte(0xaa)],
            Default::default(),
        ));

        let asserter = Asserter::new();
        asserter.push_success(&"0x64");
        asserter.push_success(&vec![log, unknown]);
        let watcher = mocked_watcher(&asserter);

        let (events, next) = watcher.poll_once(90).await.unwrap();
        assert_eq!(next, 101);
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            DatasetEvent::Used { token_id, tx_hash, .. }
                if *token_id == U256::from(9u64) && *tx_hash == Some(TxHash::repeat_byte(0x55))
        ));
    }

    #[tokio::test]
    async fn test_poll_once_ahead_of_head_skips_log_query() {
        let asserter = Asserter::new();
        asserter.push_success(&"0x5");
        let watcher = mocked_watcher(&asserter);

        let (events, next) = watcher.poll_once(10).await.unwrap();
        assert!(events.is_empty());
        assert_eq!(next, 10);
    }

    #[tokio::test]
    async fn test_poll_once_maps_rpc_errors() {
        let asserter = Asserter::new();
        asserter.push_failure_msg("relay unavailable");
        let watcher = mocked_watcher(&asserter);

        let err = watcher.poll_once(0).await.unwrap_err();
        assert!(matches!(err, PaymentError::Rpc(ref msg) if msg.contains("block number")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_backoff_waits_between_restarts() {
        let starts = Arc::new(Mutex::new(Vec::new()));
        let origin = tokio::time::Instant::now();

        let recorded = Arc::clone(&starts);
        let supervisor = run_with_backoff(move || {
            recorded.lock().unwrap().push(origin.elapsed().as_secs());
            async { Err(PaymentError::Rpc("connection refused".to_string())) }
        });
        let _ = tokio::time::timeout(Duration::from_secs(75), supervisor).await;

        assert_eq!(
            *starts.lock().unwrap(),
            vec![0, 10, 30, 70]
        );
    }

    #[test]
    fn test_event_serializes_tagged() {
        let event = DatasetEvent::Claimed {
            token_id: U256::from(1u64),
            owner: Address::ZERO,
            amount: U256::from(2u64),
            tx_hash: None,
            block_number: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "claimed");
        assert!(json.get("tokenId").is_some());
    }
}
