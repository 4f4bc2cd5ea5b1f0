//! Submission state for one buyer session.
//!
//! A [`PaymentSession`] holds at most one submission at a time. `submit`
//! returns right away; a background task drives the state through
//! Pending -> Confirming -> Succeeded/Failed and publishes every step on a
//! watch channel. `reset` bumps a generation counter so that results of
//! work started earlier are dropped instead of overwriting the new state.
//! A transaction that was already broadcast is not cancelled.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use tokio::sync::watch;

use crate::payment::{assemble, ContractCall, PaymentData};
use crate::sender::{PaymentReceipt, TransactionSender};
use crate::units::format_units;
use crate::{PaymentError, AMOUNT_DECIMALS};

/// Lifecycle of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionState {
    Idle,
    /// Waiting for the wallet to sign and broadcast.
    Pending,
    /// Broadcast, waiting for inclusion.
    Confirming,
    Succeeded,
    Failed,
}

impl SubmissionState {
    pub fn is_settled(&self) -> bool {
        matches!(self, SubmissionState::Succeeded | SubmissionState::Failed)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, SubmissionState::Pending | SubmissionState::Confirming)
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionSnapshot {
    pub state: SubmissionState,
    pub tx_hash: Option<TxHash>,
    pub receipt: Option<PaymentReceipt>,
    pub error: Option<PaymentError>,
}

impl SubmissionSnapshot {
    pub fn idle() -> Self {
        Self {
            state: SubmissionState::Idle,
            tx_hash: None,
            receipt: None,
            error: None,
        }
    }

    fn pending() -> Self {
        Self {
            state: SubmissionState::Pending,
            ..Self::idle()
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == SubmissionState::Pending
    }

    pub fn is_confirming(&self) -> bool {
        self.state == SubmissionState::Confirming
    }

    pub fn is_success(&self) -> bool {
        self.state == SubmissionState::Succeeded
    }
}

impl Default for SubmissionSnapshot {
    fn default() -> Self {
        Self::idle()
    }
}

/// Dataset payment session: assembles calls, submits them through a
/// [`TransactionSender`] and exposes the resulting state.
pub struct PaymentSession<S> {
    sender: Arc<S>,
    contract: Address,
    state: Arc<watch::Sender<SubmissionSnapshot>>,
    generation: Arc<AtomicU64>,
}

impl<S> PaymentSession<S>
where
    S: TransactionSender + 'static,
{
    pub fn new(sender: S, contract: Address) -> Self {
        Self::with_shared_sender(Arc::new(sender), contract)
    }

    /// Build a session over a sender that other sessions also use.
    pub fn with_shared_sender(sender: Arc<S>, contract: Address) -> Self {
        let (state, _) = watch::channel(SubmissionSnapshot::idle());
        Self {
            sender,
            contract,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn contract(&self) -> Address {
        self.contract
    }

    /// Pay for the selected datasets in one transaction.
    ///
    /// Clears the previous submission, then validates and assembles the call.
    /// Validation errors are returned here and nothing is sent. Once the call
    /// is handed to [`submit`](Self::submit), further failures only show up
    /// in [`current_state`](Self::current_state).
    pub fn pay_for_datasets(&self, data: &PaymentData) -> Result<(), PaymentError> {
        self.reset();

        let call = match assemble(self.contract, data) {
            Ok(call) => call,
            Err(e) => {
                tracing::error!(error = %e, "payment failed");
                return Err(e);
            }
        };

        tracing::info!(
            datasets = call.token_ids.len(),
            total = %format_units(call.total_units(), AMOUNT_DECIMALS),
            value = %call.value,
            "submitting dataset payment"
        );

        self.submit(call);
        Ok(())
    }

    /// Dispatch a composed call without waiting for it.
    ///
    /// Prior hash, receipt and error are cleared before the call goes out.
    /// Outside a tokio runtime nothing is sent and the session goes straight
    /// to Failed.
    pub fn submit(&self, call: ContractCall) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                let error = PaymentError::DispatchFailure(format!("no async runtime: {e}"));
                tracing::error!(error = %error, "payment dispatch failed");
                self.state.send_replace(SubmissionSnapshot {
                    state: SubmissionState::Failed,
                    error: Some(error),
                    ..SubmissionSnapshot::idle()
                });
                return;
            }
        };
        self.state.send_replace(SubmissionSnapshot::pending());

        let sender = Arc::clone(&self.sender);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        runtime.spawn(async move {
            // Apply `update` only if no reset or newer submit happened since.
            let publish = |update: &dyn Fn(&mut SubmissionSnapshot)| {
                state.send_if_modified(|snapshot| {
                    if current.load(Ordering::SeqCst) != generation {
                        return false;
                    }
                    update(snapshot);
                    true
                })
            };

            let hash = match sender.write_contract(&call).await {
                Ok(hash) => hash,
                Err(e) => {
                    tracing::error!(error = %e, "payment dispatch failed");
                    publish(&|s: &mut SubmissionSnapshot| {
                        s.state = SubmissionState::Failed;
                        s.error = Some(e.clone());
                    });
                    return;
                }
            };

            tracing::info!(tx = %hash, "payment broadcast, awaiting receipt");
            if !publish(&|s: &mut SubmissionSnapshot| {
                s.state = SubmissionState::Confirming;
                s.tx_hash = Some(hash);
            }) {
                tracing::debug!(tx = %hash, "session was reset, discarding result");
                return;
            }

            match sender.wait_for_receipt(hash).await {
                Ok(receipt) => {
                    tracing::info!(
                        tx = %hash,
                        block = ?receipt.block_number,
                        gas_used = receipt.gas_used,
                        "payment confirmed"
                    );
                    publish(&|s: &mut SubmissionSnapshot| {
                        s.state = SubmissionState::Succeeded;
                        s.receipt = Some(receipt.clone());
                    });
                }
                Err(e) => {
                    tracing::error!(tx = %hash, error = %e, "payment receipt failed");
                    publish(&|s: &mut SubmissionSnapshot| {
                        s.state = SubmissionState::Failed;
                        s.error = Some(e.clone());
                    });
                }
            }
        });
    }

    /// Latest known state.
    pub fn current_state(&self) -> SubmissionSnapshot {
        self.state.borrow().clone()
    }

    /// Back to Idle. Anything still in flight keeps running but its outcome
    /// is ignored.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(SubmissionSnapshot::idle());
    }

    /// Watch state changes.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionSnapshot> {
        self.state.subscribe()
    }

    /// Wait until the current submission succeeds or fails. Returns the Idle
    /// snapshot if the session is (or gets) reset first.
    pub async fn wait_settled(&self) -> SubmissionSnapshot {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(|s| !s.state.is_in_flight()).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.current_state(),
        };
        settled
    }
}
