use thiserror::Error;

/// Errors returned by dataset payment operations.
///
/// `InvalidRequest`, `EmptyRequest` and `Overflow` are raised synchronously,
/// before anything reaches the network. `DispatchFailure` and `ReceiptFailure`
/// are recorded in the session snapshot instead of being returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("at least one dataset must be selected")]
    EmptyRequest,

    #[error("amount overflow: {0}")]
    Overflow(String),

    #[error("dispatch failed: {0}")]
    DispatchFailure(String),

    #[error("receipt failed: {0}")]
    ReceiptFailure(String),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("config error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Whether this error was raised before any network effect.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidRequest(_) | PaymentError::EmptyRequest | PaymentError::Overflow(_)
        )
    }
}
