use alloy_primitives::B256;
use boost_scalar::ScalarError;

/// Errors that can occur while fetching evidence from a node.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("{method} timed out after {after_ms}ms")]
    Timeout { method: &'static str, after_ms: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("transaction {0} not found")]
    NotFound(B256),

    #[error("chain id mismatch: expected {expected}, node reports {got}")]
    ChainMismatch { expected: u64, got: u64 },
}

impl FetchError {
    /// Timeouts and transport failures may succeed on retry; everything else
    /// will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Timeout { .. } | FetchError::Transport(_))
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Errors from resolving a scalar end to end.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Scalar(#[from] ScalarError),
}

impl ChainError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ChainError::Fetch(err) => err.is_retryable(),
            ChainError::Scalar(_) => false,
        }
    }
}

pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(FetchError::Timeout {
            method: "eth_getTransactionReceipt",
            after_ms: 10
        }
        .is_retryable());
        assert!(FetchError::Transport("connection refused".into()).is_retryable());
        assert!(!FetchError::Rpc("invalid params".into()).is_retryable());
        assert!(!FetchError::NotFound(B256::ZERO).is_retryable());
        assert!(!FetchError::ChainMismatch { expected: 1, got: 2 }.is_retryable());
    }

    #[test]
    fn test_scalar_errors_never_retry() {
        let err = ChainError::from(ScalarError::NoMatchingLogs(B256::ZERO));
        assert!(!err.is_retryable());
        let err = ChainError::from(FetchError::Transport("reset".into()));
        assert!(err.is_retryable());
    }
}
