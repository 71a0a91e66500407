//! Error types for dstore

use thiserror::Error;

/// Result type alias for dstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for transactional operations
///
/// A commit conflict is not an error: `commit()` reports it by returning
/// `false` and the caller decides whether to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// `begin()` was called while the session already has an open transaction
    #[error("Transaction already in progress")]
    TransactionAlreadyActive,

    /// `commit()` or `rollback()` was called with no open transaction
    #[error("No active transaction")]
    NoActiveTransaction,

    /// Every attempt of a retried transaction lost its commit race
    #[error("Transaction conflicted on all {attempts} attempts")]
    RetriesExhausted {
        /// Number of commit attempts made
        attempts: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::TransactionAlreadyActive.to_string(),
            "Transaction already in progress"
        );
        assert_eq!(Error::NoActiveTransaction.to_string(), "No active transaction");
        assert_eq!(
            Error::RetriesExhausted { attempts: 3 }.to_string(),
            "Transaction conflicted on all 3 attempts"
        );
    }
}
