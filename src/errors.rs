//! Error types for the wager settlement core
//!
//! Every failure aborts the enclosing call with no partial effect and is
//! surfaced to the caller as a typed variant. Nothing is retried internally.

use crate::common::types::{AccountId, Amount, AssetType};

/// Root error type for all settlement operations
#[derive(Debug, thiserror::Error)]
pub enum WagerError {
    #[error("Vault already exists in {namespace} namespace for owner {owner}")]
    VaultAlreadyExists { namespace: &'static str, owner: AccountId },

    #[error("No vault in {namespace} namespace for owner {owner}")]
    VaultNotFound { namespace: &'static str, owner: AccountId },

    #[error("Insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: AccountId,
        required: Amount,
        available: Amount,
    },

    #[error("Bet of {amount} exceeds maximum {maximum}")]
    BetExceedsMaximum { amount: Amount, maximum: Amount },

    #[error("Payout of {payout} exceeds maximum {maximum}")]
    PayoutExceedsMaximum { payout: Amount, maximum: Amount },

    #[error("Too many chosen numbers: {count} (max {max})")]
    TooManyChoices { count: usize, max: usize },

    #[error("At least one number must be chosen")]
    ZeroChoices,

    #[error("Chosen number {number} is not on a wheel of {wheel_size}")]
    NumberOffWheel { number: u64, wheel_size: u64 },

    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] LedgerError),

    #[error("Randomness error: {0}")]
    Randomness(#[from] RandomnessError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Failures reported by a ledger while executing transfers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Account {account} is not registered for {asset}")]
    NotRegistered { account: AccountId, asset: AssetType },

    #[error("Account {account} holds {available} {asset}, needs {required}")]
    InsufficientBalance {
        account: AccountId,
        asset: AssetType,
        required: Amount,
        available: Amount,
    },

    #[error("Custody account {0} can only be debited with its vault capability")]
    CustodyViolation(AccountId),

    #[error("Balance overflow on {0}")]
    BalanceOverflow(AccountId),

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Failures reported by a randomness source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RandomnessError {
    #[error("Empty range: upper bound must be > 0")]
    EmptyRange,

    #[error("Randomness source exhausted")]
    Exhausted,

    #[error("VRF failure: {0}")]
    Vrf(String),
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

/// Convenience type alias for Results
pub type WagerResult<T> = Result<T, WagerError>;

pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let error = WagerError::TooManyChoices { count: 38, max: 37 };
        assert!(error.to_string().contains("38"));
        assert!(error.to_string().contains("max 37"));

        let error = WagerError::NumberOffWheel { number: 40, wheel_size: 37 };
        assert_eq!(error.to_string(), "Chosen number 40 is not on a wheel of 37");
    }

    #[test]
    fn test_ledger_error_propagates_unchanged() {
        let ledger_error = LedgerError::CustodyViolation(AccountId::new("custody:00"));
        let error: WagerError = ledger_error.clone().into();

        match error {
            WagerError::TransferFailed(inner) => assert_eq!(inner, ledger_error),
            _ => panic!("Expected transfer failure"),
        }
    }

    #[test]
    fn test_error_source() {
        let error: WagerError = RandomnessError::EmptyRange.into();
        assert!(error.source().is_some());
    }
}
