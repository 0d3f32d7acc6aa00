//! Error types for the retail bank
//!
//! This module provides a unified error type for the account models and the
//! bank service. Every failure the core reports is one of these variants and
//! every one of them is recoverable: the caller reports it and may retry.

use std::fmt::Display;
use thiserror::Error;

/// Retail bank error type
#[derive(Debug, Error)]
pub enum Error {
    /// Amount is zero, negative or otherwise unusable for the operation
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Withdrawal exceeds the account balance
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Opening balance below the variant's minimum
    #[error("Minimum balance not met: {0}")]
    MinimumBalance(String),

    /// Error when a customer cannot be found
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Error when an account cannot be found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Customer id already registered
    #[error("Duplicate customer: {0}")]
    DuplicateCustomer(String),

    /// Account number already in use
    #[error("Duplicate account: {0}")]
    DuplicateAccount(String),

    /// Generic validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Decimal conversion error
    #[error("Decimal conversion error: {0}")]
    DecimalError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait to add context to error results
pub trait ErrorExt<T> {
    /// Add context information to an error
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display;
}

impl<T> ErrorExt<T> for Result<T> {
    fn with_context<C, F>(self, context_fn: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Display,
    {
        self.map_err(|e| {
            let context = context_fn().to_string();
            match e {
                Error::InvalidAmount(msg) => Error::InvalidAmount(format!("{}: {}", context, msg)),
                Error::InsufficientFunds(msg) => Error::InsufficientFunds(format!("{}: {}", context, msg)),
                Error::MinimumBalance(msg) => Error::MinimumBalance(format!("{}: {}", context, msg)),
                Error::CustomerNotFound(msg) => Error::CustomerNotFound(format!("{}: {}", context, msg)),
                Error::AccountNotFound(msg) => Error::AccountNotFound(format!("{}: {}", context, msg)),
                Error::DuplicateCustomer(msg) => Error::DuplicateCustomer(format!("{}: {}", context, msg)),
                Error::DuplicateAccount(msg) => Error::DuplicateAccount(format!("{}: {}", context, msg)),
                Error::ValidationError(msg) => Error::ValidationError(format!("{}: {}", context, msg)),
                Error::ConfigurationError(msg) => Error::ConfigurationError(format!("{}: {}", context, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context, msg)),
                Error::Serialization(e) => Error::Serialization(e),
                Error::DecimalError(msg) => Error::DecimalError(format!("{}: {}", context, msg)),
            }
        })
    }
}

/// From rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::DecimalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_keeps_variant() {
        let result: Result<()> = Err(Error::AccountNotFound("SAV009".to_string()));
        let err = result.with_context(|| "Deposit failed").unwrap_err();

        match err {
            Error::AccountNotFound(msg) => assert_eq!(msg, "Deposit failed: SAV009"),
            other => panic!("Expected AccountNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_decimal_error_conversion() {
        let parsed: std::result::Result<rust_decimal::Decimal, _> = "12.5.3".parse();
        let err: Error = parsed.unwrap_err().into();
        assert!(matches!(err, Error::DecimalError(_)));
    }
}
