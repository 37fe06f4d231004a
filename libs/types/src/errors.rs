//! Error types for the shared value types
//!
//! Parsing and conversion failures for addresses and amounts, using thiserror

use thiserror::Error;

/// Value-type errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypesError {
    #[error("Invalid address {input}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Invalid amount {input}: {reason}")]
    InvalidAmount { input: String, reason: String },

    #[error("Invalid ether amount {value}: {reason}")]
    InvalidEtherAmount { value: String, reason: String },

    #[error("Amount overflow")]
    AmountOverflow,
}
