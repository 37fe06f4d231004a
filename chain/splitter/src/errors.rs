//! Contract-specific error types
//!
//! Every rejected ledger operation maps to exactly one variant here, and a
//! rejection never leaves partial state behind.

use std::io;
use thiserror::Error;
use types::ids::Address;

use crate::security::Role;

/// Ledger operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitterError {
    #[error("Unauthorized: {caller} is not the {required}")]
    Unauthorized { caller: Address, required: Role },

    #[error("Splitter is already closed")]
    AlreadyClosed,

    #[error("Invalid {role}: {reason}")]
    InvalidRole { role: Role, reason: String },

    #[error("Split amount must be positive")]
    InvalidAmount,

    #[error("Nothing to withdraw for {account}")]
    NothingToWithdraw { account: Address },

    #[error("Unsupported operation: funds are only accepted through split")]
    UnsupportedOperation,

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Transfer of withdrawn funds to {account} failed: {reason}")]
    TransferFailed { account: Address, reason: String },
}

impl SplitterError {
    pub(crate) fn zero_role(role: Role) -> Self {
        SplitterError::InvalidRole {
            role,
            reason: "zero address".to_string(),
        }
    }
}

/// Deployment configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Deployment rejected: {0}")]
    Deploy(#[from] SplitterError),
}
