//! Splitter contract logic
//!
//! A custodial ledger that divides each deposit from a single payer between
//! two fixed beneficiaries, who withdraw their shares independently.
//!
//! # Modules
//! - `splitter`: The ledger state machine (split, withdraw, set_payer, close)
//! - `security`: Role assignments and the one-way lifecycle guard
//! - `events`: Contract events and the sequenced event log
//! - `errors`: Contract-specific error types
//! - `payout`: Outbound transfer seam for withdrawals
//! - `call`: Typed call dispatch for hosts
//! - `config`: Deployment configuration
//!
//! The library logs through `tracing` and never installs a subscriber.

pub mod call;
pub mod config;
pub mod errors;
pub mod events;
pub mod payout;
pub mod security;
pub mod splitter;

pub use crate::splitter::Splitter;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
