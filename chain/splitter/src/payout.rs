//! Payout: the outbound side of a withdrawal
//!
//! The ledger never holds a reference to external accounts. `withdraw` hands
//! the amount to a [`Payout`] implementation after the caller's balance has
//! been zeroed. The payout gets mutable access to the ledger so it can model
//! a recipient that calls back in, which is exactly the re-entry the
//! zero-before-transfer ordering defends against.

use std::collections::HashMap;
use thiserror::Error;
use types::ids::Address;
use types::numeric::Amount;

use crate::splitter::Splitter;

/// Refusal reported by a payout
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{reason}")]
pub struct PayoutRejected {
    pub reason: String,
}

impl PayoutRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Moves withdrawn funds to their recipient.
pub trait Payout {
    fn pay(
        &mut self,
        ledger: &mut Splitter,
        to: Address,
        amount: Amount,
    ) -> Result<(), PayoutRejected>;
}

impl<F> Payout for F
where
    F: FnMut(&mut Splitter, Address, Amount) -> Result<(), PayoutRejected>,
{
    fn pay(
        &mut self,
        ledger: &mut Splitter,
        to: Address,
        amount: Amount,
    ) -> Result<(), PayoutRejected> {
        self(ledger, to, amount)
    }
}

/// In-memory external funds, one entry per recipient.
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    funds: HashMap<Address, Amount>,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// External funds held by `account`.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.funds.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Total paid out across all recipients.
    pub fn total(&self) -> Option<Amount> {
        self.funds
            .values()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(*amount))
    }
}

impl Payout for Wallet {
    fn pay(
        &mut self,
        _ledger: &mut Splitter,
        to: Address,
        amount: Amount,
    ) -> Result<(), PayoutRejected> {
        let current = self.funds.entry(to).or_insert(Amount::ZERO);
        *current = current
            .checked_add(amount)
            .ok_or_else(|| PayoutRejected::new("recipient balance overflow"))?;
        Ok(())
    }
}
