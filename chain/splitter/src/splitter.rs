//! Splitter: custodial two-way payment splitting ledger
//!
//! A single payer deposits funds through `split`; each deposit is divided
//! evenly between two fixed beneficiaries and any odd unit is credited back
//! to the payer. Credited balances are claimed with `withdraw` (pull
//! payment), which stays available after the owner `close`s the ledger.
//!
//! All state-changing operations check, in order:
//! 1. Access control (where applicable)
//! 2. Lifecycle (not closed, where applicable)
//! 3. Argument validity
//!
//! and either apply fully and append one event, or fail with no change.

use std::collections::HashMap;
use tracing::{debug, info, warn};
use types::ids::Address;
use types::numeric::Amount;

use crate::config::DeploymentConfig;
use crate::errors::SplitterError;
use crate::events::{
    Closed, Created, EventLog, Notification, PayerChanged, SplitterEvent, Splitted, Withdraw,
};
use crate::payout::Payout;
use crate::security::{Lifecycle, Role, Roles};

/// Core splitter ledger.
///
/// A missing `balances` entry means zero; entries are removed on withdraw.
#[derive(Debug, Clone)]
pub struct Splitter {
    roles: Roles,
    lifecycle: Lifecycle,
    /// Withdrawable amount per holder
    balances: HashMap<Address, Amount>,
    /// Cumulative split deposits
    total_deposited: Amount,
    /// Cumulative withdrawals
    total_withdrawn: Amount,
    /// Emitted events log (append-only)
    events: EventLog,
}

impl Splitter {
    /// Create a ledger owned by `owner`.
    ///
    /// Every role must be non-zero and the beneficiaries must differ.
    /// Emits `Created`.
    pub fn new(
        owner: Address,
        payer: Address,
        first_beneficiary: Address,
        second_beneficiary: Address,
    ) -> Result<Self, SplitterError> {
        let roles = Roles::new(owner, payer, first_beneficiary, second_beneficiary)?;

        let mut splitter = Self {
            roles,
            lifecycle: Lifecycle::new(),
            balances: HashMap::new(),
            total_deposited: Amount::ZERO,
            total_withdrawn: Amount::ZERO,
            events: EventLog::new(),
        };

        splitter.events.emit(SplitterEvent::Created(Created {
            owner,
            payer,
            first_beneficiary,
            second_beneficiary,
        }));

        info!(
            %owner,
            %payer,
            %first_beneficiary,
            %second_beneficiary,
            "Splitter created"
        );
        Ok(splitter)
    }

    /// Create a ledger from a deployment config.
    pub fn deploy(config: &DeploymentConfig) -> Result<Self, SplitterError> {
        Self::new(
            config.owner,
            config.payer,
            config.first_beneficiary,
            config.second_beneficiary,
        )
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Rotate the payer. Owner-only, open ledger only.
    ///
    /// Emits `PayerChanged`.
    pub fn set_payer(
        &mut self,
        caller: Address,
        new_payer: Address,
    ) -> Result<Notification, SplitterError> {
        self.roles
            .ensure(&caller, Role::Owner)
            .and_then(|_| self.lifecycle.ensure_open())
            .map_err(|e| rejected("set_payer", caller, e))?;

        let previous = self
            .roles
            .replace_payer(new_payer)
            .map_err(|e| rejected("set_payer", caller, e))?;

        let record = self
            .events
            .emit(SplitterEvent::PayerChanged(PayerChanged { new_payer }));

        info!(%previous, %new_payer, "Payer changed");
        Ok(record)
    }

    /// Permanently close the ledger to deposits. Owner-only.
    ///
    /// Balances are untouched and stay withdrawable. Emits `Closed`.
    pub fn close(&mut self, caller: Address) -> Result<Notification, SplitterError> {
        self.roles
            .ensure(&caller, Role::Owner)
            .map_err(|e| rejected("close", caller, e))?;

        if !self.lifecycle.close() {
            return Err(rejected("close", caller, SplitterError::AlreadyClosed));
        }

        let record = self.events.emit(SplitterEvent::Closed(Closed { caller }));

        info!(%caller, "Splitter closed");
        Ok(record)
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Deposit `value` and divide it. Payer-only, open ledger only.
    ///
    /// Each beneficiary is credited `half = (value - value % 2) / 2` and the
    /// payer is credited the remainder, so no unit is lost. Crediting zero is
    /// legal (a deposit of 1 credits only the payer). Emits `Splitted`
    /// carrying `half`.
    pub fn split(&mut self, caller: Address, value: Amount) -> Result<Notification, SplitterError> {
        self.roles
            .ensure(&caller, Role::Payer)
            .and_then(|_| self.lifecycle.ensure_open())
            .map_err(|e| rejected("split", caller, e))?;

        if value.is_zero() {
            return Err(rejected("split", caller, SplitterError::InvalidAmount));
        }

        // Every balance is bounded by cumulative deposits, so once this sum
        // fits, none of the credits below can overflow.
        let total_deposited = self
            .total_deposited
            .checked_add(value)
            .ok_or_else(|| rejected("split", caller, SplitterError::Overflow))?;

        let (half, remainder) = value.halve();
        let first_beneficiary = self.roles.first_beneficiary();
        let second_beneficiary = self.roles.second_beneficiary();

        self.credit(first_beneficiary, half)?;
        self.credit(second_beneficiary, half)?;
        self.credit(caller, remainder)?;
        self.total_deposited = total_deposited;

        let record = self.events.emit(SplitterEvent::Splitted(Splitted {
            first_beneficiary,
            second_beneficiary,
            half,
        }));

        info!(
            payer = %caller,
            %value,
            %half,
            %remainder,
            "Deposit split"
        );
        Ok(record)
    }

    /// Direct value transfer outside `split`. Always fails.
    ///
    /// Untracked deposits would break balance conservation.
    pub fn receive(&mut self, caller: Address, value: Amount) -> Result<Notification, SplitterError> {
        debug!(%caller, %value, "Direct transfer attempted");
        Err(rejected("receive", caller, SplitterError::UnsupportedOperation))
    }

    // ───────────────────────── Withdraw ─────────────────────────

    /// Pay out the caller's entire balance through `payout`.
    ///
    /// Works whether or not the ledger is closed. The balance is zeroed
    /// before `payout` runs, so a payout that re-enters `withdraw` for the
    /// same caller sees nothing left. Operations the payout performs
    /// re-entrantly are independent and stay committed. If the payout
    /// refuses, only this call's debit is undone: the amount is credited
    /// back to the caller and `total_withdrawn` reverts. Emits `Withdraw`
    /// once the payout has succeeded.
    pub fn withdraw<P>(
        &mut self,
        caller: Address,
        payout: &mut P,
    ) -> Result<Notification, SplitterError>
    where
        P: Payout + ?Sized,
    {
        let amount = self.balance_of(&caller);
        if amount.is_zero() {
            return Err(rejected(
                "withdraw",
                caller,
                SplitterError::NothingToWithdraw { account: caller },
            ));
        }

        let total_withdrawn = self
            .total_withdrawn
            .checked_add(amount)
            .ok_or_else(|| rejected("withdraw", caller, SplitterError::Overflow))?;

        // Zero before paying out: a re-entrant withdraw must find nothing.
        self.balances.remove(&caller);
        self.total_withdrawn = total_withdrawn;

        if let Err(refusal) = payout.pay(self, caller, amount) {
            self.revert_debit(caller, amount)?;
            warn!(%caller, %amount, reason = %refusal, "Payout refused, withdrawal reverted");
            return Err(SplitterError::TransferFailed {
                account: caller,
                reason: refusal.reason,
            });
        }

        let record = self.events.emit(SplitterEvent::Withdraw(Withdraw {
            account: caller,
            amount,
        }));

        info!(%caller, %amount, "Balance withdrawn");
        Ok(record)
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn owner(&self) -> Address {
        self.roles.owner()
    }

    pub fn payer(&self) -> Address {
        self.roles.payer()
    }

    pub fn first_beneficiary(&self) -> Address {
        self.roles.first_beneficiary()
    }

    pub fn second_beneficiary(&self) -> Address {
        self.roles.second_beneficiary()
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Withdrawable balance of `account` (zero if never credited).
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn total_deposited(&self) -> Amount {
        self.total_deposited
    }

    pub fn total_withdrawn(&self) -> Amount {
        self.total_withdrawn
    }

    /// Sum of all balances. Walks every entry; for audits, not hot paths.
    pub fn total_balance(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(*amount))
    }

    /// True when balances sum to deposits minus withdrawals.
    pub fn is_conserved(&self) -> bool {
        let outstanding = self.total_deposited.checked_sub(self.total_withdrawn);
        outstanding.is_some() && outstanding == self.total_balance()
    }

    // ───────────────────────── Events ─────────────────────────

    /// All events not yet drained.
    pub fn events(&self) -> &[Notification] {
        self.events.records()
    }

    /// Events with `sequence >= from`.
    pub fn events_since(&self, from: u64) -> Vec<Notification> {
        self.events.since(from).cloned().collect()
    }

    /// Events whose indexed identity fields include `address`.
    pub fn events_involving(&self, address: Address) -> Vec<Notification> {
        self.events.involving(address).cloned().collect()
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<Notification> {
        self.events.drain()
    }

    // ───────────────────────── Internal ─────────────────────────

    fn credit(&mut self, account: Address, amount: Amount) -> Result<(), SplitterError> {
        if amount.is_zero() {
            return Ok(());
        }
        let current = self.balances.entry(account).or_insert(Amount::ZERO);
        *current = current.checked_add(amount).ok_or(SplitterError::Overflow)?;
        debug!(%account, %amount, balance = %current, "Balance credited");
        Ok(())
    }

    /// Undo one withdrawal debit after its payout was refused.
    ///
    /// Adds back rather than overwrites, since the payout may have credited
    /// `account` re-entrantly in the meantime.
    fn revert_debit(&mut self, account: Address, amount: Amount) -> Result<(), SplitterError> {
        self.total_withdrawn = self
            .total_withdrawn
            .checked_sub(amount)
            .ok_or(SplitterError::Overflow)?;
        self.credit(account, amount)
    }
}

fn rejected(operation: &'static str, caller: Address, err: SplitterError) -> SplitterError {
    warn!(operation, %caller, error = %err, "Operation rejected");
    err
}
