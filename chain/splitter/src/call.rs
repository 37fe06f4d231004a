//! Typed call dispatch
//!
//! Hosts that receive transactions as data (JSON, journal replay) decode them
//! into [`Call`] and hand them to [`Splitter::execute`]. A bare value
//! transfer is its own variant and always lands on the fallback.

use serde::{Deserialize, Serialize};
use types::ids::Address;
use types::numeric::Amount;

use crate::errors::SplitterError;
use crate::events::Notification;
use crate::payout::Payout;
use crate::splitter::Splitter;

/// One ledger invocation, without its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    SetPayer { new_payer: Address },
    Split { value: Amount },
    Withdraw,
    Close,
    /// Value sent without naming an operation
    Transfer { value: Amount },
}

/// A call together with its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: Address,
    #[serde(flatten)]
    pub call: Call,
}

impl Splitter {
    /// Route `call` from `caller` to the matching operation.
    pub fn execute<P>(
        &mut self,
        caller: Address,
        call: &Call,
        payout: &mut P,
    ) -> Result<Notification, SplitterError>
    where
        P: Payout + ?Sized,
    {
        match call {
            Call::SetPayer { new_payer } => self.set_payer(caller, *new_payer),
            Call::Split { value } => self.split(caller, *value),
            Call::Withdraw => self.withdraw(caller, payout),
            Call::Close => self.close(caller),
            Call::Transfer { value } => self.receive(caller, *value),
        }
    }

    /// Execute a decoded transaction.
    pub fn apply<P>(
        &mut self,
        tx: &Transaction,
        payout: &mut P,
    ) -> Result<Notification, SplitterError>
    where
        P: Payout + ?Sized,
    {
        self.execute(tx.from, &tx.call, payout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SplitterEvent;
    use crate::payout::Wallet;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn setup() -> Splitter {
        Splitter::new(addr(1), addr(2), addr(3), addr(4)).unwrap()
    }

    #[test]
    fn test_execute_routes_each_call() {
        let mut splitter = setup();
        let mut wallet = Wallet::new();

        splitter
            .execute(addr(2), &Call::Split { value: Amount::from_wei(6) }, &mut wallet)
            .unwrap();
        splitter.execute(addr(3), &Call::Withdraw, &mut wallet).unwrap();
        splitter
            .execute(addr(1), &Call::SetPayer { new_payer: addr(5) }, &mut wallet)
            .unwrap();
        let record = splitter.execute(addr(1), &Call::Close, &mut wallet).unwrap();

        assert!(matches!(record.event, SplitterEvent::Closed(_)));
        assert_eq!(wallet.balance_of(&addr(3)), Amount::from_wei(3));
        assert_eq!(splitter.payer(), addr(5));
    }

    #[test]
    fn test_transfer_hits_fallback() {
        let mut splitter = setup();
        let mut wallet = Wallet::new();
        let result = splitter.execute(
            addr(2),
            &Call::Transfer { value: Amount::from_wei(6) },
            &mut wallet,
        );
        assert_eq!(result, Err(SplitterError::UnsupportedOperation));
    }

    #[test]
    fn test_transaction_json() {
        let raw = r#"{"from":"0x0000000000000000000000000000000000000002","op":"split","value":"11"}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.call, Call::Split { value: Amount::from_wei(11) });

        let mut splitter = setup();
        let mut wallet = Wallet::new();
        splitter.apply(&tx, &mut wallet).unwrap();
        assert_eq!(splitter.balance_of(&addr(3)), Amount::from_wei(5));
        assert_eq!(splitter.balance_of(&addr(2)), Amount::from_wei(1));
    }

    #[test]
    fn test_unit_call_json() {
        let raw = r#"{"from":"0x0000000000000000000000000000000000000001","op":"close"}"#;
        let tx: Transaction = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.call, Call::Close);
    }
}
