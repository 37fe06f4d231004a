//! Contract events
//!
//! Events are immutable records appended by successful ledger operations.
//! Exactly one event is appended per successful state change; failed
//! operations append nothing.

use serde::{Deserialize, Serialize};
use types::ids::Address;
use types::numeric::Amount;

/// Ledger created with its initial roles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    pub owner: Address,
    pub payer: Address,
    pub first_beneficiary: Address,
    pub second_beneficiary: Address,
}

/// Payer rotated by the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayerChanged {
    pub new_payer: Address,
}

/// Deposit divided between the beneficiaries.
///
/// `half` is the amount credited to each beneficiary, not the raw deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Splitted {
    pub first_beneficiary: Address,
    pub second_beneficiary: Address,
    pub half: Amount,
}

/// Balance paid out to its holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub account: Address,
    pub amount: Amount,
}

/// Ledger permanently closed to deposits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Closed {
    pub caller: Address,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "args")]
pub enum SplitterEvent {
    Created(Created),
    PayerChanged(PayerChanged),
    Splitted(Splitted),
    Withdraw(Withdraw),
    Closed(Closed),
}

impl SplitterEvent {
    /// Stable log name, shared with off-ledger indexers.
    pub fn name(&self) -> &'static str {
        match self {
            SplitterEvent::Created(_) => "LogCreation",
            SplitterEvent::PayerChanged(_) => "LogPayerChanged",
            SplitterEvent::Splitted(_) => "LogSplitted",
            SplitterEvent::Withdraw(_) => "LogWithdraw",
            SplitterEvent::Closed(_) => "LogClosed",
        }
    }

    /// Identity fields an observer can filter on.
    pub fn indexed_addresses(&self) -> Vec<Address> {
        match self {
            SplitterEvent::Created(e) => vec![
                e.owner,
                e.payer,
                e.first_beneficiary,
                e.second_beneficiary,
            ],
            SplitterEvent::PayerChanged(e) => vec![e.new_payer],
            SplitterEvent::Splitted(e) => vec![e.first_beneficiary, e.second_beneficiary],
            SplitterEvent::Withdraw(e) => vec![e.account],
            SplitterEvent::Closed(e) => vec![e.caller],
        }
    }
}

/// A sequenced event record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Position in the log, starting at 0 for `Created`
    pub sequence: u64,
    pub event: SplitterEvent,
}

/// Append-only event log with a monotonic sequence.
///
/// Draining hands records to an observer but never rewinds the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    records: Vec<Notification>,
    next_sequence: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event and return its record.
    pub fn emit(&mut self, event: SplitterEvent) -> Notification {
        let record = Notification {
            sequence: self.next_sequence,
            event,
        };
        self.next_sequence += 1;
        self.records.push(record.clone());
        record
    }

    pub fn records(&self) -> &[Notification] {
        &self.records
    }

    /// Records with `sequence >= from`.
    pub fn since(&self, from: u64) -> impl Iterator<Item = &Notification> {
        self.records.iter().filter(move |r| r.sequence >= from)
    }

    /// Records whose indexed identity fields include `address`.
    pub fn involving(&self, address: Address) -> impl Iterator<Item = &Notification> {
        self.records
            .iter()
            .filter(move |r| r.event.indexed_addresses().contains(&address))
    }

    /// Drain all records (consume and clear).
    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_splitted_serialization() {
        let event = SplitterEvent::Splitted(Splitted {
            first_beneficiary: addr(3),
            second_beneficiary: addr(4),
            half: Amount::from_wei(5),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "Splitted");
        assert_eq!(json["args"]["half"], "5");

        let deser: SplitterEvent = serde_json::from_value(json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_event_names() {
        let closed = SplitterEvent::Closed(Closed { caller: addr(1) });
        assert_eq!(closed.name(), "LogClosed");
        let changed = SplitterEvent::PayerChanged(PayerChanged { new_payer: addr(2) });
        assert_eq!(changed.name(), "LogPayerChanged");
    }

    #[test]
    fn test_sequence_survives_drain() {
        let mut log = EventLog::new();
        log.emit(SplitterEvent::Closed(Closed { caller: addr(1) }));
        log.emit(SplitterEvent::Closed(Closed { caller: addr(1) }));

        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.records().is_empty());

        let next = log.emit(SplitterEvent::Closed(Closed { caller: addr(1) }));
        assert_eq!(next.sequence, 2);
    }

    #[test]
    fn test_since_and_involving() {
        let mut log = EventLog::new();
        log.emit(SplitterEvent::PayerChanged(PayerChanged { new_payer: addr(2) }));
        log.emit(SplitterEvent::Withdraw(Withdraw {
            account: addr(3),
            amount: Amount::from_wei(10),
        }));
        log.emit(SplitterEvent::Withdraw(Withdraw {
            account: addr(4),
            amount: Amount::from_wei(10),
        }));

        assert_eq!(log.since(1).count(), 2);
        let for_three: Vec<_> = log.involving(addr(3)).collect();
        assert_eq!(for_three.len(), 1);
        assert_eq!(for_three[0].sequence, 1);
    }
}
