//! Role-based access control and lifecycle gating
//!
//! The ledger has four fixed role slots. Only the payer slot is mutable, and
//! only the owner may rotate it. The lifecycle guard is one-way: once closed,
//! it stays closed.

use serde::{Deserialize, Serialize};
use std::fmt;
use types::ids::Address;

use crate::errors::SplitterError;

/// Access control roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Administrative control: rotate payer, close
    Owner,
    /// Allowed to deposit funds through split
    Payer,
    FirstBeneficiary,
    SecondBeneficiary,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Owner => "owner",
            Role::Payer => "payer",
            Role::FirstBeneficiary => "first beneficiary",
            Role::SecondBeneficiary => "second beneficiary",
        };
        f.write_str(name)
    }
}

/// Role assignments for one ledger.
///
/// Construction rejects the zero address in every slot and identical
/// beneficiaries, so a `Roles` value always holds valid identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Roles {
    owner: Address,
    payer: Address,
    first_beneficiary: Address,
    second_beneficiary: Address,
}

impl Roles {
    pub fn new(
        owner: Address,
        payer: Address,
        first_beneficiary: Address,
        second_beneficiary: Address,
    ) -> Result<Self, SplitterError> {
        for (role, addr) in [
            (Role::Owner, owner),
            (Role::Payer, payer),
            (Role::FirstBeneficiary, first_beneficiary),
            (Role::SecondBeneficiary, second_beneficiary),
        ] {
            if addr.is_zero() {
                return Err(SplitterError::zero_role(role));
            }
        }

        if first_beneficiary == second_beneficiary {
            return Err(SplitterError::InvalidRole {
                role: Role::SecondBeneficiary,
                reason: "duplicate of first beneficiary".to_string(),
            });
        }

        Ok(Self {
            owner,
            payer,
            first_beneficiary,
            second_beneficiary,
        })
    }

    /// Check if `caller` holds `role`.
    pub fn has_role(&self, caller: &Address, role: Role) -> bool {
        *caller == self.address_of(role)
    }

    pub fn address_of(&self, role: Role) -> Address {
        match role {
            Role::Owner => self.owner,
            Role::Payer => self.payer,
            Role::FirstBeneficiary => self.first_beneficiary,
            Role::SecondBeneficiary => self.second_beneficiary,
        }
    }

    /// Fail with `Unauthorized` unless `caller` holds `role`.
    pub fn ensure(&self, caller: &Address, role: Role) -> Result<(), SplitterError> {
        if !self.has_role(caller, role) {
            return Err(SplitterError::Unauthorized {
                caller: *caller,
                required: role,
            });
        }
        Ok(())
    }

    /// Replace the payer, returning the previous one.
    ///
    /// The caller must already have been checked for ownership.
    pub fn replace_payer(&mut self, new_payer: Address) -> Result<Address, SplitterError> {
        if new_payer.is_zero() {
            return Err(SplitterError::zero_role(Role::Payer));
        }
        if new_payer == self.payer {
            return Err(SplitterError::InvalidRole {
                role: Role::Payer,
                reason: "unchanged".to_string(),
            });
        }
        Ok(std::mem::replace(&mut self.payer, new_payer))
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn payer(&self) -> Address {
        self.payer
    }

    pub fn first_beneficiary(&self) -> Address {
        self.first_beneficiary
    }

    pub fn second_beneficiary(&self) -> Address {
        self.second_beneficiary
    }
}

/// One-way open/closed lifecycle guard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lifecycle {
    closed: bool,
}

impl Lifecycle {
    /// Create a new open lifecycle.
    pub fn new() -> Self {
        Self { closed: false }
    }

    /// Close. Returns `false` if already closed.
    pub fn close(&mut self) -> bool {
        if self.closed {
            return false;
        }
        self.closed = true;
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fail with `AlreadyClosed` once closed.
    pub fn ensure_open(&self) -> Result<(), SplitterError> {
        if self.closed {
            return Err(SplitterError::AlreadyClosed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    fn roles() -> Roles {
        Roles::new(addr(1), addr(2), addr(3), addr(4)).unwrap()
    }

    // --- Roles tests ---

    #[test]
    fn test_roles_assigned() {
        let roles = roles();
        assert!(roles.has_role(&addr(1), Role::Owner));
        assert!(roles.has_role(&addr(2), Role::Payer));
        assert!(roles.has_role(&addr(3), Role::FirstBeneficiary));
        assert!(roles.has_role(&addr(4), Role::SecondBeneficiary));
        assert!(!roles.has_role(&addr(2), Role::Owner));
    }

    #[test]
    fn test_roles_reject_zero_in_each_slot() {
        let zero = Address::ZERO;
        let cases = [
            (Roles::new(zero, addr(2), addr(3), addr(4)), Role::Owner),
            (Roles::new(addr(1), zero, addr(3), addr(4)), Role::Payer),
            (Roles::new(addr(1), addr(2), zero, addr(4)), Role::FirstBeneficiary),
            (Roles::new(addr(1), addr(2), addr(3), zero), Role::SecondBeneficiary),
        ];
        for (result, role) in cases {
            assert_eq!(result, Err(SplitterError::zero_role(role)));
        }
    }

    #[test]
    fn test_roles_reject_duplicate_beneficiaries() {
        let result = Roles::new(addr(1), addr(2), addr(3), addr(3));
        assert!(matches!(
            result,
            Err(SplitterError::InvalidRole {
                role: Role::SecondBeneficiary,
                ..
            })
        ));
    }

    #[test]
    fn test_payer_may_also_be_beneficiary() {
        assert!(Roles::new(addr(1), addr(3), addr(3), addr(4)).is_ok());
    }

    #[test]
    fn test_ensure_unauthorized() {
        let roles = roles();
        assert_eq!(
            roles.ensure(&addr(9), Role::Owner),
            Err(SplitterError::Unauthorized {
                caller: addr(9),
                required: Role::Owner,
            })
        );
        assert!(roles.ensure(&addr(1), Role::Owner).is_ok());
    }

    #[test]
    fn test_replace_payer() {
        let mut roles = roles();
        let previous = roles.replace_payer(addr(5)).unwrap();
        assert_eq!(previous, addr(2));
        assert_eq!(roles.payer(), addr(5));
    }

    #[test]
    fn test_replace_payer_rejects_zero_and_unchanged() {
        let mut roles = roles();
        assert_eq!(
            roles.replace_payer(Address::ZERO),
            Err(SplitterError::zero_role(Role::Payer))
        );
        assert!(matches!(
            roles.replace_payer(addr(2)),
            Err(SplitterError::InvalidRole { role: Role::Payer, .. })
        ));
        assert_eq!(roles.payer(), addr(2));
    }

    // --- Lifecycle tests ---

    #[test]
    fn test_lifecycle_close_once() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.ensure_open().is_ok());
        assert!(lifecycle.close());
        assert!(lifecycle.is_closed());
        assert!(!lifecycle.close(), "Second close must fail");
        assert_eq!(lifecycle.ensure_open(), Err(SplitterError::AlreadyClosed));
    }
}
