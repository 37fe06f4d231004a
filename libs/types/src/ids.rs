//! Identity types for ledger participants
//!
//! Every role (owner, payer, beneficiary) and every balance holder is an
//! [`Address`]: a fixed 20-byte account identifier. The all-zero address is
//! the null identity and is never a valid role.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypesError;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte account identity.
///
/// Displays and serializes as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The null identity
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Build an address whose low 8 bytes hold `n` big-endian.
    ///
    /// Useful for deterministic identities in hosts and tests.
    pub fn from_low_u64_be(n: u64) -> Self {
        let mut bytes = [0u8; ADDRESS_LEN];
        bytes[ADDRESS_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        Self(bytes)
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypesError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let raw = hex::decode(digits).map_err(|e| TypesError::InvalidAddress {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        let bytes: [u8; ADDRESS_LEN] =
            raw.try_into().map_err(|raw: Vec<u8>| TypesError::InvalidAddress {
                input: s.to_string(),
                reason: format!("expected {} bytes, got {}", ADDRESS_LEN, raw.len()),
            })?;
        Ok(Self(bytes))
    }

    /// True for the null identity
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(Address::default().is_zero());
        assert!(!Address::from_low_u64_be(1).is_zero());
    }

    #[test]
    fn test_from_low_u64_distinct() {
        assert_ne!(Address::from_low_u64_be(1), Address::from_low_u64_be(2));
    }

    #[test]
    fn test_display_is_prefixed_hex() {
        let addr = Address::from_low_u64_be(0xabcd);
        assert_eq!(
            addr.to_string(),
            "0x000000000000000000000000000000000000abcd"
        );
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let with = Address::from_hex("0x000000000000000000000000000000000000abcd").unwrap();
        let without: Address = "000000000000000000000000000000000000ABCD".parse().unwrap();
        assert_eq!(with, without);
        assert_eq!(with, Address::from_low_u64_be(0xabcd));
    }

    #[test]
    fn test_parse_wrong_length() {
        let err = Address::from_hex("0xabcd").unwrap_err();
        assert!(matches!(err, TypesError::InvalidAddress { .. }));
        assert!(err.to_string().contains("expected 20 bytes"));
    }

    #[test]
    fn test_parse_bad_hex() {
        let result = Address::from_hex("0xzz00000000000000000000000000000000000000");
        assert!(matches!(result, Err(TypesError::InvalidAddress { .. })));
    }

    #[test]
    fn test_address_serialization() {
        let addr = Address::from_low_u64_be(7);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000000007\"");

        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }
}
