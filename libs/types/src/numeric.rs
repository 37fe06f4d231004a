//! Integer amounts in the smallest indivisible currency unit
//!
//! Ledger arithmetic is done on [`Amount`] (a `u128` wei count) so balances
//! can never be negative and division is exact. Human-facing ether values
//! go through `rust_decimal` for deterministic conversion, never floats.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::TypesError;

/// Number of fractional digits in one ether
pub const ETHER_DECIMALS: u32 = 18;

/// Wei per ether (10^18)
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Non-negative amount in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    pub const fn as_wei(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }

    /// Divide into two equal halves and the odd remainder.
    ///
    /// Returns `(half, remainder)` where `remainder = amount % 2` and
    /// `half = (amount - remainder) / 2`, so `2 * half + remainder == amount`.
    pub fn halve(self) -> (Amount, Amount) {
        let remainder = self.0 % 2;
        let half = (self.0 - remainder) / 2;
        (Amount(half), Amount(remainder))
    }

    /// Convert an ether value to wei.
    ///
    /// Rejects negative values, values with more than 18 fractional digits
    /// and values too large to represent.
    pub fn from_ether(ether: Decimal) -> Result<Self, TypesError> {
        if ether.is_sign_negative() && !ether.is_zero() {
            return Err(TypesError::InvalidEtherAmount {
                value: ether.to_string(),
                reason: "negative".to_string(),
            });
        }

        let wei = ether
            .checked_mul(Decimal::from(WEI_PER_ETHER as u64))
            .ok_or(TypesError::AmountOverflow)?;

        if !wei.fract().is_zero() {
            return Err(TypesError::InvalidEtherAmount {
                value: ether.to_string(),
                reason: format!("more than {} fractional digits", ETHER_DECIMALS),
            });
        }

        wei.to_u128().map(Amount).ok_or(TypesError::AmountOverflow)
    }

    /// Convert to an ether value.
    pub fn to_ether(&self) -> Result<Decimal, TypesError> {
        let wei = i128::try_from(self.0).map_err(|_| TypesError::AmountOverflow)?;
        Decimal::try_from_i128_with_scale(wei, ETHER_DECIMALS)
            .map(|d| d.normalize())
            .map_err(|_| TypesError::AmountOverflow)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u128>()
            .map(Amount)
            .map_err(|e| TypesError::InvalidAmount {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<u64> for Amount {
    fn from(wei: u64) -> Self {
        Self(wei as u128)
    }
}

impl From<u128> for Amount {
    fn from(wei: u128) -> Self {
        Self(wei)
    }
}

// Decimal string on the wire; u128 exceeds JSON number range.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
