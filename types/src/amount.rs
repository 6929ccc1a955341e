//! Token-weighted stake amounts.
//!
//! Stakes are fixed-point integers (u128) in the token's smallest unit. They are
//! serialized as decimal strings because text formats such as TOML cannot hold
//! 128-bit integers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

/// A voter's weight, a claimed tally, or a collateral amount.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stake(u128);

impl Stake {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(u128::MAX);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    /// `whole * 10^decimals`, saturating on overflow.
    pub fn from_units(whole: u128, decimals: u32) -> Self {
        Self(whole.saturating_mul(10u128.saturating_pow(decimals)))
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }
}

impl Add for Stake {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Stake {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Stake {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, s| acc + s)
    }
}

impl From<u128> for Stake {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Stake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Stake {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Stake {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StakeVisitor;

        impl<'de> serde::de::Visitor<'de> for StakeVisitor {
            type Value = Stake;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a non-negative integer or decimal string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Stake(v as u128))
            }

            fn visit_u128<E: serde::de::Error>(self, v: u128) -> Result<Self::Value, E> {
                Ok(Stake(v))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u128::try_from(v)
                    .map(Stake)
                    .map_err(|_| E::custom("stake cannot be negative"))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.trim().parse::<u128>().map(Stake).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(StakeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_units_scales_by_decimals() {
        assert_eq!(Stake::from_units(20, 18).raw(), 20_000_000_000_000_000_000);
        assert_eq!(Stake::from_units(7, 0).raw(), 7);
    }

    #[test]
    fn checked_add_detects_overflow() {
        assert!(Stake::MAX.checked_add(Stake::new(1)).is_none());
        assert_eq!(
            Stake::new(20).checked_add(Stake::new(29)),
            Some(Stake::new(49))
        );
    }

    #[test]
    fn sum_of_stakes() {
        let total: Stake = [20u128, 29, 51].into_iter().map(Stake::new).sum();
        assert_eq!(total, Stake::new(100));
    }

    #[test]
    fn json_roundtrip_as_string() {
        let stake = Stake::new(u128::MAX);
        let json = serde_json::to_string(&stake).unwrap();
        assert_eq!(json, format!("\"{}\"", u128::MAX));
        let back: Stake = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stake);
    }

    #[test]
    fn json_accepts_plain_integers() {
        let stake: Stake = serde_json::from_str("49").unwrap();
        assert_eq!(stake, Stake::new(49));
        assert!(serde_json::from_str::<Stake>("-1").is_err());
    }
}
