//! Unsigned 256 bits quantity used by the rpc layer and gas accounting.
//!

use std::{fmt::Display, ops::Mul, str::FromStr};

use num::{BigUint, Num, Zero};
use serde::{de, Deserialize, Serialize};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UintError {
    #[error("OutOfRange: {0}")]
    OutOfRange(String),

    #[error("Parse: {0}")]
    Parse(String),
}

/// uint256 mapping, a wrapper of [`BigUint`]
///
/// Serialized as ethereum quantity string `0x..`, deserialized from quantity
/// strings, decimal strings or json numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct U256(pub BigUint);

impl U256 {
    pub const BITS: u64 = 256;

    /// Create `U256` from [`BigUint`], returns [`UintError::OutOfRange`] if value overflows.
    pub fn new(value: BigUint) -> Result<Self, UintError> {
        if value.bits() > Self::BITS {
            return Err(UintError::OutOfRange(format!(
                "{} convert to uint256 failed",
                value
            )));
        }

        Ok(Self(value))
    }

    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns ethereum quantity format string.
    pub fn to_quantity(&self) -> String {
        format!("{:#x}", self.0)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<U256> for BigUint {
    fn from(value: U256) -> Self {
        value.0
    }
}

impl<'a> Mul<&'a U256> for &'a U256 {
    type Output = U256;

    fn mul(self, rhs: &'a U256) -> Self::Output {
        U256(&self.0 * &rhs.0)
    }
}

impl FromStr for U256 {
    type Err = UintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = if let Some(hex) = s.strip_prefix("0x") {
            BigUint::from_str_radix(hex, 16)
        } else {
            BigUint::from_str_radix(s, 10)
        }
        .map_err(|err| UintError::Parse(format!("{}, {}", s, err)))?;

        Self::new(value)
    }
}

impl Display for U256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for U256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_quantity())
    }
}

struct U256Visitor;

impl<'de> de::Visitor<'de> for U256Visitor {
    type Value = U256;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "expect quantity string or unsigned number")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(U256::from(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        v.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(U256Visitor)
    }
}
