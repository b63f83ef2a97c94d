use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use crate::hex::{FromEtherHex, FromHexError, ToEtherHex};

/// Calculate keccak256 digest of `bytes`.
pub fn keccak256<S: AsRef<[u8]>>(bytes: S) -> [u8; 32] {
    Keccak256::new().chain_update(bytes.as_ref()).finalize().into()
}

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("Invalid hash length, expect 32 bytes, {0}")]
    Length(String),

    #[error("{0}")]
    FromHexError(#[from] FromHexError),
}

/// 32 bytes hash, used for transaction hashes and `bytes32` values.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord, Default)]
pub struct H256(pub [u8; 32]);

impl From<[u8; 32]> for H256 {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl FromStr for H256 {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let buff = Vec::<u8>::from_eth_hex(s)?;

        Ok(Self(
            buff.try_into()
                .map_err(|_| HashError::Length(s.to_owned()))?,
        ))
    }
}

impl Display for H256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_eth_hex())
    }
}

impl Serialize for H256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_eth_hex())
    }
}

impl<'de> Deserialize<'de> for H256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = String::deserialize(deserializer)?;

        data.parse().map_err(serde::de::Error::custom)
    }
}
