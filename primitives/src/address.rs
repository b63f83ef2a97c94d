//! Rust type for ethereum account address with builtin eip55 support
//!
//!

use std::{fmt::Display, str::FromStr};

use hex::FromHexError;

use serde::Deserialize;
use serde::Serialize;

use crate::hash::keccak256;
use crate::hex::FromEtherHex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AddressError {
    #[error("Invalid address string length,{0}")]
    Length(String),

    #[error("Eip55 format check failed,{0}")]
    Eip55(String),

    #[error("{0}")]
    FromHexError(#[from] FromHexError),
}

/// Ethereum address type in binary bytes.
#[derive(Debug, PartialEq, Clone, Copy, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(
    /// Ethereum address's length is 20 in bytes
    pub [u8; 20],
);

impl Address {
    pub fn zero_address() -> Address {
        Address([0; 20])
    }

    /// Returns the address left padded to one abi word.
    pub fn to_word(&self) -> [u8; 32] {
        let mut buff = [0u8; 32];

        buff[12..].copy_from_slice(&self.0);

        buff
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_checksum_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = String::deserialize(deserializer)?;

        data.parse().map_err(serde::de::Error::custom)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_checksum_string())
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parse address string, the eip55 checksum is only checked for mixed case inputs.
impl FromStr for Address {
    type Err = AddressError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let payload = s.trim_start_matches("0x");

        let mixed_case = payload.chars().any(|c| c.is_ascii_lowercase())
            && payload.chars().any(|c| c.is_ascii_uppercase());

        <Address as Eip55>::from_str(s, mixed_case)
    }
}

/// Eip55 support trait
pub trait Eip55: Sized {
    /// Convert address to eip55 string
    fn to_checksum_string(&self) -> String;

    /// Load address from string and make a eip55 checksum comparison
    fn from_str(source: &str, checksum: bool) -> Result<Self, AddressError>;
}

impl Eip55 for Address {
    fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.0);

        let digest = keccak256(lower.as_bytes());

        let checksummed: String = lower
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let byte = digest[i / 2];
                let nibble = 0xf & if i % 2 == 0 { byte >> 4 } else { byte };

                if nibble >= 8 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect();

        format!("0x{}", checksummed)
    }

    fn from_str(source: &str, checksum: bool) -> Result<Self, AddressError> {
        let buff = Vec::<u8>::from_eth_hex(source)?;

        let buff: [u8; 20] = buff
            .try_into()
            .map_err(|_| AddressError::Length(source.to_owned()))?;

        let address = Self(buff);

        if checksum {
            let expected = address.to_checksum_string();

            if expected.trim_start_matches("0x") != source.trim_start_matches("0x") {
                return Err(AddressError::Eip55(source.to_owned()));
            }
        }

        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address() {
        _ = pretty_env_logger::try_init();

        let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"
            .parse()
            .expect("Parse lowercase address");

        assert_eq!(
            address.to_checksum_string(),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );

        assert_eq!(
            <Address as Eip55>::from_str("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed", true)
                .unwrap(),
            address
        );

        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD"
            .parse::<Address>()
            .expect_err("Bad checksum");

        "0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea"
            .parse::<Address>()
            .expect_err("Short address");
    }

    #[test]
    fn test_address_word() {
        let address: Address = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359".parse().unwrap();

        let word = address.to_word();

        assert_eq!(&word[..12], &[0u8; 12]);
        assert_eq!(&word[12..], &address.0);
    }

    #[test]
    fn test_address_json() {
        let address: Address = serde_json::from_str("\"0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359\"")
            .expect("Deserialize address");

        assert_eq!(
            serde_json::to_string(&address).unwrap(),
            "\"0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359\""
        );
    }
}
