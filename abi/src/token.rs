use ethers_primitives::{Address, ToEtherHex};
use num::{BigInt, BigUint, Signed};
use serde_json::Value;

use crate::ParamType;

/// Typed abi value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    Address(Address),
    Bool(bool),
    String(String),
    Bytes(Vec<u8>),
    /// `bytes<M>` value, without right padding.
    FixedBytes(Vec<u8>),
    Uint(BigUint),
    Int(BigInt),
    Array(Vec<Token>),
    FixedArray(Vec<Token>),
    Tuple(Vec<Token>),
}

impl Token {
    /// Returns true if the encoding of this value is stored in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String(_) | Self::Bytes(_) | Self::Array(_) => true,
            Self::FixedArray(items) | Self::Tuple(items) => items.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    /// Check if this value can be encoded as `param`.
    pub fn type_check(&self, param: &ParamType) -> bool {
        match (self, param) {
            (Self::Address(_), ParamType::Address)
            | (Self::Bool(_), ParamType::Bool)
            | (Self::String(_), ParamType::String)
            | (Self::Bytes(_), ParamType::Bytes) => true,
            (Self::FixedBytes(bytes), ParamType::FixedBytes(len)) => bytes.len() == *len,
            (Self::Uint(value), ParamType::Uint(bits)) => value.bits() <= *bits as u64,
            (Self::Int(value), ParamType::Int(bits)) => int_in_range(value, *bits),
            (Self::Array(items), ParamType::Array(inner)) => {
                items.iter().all(|item| item.type_check(inner))
            }
            (Self::FixedArray(items), ParamType::FixedArray(inner, len)) => {
                items.len() == *len && items.iter().all(|item| item.type_check(inner))
            }
            (Self::Tuple(items), ParamType::Tuple(members)) => {
                items.len() == members.len()
                    && items
                        .iter()
                        .zip(members.iter())
                        .all(|(item, member)| item.type_check(member))
            }
            _ => false,
        }
    }

    /// Convert back to the json representation accepted by [`tokenize`](crate::tokenize).
    pub fn to_json(&self) -> Value {
        match self {
            Self::Address(address) => Value::String(address.to_string()),
            Self::Bool(b) => Value::Bool(*b),
            Self::String(s) => Value::String(s.clone()),
            Self::Bytes(bytes) | Self::FixedBytes(bytes) => Value::String(bytes.to_eth_hex()),
            Self::Uint(value) => Value::String(value.to_string()),
            Self::Int(value) => Value::String(value.to_string()),
            Self::Array(items) | Self::FixedArray(items) | Self::Tuple(items) => {
                Value::Array(items.iter().map(Token::to_json).collect())
            }
        }
    }
}

/// Returns true if `value` fits in two's complement `int<bits>`.
pub(crate) fn int_in_range(value: &BigInt, bits: usize) -> bool {
    if bits == 0 {
        return false;
    }

    let bound = BigInt::from(1u8) << (bits - 1);

    if value.is_negative() {
        -value <= bound
    } else {
        *value < bound
    }
}
