use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{AbiError, Param};

static ARRAY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.+)\[(\d*)\]$").unwrap());
static BYTES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^bytes(\d{1,2})$").unwrap());
static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(u)?int(\d{0,3})$").unwrap());

/// Solidity abi parameter type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamType {
    Address,
    Bool,
    String,
    Bytes,
    /// `bytes<M>`, 0 < M <= 32
    FixedBytes(usize),
    /// `uint<M>`, 0 < M <= 256, M % 8 == 0
    Uint(usize),
    /// `int<M>`, 0 < M <= 256, M % 8 == 0
    Int(usize),
    /// `T[]`
    Array(Box<ParamType>),
    /// `T[k]`
    FixedArray(Box<ParamType>, usize),
    /// `(T1,T2,...,Tn)`
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Parse solidity type string, tuple types are built from `components`.
    pub fn parse(kind: &str, components: Option<&[Param]>) -> Result<Self, AbiError> {
        if let Some(caps) = ARRAY_REGEX.captures(kind) {
            let inner = Box::new(Self::parse(&caps[1], components)?);

            if caps[2].is_empty() {
                return Ok(Self::Array(inner));
            }

            let len = caps[2]
                .parse()
                .map_err(|_| AbiError::UnsupportType(kind.to_owned()))?;

            return Ok(Self::FixedArray(inner, len));
        }

        match kind {
            "address" => return Ok(Self::Address),
            "bool" => return Ok(Self::Bool),
            "string" => return Ok(Self::String),
            "bytes" => return Ok(Self::Bytes),
            "tuple" => {
                let components =
                    components.ok_or_else(|| AbiError::TupleComponents(kind.to_owned()))?;

                return Ok(Self::Tuple(
                    components
                        .iter()
                        .map(ParamType::from_param)
                        .collect::<Result<Vec<_>, _>>()?,
                ));
            }
            _ => {}
        }

        if let Some(caps) = BYTES_REGEX.captures(kind) {
            let len: usize = caps[1]
                .parse()
                .map_err(|_| AbiError::UnsupportType(kind.to_owned()))?;

            if len == 0 || len > 32 {
                return Err(AbiError::UnsupportType(kind.to_owned()));
            }

            return Ok(Self::FixedBytes(len));
        }

        if let Some(caps) = INT_REGEX.captures(kind) {
            let bits: usize = if caps[2].is_empty() {
                256
            } else {
                caps[2]
                    .parse()
                    .map_err(|_| AbiError::UnsupportType(kind.to_owned()))?
            };

            if bits == 0 || bits > 256 || bits % 8 != 0 {
                return Err(AbiError::UnsupportType(kind.to_owned()));
            }

            return Ok(if caps.get(1).is_some() {
                Self::Uint(bits)
            } else {
                Self::Int(bits)
            });
        }

        Err(AbiError::UnsupportType(kind.to_owned()))
    }

    /// Parse type from abi json parameter description.
    pub fn from_param(param: &Param) -> Result<Self, AbiError> {
        Self::parse(&param.kind, param.components.as_deref())
    }

    /// Returns true if the encoding of this type is stored in the tail.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Self::String | Self::Bytes | Self::Array(_) => true,
            Self::FixedArray(inner, _) => inner.is_dynamic(),
            Self::Tuple(members) => members.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Size of the head part of this type in bytes.
    pub(crate) fn head_size(&self) -> usize {
        if self.is_dynamic() {
            return 32;
        }

        match self {
            Self::FixedArray(inner, len) => inner.head_size() * len,
            Self::Tuple(members) => members.iter().map(ParamType::head_size).sum(),
            _ => 32,
        }
    }
}

impl Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Address => write!(f, "address"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
            Self::Bytes => write!(f, "bytes"),
            Self::FixedBytes(len) => write!(f, "bytes{}", len),
            Self::Uint(bits) => write!(f, "uint{}", bits),
            Self::Int(bits) => write!(f, "int{}", bits),
            Self::Array(inner) => write!(f, "{}[]", inner),
            Self::FixedArray(inner, len) => write!(f, "{}[{}]", inner, len),
            Self::Tuple(members) => {
                let members = members
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");

                write!(f, "({})", members)
            }
        }
    }
}
