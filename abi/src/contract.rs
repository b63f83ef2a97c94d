//! Contract abi json, as emitted by solc and hardhat artifacts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{decode, encode, tokenize_all, AbiError, ParamType, Token};

/// Abi json parameter description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Param>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

impl Constructor {
    /// Returns constructor declared parameter types.
    pub fn param_types(&self) -> Result<Vec<ParamType>, AbiError> {
        self.inputs.iter().map(ParamType::from_param).collect()
    }

    pub fn is_payable(&self) -> bool {
        self.state_mutability.as_deref() == Some("payable")
    }

    /// Type check json `args` against the declared parameters and abi encode them.
    pub fn encode_args(&self, args: &[Value]) -> Result<Vec<u8>, AbiError> {
        let tokens = tokenize_all(&self.param_types()?, args)?;

        Ok(encode(&tokens))
    }

    /// Decode abi encoded constructor arguments.
    pub fn decode_args(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode(&self.param_types()?, data)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Function {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub outputs: Vec<Param>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomError {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Param>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Special {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
}

/// One entry of the contract abi json array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AbiItem {
    Constructor(Constructor),
    Function(Function),
    Event(Event),
    Error(CustomError),
    Fallback(Special),
    Receive(Special),
}

/// Contract abi json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Abi(pub Vec<AbiItem>);

impl Abi {
    /// Returns the declared constructor, `None` for contracts without one.
    pub fn constructor(&self) -> Option<&Constructor> {
        self.0.iter().find_map(|item| match item {
            AbiItem::Constructor(constructor) => Some(constructor),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.0.iter().filter_map(|item| match item {
            AbiItem::Function(function) => Some(function),
            _ => None,
        })
    }
}
