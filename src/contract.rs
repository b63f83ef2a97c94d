use std::collections::BTreeMap;

use ethers_abi::Abi;
use ethers_primitives::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Deploy transaction options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
    /// Native token sent to a payable constructor, in wei.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<U256>,
    /// Library name (or fully qualified name) => deployed library address.
    #[serde(default)]
    pub libraries: BTreeMap<String, Address>,
}

/// One contract to deploy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContractSpec {
    pub name: String,
    /// Constructor args in declaration order.
    pub args: Vec<Value>,
    pub overrides: Overrides,
    /// Submit the contract to the verification backend after deployment.
    pub verify: bool,
}

impl ContractSpec {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

/// The creation transaction of a deployed contract.
#[derive(Debug, Clone, PartialEq)]
pub struct DeployTransaction {
    pub hash: H256,
    pub gas_limit: Option<U256>,
    pub gas_price: Option<U256>,
}

/// Chain side handle of a contract instance.
#[derive(Debug, Clone)]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub interface: Abi,
    pub deploy_transaction: Option<DeployTransaction>,
}

/// Outcome of one successful deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentResult {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: H256,
    pub gas_limit: Option<U256>,
    pub gas_price: Option<U256>,
    /// `None` if the constructor takes no arguments.
    pub encoded_constructor_args: Option<Vec<u8>>,
}

impl DeploymentResult {
    pub fn new(deployed: &DeployedContract, encoded_constructor_args: Vec<u8>) -> Self {
        let (transaction_hash, gas_limit, gas_price) = match &deployed.deploy_transaction {
            Some(tx) => (tx.hash, tx.gas_limit.clone(), tx.gas_price.clone()),
            None => (H256::default(), None, None),
        };

        Self {
            contract_name: deployed.name.clone(),
            address: deployed.address,
            transaction_hash,
            gas_limit,
            gas_price,
            encoded_constructor_args: if encoded_constructor_args.is_empty() {
                None
            } else {
                Some(encoded_constructor_args)
            },
        }
    }
}
