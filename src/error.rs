use std::path::PathBuf;

use ethers_abi::AbiError;
use ethers_primitives::{hex::FromHexError, AddressError, UnitError, H256};

/// Fatal deployment failures, the orchestrator stops on any of them.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("Resolve contract {0} failed: {1}")]
    Resolve(String, anyhow::Error),

    #[error("Deploy contract {0} failed: {1}")]
    Construct(String, anyhow::Error),

    #[error("Encode constructor args of {0} failed: {1}")]
    Codec(String, #[source] AbiError),
}

/// Deployment record persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid address record, {0}")]
    Address(#[from] AddressError),

    #[error("Invalid args record, {0}")]
    Hex(#[from] FromHexError),
}

/// Chain side errors of the hardhat registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Node returns empty accounts list, set DEPLOYER_ADDRESS or unlock an account")]
    Accounts,

    #[error("Contract {0} has no constructor, but {1} args provided")]
    NoConstructor(String, usize),

    #[error("Deploy tx {0} reverted")]
    TxFailure(H256),

    #[error("DeployContract: contract_address field of receipt is null, {0}")]
    DeployContract(H256),
}

/// Deploy plan and environment errors, raised before any deployment starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Read deploy plan {0:?} failed, {1}")]
    Plan(PathBuf, std::io::Error),

    #[error("Parse deploy plan {0:?} failed, {1}")]
    PlanJson(PathBuf, serde_json::Error),

    #[error("No rpc url configured for network {0}")]
    NetworkUrl(String),

    #[error("Unknown chain id of network {0}")]
    ChainId(String),

    #[error("Environment variable {0} required")]
    MissingEnv(&'static str),

    #[error("Invalid {0}, {1}")]
    Address(&'static str, AddressError),

    #[error("Invalid value of contract {0}, {1}")]
    Value(String, UnitError),

    #[error("Load uploaded assets failed, {0}")]
    Assets(anyhow::Error),
}
