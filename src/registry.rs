use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use ethers_abi::Abi;
use ethers_hardhat::{utils::find_artifact, HardhatArtifact};
use ethers_primitives::Address;
use ethers_provider::{Provider, TransactionRequest, DEFAULT_POLL_INTERVAL};
use serde_json::Value;

use crate::{error::RegistryError, DeployTransaction, DeployedContract, Overrides};

/// Maps contract names to deployable factories.
#[async_trait::async_trait]
pub trait ContractRegistry: Send + Sync {
    /// Returns the factory of `contract_name` with `libraries` linked in.
    async fn resolve(
        &self,
        contract_name: &str,
        libraries: &BTreeMap<String, Address>,
    ) -> anyhow::Result<Box<dyn ContractFactory>>;
}

#[async_trait::async_trait]
pub trait ContractFactory: Send + Sync {
    fn interface(&self) -> &Abi;

    /// Send the creation transaction and wait until it is included.
    async fn deploy(&self, args: &[Value], overrides: &Overrides)
        -> anyhow::Result<DeployedContract>;
}

/// Registry of hardhat compiled contracts, deployed through a json-rpc node.
#[derive(Debug, Clone)]
pub struct HardhatRegistry {
    provider: Provider,
    artifacts_dir: PathBuf,
    deployer: Option<Address>,
    poll_interval: Duration,
}

impl HardhatRegistry {
    pub fn new<P: Into<PathBuf>>(provider: Provider, artifacts_dir: P) -> Self {
        Self {
            provider,
            artifacts_dir: artifacts_dir.into(),
            deployer: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Send deploy transactions from `deployer` instead of the node's first account.
    pub fn with_deployer(mut self, deployer: Option<Address>) -> Self {
        self.deployer = deployer;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }
}

#[async_trait::async_trait]
impl ContractRegistry for HardhatRegistry {
    async fn resolve(
        &self,
        contract_name: &str,
        libraries: &BTreeMap<String, Address>,
    ) -> anyhow::Result<Box<dyn ContractFactory>> {
        let path = find_artifact(&self.artifacts_dir, contract_name)?;

        let artifact = HardhatArtifact::load_file(path)?;

        let bytecode = artifact.link(libraries)?;

        log::debug!(
            target: "registry",
            "resolved {}, bytecode {} bytes",
            artifact.fully_qualified_name(),
            bytecode.len()
        );

        Ok(Box::new(HardhatFactory {
            provider: self.provider.clone(),
            name: contract_name.to_owned(),
            interface: artifact.abi,
            bytecode,
            deployer: self.deployer,
            poll_interval: self.poll_interval,
        }))
    }
}

/// Linked creation code of one hardhat contract.
#[derive(Debug)]
pub struct HardhatFactory {
    provider: Provider,
    name: String,
    interface: Abi,
    bytecode: Vec<u8>,
    deployer: Option<Address>,
    poll_interval: Duration,
}

impl HardhatFactory {
    fn init_code(&self, args: &[Value]) -> anyhow::Result<Vec<u8>> {
        let mut code = self.bytecode.clone();

        match self.interface.constructor() {
            Some(constructor) => {
                code.append(&mut constructor.encode_args(args)?);
            }
            None if !args.is_empty() => {
                return Err(RegistryError::NoConstructor(self.name.clone(), args.len()).into());
            }
            None => {}
        }

        Ok(code)
    }

    async fn sender(&self) -> anyhow::Result<Address> {
        if let Some(deployer) = self.deployer {
            return Ok(deployer);
        }

        let accounts = self.provider.eth_accounts().await?;

        Ok(*accounts.first().ok_or(RegistryError::Accounts)?)
    }
}

#[async_trait::async_trait]
impl ContractFactory for HardhatFactory {
    fn interface(&self) -> &Abi {
        &self.interface
    }

    async fn deploy(
        &self,
        args: &[Value],
        overrides: &Overrides,
    ) -> anyhow::Result<DeployedContract> {
        let tx = TransactionRequest {
            from: Some(self.sender().await?),
            to: None,
            data: Some(self.init_code(args)?.into()),
            value: overrides.value.clone(),
            gas: overrides.gas_limit.clone(),
            gas_price: overrides.gas_price.clone(),
        };

        let tx_hash = self.provider.eth_send_transaction(&tx).await?;

        log::debug!(target: "registry", "{} deploy tx {}", self.name, tx_hash);

        let receipt = self
            .provider
            .wait_for_receipt(&tx_hash, self.poll_interval)
            .await?;

        if !receipt.is_success() {
            return Err(RegistryError::TxFailure(tx_hash).into());
        }

        let address = receipt
            .contract_address
            .ok_or(RegistryError::DeployContract(tx_hash))?;

        let deploy_transaction = match self.provider.eth_get_transaction_by_hash(&tx_hash).await {
            Ok(Some(tx)) => DeployTransaction {
                hash: tx_hash,
                gas_limit: Some(tx.gas),
                gas_price: tx.gas_price.or(receipt.effective_gas_price),
            },
            Ok(None) => {
                log::warn!(target: "registry", "tx {} not found, gas info unavailable", tx_hash);

                DeployTransaction {
                    hash: tx_hash,
                    gas_limit: None,
                    gas_price: None,
                }
            }
            Err(err) => {
                log::warn!(target: "registry", "get tx {} failed, {}", tx_hash, err);

                DeployTransaction {
                    hash: tx_hash,
                    gas_limit: None,
                    gas_price: None,
                }
            }
        };

        Ok(DeployedContract {
            name: self.name.clone(),
            address,
            interface: self.interface.clone(),
            deploy_transaction: Some(deploy_transaction),
        })
    }
}
