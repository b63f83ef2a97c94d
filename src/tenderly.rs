//! [tenderly](https://tenderly.co) verification backend.

use std::{
    env,
    fs::{create_dir_all, write},
    path::{Path, PathBuf},
};

use ethers_hardhat::{utils::find_artifact, BuildInfo, HardhatArtifact, HardhatError};
use ethers_primitives::Address;
use serde_json::{json, Map, Value};

use crate::{config::Network, error::ConfigError, verify::VerificationBackend};

pub const ACCESS_KEY_ENV: &str = "TENDERLY_ACCESS_KEY";
pub const API_URL_ENV: &str = "TENDERLY_API_URL";

pub const DEFAULT_API_URL: &str = "https://api.tenderly.co";

/// solc default when the build settings omit the optimizer runs.
const DEFAULT_OPTIMIZER_RUNS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenderlyCredentials {
    pub access_key: String,
    pub api_url: String,
}

impl TenderlyCredentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        let access_key = env::var(ACCESS_KEY_ENV)
            .ok()
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingEnv(ACCESS_KEY_ENV))?;

        Ok(Self {
            access_key,
            api_url: env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_owned()),
        })
    }

    fn verify_url(&self) -> String {
        format!(
            "{}/api/v1/account/me/verify-contracts",
            self.api_url.trim_end_matches('/')
        )
    }
}

/// Builds the `verify-contracts` request body of `artifact` deployed at `address`.
///
/// Every source of the build is submitted, only the deployed contract carries
/// the `networks` entry.
pub fn verification_request(
    artifact: &HardhatArtifact,
    build_info: &BuildInfo,
    chain_id: u64,
    address: &Address,
) -> Result<Value, HardhatError> {
    let sources = &build_info.input.sources;

    if !sources.contains_key(&artifact.source_name) {
        return Err(HardhatError::MissingSource(artifact.source_name.clone()));
    }

    let compiler = json!({
        "name": "solc",
        "version": build_info.solc_version,
    });

    let mut contracts = vec![];

    for (source_path, source) in sources {
        let mut names: Vec<String> = build_info
            .contract_names(source_path)
            .into_iter()
            .map(ToOwned::to_owned)
            .collect();

        if names.is_empty() {
            if let Some(stem) = Path::new(source_path).file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }

        for name in names {
            let mut networks = Map::new();

            if *source_path == artifact.source_name && name == artifact.contract_name {
                networks.insert(
                    chain_id.to_string(),
                    json!({ "address": address, "links": {} }),
                );
            }

            contracts.push(json!({
                "contractName": name,
                "source": source.content,
                "sourcePath": source_path,
                "networks": networks,
                "compiler": compiler,
            }));
        }
    }

    let settings = &build_info.input.settings;

    Ok(json!({
        "config": {
            "compiler_version": build_info.solc_version,
            "optimizations_used": settings.optimizer.enabled,
            "optimizations_count": settings.optimizer.runs.unwrap_or(DEFAULT_OPTIMIZER_RUNS),
            "evm_version": settings.evm_version.as_deref().unwrap_or("default"),
        },
        "contracts": contracts,
    }))
}

/// Persists deployed artifacts under `deployments/<network>` and submits them to tenderly.
///
/// Artifacts are persisted without credentials, verification requires them.
#[derive(Debug, Clone)]
pub struct TenderlyBackend {
    client: reqwest::Client,
    credentials: Option<TenderlyCredentials>,
    artifacts_dir: PathBuf,
    deployments_dir: PathBuf,
    network: Network,
}

impl TenderlyBackend {
    pub fn new<A, D>(
        credentials: Option<TenderlyCredentials>,
        artifacts_dir: A,
        deployments_dir: D,
        network: Network,
    ) -> Self
    where
        A: Into<PathBuf>,
        D: Into<PathBuf>,
    {
        Self {
            client: reqwest::Client::new(),
            credentials,
            artifacts_dir: artifacts_dir.into(),
            deployments_dir: deployments_dir.into(),
            network,
        }
    }

    pub fn deployment_path(&self, contract_name: &str) -> PathBuf {
        self.deployments_dir
            .join(self.network.name())
            .join(format!("{}.json", contract_name))
    }

    fn load_artifact(&self, contract_name: &str) -> anyhow::Result<HardhatArtifact> {
        HardhatArtifact::load_file(find_artifact(&self.artifacts_dir, contract_name)?)
    }
}

#[async_trait::async_trait]
impl VerificationBackend for TenderlyBackend {
    async fn register_artifact(
        &self,
        contract_name: &str,
        address: &Address,
    ) -> anyhow::Result<()> {
        let artifact = self.load_artifact(contract_name)?;

        let path = self.deployment_path(contract_name);

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let deployment = json!({
            "contractName": artifact.contract_name,
            "sourceName": artifact.source_name,
            "address": address,
            "network": self.network.name(),
            "chainId": self.network.chain_id(),
            "abi": artifact.abi,
            "bytecode": artifact.bytecode,
            "deployedBytecode": artifact.deployed_bytecode,
        });

        write(&path, serde_json::to_string_pretty(&deployment)?)?;

        log::debug!(target: "tenderly", "persist {:?}", path);

        Ok(())
    }

    async fn verify(
        &self,
        contract_name: &str,
        address: &Address,
        network: &Network,
    ) -> anyhow::Result<()> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(ConfigError::MissingEnv(ACCESS_KEY_ENV))?;

        let chain_id = network
            .chain_id()
            .ok_or_else(|| ConfigError::ChainId(network.to_string()))?;

        let path = find_artifact(&self.artifacts_dir, contract_name)?;

        let artifact = HardhatArtifact::load_file(&path)?;

        let build_info = BuildInfo::for_artifact(&path)?;

        let body = verification_request(&artifact, &build_info, chain_id, address)?;

        let url = credentials.verify_url();

        log::debug!(target: "tenderly", "POST {}", url);

        self.client
            .post(&url)
            .header("X-Access-Key", &credentials.access_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use super::*;

    fn write_artifact(artifacts_dir: &std::path::Path) {
        let dir = artifacts_dir.join("contracts/Token.sol");

        create_dir_all(&dir).unwrap();

        write(
            dir.join("Token.json"),
            json!({
                "contractName": "Token",
                "sourceName": "contracts/Token.sol",
                "abi": [],
                "bytecode": "0x6080",
                "deployedBytecode": "0x6001"
            })
            .to_string(),
        )
        .unwrap();
    }

    #[async_std::test]
    async fn test_register_artifact() {
        _ = pretty_env_logger::try_init();

        let dir = tempfile::tempdir().unwrap();

        write_artifact(&dir.path().join("artifacts"));

        let backend = TenderlyBackend::new(
            None,
            dir.path().join("artifacts"),
            dir.path().join("deployments"),
            Network::Kovan,
        );

        let address: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();

        backend.register_artifact("Token", &address).await.unwrap();

        let path = dir.path().join("deployments/kovan/Token.json");

        assert_eq!(backend.deployment_path("Token"), path);

        let deployment: Value = serde_json::from_str(&read_to_string(path).unwrap()).unwrap();

        assert_eq!(deployment["address"], "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert_eq!(deployment["chainId"], 42);
        assert_eq!(deployment["bytecode"], "0x6080");

        backend
            .register_artifact("Bad", &address)
            .await
            .expect_err("Bad not compiled");

        let err = backend
            .verify("Token", &address, &Network::Kovan)
            .await
            .expect_err("Credentials required");

        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingEnv(ACCESS_KEY_ENV))
        ));
    }

    #[test]
    fn test_verify_url() {
        let credentials = TenderlyCredentials {
            access_key: "key".to_owned(),
            api_url: "https://api.tenderly.co/".to_owned(),
        };

        assert_eq!(
            credentials.verify_url(),
            "https://api.tenderly.co/api/v1/account/me/verify-contracts"
        );
    }

    #[test]
    fn test_verification_request() {
        let artifact: HardhatArtifact = serde_json::from_value(json!({
            "contractName": "Token",
            "sourceName": "contracts/Token.sol",
            "abi": [],
            "bytecode": "0x6080",
            "deployedBytecode": "0x6001"
        }))
        .unwrap();

        let mut build_info: BuildInfo = serde_json::from_value(json!({
            "solcVersion": "0.8.4",
            "input": {
                "language": "Solidity",
                "sources": {
                    "contracts/Token.sol": { "content": "import './Math.sol'; contract Token {}" },
                    "contracts/Math.sol": { "content": "library Math {}" }
                },
                "settings": {
                    "optimizer": { "enabled": true, "runs": 1000 },
                    "evmVersion": "london"
                }
            },
            "output": {
                "contracts": {
                    "contracts/Token.sol": { "Token": {} },
                    "contracts/Math.sol": { "Math": {} }
                }
            }
        }))
        .unwrap();

        let address: Address = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse().unwrap();

        let request = verification_request(&artifact, &build_info, 42, &address).unwrap();

        assert_eq!(
            request["config"],
            json!({
                "compiler_version": "0.8.4",
                "optimizations_used": true,
                "optimizations_count": 1000,
                "evm_version": "london"
            })
        );

        let contracts = request["contracts"].as_array().unwrap();

        assert_eq!(contracts.len(), 2);

        let math = &contracts[0];

        assert_eq!(math["contractName"], "Math");
        assert_eq!(math["sourcePath"], "contracts/Math.sol");
        assert_eq!(math["source"], "library Math {}");
        assert_eq!(math["networks"], json!({}));

        let token = &contracts[1];

        assert_eq!(token["contractName"], "Token");
        assert_eq!(token["source"], "import './Math.sol'; contract Token {}");
        assert_eq!(token["compiler"], json!({ "name": "solc", "version": "0.8.4" }));
        assert_eq!(
            token["networks"],
            json!({
                "42": {
                    "address": "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
                    "links": {}
                }
            })
        );

        build_info.input.settings = Default::default();
        build_info.output = Default::default();

        let request = verification_request(&artifact, &build_info, 42, &address).unwrap();

        assert_eq!(request["config"]["optimizations_used"], false);
        assert_eq!(request["config"]["optimizations_count"], 200);
        assert_eq!(request["config"]["evm_version"], "default");
        assert_eq!(request["contracts"][1]["contractName"], "Token");

        build_info.input.sources.remove("contracts/Token.sol");

        assert!(matches!(
            verification_request(&artifact, &build_info, 42, &address),
            Err(HardhatError::MissingSource(_))
        ));
    }
}
