//! `deploy.json` plan file.

use std::{collections::BTreeMap, fs::read_to_string, path::PathBuf};

use ethers_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

fn default_network() -> String {
    "localhost".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployPlan {
    /// Target network if `HARDHAT_NETWORK` is not set.
    #[serde(default = "default_network")]
    pub default_network: String,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkPlan>,
    /// Hardhat project root, defaults to the current directory.
    #[serde(default)]
    pub hardhat_root: Option<PathBuf>,
    /// Relative to `hardhat_root`, defaults to `artifacts`.
    #[serde(default)]
    pub artifacts_dir: Option<PathBuf>,
    /// Directory of json `<Name>.args` files, relative to `hardhat_root`.
    #[serde(default)]
    pub contracts_dir: Option<PathBuf>,
    /// Uploaded assets manifest, relative to `hardhat_root`.
    #[serde(default)]
    pub assets: Option<PathBuf>,
    /// Run `npx hardhat compile` before deploying.
    #[serde(default)]
    pub compile: bool,
    #[serde(default)]
    pub contracts: Vec<PlanContract>,
}

impl Default for DeployPlan {
    fn default() -> Self {
        Self {
            default_network: default_network(),
            networks: Default::default(),
            hardhat_root: None,
            artifacts_dir: None,
            contracts_dir: None,
            assets: None,
            compile: false,
            contracts: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkPlan {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanContract {
    pub name: String,
    /// Loaded from `<contracts_dir>/<name>.args` if not set.
    #[serde(default)]
    pub args: Option<Vec<Value>>,
    /// Ether decimal string, e.g `"0.05"`.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub gas_limit: Option<U256>,
    #[serde(default)]
    pub gas_price: Option<U256>,
    #[serde(default)]
    pub libraries: BTreeMap<String, Address>,
    #[serde(default)]
    pub verify: bool,
}

impl DeployPlan {
    pub fn load_file<P: Into<PathBuf>>(path: P) -> Result<Self, ConfigError> {
        let path = path.into();

        let content = read_to_string(&path).map_err(|err| ConfigError::Plan(path.clone(), err))?;

        serde_json::from_str(&content).map_err(|err| ConfigError::PlanJson(path, err))
    }
}
