//! Deployment configuration, resolved once from `.env`, environment variables
//! and the deploy plan file.

use std::{convert::Infallible, env, fmt::Display, path::PathBuf, str::FromStr};

use ethers_primitives::{parse_ether, Address};

use crate::{
    assets::{expand_assets, load_asset_ids},
    error::ConfigError,
    plan::{DeployPlan, PlanContract},
    store::load_constructor_args,
    ContractSpec, Overrides,
};

/// Target network override.
pub const NETWORK_ENV: &str = "HARDHAT_NETWORK";
/// Deploy plan path.
pub const PLAN_ENV: &str = "DEPLOY_PLAN";
/// Sender of deploy transactions, must be unlocked by the node.
pub const DEPLOYER_ENV: &str = "DEPLOYER_ADDRESS";

pub const DEFAULT_PLAN: &str = "deploy.json";

/// Local hardhat node endpoint.
pub const LOCAL_RPC_URL: &str = "http://localhost:8545";

/// Known networks, names are case sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    Localhost,
    Hardhat,
    Kovan,
    Goerli,
    Mainnet,
    Rinkeby,
    Ropsten,
    Matic,
    Mumbai,
    XDai,
    Poa,
    Custom(String),
}

impl Network {
    pub fn name(&self) -> &str {
        match self {
            Self::Localhost => "localhost",
            Self::Hardhat => "hardhat",
            Self::Kovan => "kovan",
            Self::Goerli => "goerli",
            Self::Mainnet => "mainnet",
            Self::Rinkeby => "rinkeby",
            Self::Ropsten => "ropsten",
            Self::Matic => "matic",
            Self::Mumbai => "mumbai",
            Self::XDai => "xDai",
            Self::Poa => "POA",
            Self::Custom(name) => name,
        }
    }

    pub fn chain_id(&self) -> Option<u64> {
        match self {
            Self::Localhost | Self::Hardhat => Some(31337),
            Self::Kovan => Some(42),
            Self::Goerli => Some(5),
            Self::Mainnet => Some(1),
            Self::Rinkeby => Some(4),
            Self::Ropsten => Some(3),
            Self::Matic => Some(137),
            Self::Mumbai => Some(80001),
            Self::XDai => Some(100),
            Self::Poa => Some(99),
            Self::Custom(_) => None,
        }
    }

    /// Rpc endpoint used when the plan configures none.
    pub fn default_url(&self) -> Option<&'static str> {
        match self {
            Self::Localhost | Self::Hardhat => Some(LOCAL_RPC_URL),
            _ => None,
        }
    }
}

impl FromStr for Network {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "localhost" => Self::Localhost,
            "hardhat" => Self::Hardhat,
            "kovan" => Self::Kovan,
            "goerli" => Self::Goerli,
            "mainnet" => Self::Mainnet,
            "rinkeby" => Self::Rinkeby,
            "ropsten" => Self::Ropsten,
            "matic" => Self::Matic,
            "mumbai" => Self::Mumbai,
            "xDai" => Self::XDai,
            "POA" => Self::Poa,
            custom => Self::Custom(custom.to_owned()),
        })
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Network {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(network) => network,
            Err(never) => match never {},
        }
    }
}

/// Returns the `env_override` network if set and not empty, `static_default` otherwise.
pub fn resolve_network(env_override: Option<&str>, static_default: &str) -> Network {
    match env_override {
        Some(name) if !name.is_empty() => name.into(),
        _ => static_default.into(),
    }
}

/// Resolved deployment configuration.
#[derive(Debug, Clone)]
pub struct DeploymentConfig {
    pub target_network: Network,
    pub rpc_url: String,
    pub hardhat_root: PathBuf,
    pub artifacts_dir: PathBuf,
    pub contracts_dir: PathBuf,
    pub assets_path: PathBuf,
    pub compile: bool,
    /// `None` selects the first account of the node.
    pub deployer: Option<Address>,
    pub contracts: Vec<ContractSpec>,
}

impl DeploymentConfig {
    /// Load `.env`, then the plan file named by `DEPLOY_PLAN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            log::debug!("skip .env, {}", err);
        }

        let plan_path = env::var(PLAN_ENV).unwrap_or_else(|_| DEFAULT_PLAN.to_owned());

        log::debug!("load deploy plan {}", plan_path);

        let plan = DeployPlan::load_file(plan_path)?;

        Self::from_plan(
            plan,
            env::var(NETWORK_ENV).ok().as_deref(),
            env::var(DEPLOYER_ENV).ok().as_deref(),
        )
    }

    /// Resolve `plan` with the given environment overrides.
    ///
    /// Contracts without inline args load them from `<contracts_dir>/<Name>.args`.
    pub fn from_plan(
        plan: DeployPlan,
        network_override: Option<&str>,
        deployer: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let target_network = resolve_network(network_override, &plan.default_network);

        let rpc_url = match plan.networks.get(target_network.name()) {
            Some(network) => network.url.clone(),
            None => target_network
                .default_url()
                .ok_or_else(|| ConfigError::NetworkUrl(target_network.to_string()))?
                .to_owned(),
        };

        let deployer = match deployer {
            Some(address) if !address.is_empty() => Some(
                address
                    .parse()
                    .map_err(|err| ConfigError::Address(DEPLOYER_ENV, err))?,
            ),
            _ => None,
        };

        let hardhat_root = plan.hardhat_root.unwrap_or_else(|| PathBuf::from("."));

        let artifacts_dir =
            hardhat_root.join(plan.artifacts_dir.unwrap_or_else(|| "artifacts".into()));

        let contracts_dir =
            hardhat_root.join(plan.contracts_dir.unwrap_or_else(|| "contracts".into()));

        let assets_path = hardhat_root.join(plan.assets.unwrap_or_else(|| "uploaded.json".into()));

        let asset_ids = load_asset_ids(&assets_path).map_err(ConfigError::Assets)?;

        let contracts = plan
            .contracts
            .into_iter()
            .map(|contract| {
                let args = match &contract.args {
                    Some(args) => args.clone(),
                    None => load_constructor_args(&contracts_dir, &contract.name),
                };

                contract_spec(contract, expand_assets(args, &asset_ids))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            target_network,
            rpc_url,
            hardhat_root,
            artifacts_dir,
            contracts_dir,
            assets_path,
            compile: plan.compile,
            deployer,
            contracts,
        })
    }
}

fn contract_spec(
    contract: PlanContract,
    args: Vec<serde_json::Value>,
) -> Result<ContractSpec, ConfigError> {
    let value = match &contract.value {
        Some(value) => Some(
            parse_ether(value).map_err(|err| ConfigError::Value(contract.name.clone(), err))?,
        ),
        None => None,
    };

    Ok(ContractSpec::new(contract.name)
        .with_args(args)
        .with_overrides(Overrides {
            value,
            gas_limit: contract.gas_limit,
            gas_price: contract.gas_price,
            libraries: contract.libraries,
        })
        .with_verify(contract.verify))
}
