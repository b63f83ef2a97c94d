use ethers_hardhat::cmds::compile;
use ethers_primitives::U256;
use ethers_provider::Provider;

use crate::{
    config::{DeploymentConfig, Network},
    orchestrator::Deployer,
    registry::HardhatRegistry,
    store::ArtifactStore,
    tenderly::{TenderlyBackend, TenderlyCredentials},
    verify::VerificationClient,
    DeploymentResult,
};

/// Compile, deploy, record and verify the contracts of the deploy plan.
pub async fn run() -> anyhow::Result<Vec<DeploymentResult>> {
    let config = DeploymentConfig::from_env()?;

    log::info!(
        "Deploying {} contracts to {} ({})",
        config.contracts.len(),
        config.target_network,
        config.rpc_url
    );

    if config.compile {
        compile(&config.hardhat_root).await?;
    }

    let credentials = match TenderlyCredentials::from_env() {
        Ok(credentials) => Some(credentials),
        Err(err) => {
            log::debug!("tenderly verification disabled, {}", err);
            None
        }
    };

    let verifier = VerificationClient::tenderly(Box::new(TenderlyBackend::new(
        credentials,
        &config.artifacts_dir,
        config.hardhat_root.join("deployments"),
        config.target_network.clone(),
    )));

    let provider = ethers_provider::connect_to(config.rpc_url.clone());

    check_chain_id(&provider, &config.target_network).await;

    let registry =
        HardhatRegistry::new(provider, &config.artifacts_dir).with_deployer(config.deployer);

    let deployer = Deployer::new(
        registry,
        ArtifactStore::new(&config.artifacts_dir),
        config.target_network.clone(),
    )
    .with_verification(verifier);

    let results = deployer.run(&config.contracts).await?;

    log::info!(
        "Artifacts (address, abi, and args) saved to: {}",
        deployer.store().dir().to_string_lossy()
    );

    Ok(results)
}

/// Compare the node chain id with the one known for `network`.
///
/// Mismatches and query failures are only warned about, returns false on mismatch.
pub async fn check_chain_id(provider: &Provider, network: &Network) -> bool {
    let expected = match network.chain_id() {
        Some(chain_id) => U256::from(chain_id),
        None => return true,
    };

    match provider.eth_chain_id().await {
        Ok(chain_id) if chain_id == expected => true,
        Ok(chain_id) => {
            log::warn!(
                "Node at {} reports chain id {}, {} expects {}",
                provider.url(),
                chain_id,
                network,
                expected
            );

            false
        }
        Err(err) => {
            log::warn!("Query chain id from {} failed, {}", provider.url(), err);

            true
        }
    }
}
