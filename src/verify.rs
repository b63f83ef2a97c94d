use std::collections::BTreeSet;

use ethers_primitives::Address;

use crate::config::Network;

/// Networks supported by tenderly verification.
pub const TENDERLY_NETWORKS: &[&str] = &[
    "kovan", "goerli", "mainnet", "rinkeby", "ropsten", "matic", "mumbai", "xDai", "POA",
];

/// Third party verification service.
#[async_trait::async_trait]
pub trait VerificationBackend: Send + Sync {
    /// Register the contract build artifact with the deployed `address`.
    async fn register_artifact(&self, contract_name: &str, address: &Address)
        -> anyhow::Result<()>;

    async fn verify(
        &self,
        contract_name: &str,
        address: &Address,
        network: &Network,
    ) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerificationRequest {
    pub contract_name: String,
    pub address: Address,
    pub target_network: Network,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    /// Target network is not in the allow list, nothing was submitted.
    Unsupported { network: String },
    Failed { reason: String },
}

/// Verification client gated by a network allow list.
///
/// Failures are reported as [`VerificationOutcome::Failed`] and never propagated.
pub struct VerificationClient {
    backend: Box<dyn VerificationBackend>,
    allow_list: BTreeSet<String>,
}

impl VerificationClient {
    pub fn new<I, S>(backend: Box<dyn VerificationBackend>, allow_list: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            backend,
            allow_list: allow_list.into_iter().map(Into::into).collect(),
        }
    }

    /// Client with the [`TENDERLY_NETWORKS`] allow list.
    pub fn tenderly(backend: Box<dyn VerificationBackend>) -> Self {
        Self::new(backend, TENDERLY_NETWORKS.iter().copied())
    }

    pub fn is_supported(&self, network: &Network) -> bool {
        self.allow_list.contains(network.name())
    }

    /// Register the build artifact of a deployed contract on any network.
    ///
    /// Returns false if the backend failed, the error is only logged.
    pub async fn register(&self, contract_name: &str, address: &Address) -> bool {
        match self.backend.register_artifact(contract_name, address).await {
            Ok(()) => true,
            Err(err) => {
                log::error!(
                    target: "verify",
                    "Register artifact of {} failed, {:#}",
                    contract_name,
                    err
                );

                false
            }
        }
    }

    pub async fn verify(&self, request: &VerificationRequest) -> VerificationOutcome {
        let network = &request.target_network;

        if !self.is_supported(network) {
            log::info!(
                target: "verify",
                "Contract verification not supported on {}",
                network
            );

            return VerificationOutcome::Unsupported {
                network: network.to_string(),
            };
        }

        log::info!(
            target: "verify",
            "Attempting verification of {} on {}",
            request.contract_name,
            network
        );

        match self.submit(request).await {
            Ok(()) => {
                log::info!(target: "verify", "{} verified", request.contract_name);

                VerificationOutcome::Verified
            }
            Err(err) => {
                log::error!(
                    target: "verify",
                    "Verification of {} failed, {:#}",
                    request.contract_name,
                    err
                );

                VerificationOutcome::Failed {
                    reason: format!("{:#}", err),
                }
            }
        }
    }

    async fn submit(&self, request: &VerificationRequest) -> anyhow::Result<()> {
        self.backend
            .register_artifact(&request.contract_name, &request.address)
            .await?;

        self.backend
            .verify(
                &request.contract_name,
                &request.address,
                &request.target_network,
            )
            .await
    }
}
