use crate::{
    codec::encode_constructor_args,
    config::Network,
    error::DeployError,
    gas,
    registry::ContractRegistry,
    store::ArtifactStore,
    verify::{VerificationClient, VerificationOutcome, VerificationRequest},
    ContractSpec, DeploymentResult,
};

/// Deploys contracts one by one: resolve, construct, record, then optionally verify.
///
/// Deployments of the same contract name must not run concurrently, the
/// artifact records are last write wins.
pub struct Deployer<R> {
    registry: R,
    store: ArtifactStore,
    network: Network,
    verifier: Option<VerificationClient>,
}

impl<R> Deployer<R>
where
    R: ContractRegistry,
{
    pub fn new(registry: R, store: ArtifactStore, network: Network) -> Self {
        Self {
            registry,
            store,
            network,
            verifier: None,
        }
    }

    pub fn with_verification(mut self, verifier: VerificationClient) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Deploy one contract, write its artifact records and register its build
    /// artifact with the verification backend, if any.
    ///
    /// Record failures are logged, the deployment still succeeds.
    pub async fn deploy(&self, spec: &ContractSpec) -> Result<DeploymentResult, DeployError> {
        log::info!(target: "deploy", "Deploying: {}", spec.name);

        let factory = self
            .registry
            .resolve(&spec.name, &spec.overrides.libraries)
            .await
            .map_err(|err| DeployError::Resolve(spec.name.clone(), err))?;

        let deployed = factory
            .deploy(&spec.args, &spec.overrides)
            .await
            .map_err(|err| DeployError::Construct(spec.name.clone(), err))?;

        log::info!(target: "deploy", "{} deployed to: {}", spec.name, deployed.address);

        let gas_info = gas::describe(deployed.deploy_transaction.as_ref());

        if gas_info.is_empty() {
            log::debug!(target: "deploy", "{} gas info unavailable", spec.name);
        } else {
            log::info!(target: "deploy", "{}", gas_info);
        }

        let encoded = encode_constructor_args(&deployed, &spec.args)
            .map_err(|err| DeployError::Codec(spec.name.clone(), err))?;

        let result = DeploymentResult::new(&deployed, encoded);

        if let Err(err) = self.store.write(&result) {
            log::error!(
                target: "deploy",
                "Write {} artifacts to {:?} failed, {}",
                spec.name,
                self.store.dir(),
                err
            );
        }

        if let Some(verifier) = &self.verifier {
            verifier.register(&result.contract_name, &result.address).await;
        }

        Ok(result)
    }

    /// Submit a deployed contract to the verification backend of the target network.
    pub async fn verify(&self, result: &DeploymentResult) -> VerificationOutcome {
        let verifier = match &self.verifier {
            Some(verifier) => verifier,
            None => {
                log::warn!(
                    target: "deploy",
                    "No verification backend, skip {}",
                    result.contract_name
                );

                return VerificationOutcome::Failed {
                    reason: "verification backend not configured".to_owned(),
                };
            }
        };

        verifier
            .verify(&VerificationRequest {
                contract_name: result.contract_name.clone(),
                address: result.address,
                target_network: self.network.clone(),
            })
            .await
    }

    /// Deploy `specs` in order, stops at the first failed deployment.
    ///
    /// Contracts flagged with `verify` are verified right after their records are written.
    pub async fn run(&self, specs: &[ContractSpec]) -> Result<Vec<DeploymentResult>, DeployError> {
        let mut results = Vec::with_capacity(specs.len());

        for spec in specs {
            let result = self.deploy(spec).await?;

            if spec.verify {
                self.verify(&result).await;
            }

            results.push(result);
        }

        Ok(results)
    }
}
