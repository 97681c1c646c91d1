//! Implementations of the token deploy scripts

use std::io::Write;

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider},
};
use tracing::info;

use crate::{
    artifacts::BlueprintResolver,
    deployer::ContractDeployer,
    errors::ScriptError,
    solidity::IWrappedCosmosCoin,
    types::{DeployedToken, DeploymentRequest, TokenMetadata},
};

/// Deploy a token from the requested blueprint and report its address.
///
/// The success line is written to `out` only once the deployment has been
/// confirmed; on any error nothing is written.
pub async fn deploy_token<R, D, W>(
    request: DeploymentRequest,
    resolver: &R,
    deployer: &D,
    out: &mut W,
) -> Result<DeployedToken, ScriptError>
where
    R: BlueprintResolver,
    D: ContractDeployer,
    W: Write,
{
    request.validate()?;
    info!(
        blueprint = %request.blueprint,
        name = %request.name,
        symbol = %request.symbol,
        decimals = request.decimals,
        "deploying token"
    );

    let blueprint = resolver.resolve(&request.blueprint)?;
    let init_code = blueprint.deploy_code(&request)?;
    let address = deployer.deploy(init_code).await?;

    let token = DeployedToken { request, address };
    writeln!(out, "{token}").map_err(|e| ScriptError::Output(e.to_string()))?;

    Ok(token)
}

/// Read the ERC20 metadata of a deployed token
pub async fn read_token_metadata(
    provider: &DynProvider,
    address: Address,
) -> Result<TokenMetadata, ScriptError> {
    let code = provider
        .get_code_at(address)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    if code.is_empty() {
        return Err(ScriptError::ContractInteraction(format!(
            "no contract deployed at {address}"
        )));
    }

    let token = IWrappedCosmosCoin::new(address, provider);
    let name = token
        .name()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let symbol = token
        .symbol()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let decimals = token
        .decimals()
        .call()
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    Ok(TokenMetadata {
        name,
        symbol,
        decimals,
    })
}

/// Check that a freshly deployed token reports the metadata it was deployed with
pub async fn verify_token(provider: &DynProvider, token: &DeployedToken) -> Result<(), ScriptError> {
    let metadata = read_token_metadata(provider, token.address).await?;
    metadata.check_matches(&token.request)?;

    info!(address = %token.address, "verified deployed token metadata");
    Ok(())
}

/// Print the metadata of an already deployed token
pub async fn inspect_token<W: Write>(
    provider: &DynProvider,
    address: Address,
    out: &mut W,
) -> Result<TokenMetadata, ScriptError> {
    let metadata = read_token_metadata(provider, address).await?;
    writeln!(out, "{metadata} at {address}").map_err(|e| ScriptError::Output(e.to_string()))?;

    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use std::{
        future::Future,
        sync::{
            atomic::{AtomicU64, Ordering},
            Mutex,
        },
    };

    use alloy::{
        primitives::{address, Bytes},
        sol_types::{sol_data, SolType},
        transports::mock::Asserter,
    };

    use super::*;
    use crate::{
        artifacts::{test_fixtures::wrapped_token_blueprint, Blueprint},
        constants::{
            DEFAULT_TOKEN_DECIMALS, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL,
            LEGACY_WRAPPED_COSMOS_COIN_CONTRACT, WRAPPED_COSMOS_COIN_CONTRACT,
        },
        utils::test_helpers::mocked_provider,
    };

    /// The first default account of a local dev node
    const DEV_ACCOUNT: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    // ----------------
    // | Test Doubles |
    // ----------------

    /// A resolver serving a fixed set of blueprints and recording lookups
    struct StaticBlueprints {
        /// The blueprints available for resolution
        blueprints: Vec<Blueprint>,
        /// The names that were requested
        requested: Mutex<Vec<String>>,
    }

    impl StaticBlueprints {
        fn new(names: &[&str]) -> Self {
            Self {
                blueprints: names.iter().map(|name| wrapped_token_blueprint(name)).collect(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl BlueprintResolver for StaticBlueprints {
        fn resolve(&self, name: &str) -> Result<Blueprint, ScriptError> {
            self.requested.lock().unwrap().push(name.to_string());
            self.blueprints
                .iter()
                .find(|blueprint| blueprint.name == name)
                .cloned()
                .ok_or_else(|| ScriptError::BlueprintNotFound(name.to_string()))
        }
    }

    /// A deployer assigning `CREATE` addresses from an incrementing nonce
    struct MockDeployer {
        /// The account sending the deployments
        sender: Address,
        /// The sender's next nonce
        nonce: AtomicU64,
        /// The init code of every deployment sent
        sent: Mutex<Vec<Bytes>>,
    }

    impl MockDeployer {
        fn new() -> Self {
            Self {
                sender: DEV_ACCOUNT,
                nonce: AtomicU64::new(0),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<Bytes> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl ContractDeployer for MockDeployer {
        fn deploy(
            &self,
            init_code: Bytes,
        ) -> impl Future<Output = Result<Address, ScriptError>> + Send {
            self.sent.lock().unwrap().push(init_code);
            let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
            let address = self.sender.create(nonce);
            async move { Ok(address) }
        }
    }

    /// A deployer whose transactions never confirm
    struct FailingDeployer;

    impl ContractDeployer for FailingDeployer {
        fn deploy(
            &self,
            _init_code: Bytes,
        ) -> impl Future<Output = Result<Address, ScriptError>> + Send {
            async {
                Err(ScriptError::ContractDeployment(
                    "deployment transaction reverted".to_string(),
                ))
            }
        }
    }

    fn katom_request(blueprint: &str) -> DeploymentRequest {
        DeploymentRequest {
            blueprint: blueprint.to_string(),
            name: DEFAULT_TOKEN_NAME.to_string(),
            symbol: DEFAULT_TOKEN_SYMBOL.to_string(),
            decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }

    // ---------
    // | Tests |
    // ---------

    #[tokio::test]
    async fn test_deploy_reports_confirmed_address() {
        let resolver = StaticBlueprints::new(&[WRAPPED_COSMOS_COIN_CONTRACT]);
        let deployer = MockDeployer::new();
        let mut out = Vec::new();

        let request = katom_request(WRAPPED_COSMOS_COIN_CONTRACT);
        let token = deploy_token(request.clone(), &resolver, &deployer, &mut out)
            .await
            .unwrap();

        assert_eq!(token.address, DEV_ACCOUNT.create(0));
        assert_eq!(token.request, request);

        let output = String::from_utf8(out).unwrap();
        assert_eq!(output, format!("{token}\n"));
        assert!(output.contains("\"0g-chain-wrapped ATOM\""));
        assert!(output.contains("(kATOM)"));
        assert!(output.contains("with 6 decimals"));
        assert!(output.contains(&token.address.to_string()));

        let expected_code = wrapped_token_blueprint(WRAPPED_COSMOS_COIN_CONTRACT)
            .deploy_code(&request)
            .unwrap();
        assert_eq!(deployer.sent(), vec![expected_code]);
    }

    #[tokio::test]
    async fn test_resolution_failure_prints_nothing() {
        let resolver = StaticBlueprints::new(&[WRAPPED_COSMOS_COIN_CONTRACT]);
        let deployer = MockDeployer::new();
        let mut out = Vec::new();

        let request = katom_request(LEGACY_WRAPPED_COSMOS_COIN_CONTRACT);
        let err = deploy_token(request, &resolver, &deployer, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::BlueprintNotFound(_)), "{err}");
        assert!(out.is_empty());
        assert!(deployer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_deployment_failure_prints_nothing() {
        let resolver = StaticBlueprints::new(&[WRAPPED_COSMOS_COIN_CONTRACT]);
        let mut out = Vec::new();

        let request = katom_request(WRAPPED_COSMOS_COIN_CONTRACT);
        let err = deploy_token(request, &resolver, &FailingDeployer, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::ContractDeployment(_)), "{err}");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected_before_resolution() {
        let resolver = StaticBlueprints::new(&[WRAPPED_COSMOS_COIN_CONTRACT]);
        let deployer = MockDeployer::new();
        let mut out = Vec::new();

        let mut request = katom_request(WRAPPED_COSMOS_COIN_CONTRACT);
        request.name = String::new();
        let err = deploy_token(request, &resolver, &deployer, &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::InvalidRequest(_)), "{err}");
        assert!(resolver.requested().is_empty());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_blueprint_is_a_parameter() {
        let blueprints = [WRAPPED_COSMOS_COIN_CONTRACT, LEGACY_WRAPPED_COSMOS_COIN_CONTRACT];

        for blueprint in blueprints {
            let resolver = StaticBlueprints::new(&blueprints);
            let deployer = MockDeployer::new();
            let mut out = Vec::new();

            let token = deploy_token(katom_request(blueprint), &resolver, &deployer, &mut out)
                .await
                .unwrap();

            assert_eq!(resolver.requested(), vec![blueprint.to_string()]);
            assert_eq!(token.request.blueprint, blueprint);
            assert_eq!(
                String::from_utf8(out).unwrap(),
                format!(
                    "Token \"0g-chain-wrapped ATOM\" (kATOM) with 6 decimals is deployed to {}!\n",
                    DEV_ACCOUNT.create(0)
                )
            );
        }
    }

    #[tokio::test]
    async fn test_repeated_deployments_get_new_addresses() {
        let resolver = StaticBlueprints::new(&[WRAPPED_COSMOS_COIN_CONTRACT]);
        let deployer = MockDeployer::new();
        let mut out = Vec::new();

        let first = deploy_token(
            katom_request(WRAPPED_COSMOS_COIN_CONTRACT),
            &resolver,
            &deployer,
            &mut out,
        )
        .await
        .unwrap();
        let second = deploy_token(
            katom_request(WRAPPED_COSMOS_COIN_CONTRACT),
            &resolver,
            &deployer,
            &mut out,
        )
        .await
        .unwrap();

        assert_ne!(first.address, second.address);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    // ---------------------
    // | On-chain Metadata |
    // ---------------------

    /// The address the metadata tests read from
    const TOKEN_ADDRESS: Address = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

    /// Queue the responses of a node hosting a token with the given metadata
    fn push_token(asserter: &Asserter, name: &str, symbol: &str, decimals: u8) {
        asserter.push_success(&Bytes::from_static(&[0x60, 0x80, 0x60, 0x40]));
        asserter.push_success(&Bytes::from(sol_data::String::abi_encode(&name.to_string())));
        asserter.push_success(&Bytes::from(sol_data::String::abi_encode(&symbol.to_string())));
        asserter.push_success(&Bytes::from(sol_data::Uint::<8>::abi_encode(&decimals)));
    }

    fn deployed_katom() -> DeployedToken {
        DeployedToken {
            request: katom_request(WRAPPED_COSMOS_COIN_CONTRACT),
            address: TOKEN_ADDRESS,
        }
    }

    #[tokio::test]
    async fn test_read_metadata_requires_code() {
        let asserter = Asserter::new();
        asserter.push_success(&Bytes::new());
        let provider = mocked_provider(&asserter);

        let err = read_token_metadata(&provider, TOKEN_ADDRESS).await.unwrap_err();
        match err {
            ScriptError::ContractInteraction(msg) => {
                assert!(msg.contains("no contract deployed at"), "{msg}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_verify_accepts_matching_metadata() {
        let asserter = Asserter::new();
        push_token(&asserter, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL, DEFAULT_TOKEN_DECIMALS);
        let provider = mocked_provider(&asserter);

        verify_token(&provider, &deployed_katom()).await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_rejects_metadata_mismatch() {
        let asserter = Asserter::new();
        push_token(&asserter, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL, 18);
        let provider = mocked_provider(&asserter);

        let err = verify_token(&provider, &deployed_katom()).await.unwrap_err();
        match err {
            ScriptError::ContractInteraction(msg) => {
                assert!(msg.contains("decimals 18 != 6"), "{msg}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_inspect_prints_metadata() {
        let asserter = Asserter::new();
        push_token(&asserter, "0g-chain-wrapped OSMO", "kOSMO", 6);
        let provider = mocked_provider(&asserter);
        let mut out = Vec::new();

        let metadata = inspect_token(&provider, TOKEN_ADDRESS, &mut out).await.unwrap();

        assert_eq!(metadata.symbol, "kOSMO");
        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!(
                "Token \"0g-chain-wrapped OSMO\" (kOSMO) with 6 decimals at {TOKEN_ADDRESS}\n"
            )
        );
    }
}
