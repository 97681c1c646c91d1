//! Definitions of CLI arguments and commands for deploy scripts

use std::{io, path::PathBuf, time::Duration};

use alloy::primitives::Address;
use clap::{Args, Parser, Subcommand};

use crate::{
    artifacts::{ArtifactsDir, BlueprintResolver},
    commands::{deploy_token, inspect_token, verify_token},
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_RPC_URL, DEFAULT_TOKEN_DECIMALS, DEFAULT_TOKEN_NAME,
        DEFAULT_TOKEN_SYMBOL, NUM_DEPLOY_CONFIRMATIONS, WRAPPED_COSMOS_COIN_CONTRACT,
    },
    deployer::RpcDeployer,
    errors::ScriptError,
    types::DeploymentRequest,
    utils::setup_client,
};

/// Deploy ERC20 wrappers of Cosmos SDK coins to an EVM chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// The script to run
    #[command(subcommand)]
    pub command: Command,
}

/// The scripts that can be run
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a wrapped cosmos coin token
    DeployToken(DeployTokenArgs),
    /// Print the metadata of a deployed token
    InspectToken(InspectTokenArgs),
}

/// Deploy a token contract from its compilation artifact.
///
/// The contract's constructor must take `(string name, string symbol, uint8 decimals)`.
#[derive(Args, Clone, Debug)]
pub struct DeployTokenArgs {
    /// Name of the contract artifact to deploy
    #[arg(short, long, default_value = WRAPPED_COSMOS_COIN_CONTRACT)]
    pub blueprint: String,

    /// Display name of the token
    #[arg(long, default_value = DEFAULT_TOKEN_NAME)]
    pub name: String,

    /// Ticker symbol of the token
    #[arg(long, default_value = DEFAULT_TOKEN_SYMBOL)]
    pub symbol: String,

    /// Number of decimals of the token
    #[arg(long, default_value_t = DEFAULT_TOKEN_DECIMALS)]
    pub decimals: u8,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Number of confirmations to wait for
    #[arg(long, default_value_t = NUM_DEPLOY_CONFIRMATIONS)]
    pub confirmations: u64,

    /// Give up waiting for confirmation after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Read the token metadata back from the chain after deployment
    #[arg(long)]
    pub verify: bool,
}

impl DeployTokenArgs {
    /// The deployment request described by the arguments
    pub fn request(&self) -> DeploymentRequest {
        DeploymentRequest {
            blueprint: self.blueprint.clone(),
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }
}

/// Read `name()`, `symbol()` and `decimals()` from a deployed token
#[derive(Args, Clone, Debug)]
pub struct InspectTokenArgs {
    /// Address of the token contract
    #[arg(short, long)]
    pub address: Address,
}

impl Command {
    /// Run the command, connecting to the node at `rpc_url` with `priv_key`.
    ///
    /// A deployment resolves its blueprint before connecting, so a missing or
    /// ambiguous artifact is reported without a reachable node.
    pub async fn run(self, priv_key: &str, rpc_url: &str) -> Result<(), ScriptError> {
        match self {
            Command::DeployToken(args) => {
                let request = args.request();
                request.validate()?;
                let blueprint = ArtifactsDir::new(&args.artifacts_dir).resolve(&request.blueprint)?;

                let client = setup_client(priv_key, rpc_url).await?;
                let deployer = RpcDeployer::new(client.clone())
                    .with_confirmations(args.confirmations)
                    .with_timeout(args.timeout_secs.map(Duration::from_secs));

                let token = deploy_token(request, &blueprint, &deployer, &mut io::stdout()).await?;
                if args.verify {
                    verify_token(&client, &token).await?;
                }

                Ok(())
            }
            Command::InspectToken(args) => {
                let client = setup_client(priv_key, rpc_url).await?;
                inspect_token(&client, args.address, &mut io::stdout()).await?;
                Ok(())
            }
        }
    }
}
