//! Constants used in the deploy scripts

/// The default name of the wrapped token
pub const DEFAULT_TOKEN_NAME: &str = "0g-chain-wrapped ATOM";

/// The default symbol of the wrapped token
pub const DEFAULT_TOKEN_SYMBOL: &str = "kATOM";

/// The default number of decimals of the wrapped token, matching the `uatom` denom
pub const DEFAULT_TOKEN_DECIMALS: u8 = 6;

/// The name of the contract that wraps a Cosmos SDK coin as an ERC20
pub const WRAPPED_COSMOS_COIN_CONTRACT: &str = "ERC20ZgChainWrappedCosmosCoin";

/// The name under which older builds of the contracts emitted the wrapper artifact
pub const LEGACY_WRAPPED_COSMOS_COIN_CONTRACT: &str = "ERC200gChainWrappedCosmosCoin";

/// The default directory holding the compiled contract artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

/// The default RPC URL, a local EVM node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The number of confirmations to wait for the contract deployment transaction
pub const NUM_DEPLOY_CONFIRMATIONS: u64 = 1;

/// The extension of a compilation artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The marker solc leaves in bytecode that still references an unlinked library
pub const UNLINKED_LIBRARY_MARKER: &str = "__$";
