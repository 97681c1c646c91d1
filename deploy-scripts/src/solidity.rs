//! Definitions of Solidity functions called on deployed tokens

use alloy::sol;

sol! {
    /// The ERC20 metadata getters of a wrapped cosmos coin token
    #[sol(rpc)]
    interface IWrappedCosmosCoin {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
    }
}
