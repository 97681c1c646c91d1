//! Scripts for deploying ERC20 wrappers of Cosmos SDK coins to an EVM chain.

#![deny(missing_docs)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod deployer;
pub mod errors;
mod solidity;
pub mod types;
pub mod utils;
