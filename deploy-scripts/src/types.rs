//! Types describing a token deployment and its outcome

use std::fmt::{self, Display, Formatter};

use alloy::primitives::Address;

use crate::errors::ScriptError;

/// The configuration of a single token deployment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentRequest {
    /// The name of the contract artifact to instantiate
    pub blueprint: String,
    /// The display name of the token
    pub name: String,
    /// The ticker symbol of the token
    pub symbol: String,
    /// The number of decimals of the token
    pub decimals: u8,
}

impl DeploymentRequest {
    /// Ensure every display string in the request is non-empty
    pub fn validate(&self) -> Result<(), ScriptError> {
        let fields = [
            ("blueprint", &self.blueprint),
            ("name", &self.name),
            ("symbol", &self.symbol),
        ];

        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ScriptError::InvalidRequest(format!("{field} must not be empty")));
            }
        }

        Ok(())
    }
}

/// A token contract which has been deployed and confirmed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedToken {
    /// The request the token was deployed from
    pub request: DeploymentRequest,
    /// The address of the deployed contract
    pub address: Address,
}

impl Display for DeployedToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let DeploymentRequest {
            name,
            symbol,
            decimals,
            ..
        } = &self.request;

        write!(
            f,
            "Token \"{name}\" ({symbol}) with {decimals} decimals is deployed to {}!",
            self.address
        )
    }
}

/// The ERC20 metadata reported by a deployed token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    /// The value returned by `name()`
    pub name: String,
    /// The value returned by `symbol()`
    pub symbol: String,
    /// The value returned by `decimals()`
    pub decimals: u8,
}

impl TokenMetadata {
    /// Check that the on-chain metadata is what the request asked for
    pub fn check_matches(&self, request: &DeploymentRequest) -> Result<(), ScriptError> {
        let mut mismatches = Vec::new();
        if self.name != request.name {
            mismatches.push(format!("name {:?} != {:?}", self.name, request.name));
        }
        if self.symbol != request.symbol {
            mismatches.push(format!("symbol {:?} != {:?}", self.symbol, request.symbol));
        }
        if self.decimals != request.decimals {
            mismatches.push(format!("decimals {} != {}", self.decimals, request.decimals));
        }

        if mismatches.is_empty() {
            Ok(())
        } else {
            Err(ScriptError::ContractInteraction(format!(
                "deployed token metadata mismatch: {}",
                mismatches.join(", ")
            )))
        }
    }
}

impl Display for TokenMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token \"{}\" ({}) with {} decimals",
            self.name, self.symbol, self.decimals
        )
    }
}
