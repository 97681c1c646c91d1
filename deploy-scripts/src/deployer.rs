//! Submission of contract creation transactions

use std::{future::Future, time::Duration};

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, Bytes},
    providers::{DynProvider, Provider},
    rpc::types::TransactionRequest,
};
use tracing::info;

use crate::{constants::NUM_DEPLOY_CONFIRMATIONS, errors::ScriptError};

/// A client able to create contract instances on chain
pub trait ContractDeployer {
    /// Send a creation transaction with the given init code and wait until it
    /// is confirmed, returning the address of the new contract
    fn deploy(&self, init_code: Bytes) -> impl Future<Output = Result<Address, ScriptError>> + Send;
}

/// A [`ContractDeployer`] which sends transactions through a wallet-enabled RPC provider
#[derive(Clone)]
pub struct RpcDeployer {
    /// The provider used to send the deployment transaction
    provider: DynProvider,
    /// The number of confirmations to wait for
    confirmations: u64,
    /// How long to wait for the confirmations, if bounded
    timeout: Option<Duration>,
}

impl RpcDeployer {
    /// Create a deployer waiting for the default number of confirmations
    pub fn new(provider: DynProvider) -> Self {
        Self {
            provider,
            confirmations: NUM_DEPLOY_CONFIRMATIONS,
            timeout: None,
        }
    }

    /// Set the number of confirmations to wait for
    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = confirmations;
        self
    }

    /// Bound the time spent waiting for confirmation
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl ContractDeployer for RpcDeployer {
    async fn deploy(&self, init_code: Bytes) -> Result<Address, ScriptError> {
        let tx = TransactionRequest::default().with_deploy_code(init_code);
        let pending_tx = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let tx_hash = *pending_tx.tx_hash();
        info!(%tx_hash, confirmations = self.confirmations, "deployment transaction sent");

        let receipt = pending_tx
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.timeout)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "deployment transaction {tx_hash} reverted"
            )));
        }

        receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!(
                "receipt for {tx_hash} has no contract address"
            ))
        })
    }
}
