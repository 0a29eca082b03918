//! Submission pipeline: estimate, buffer, sign

use super::envelope::FeeSchedule;
use super::gas::GasEstimator;
use super::signer::{SignRequest, TransactionSigner};
use crate::config::GasConfig;
use crate::error::SwapResult;
use crate::router::{RouterContract, SwapArguments, PROXIED_SWAP};
use crate::wallet::WalletProvider;

use ethers::providers::{Http, JsonRpcClient};
use ethers::types::{Address, U256};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Inputs of one submission. Optional fields are filled in as wallet and
/// network state become available.
pub struct SubmitParams<P = Http> {
    pub contract: Option<RouterContract>,
    pub chain_id: Option<u64>,
    pub wallet: Option<Arc<WalletProvider<P>>>,
    pub account: Option<Address>,
    pub max_base_fee_per_gas: Option<U256>,
    pub max_priority_fee_per_gas: Option<U256>,
    pub swap: SwapArguments,
    pub value: Option<U256>,
}

impl<P> SubmitParams<P> {
    pub fn new(swap: SwapArguments) -> Self {
        Self {
            contract: None,
            chain_id: None,
            wallet: None,
            account: None,
            max_base_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            swap,
            value: None,
        }
    }

    pub fn contract(mut self, contract: RouterContract) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn wallet(mut self, wallet: Arc<WalletProvider<P>>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn account(mut self, account: Address) -> Self {
        self.account = Some(account);
        self
    }

    pub fn fees(mut self, fees: FeeSchedule) -> Self {
        self.max_base_fee_per_gas = Some(fees.max_base_fee_per_gas);
        self.max_priority_fee_per_gas = Some(fees.max_priority_fee_per_gas);
        self
    }

    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Name of the first required field still missing
    fn missing(&self) -> Option<&'static str> {
        if self.contract.is_none() {
            Some("contract")
        } else if self.chain_id.map_or(true, |id| id == 0) {
            Some("chain_id")
        } else if self.wallet.is_none() {
            Some("wallet")
        } else if self.account.is_none() {
            Some("account")
        } else if self.max_base_fee_per_gas.is_none() {
            Some("max_base_fee_per_gas")
        } else if self.max_priority_fee_per_gas.is_none() {
            Some("max_priority_fee_per_gas")
        } else {
            None
        }
    }
}

/// Runs the estimate-then-sign pipeline for router swaps
#[derive(Debug, Clone)]
pub struct TransactionSubmitter {
    gas: GasConfig,
    method: String,
}

impl TransactionSubmitter {
    pub fn new(gas: GasConfig) -> Self {
        Self {
            gas,
            method: PROXIED_SWAP.to_string(),
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Estimate gas, add the safety buffer and sign.
    ///
    /// Returns `Ok(None)` without touching the wallet when a required
    /// parameter is missing. Estimation and signing failures abort the run.
    pub async fn submit_transaction<P: JsonRpcClient>(
        &self,
        params: SubmitParams<P>,
    ) -> SwapResult<Option<String>> {
        if let Some(field) = params.missing() {
            debug!("Skipping submission, {} not ready", field);
            crate::metrics::record_submission("skipped");
            return Ok(None);
        }

        let SubmitParams {
            contract: Some(contract),
            chain_id: Some(chain_id),
            wallet: Some(wallet),
            account: Some(account),
            max_base_fee_per_gas: Some(max_base_fee_per_gas),
            max_priority_fee_per_gas: Some(max_priority_fee_per_gas),
            swap,
            value,
        } = params
        else {
            return Ok(None);
        };

        let submission_id = Uuid::new_v4();
        info!(%submission_id, chain_id, "Submitting {} via {:?}", self.method, contract.address());

        let estimator = GasEstimator::new(wallet.clone(), &self.gas);
        let estimated = match estimator
            .estimate_gas(&contract, &self.method, &swap, value)
            .await
        {
            Ok(estimated) => estimated,
            Err(e) => {
                if e.is_user_rejection() {
                    info!(%submission_id, "Gas estimation cancelled: {}", e);
                } else {
                    error!(%submission_id, stage = e.stage(), "Gas estimation failed: {}", e);
                }
                crate::metrics::record_submission("failed");
                return Err(e);
            }
        };

        let gas_limit = estimator.apply_buffer(estimated);
        debug!(%submission_id, "Gas limit {} from estimate {}", gas_limit, estimated);

        let signed = TransactionSigner::new(wallet)
            .sign_transaction(SignRequest {
                contract: &contract,
                method: &self.method,
                args: &swap,
                value,
                fees: FeeSchedule::new(max_base_fee_per_gas, max_priority_fee_per_gas),
                gas_limit,
                chain_id,
                account,
            })
            .await;

        match signed {
            Ok(signed) => {
                info!(%submission_id, "Transaction signed ({} bytes)", (signed.len() - 2) / 2);
                crate::metrics::record_submission("signed");
                Ok(Some(signed))
            }
            Err(e) => {
                error!(%submission_id, stage = e.stage(), "Submission failed: {}", e);
                crate::metrics::record_submission("failed");
                Err(e)
            }
        }
    }
}
