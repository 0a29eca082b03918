//! Gas estimation for router calls

use crate::config::GasConfig;
use crate::error::{SwapError, SwapResult};
use crate::router::{RouterContract, SwapArguments};
use crate::wallet::WalletProvider;

use ethers::prelude::*;
use ethers::providers::{Http, JsonRpcClient};
use ethers::types::transaction::eip2718::TypedTransaction;
use std::sync::Arc;
use tracing::{debug, warn};

/// Gas estimator for swap transactions
pub struct GasEstimator<P = Http> {
    wallet: Arc<WalletProvider<P>>,
    /// Buffer percentage for gas limit (e.g., 20 = 20% buffer)
    gas_limit_buffer_percent: u64,
    /// Upper bound passed along with non-zero value estimations
    estimation_gas_hint: U256,
}

impl<P: JsonRpcClient> GasEstimator<P> {
    /// Create a new gas estimator
    pub fn new(wallet: Arc<WalletProvider<P>>, config: &GasConfig) -> Self {
        Self {
            wallet,
            gas_limit_buffer_percent: config.limit_buffer_percent,
            estimation_gas_hint: U256::from(config.estimation_gas_hint),
        }
    }

    /// Estimate gas for `method` on the router.
    ///
    /// Zero or missing value sends neither gas nor value with the estimate;
    /// some routers revert on an explicit zero value.
    pub async fn estimate_gas(
        &self,
        contract: &RouterContract,
        method: &str,
        args: &SwapArguments,
        value: Option<U256>,
    ) -> SwapResult<U256> {
        let data = contract.encode_call(method, args)?;

        let mut request = Eip1559TransactionRequest::new()
            .to(contract.address())
            .data(data);
        if let Some(from) = contract.signer().address() {
            request = request.from(from);
        }
        if let Some(value) = value.filter(|value| !value.is_zero()) {
            request = request.gas(self.estimation_gas_hint).value(value);
        }
        let tx = TypedTransaction::Eip1559(request);

        let estimated = self
            .wallet
            .provider()
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| {
                warn!("Gas estimation for {} reverted: {}", method, e);
                SwapError::from_rpc(e, SwapError::Estimation)
            });

        crate::metrics::record_gas_estimation(estimated.is_ok());
        let estimated = estimated?;
        debug!("Estimated {} gas for {}", estimated, method);
        Ok(estimated)
    }

    /// Apply the safety buffer, rounding to the nearest gas unit
    pub fn apply_buffer(&self, estimated: U256) -> U256 {
        let scaled = estimated * U256::from(100 + self.gas_limit_buffer_percent);
        (scaled + U256::from(50)) / U256::from(100)
    }
}
