//! Nonce lookup for a single signing attempt
//!
//! No local nonce tracking: every attempt reads the account's transaction
//! count from the wallet and fails outright when that read fails.

use crate::error::{SwapError, SwapResult};

use ethers::prelude::*;
use ethers::providers::{JsonRpcClient, Provider};
use tracing::debug;

/// Fetch the next nonce for `address`
pub async fn fetch_nonce<P: JsonRpcClient>(provider: &Provider<P>, address: Address) -> SwapResult<U256> {
    let nonce = provider
        .get_transaction_count(address, None)
        .await
        .map_err(|e| SwapError::NonceFetch(e.to_string()))?;

    debug!("Fetched nonce {} for {:?}", nonce, address);
    Ok(nonce)
}
