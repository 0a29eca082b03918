//! Wallet-backed JSON-RPC provider

use super::identity::{BrowserKind, WalletIdentity};
use crate::config::WalletConfig;
use crate::error::{SwapError, SwapResult};
use crate::tx::FeeSchedule;

use ethers::prelude::*;
use ethers::providers::{Http, JsonRpcClient, Provider};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Response of `eth_signTransaction`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignTransactionResponse {
    pub raw: Bytes,
    #[serde(default)]
    pub tx: serde_json::Value,
}

/// Connection to the user's wallet
pub struct WalletProvider<P = Http> {
    provider: Provider<P>,
    identity: WalletIdentity,
    browser: BrowserKind,
}

impl WalletProvider<Http> {
    /// Connect over HTTP using the wallet section of the config
    pub fn connect(config: &WalletConfig) -> SwapResult<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| SwapError::Config(format!("Invalid wallet RPC URL: {}", e)))?
            .interval(Duration::from_millis(100));

        debug!("Wallet provider configured for {}", config.rpc_url);
        Ok(Self::new(provider, config.extension_wallet, config.browser))
    }
}

impl<P: JsonRpcClient> WalletProvider<P> {
    pub fn new(provider: Provider<P>, extension_wallet: bool, browser: BrowserKind) -> Self {
        Self {
            provider,
            identity: WalletIdentity::new(extension_wallet),
            browser,
        }
    }

    pub fn provider(&self) -> &Provider<P> {
        &self.provider
    }

    pub fn identity(&self) -> &WalletIdentity {
        &self.identity
    }

    pub fn browser(&self) -> BrowserKind {
        self.browser
    }

    /// Prompt the wallet for account access
    pub async fn request_accounts(&self) -> SwapResult<Vec<Address>> {
        let accounts: Vec<Address> = self
            .provider
            .request("eth_requestAccounts", ())
            .await
            .map_err(|e| SwapError::from_rpc(e, SwapError::Wallet))?;

        info!("Wallet connected with {} account(s)", accounts.len());
        Ok(accounts)
    }

    /// Chain the wallet is connected to
    pub async fn chain_id(&self) -> SwapResult<u64> {
        self.provider
            .get_chainid()
            .await
            .map(|id| id.as_u64())
            .map_err(|e| SwapError::Wallet(e.to_string()))
    }

    /// One-shot fee snapshot from the latest block
    pub async fn fee_schedule(&self, priority_fee: U256) -> SwapResult<FeeSchedule> {
        let block = self
            .provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| SwapError::Wallet(e.to_string()))?
            .ok_or_else(|| SwapError::Wallet("No latest block".to_string()))?;

        let base_fee = block
            .base_fee_per_gas
            .ok_or_else(|| SwapError::Wallet("No base fee in block".to_string()))?;

        // Max fee = 2 * base_fee + priority_fee (buffer for block variability)
        let schedule = FeeSchedule::new(base_fee * 2 + priority_fee, priority_fee);
        debug!("Fee snapshot: {:?}", schedule);
        Ok(schedule)
    }

    /// Sign a 32-byte hash with the wallet's legacy signing method.
    ///
    /// While the extension flag is set the request goes out as `personal_sign`,
    /// which signs a prefixed message instead of the raw hash.
    pub async fn legacy_sign(&self, account: Address, hash: H256) -> SwapResult<Signature> {
        let signature: String = if self.identity.is_extension() {
            self.provider
                .request("personal_sign", (hash, account))
                .await
        } else {
            self.provider.request("eth_sign", (account, hash)).await
        }
        .map_err(|e| SwapError::from_rpc(e, SwapError::Signing))?;

        Signature::from_str(&signature)
            .map_err(|e| SwapError::Signing(format!("Malformed signature {}: {}", signature, e)))
    }

    /// Ask the wallet to sign a full transaction payload
    pub async fn sign_transaction_request<T>(&self, payload: &T) -> SwapResult<SignTransactionResponse>
    where
        T: Serialize + std::fmt::Debug + Send + Sync,
    {
        self.provider
            .request("eth_signTransaction", [payload])
            .await
            .map_err(|e| SwapError::from_rpc(e, SwapError::Signing))
    }

    /// Broadcast an already signed transaction
    pub async fn send_raw_transaction(&self, raw: Bytes) -> SwapResult<H256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| SwapError::from_rpc(e, SwapError::Wallet))?;

        let tx_hash = pending.tx_hash();
        info!("Transaction broadcast: {:?}", tx_hash);
        Ok(tx_hash)
    }
}
