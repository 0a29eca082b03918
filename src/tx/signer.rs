//! Transaction signing through the connected wallet
//!
//! Two strategies, picked once per call from the wallet identity:
//! - `Standard`: `eth_signTransaction` with a hex-quantity payload
//! - `Workaround`: for the extension wallet that cannot sign typed
//!   transactions, sign the unsigned envelope's hash with `eth_sign` and
//!   serialize the envelope together with that signature

use super::envelope::{FeeSchedule, PopulatedTransaction, SignedTransaction};
use super::nonce::fetch_nonce;
use crate::error::{SwapError, SwapResult};
use crate::router::{RouterContract, SignerKind, SwapArguments};
use crate::wallet::{BrowserKind, WalletProvider};

use ethers::providers::{Http, JsonRpcClient};
use ethers::types::{Address, Signature, H256, U256};
use ethers::utils::keccak256;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How the wallet is asked for a signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningStrategy {
    /// Hash-then-combine via `eth_sign`
    Workaround,
    /// Direct `eth_signTransaction`
    Standard,
}

impl SigningStrategy {
    /// The privacy browser's own wallet handles typed signing, so it always
    /// takes the standard path even when flagged as the extension.
    pub fn select(extension_wallet: bool, browser: BrowserKind) -> Self {
        if extension_wallet && !browser.is_brave() {
            SigningStrategy::Workaround
        } else {
            SigningStrategy::Standard
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SigningStrategy::Workaround => "workaround",
            SigningStrategy::Standard => "standard",
        }
    }

    /// Sign `tx` (chain ID already attached) and return broadcastable hex
    pub async fn sign<P: JsonRpcClient>(
        &self,
        wallet: &WalletProvider<P>,
        tx: &PopulatedTransaction,
        account: Address,
    ) -> SwapResult<String> {
        let signed = match self {
            SigningStrategy::Workaround => {
                let unsigned = tx.unsigned_without_sender();
                let hash = H256::from(keccak256(unsigned.rlp()));
                let signature = with_parity_v(wallet.legacy_sign(account, hash).await?)?;
                SignedTransaction::Raw(unsigned.rlp_signed(&signature))
            }
            SigningStrategy::Standard => {
                let response = wallet.sign_transaction_request(&tx.sign_payload()).await?;
                SignedTransaction::Response(response)
            }
        };

        Ok(signed.into_hex())
    }
}

/// `eth_sign` reports `v` as 27/28, typed envelopes carry the bare y-parity
fn with_parity_v(mut signature: Signature) -> SwapResult<Signature> {
    signature.v = match signature.v {
        0 | 1 => signature.v,
        27 | 28 => signature.v - 27,
        v => {
            return Err(SwapError::Signing(format!(
                "Unexpected recovery id {} in wallet signature",
                v
            )))
        }
    };
    Ok(signature)
}

/// Everything one signing attempt needs
#[derive(Debug, Clone)]
pub struct SignRequest<'a> {
    pub contract: &'a RouterContract,
    pub method: &'a str,
    pub args: &'a SwapArguments,
    pub value: Option<U256>,
    pub fees: FeeSchedule,
    pub gas_limit: U256,
    pub chain_id: u64,
    pub account: Address,
}

/// Builds, signs and serializes router transactions
pub struct TransactionSigner<P = Http> {
    wallet: Arc<WalletProvider<P>>,
}

impl<P: JsonRpcClient> TransactionSigner<P> {
    pub fn new(wallet: Arc<WalletProvider<P>>) -> Self {
        Self { wallet }
    }

    /// Produce a signed transaction for the router call in `request`.
    ///
    /// A fresh nonce is read every time. The wallet identity flag is cleared
    /// while the wallet signs and restored before this returns, whatever the
    /// outcome.
    pub async fn sign_transaction(&self, request: SignRequest<'_>) -> SwapResult<String> {
        let signer = match request.contract.signer() {
            SignerKind::JsonRpc(address) => *address,
            other => {
                return Err(SwapError::UnsupportedSigner(format!(
                    "expected a wallet-backed signer, got {:?}",
                    other
                )))
            }
        };

        let nonce = fetch_nonce(self.wallet.provider(), signer).await?;
        let data = request.contract.encode_call(request.method, request.args)?;
        let populated = PopulatedTransaction::new(
            signer,
            request.contract.address(),
            data,
            nonce,
            request.gas_limit,
            &request.fees,
            request.value,
        );

        let scope = self.wallet.identity().suppress();
        let strategy = SigningStrategy::select(scope.original(), self.wallet.browser());
        let populated = populated.with_chain_id(request.chain_id);
        debug!(
            "Signing {} with nonce {} via {} strategy",
            request.method,
            nonce,
            strategy.name()
        );

        let result = strategy
            .sign(&self.wallet, &populated, request.account)
            .await;
        drop(scope);

        crate::metrics::record_signature(strategy.name(), result.is_ok());
        match &result {
            Ok(_) => info!("Signed {} for chain {}", request.method, request.chain_id),
            Err(e) if e.is_user_rejection() => info!("Signature request declined: {}", e),
            Err(e) => warn!("Signing via {} strategy failed: {}", strategy.name(), e),
        }
        result
    }
}
