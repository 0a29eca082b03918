//! Error types for the swap submission pipeline

use ethers::providers::{ProviderError, RpcError};
use thiserror::Error;

/// EIP-1193 `userRejectedRequest` error code
pub const USER_REJECTED_CODE: i64 = 4001;

/// Main error type for quoting, estimating and signing swaps
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Quote request failed: {0}")]
    Quote(#[from] reqwest::Error),

    #[error("Cannot sign transactions with this wallet type: {0}")]
    UnsupportedSigner(String),

    #[error("Unable to get nonce: {0}")]
    NonceFetch(String),

    #[error("[estimateGas]: {0}")]
    Estimation(String),

    #[error("[signTransaction]: {0}")]
    Signing(String),

    #[error("User rejected the request: {0}")]
    UserRejected(String),

    #[error("Contract error: {0}")]
    Contract(String),

    #[error("Wallet error: {0}")]
    Wallet(String),
}

impl SwapError {
    /// Map a wallet RPC failure, turning code 4001 into a user rejection
    pub fn from_rpc(err: ProviderError, wrap: fn(String) -> SwapError) -> SwapError {
        match err.as_error_response() {
            Some(resp) if resp.code == USER_REJECTED_CODE => {
                SwapError::UserRejected(resp.message.clone())
            }
            _ => wrap(err.to_string()),
        }
    }

    /// Pipeline stage the error came from
    pub fn stage(&self) -> &'static str {
        match self {
            SwapError::Config(_) => "config",
            SwapError::Quote(_) => "quote",
            SwapError::UnsupportedSigner(_) | SwapError::NonceFetch(_) => "prepare",
            SwapError::Estimation(_) => "estimate",
            SwapError::Signing(_) => "sign",
            SwapError::UserRejected(_) => "wallet-prompt",
            SwapError::Contract(_) => "encode",
            SwapError::Wallet(_) => "wallet",
        }
    }

    /// A declined wallet prompt is a cancellation, not a crash
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, SwapError::UserRejected(_))
    }
}

/// Result type for swap operations
pub type SwapResult<T> = Result<T, SwapError>;
