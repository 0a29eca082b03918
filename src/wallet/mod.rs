//! Wallet module - the user's wallet as seen through its JSON-RPC provider
//!
//! This module provides:
//! - The provider wrapper used for nonce, estimation and signing calls
//! - The extension-wallet identity flag and its scoped override
//! - Thin bootstrap helpers (account access, chain ID, fee snapshot)

pub mod identity;
pub mod provider;

pub use identity::{BrowserKind, IdentityScope, WalletIdentity};
pub use provider::{SignTransactionResponse, WalletProvider};
