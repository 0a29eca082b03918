//! Wallet identity flag and its scoped override
//!
//! Injected extension wallets announce themselves with a flag on the provider.
//! While that flag is set, legacy hash signing gets rewritten to
//! `personal_sign`, which prefixes the payload and breaks transaction
//! signatures. Signing therefore clears the flag for its own duration and puts
//! the original value back afterwards.
//!
//! The flag is shared by everything holding the same provider. Two signings
//! racing on one provider can observe each other's override; callers that
//! submit concurrently must use separate providers.

use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};

/// Browser hosting the wallet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    /// Privacy browser whose built-in wallet signs typed transactions natively
    Brave,
    #[default]
    Other,
}

impl BrowserKind {
    pub fn is_brave(&self) -> bool {
        matches!(self, BrowserKind::Brave)
    }
}

/// "Is this the extension wallet that needs the signing workaround"
#[derive(Debug, Default)]
pub struct WalletIdentity {
    extension: AtomicBool,
}

impl WalletIdentity {
    pub fn new(extension: bool) -> Self {
        Self {
            extension: AtomicBool::new(extension),
        }
    }

    pub fn is_extension(&self) -> bool {
        self.extension.load(Ordering::SeqCst)
    }

    /// Clear the flag until the returned scope is dropped
    pub fn suppress(&self) -> IdentityScope<'_> {
        let original = self.extension.swap(false, Ordering::SeqCst);
        IdentityScope {
            identity: self,
            original,
        }
    }
}

/// Restores the identity flag on drop, on success and error paths alike
#[must_use = "dropping the scope restores the flag immediately"]
pub struct IdentityScope<'a> {
    identity: &'a WalletIdentity,
    original: bool,
}

impl IdentityScope<'_> {
    /// Flag value captured when the scope was entered
    pub fn original(&self) -> bool {
        self.original
    }
}

impl Drop for IdentityScope<'_> {
    fn drop(&mut self) {
        self.identity
            .extension
            .store(self.original, Ordering::SeqCst);
    }
}
