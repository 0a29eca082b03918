//! Swap Submitter - quote, estimate, sign and submit aggregator swaps through
//! a browser-connected wallet

pub mod config;
pub mod error;
pub mod metrics;
pub mod quote;
pub mod router;
pub mod tx;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{SwapError, SwapResult};
