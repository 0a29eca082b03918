//! Swap transaction pipeline: nonce, gas estimation, signing and submission

mod envelope;
mod gas;
mod nonce;
mod signer;
mod submitter;

pub use envelope::{to_quantity, FeeSchedule, PopulatedTransaction, SignTransactionPayload, SignedTransaction};
pub use gas::GasEstimator;
pub use nonce::fetch_nonce;
pub use signer::{SignRequest, SigningStrategy, TransactionSigner};
pub use submitter::{SubmitParams, TransactionSubmitter};
