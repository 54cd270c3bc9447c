//! Proof-gated mortgage eligibility checker
//!
//! An applicant proves, without revealing the figures, that a credit score
//! and 24 months of income satisfy thresholds committed on a local ledger.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     Caller                           │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                 Services Layer                       │
//! │   deploy / submit_*        EligibilityProver         │
//! │   (read-then-assert)       (cached Groth16 keys)     │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                  LocalLedger                         │
//! │   accounts · contract state · preconditions ·        │
//! │   permission policy · transaction journal            │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: ledger/runtime configuration
//! - `contract`: contract state view and permission policy
//! - `error`: error taxonomy
//! - `ledger`: explicit in-memory ledger handle
//! - `services`: prover service and the deploy/submit protocol

pub mod config;
pub mod contract;
pub mod error;
pub mod ledger;
pub mod services;

// Re-exports for convenience
pub use config::LedgerConfig;
pub use contract::{EligibilityRequirements, MortgageContract, PermissionPolicy};
pub use error::{LedgerError, SubmissionError};
pub use ledger::account::{Address, Keypair};
pub use ledger::transaction::{
    Authorization, FailureReason, Transaction, TransactionKind, TransactionReceipt,
    TransactionStatus, TxHash,
};
pub use ledger::LocalLedger;
pub use services::prover::EligibilityProver;
pub use services::submission::{
    deploy, submit_credit_proofs, submit_credit_score, submit_income_history,
};

/// The scalar field all thresholds and witnesses live in.
pub type Scalar = ark_bn254::Fr;

/// Install a tracing subscriber honoring `RUST_LOG`, defaulting to `info`
/// for this crate. Safe to call more than once.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mortgage_zkapp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
