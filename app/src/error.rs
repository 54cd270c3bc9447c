//! Error taxonomy for the ledger and the submission protocol
//!
//! Constraint violations and stale preconditions are not errors: the
//! submission protocol recovers them into a rejected (`false`) result.
//! Only configuration mistakes, confirmation failures and internal faults
//! propagate as `Err`.

use mortgage_circuits::CircuitError;
use thiserror::Error;

/// Errors raised by [`crate::ledger::LocalLedger`] operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("unknown account {0}")]
    UnknownAccount(String),

    #[error("unknown contract account {0}")]
    UnknownContract(String),

    #[error("contract state at {0} read before initialization")]
    Uninitialized(String),

    #[error("unknown transaction {0}")]
    UnknownTransaction(String),

    #[error("transaction was not confirmed within {timeout_ms}ms")]
    ConfirmationTimeout { timeout_ms: u64 },
}

/// Errors surfaced to callers of deploy/submit
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Programmer or deployment error: uninitialized state, witness length
    /// mismatch, missing verifying key. Fatal, not retryable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The transaction could not be confirmed within the expected window.
    /// Distinct from rejection; the same transaction may be re-awaited.
    #[error("transaction was not confirmed within {timeout_ms}ms")]
    NetworkConfirmation { timeout_ms: u64 },

    /// Unexpected internal failure (synthesis, proving, serialization)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<CircuitError> for SubmissionError {
    fn from(err: CircuitError) -> Self {
        match err {
            // A wrong-length witness is a construction-time mistake, not a
            // proving failure.
            CircuitError::WitnessLength { .. } => {
                SubmissionError::Configuration(err.to_string())
            }
            other => SubmissionError::Internal(anyhow::anyhow!(other)),
        }
    }
}

impl From<LedgerError> for SubmissionError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ConfirmationTimeout { timeout_ms } => {
                SubmissionError::NetworkConfirmation { timeout_ms }
            }
            other => SubmissionError::Configuration(other.to_string()),
        }
    }
}
