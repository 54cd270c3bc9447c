//! Services Layer
//!
//! - `prover`: Groth16 proving with lazily generated, cached keys
//! - `submission`: the deploy and proof-submission protocol

pub mod prover;
pub mod submission;

pub use prover::EligibilityProver;
pub use submission::{deploy, submit_credit_proofs, submit_credit_score, submit_income_history};
