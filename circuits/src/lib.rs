//! arkworks R1CS circuits for verifiable mortgage eligibility
//!
//! A prover shows, without revealing the underlying figures, that a credit
//! score and 24 months of income each clear a publicly committed threshold.
//!
//! # Available Circuits
//!
//! | Circuit | Predicate | Public inputs |
//! |---------|-----------|---------------|
//! | `CreditCircuit` | credit_score >= min_credit_score | `[min_credit_score]` |
//! | `IncomeCircuit` | every month >= monthly_income_req | `[monthly_income_req, income_commitment]` |
//! | `EligibilityCircuit` | conjunction of both groups | `[min_credit_score, monthly_income_req, income_commitment]` |
//!
//! Comparisons are inclusive (equal-to-threshold passes) and use bit
//! decomposition range checks, so every compared value must fit in
//! [`cmp::RANGE_BITS`] bits. The income history is bound to a Poseidon
//! commitment recomputed inside the circuit.
//!
//! The `proof` module wraps Groth16 setup, witness satisfaction checks,
//! proving and verification around these circuits.

pub mod cmp;
pub mod commitment;
pub mod credit;
pub mod eligibility;
pub mod error;
pub mod income;
pub mod proof;

pub use cmp::RANGE_BITS;
pub use commitment::{commit, commit_gadget, poseidon_config};
pub use credit::CreditCircuit;
pub use eligibility::EligibilityCircuit;
pub use error::CircuitError;
pub use income::{IncomeCircuit, IncomeHistory, MONTHS_OF_HISTORY};
pub use proof::{CircuitKeys, CircuitKind, EligibilityProof};
