//! Credit score circuit
//!
//! Proves `credit_score >= min_credit_score` without revealing the score.
//!
//! # Circuit Constraints
//! 1. Range check: credit_score in [0, 2^RANGE_BITS)
//! 2. Range check: min_credit_score in [0, 2^RANGE_BITS)
//! 3. Comparison: credit_score >= min_credit_score

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, fields::fp::FpVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_std::marker::PhantomData;

use crate::cmp::{enforce_gte, enforce_in_range};

/// Credit score circuit
///
/// Public input order: `[min_credit_score]`.
#[derive(Clone)]
pub struct CreditCircuit<F: PrimeField> {
    /// Private: the applicant's credit score
    pub credit_score: Option<F>,
    /// Public: minimum credit score threshold
    pub min_credit_score: Option<F>,
    _marker: PhantomData<F>,
}

impl<F: PrimeField> CreditCircuit<F> {
    /// Create a new circuit with a full witness assignment
    pub fn new(credit_score: F, min_credit_score: F) -> Self {
        Self {
            credit_score: Some(credit_score),
            min_credit_score: Some(min_credit_score),
            _marker: PhantomData,
        }
    }

    /// Create empty circuit for setup
    pub fn empty() -> Self {
        Self {
            credit_score: None,
            min_credit_score: None,
            _marker: PhantomData,
        }
    }

    /// Public inputs in allocation order
    pub fn public_inputs(min_credit_score: F) -> Vec<F> {
        vec![min_credit_score]
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for CreditCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        // ======== Allocate Private Inputs ========

        let credit_var = FpVar::new_witness(cs.clone(), || {
            self.credit_score.ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ======== Allocate Public Inputs ========

        let min_var = FpVar::new_input(cs.clone(), || {
            self.min_credit_score
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ======== Constraints 1 & 2: Range Checks ========

        enforce_in_range(&credit_var)?;
        enforce_in_range(&min_var)?;

        // ======== Constraint 3: Comparison ========

        enforce_gte(&credit_var, &min_var)?;

        Ok(())
    }
}
