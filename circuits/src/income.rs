//! Income history circuit
//!
//! Proves that every one of 24 monthly income samples clears the public
//! requirement, and binds the private sequence to a public Poseidon
//! commitment.
//!
//! # Circuit Constraints
//! 1. Range check: monthly_income_req in [0, 2^RANGE_BITS)
//! 2. For each month: range check + month >= monthly_income_req
//! 3. Commitment: income_commitment == Poseidon(month_0, ..., month_23)
//!
//! A single failing month makes the whole assignment unsatisfiable.

use ark_crypto_primitives::sponge::Absorb;
use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, eq::EqGadget, fields::fp::FpVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_std::marker::PhantomData;

use crate::cmp::{enforce_gte, enforce_in_range};
use crate::commitment::{commit, commit_gadget};
use crate::error::CircuitError;

/// Fixed length of the income history witness: one sample per month over
/// two years.
pub const MONTHS_OF_HISTORY: usize = 24;

/// Length-checked income history witness.
///
/// The length is fixed at compile time; building one from a slice of any
/// other length is a construction-time error, never a runtime comparison
/// failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomeHistory<F: PrimeField>([F; MONTHS_OF_HISTORY]);

impl<F: PrimeField> IncomeHistory<F> {
    /// Wrap an exact-length array of monthly samples
    pub fn new(months: [F; MONTHS_OF_HISTORY]) -> Self {
        Self(months)
    }

    /// Validate a slice into an income history, failing fast on a length
    /// mismatch.
    pub fn from_slice(months: &[F]) -> Result<Self, CircuitError> {
        let months: [F; MONTHS_OF_HISTORY] =
            months
                .try_into()
                .map_err(|_| CircuitError::WitnessLength {
                    expected: MONTHS_OF_HISTORY,
                    actual: months.len(),
                })?;
        Ok(Self(months))
    }

    /// History with the same figure for every month
    pub fn uniform(monthly_income: F) -> Self {
        Self([monthly_income; MONTHS_OF_HISTORY])
    }

    /// Monthly samples in order
    pub fn months(&self) -> &[F; MONTHS_OF_HISTORY] {
        &self.0
    }
}

impl<F: PrimeField + Absorb> IncomeHistory<F> {
    /// Poseidon commitment to the ordered sequence
    pub fn commitment(&self) -> F {
        commit(&self.0)
    }
}

/// Income history circuit
///
/// Public input order: `[monthly_income_req, income_commitment]`.
#[derive(Clone)]
pub struct IncomeCircuit<F: PrimeField> {
    /// Private: 24 monthly income samples
    pub income: Option<IncomeHistory<F>>,
    /// Public: minimum monthly income threshold
    pub monthly_income_req: Option<F>,
    /// Public: Poseidon commitment to the income history
    pub income_commitment: Option<F>,
    _marker: PhantomData<F>,
}

impl<F: PrimeField> IncomeCircuit<F> {
    /// Create a new circuit with a full witness assignment
    pub fn new(income: IncomeHistory<F>, monthly_income_req: F, income_commitment: F) -> Self {
        Self {
            income: Some(income),
            monthly_income_req: Some(monthly_income_req),
            income_commitment: Some(income_commitment),
            _marker: PhantomData,
        }
    }

    /// Create empty circuit for setup
    pub fn empty() -> Self {
        Self {
            income: None,
            monthly_income_req: None,
            income_commitment: None,
            _marker: PhantomData,
        }
    }

    /// Public inputs in allocation order
    pub fn public_inputs(monthly_income_req: F, income_commitment: F) -> Vec<F> {
        vec![monthly_income_req, income_commitment]
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for IncomeCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        // ======== Allocate Private Inputs ========

        let mut month_vars = Vec::with_capacity(MONTHS_OF_HISTORY);
        for i in 0..MONTHS_OF_HISTORY {
            let var = FpVar::new_witness(cs.clone(), || {
                self.income
                    .as_ref()
                    .map(|history| history.months()[i])
                    .ok_or(SynthesisError::AssignmentMissing)
            })?;
            month_vars.push(var);
        }

        // ======== Allocate Public Inputs ========

        let req_var = FpVar::new_input(cs.clone(), || {
            self.monthly_income_req
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        let commitment_var = FpVar::new_input(cs.clone(), || {
            self.income_commitment
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ======== Constraint 1: Requirement Range Check ========

        enforce_in_range(&req_var)?;

        // ======== Constraint 2: Per-Month Comparisons ========

        for month_var in &month_vars {
            enforce_in_range(month_var)?;
            enforce_gte(month_var, &req_var)?;
        }

        // ======== Constraint 3: Commitment Verification ========

        let computed_commitment = commit_gadget(cs, &month_vars)?;
        computed_commitment.enforce_equal(&commitment_var)?;

        Ok(())
    }
}
