//! Combined eligibility circuit
//!
//! Conjunction of the credit and income predicate groups in a single
//! constraint system: the proof is accepted only when the credit score and
//! all 24 income samples clear their thresholds. There is no partial
//! result.
//!
//! # Circuit Constraints
//! 1. Credit group: range checks + credit_score >= min_credit_score
//! 2. Income group: per-month range checks + month >= monthly_income_req
//! 3. Commitment: income_commitment == Poseidon(month_0, ..., month_23)

use ark_ff::PrimeField;
use ark_r1cs_std::{alloc::AllocVar, eq::EqGadget, fields::fp::FpVar};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};
use ark_std::marker::PhantomData;

use crate::cmp::{enforce_gte, enforce_in_range};
use crate::commitment::commit_gadget;
use crate::income::{IncomeHistory, MONTHS_OF_HISTORY};

/// Combined eligibility circuit
///
/// Public input order: `[min_credit_score, monthly_income_req,
/// income_commitment]`.
#[derive(Clone)]
pub struct EligibilityCircuit<F: PrimeField> {
    /// Private: the applicant's credit score
    pub credit_score: Option<F>,
    /// Private: 24 monthly income samples
    pub income: Option<IncomeHistory<F>>,
    /// Public: minimum credit score threshold
    pub min_credit_score: Option<F>,
    /// Public: minimum monthly income threshold
    pub monthly_income_req: Option<F>,
    /// Public: Poseidon commitment to the income history
    pub income_commitment: Option<F>,
    _marker: PhantomData<F>,
}

impl<F: PrimeField> EligibilityCircuit<F> {
    /// Create a new circuit with a full witness assignment
    pub fn new(
        credit_score: F,
        income: IncomeHistory<F>,
        min_credit_score: F,
        monthly_income_req: F,
        income_commitment: F,
    ) -> Self {
        Self {
            credit_score: Some(credit_score),
            income: Some(income),
            min_credit_score: Some(min_credit_score),
            monthly_income_req: Some(monthly_income_req),
            income_commitment: Some(income_commitment),
            _marker: PhantomData,
        }
    }

    /// Create empty circuit for setup
    pub fn empty() -> Self {
        Self {
            credit_score: None,
            income: None,
            min_credit_score: None,
            monthly_income_req: None,
            income_commitment: None,
            _marker: PhantomData,
        }
    }

    /// Public inputs in allocation order
    pub fn public_inputs(
        min_credit_score: F,
        monthly_income_req: F,
        income_commitment: F,
    ) -> Vec<F> {
        vec![min_credit_score, monthly_income_req, income_commitment]
    }
}

impl<F: PrimeField> ConstraintSynthesizer<F> for EligibilityCircuit<F> {
    fn generate_constraints(self, cs: ConstraintSystemRef<F>) -> Result<(), SynthesisError> {
        // ======== Allocate Private Inputs ========

        let credit_var = FpVar::new_witness(cs.clone(), || {
            self.credit_score.ok_or(SynthesisError::AssignmentMissing)
        })?;

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

        let min_credit_var = FpVar::new_input(cs.clone(), || {
            self.min_credit_score
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        let req_var = FpVar::new_input(cs.clone(), || {
            self.monthly_income_req
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        let commitment_var = FpVar::new_input(cs.clone(), || {
            self.income_commitment
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        // ======== Constraint Group 1: Credit Check ========

        enforce_in_range(&credit_var)?;
        enforce_in_range(&min_credit_var)?;
        enforce_gte(&credit_var, &min_credit_var)?;

        // ======== Constraint Group 2: Income Check ========

        enforce_in_range(&req_var)?;
        for month_var in &month_vars {
            enforce_in_range(month_var)?;
            enforce_gte(month_var, &req_var)?;
        }

        // ======== Constraint Group 3: Commitment Verification ========

        let computed_commitment = commit_gadget(cs, &month_vars)?;
        computed_commitment.enforce_equal(&commitment_var)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_relations::r1cs::ConstraintSystem;

    fn test_circuit(credit_score: u64, monthly_income: u64) -> bool {
        let income = IncomeHistory::uniform(Fr::from(monthly_income));
        let commitment = income.commitment();
        let circuit = EligibilityCircuit::new(
            Fr::from(credit_score),
            income,
            Fr::from(620u64),
            Fr::from(1200u64),
            commitment,
        );

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();

        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_both_groups_pass() {
        // credit 700 >= 620, income 1300 >= 1200
        assert!(test_circuit(700, 1300));
    }

    #[test]
    fn test_boundary_values_pass() {
        // inclusive bounds on both groups
        assert!(test_circuit(620, 1200));
    }

    #[test]
    fn test_low_credit_fails() {
        assert!(!test_circuit(600, 1300));
    }

    #[test]
    fn test_low_income_fails() {
        assert!(!test_circuit(700, 1100));
    }

    #[test]
    fn test_both_low_fails() {
        // no partial accept
        assert!(!test_circuit(600, 1100));
    }

    #[test]
    fn test_constraint_count() {
        let income = IncomeHistory::uniform(Fr::from(1300u64));
        let commitment = income.commitment();
        let circuit = EligibilityCircuit::new(
            Fr::from(700u64),
            income,
            Fr::from(620u64),
            Fr::from(1200u64),
            commitment,
        );

        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();

        // 27 range-checked operands plus 25 comparisons, each a bit
        // decomposition, dominate the count.
        assert!(cs.num_constraints() > 1000);
    }

    #[test]
    fn test_groth16_proof() {
        use ark_bn254::Bn254;
        use ark_groth16::Groth16;
        use ark_snark::SNARK;
        use ark_std::rand::thread_rng;

        let mut rng = thread_rng();

        let credit_score = Fr::from(700u64);
        let min_credit_score = Fr::from(620u64);
        let monthly_income_req = Fr::from(1200u64);
        let income = IncomeHistory::uniform(Fr::from(1300u64));
        let commitment = income.commitment();

        let circuit = EligibilityCircuit::new(
            credit_score,
            income,
            min_credit_score,
            monthly_income_req,
            commitment,
        );

        let (pk, vk) =
            Groth16::<Bn254>::circuit_specific_setup(EligibilityCircuit::<Fr>::empty(), &mut rng)
                .unwrap();

        let proof = Groth16::<Bn254>::prove(&pk, circuit, &mut rng).unwrap();

        let public_inputs =
            EligibilityCircuit::public_inputs(min_credit_score, monthly_income_req, commitment);
        let valid = Groth16::<Bn254>::verify(&vk, &public_inputs, &proof).unwrap();
        assert!(valid, "Groth16 eligibility proof should be valid");
    }
}
