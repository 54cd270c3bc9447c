//! Comparison helpers for greater-than-or-equal over field elements
//!
//! Proves a >= b by showing (a - b) is in range [0, 2^RANGE_BITS).
//!
//! # Strategy
//! 1. Compute diff = a - b (in the finite field)
//! 2. Range check that diff is in [0, 2^RANGE_BITS)
//! 3. If a >= b, diff is small and in range
//! 4. If a < b, diff wraps to p - (b - a) which is huge, failing range check
//!
//! # Important Constraint
//! Both a and b MUST be in range [0, 2^RANGE_BITS) for this to work
//! correctly, so callers range check every operand before comparing.

use ark_ff::PrimeField;
use ark_r1cs_std::{boolean::Boolean, eq::EqGadget, fields::fp::FpVar, ToBitsGadget};
use ark_relations::r1cs::SynthesisError;

/// Number of bits for range checking
pub const RANGE_BITS: usize = 64;

/// Enforce that `value` fits in [`RANGE_BITS`] bits.
///
/// Decomposes the value into bits (~`RANGE_BITS` constraints) and forces
/// every higher bit to zero.
pub fn enforce_in_range<F: PrimeField>(value: &FpVar<F>) -> Result<(), SynthesisError> {
    let bits = value.to_bits_le()?;
    for bit in bits.iter().skip(RANGE_BITS) {
        bit.enforce_equal(&Boolean::constant(false))?;
    }
    Ok(())
}

/// Enforce `a >= b` (inclusive bound).
///
/// Both operands must already be range checked to [`RANGE_BITS`] bits.
pub fn enforce_gte<F: PrimeField>(a: &FpVar<F>, b: &FpVar<F>) -> Result<(), SynthesisError> {
    let diff = a - b;
    enforce_in_range(&diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_r1cs_std::alloc::AllocVar;
    use ark_relations::r1cs::ConstraintSystem;

    fn check_gte(a: u64, b: u64) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let a_var = FpVar::new_witness(cs.clone(), || Ok(Fr::from(a))).unwrap();
        let b_var = FpVar::new_witness(cs.clone(), || Ok(Fr::from(b))).unwrap();

        enforce_in_range(&a_var).unwrap();
        enforce_in_range(&b_var).unwrap();
        enforce_gte(&a_var, &b_var).unwrap();

        cs.is_satisfied().unwrap()
    }

    #[test]
    fn test_strictly_greater() {
        assert!(check_gte(700, 620));
    }

    #[test]
    fn test_equal_values_pass() {
        // inclusive bound
        assert!(check_gte(620, 620));
    }

    #[test]
    fn test_smaller_value_fails() {
        assert!(!check_gte(600, 620));
    }

    #[test]
    fn test_zero_bound() {
        assert!(check_gte(0, 0));
    }

    #[test]
    fn test_out_of_range_operand_fails() {
        // An operand above 2^RANGE_BITS fails its own range check even
        // though the difference would be small.
        let cs = ConstraintSystem::<Fr>::new_ref();
        let big = Fr::from(u64::MAX) + Fr::from(2u64);
        let a_var = FpVar::new_witness(cs.clone(), || Ok(big)).unwrap();

        enforce_in_range(&a_var).unwrap();
        assert!(!cs.is_satisfied().unwrap());
    }
}
