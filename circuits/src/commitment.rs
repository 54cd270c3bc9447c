//! Poseidon commitment over an ordered sequence of scalars
//!
//! The income history witness is committed as
//! `commitment = Poseidon(month_0, month_1, ..., month_23)` and the same
//! hash is recomputed inside the circuit, binding the private sequence to a
//! single public field element.

use ark_crypto_primitives::sponge::{
    constraints::CryptographicSpongeVar,
    poseidon::{
        constraints::PoseidonSpongeVar, find_poseidon_ark_and_mds, PoseidonConfig, PoseidonSponge,
    },
    Absorb, CryptographicSponge,
};
use ark_ff::PrimeField;
use ark_r1cs_std::fields::fp::FpVar;
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

// Standard Poseidon parameters for a 254-bit field:
// rate 2, capacity 1, 8 full rounds, 57 partial rounds, alpha 5.
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 57;
const ALPHA: u64 = 5;
const RATE: usize = 2;
const CAPACITY: usize = 1;

/// Generate the Poseidon configuration used by both the native hash and the
/// in-circuit gadget. Round constants and the MDS matrix come from the
/// arkworks parameter search for the field's modulus.
pub fn poseidon_config<F: PrimeField>() -> PoseidonConfig<F> {
    let (ark, mds) = find_poseidon_ark_and_mds::<F>(
        F::MODULUS_BIT_SIZE as u64,
        RATE,
        FULL_ROUNDS as u64,
        PARTIAL_ROUNDS as u64,
        0,
    );

    PoseidonConfig::new(FULL_ROUNDS, PARTIAL_ROUNDS, ALPHA, mds, ark, RATE, CAPACITY)
}

/// Commit to an ordered sequence of scalars.
pub fn commit<F: PrimeField + Absorb>(elements: &[F]) -> F {
    let mut sponge = PoseidonSponge::new(&poseidon_config::<F>());
    sponge.absorb(&elements.to_vec());
    sponge.squeeze_field_elements(1)[0]
}

/// Recompute the commitment in-circuit over already-allocated variables.
///
/// Must agree with [`commit`] for the same sequence.
pub fn commit_gadget<F: PrimeField>(
    cs: ConstraintSystemRef<F>,
    elements: &[FpVar<F>],
) -> Result<FpVar<F>, SynthesisError> {
    let mut sponge = PoseidonSpongeVar::new(cs, &poseidon_config::<F>());
    sponge.absorb(&elements.to_vec())?;
    let output = sponge.squeeze_field_elements(1)?;
    Ok(output[0].clone())
}
