//! Groth16 plumbing around the eligibility circuits
//!
//! Setup produces a proving key and a prepared verifying key per circuit.
//! Proving first replays the witness assignment through the constraint
//! system; an unsatisfied assignment is reported as
//! [`CircuitError::Unsatisfiable`] and no proof is produced, so a failing
//! witness can never yield an artifact that merely fails verification
//! later.

use ark_ec::pairing::Pairing;
use ark_groth16::{prepare_verifying_key, Groth16, PreparedVerifyingKey, Proof, ProvingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use std::fmt;

use crate::error::CircuitError;

/// Which predicate family a proof was produced for.
///
/// The credit and income groups are independent sub-circuits; `Eligibility`
/// is their conjunction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CircuitKind {
    Credit,
    Income,
    Eligibility,
}

impl CircuitKind {
    /// Stable one-byte tag used in serialized proofs
    pub fn tag(self) -> u8 {
        match self {
            CircuitKind::Credit => 0,
            CircuitKind::Income => 1,
            CircuitKind::Eligibility => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, CircuitError> {
        match tag {
            0 => Ok(CircuitKind::Credit),
            1 => Ok(CircuitKind::Income),
            2 => Ok(CircuitKind::Eligibility),
            _ => Err(CircuitError::UnknownCircuitKind { tag }),
        }
    }
}

impl fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitKind::Credit => write!(f, "credit"),
            CircuitKind::Income => write!(f, "income"),
            CircuitKind::Eligibility => write!(f, "eligibility"),
        }
    }
}

/// Keys produced by circuit-specific setup
#[derive(Clone)]
pub struct CircuitKeys<E: Pairing> {
    pub proving_key: ProvingKey<E>,
    pub verifying_key: PreparedVerifyingKey<E>,
}

/// A proof artifact: the Groth16 proof together with the ordered public
/// inputs it was produced against and the circuit it belongs to.
#[derive(Clone, Debug)]
pub struct EligibilityProof<E: Pairing> {
    pub kind: CircuitKind,
    pub proof: Proof<E>,
    pub public_inputs: Vec<E::ScalarField>,
}

impl<E: Pairing> EligibilityProof<E> {
    /// Compressed byte encoding: kind tag, proof, public inputs
    pub fn to_bytes(&self) -> Result<Vec<u8>, CircuitError> {
        let mut bytes = vec![self.kind.tag()];
        self.proof.serialize_compressed(&mut bytes)?;
        self.public_inputs.serialize_compressed(&mut bytes)?;
        Ok(bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CircuitError> {
        let (&tag, rest) = bytes
            .split_first()
            .ok_or_else(|| CircuitError::Serialization {
                reason: "empty buffer".to_string(),
            })?;
        let kind = CircuitKind::from_tag(tag)?;

        let mut reader = rest;
        let proof = Proof::<E>::deserialize_compressed(&mut reader)?;
        let public_inputs = Vec::<E::ScalarField>::deserialize_compressed(&mut reader)?;

        Ok(Self {
            kind,
            proof,
            public_inputs,
        })
    }
}

/// Run circuit-specific setup and prepare the verifying key.
pub fn setup<E, C, R>(circuit: C, rng: &mut R) -> Result<CircuitKeys<E>, CircuitError>
where
    E: Pairing,
    C: ConstraintSynthesizer<E::ScalarField>,
    R: RngCore + CryptoRng,
{
    let (proving_key, vk) = Groth16::<E>::circuit_specific_setup(circuit, rng)?;
    Ok(CircuitKeys {
        proving_key,
        verifying_key: prepare_verifying_key(&vk),
    })
}

/// Replay the witness assignment and report whether it satisfies the
/// constraint system.
pub fn is_satisfied<F, C>(circuit: C) -> Result<bool, CircuitError>
where
    F: ark_ff::PrimeField,
    C: ConstraintSynthesizer<F>,
{
    let cs = ConstraintSystem::<F>::new_ref();
    circuit.generate_constraints(cs.clone())?;
    Ok(cs.is_satisfied()?)
}

/// Produce a proof artifact for a satisfied witness assignment.
///
/// Returns [`CircuitError::Unsatisfiable`] without proving when the
/// assignment fails any constraint.
pub fn prove<E, C, R>(
    kind: CircuitKind,
    proving_key: &ProvingKey<E>,
    circuit: C,
    public_inputs: Vec<E::ScalarField>,
    rng: &mut R,
) -> Result<EligibilityProof<E>, CircuitError>
where
    E: Pairing,
    C: ConstraintSynthesizer<E::ScalarField> + Clone,
    R: RngCore + CryptoRng,
{
    if !is_satisfied(circuit.clone())? {
        return Err(CircuitError::Unsatisfiable);
    }

    let proof = Groth16::<E>::prove(proving_key, circuit, rng)?;
    Ok(EligibilityProof {
        kind,
        proof,
        public_inputs,
    })
}

/// Verify a proof artifact against a prepared verifying key.
pub fn verify<E: Pairing>(
    verifying_key: &PreparedVerifyingKey<E>,
    proof: &EligibilityProof<E>,
) -> Result<bool, CircuitError> {
    Ok(Groth16::<E>::verify_proof(
        verifying_key,
        &proof.proof,
        &proof.public_inputs,
    )?)
}
