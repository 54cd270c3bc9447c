//! Error types for the eligibility circuits
//!
//! Provides structured error handling for witness construction and the
//! Groth16 proof plumbing.

use std::fmt;

use ark_relations::r1cs::SynthesisError;
use ark_serialize::SerializationError;

/// Error types for circuit operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    /// Witness sequence has the wrong length
    WitnessLength {
        expected: usize,
        actual: usize,
    },

    /// Witness assignment does not satisfy the constraint system
    Unsatisfiable,

    /// Constraint synthesis failed
    Synthesis {
        reason: String,
    },

    /// Proof artifact could not be (de)serialized
    Serialization {
        reason: String,
    },

    /// Unknown circuit kind tag in a serialized proof
    UnknownCircuitKind {
        tag: u8,
    },
}

impl fmt::Display for CircuitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CircuitError::WitnessLength { expected, actual } => {
                write!(
                    f,
                    "witness sequence has {} entries, expected exactly {}",
                    actual, expected
                )
            }
            CircuitError::Unsatisfiable => {
                write!(f, "witness assignment does not satisfy the circuit")
            }
            CircuitError::Synthesis { reason } => {
                write!(f, "constraint synthesis failed: {}", reason)
            }
            CircuitError::Serialization { reason } => {
                write!(f, "proof serialization failed: {}", reason)
            }
            CircuitError::UnknownCircuitKind { tag } => {
                write!(f, "unknown circuit kind tag {}", tag)
            }
        }
    }
}

impl std::error::Error for CircuitError {}

impl From<SynthesisError> for CircuitError {
    fn from(err: SynthesisError) -> Self {
        CircuitError::Synthesis {
            reason: err.to_string(),
        }
    }
}

impl From<SerializationError> for CircuitError {
    fn from(err: SerializationError) -> Self {
        CircuitError::Serialization {
            reason: err.to_string(),
        }
    }
}
