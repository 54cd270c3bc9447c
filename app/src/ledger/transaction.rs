//! Transactions, authorization and receipts
//!
//! A transaction binds a contract address, a fee payer, its semantic
//! payload and an authorization over the payload digest. The digest covers
//! every field except the authorization itself, so signing and proving
//! attach to a stable identity.

use ark_bn254::Bn254;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::CanonicalSerialize;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::collections::HashMap;
use std::fmt;

use ark_groth16::PreparedVerifyingKey;
use mortgage_circuits::{CircuitKind, EligibilityProof};

use crate::contract::{EligibilityRequirements, PermissionPolicy};
use crate::ledger::account::{Address, Keypair, Signature};
use crate::Scalar;

const TRANSACTION_DOMAIN: &[u8] = b"mortgage-zkapp/transaction";

/// Hash identifying a submitted transaction
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub(crate) fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.to_hex())
    }
}

/// Semantic payload of a transaction
pub enum TransactionKind {
    /// Create and initialize the contract account: thresholds, verifying
    /// keys and the permission policy, all in one atomic step.
    Deploy {
        requirements: EligibilityRequirements,
        verifying_keys: HashMap<CircuitKind, PreparedVerifyingKey<Bn254>>,
        policy: PermissionPolicy,
    },

    /// Prove eligibility against the thresholds asserted in the
    /// precondition. Mutates nothing.
    SubmitProof {
        precondition: EligibilityRequirements,
    },
}

/// How the transaction is authorized
pub enum Authorization {
    Proof(EligibilityProof<Bn254>),
    Signature(Signature),
    None,
}

/// A transaction against the local ledger
pub struct Transaction {
    pub contract: Address,
    pub fee_payer: Address,
    pub fee: u64,
    pub kind: TransactionKind,
    pub authorization: Authorization,
}

impl Transaction {
    pub fn new(contract: Address, fee_payer: Address, fee: u64, kind: TransactionKind) -> Self {
        Self {
            contract,
            fee_payer,
            fee,
            kind,
            authorization: Authorization::None,
        }
    }

    /// Digest over the semantic fields, excluding the authorization
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(TRANSACTION_DOMAIN);
        hasher.update(self.contract.as_bytes());
        hasher.update(self.fee_payer.as_bytes());
        hasher.update(self.fee.to_le_bytes());

        match &self.kind {
            TransactionKind::Deploy {
                requirements,
                verifying_keys,
                policy,
            } => {
                hasher.update([0u8]);
                hasher.update(scalar_bytes(&requirements.min_credit_score));
                hasher.update(scalar_bytes(&requirements.monthly_income_req));
                hasher.update([policy_tag(*policy)]);
                hasher.update(verifying_keys_digest(verifying_keys));
            }
            TransactionKind::SubmitProof { precondition } => {
                hasher.update([1u8]);
                hasher.update(scalar_bytes(&precondition.min_credit_score));
                hasher.update(scalar_bytes(&precondition.monthly_income_req));
            }
        }

        hasher.finalize().into()
    }

    /// Attach a signature authorization over the digest
    pub fn signed_by(mut self, keypair: &Keypair) -> Self {
        let digest = self.digest();
        self.authorization = Authorization::Signature(keypair.sign(&digest));
        self
    }

    /// Attach a proof authorization
    pub fn with_proof(mut self, proof: EligibilityProof<Bn254>) -> Self {
        self.authorization = Authorization::Proof(proof);
        self
    }
}

fn scalar_bytes(scalar: &Scalar) -> Vec<u8> {
    scalar.into_bigint().to_bytes_le()
}

/// Digest over the installed verifying keys, so a signed deploy cannot have
/// its key map swapped after signing. Keys are hashed in tag order; map
/// iteration order is unspecified.
fn verifying_keys_digest(
    verifying_keys: &HashMap<CircuitKind, PreparedVerifyingKey<Bn254>>,
) -> [u8; 32] {
    let mut kinds: Vec<CircuitKind> = verifying_keys.keys().copied().collect();
    kinds.sort_by_key(|kind| kind.tag());

    let mut hasher = Keccak256::new();
    for kind in kinds {
        let mut bytes = Vec::new();
        // Writing into a Vec never fails.
        verifying_keys[&kind].vk.serialize_compressed(&mut bytes).unwrap();
        hasher.update([kind.tag()]);
        hasher.update(&bytes);
    }
    hasher.finalize().into()
}

fn policy_tag(policy: PermissionPolicy) -> u8 {
    match policy {
        PermissionPolicy::Proof => 0,
        PermissionPolicy::Signature => 1,
        PermissionPolicy::ProofOrSignature => 2,
    }
}

/// Why a processed transaction was not accepted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The asserted thresholds no longer match ledger state
    StalePrecondition,
    /// Proof failed verification or does not bind the asserted thresholds
    InvalidProof,
    /// Authorization not admitted by the permission policy
    Unauthorized,
    /// Fee payer cannot cover the fee
    InsufficientBalance,
    /// Fee payer is not a known account
    UnknownAccount,
    /// Target contract account does not exist or is uninitialized
    UnknownContract,
    /// No verifying key installed for the proof's circuit
    MissingVerifyingKey,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::StalePrecondition => write!(f, "stale precondition"),
            FailureReason::InvalidProof => write!(f, "invalid proof"),
            FailureReason::Unauthorized => write!(f, "unauthorized"),
            FailureReason::InsufficientBalance => write!(f, "insufficient balance"),
            FailureReason::UnknownAccount => write!(f, "unknown account"),
            FailureReason::UnknownContract => write!(f, "unknown contract"),
            FailureReason::MissingVerifyingKey => write!(f, "missing verifying key"),
        }
    }
}

/// Lifecycle of a submitted transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed(FailureReason),
}

/// Serializable summary of a processed transaction
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionReceipt {
    pub hash: String,
    pub status: TransactionStatus,
    pub height: Option<u64>,
}
