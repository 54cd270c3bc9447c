//! Contract state view and permission policy
//!
//! The thresholds live in a contract account on the ledger; this module is
//! the typed view over them. Reads return the last committed value, so
//! callers must not assume freshness; the submission protocol re-asserts
//! the value it read as a transaction precondition.

use crate::error::LedgerError;
use crate::ledger::account::Address;
use crate::ledger::LocalLedger;
use crate::Scalar;

/// The public thresholds: set once at deployment, read and re-asserted on
/// every submission. Also doubles as the precondition a submission carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EligibilityRequirements {
    pub min_credit_score: Scalar,
    pub monthly_income_req: Scalar,
}

impl EligibilityRequirements {
    pub fn new(min_credit_score: Scalar, monthly_income_req: Scalar) -> Self {
        Self {
            min_credit_score,
            monthly_income_req,
        }
    }
}

/// Who may cause a state mutation on the contract account.
///
/// Once set to [`PermissionPolicy::ProofOrSignature`] at deploy time,
/// direct unauthenticated mutation is impossible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PermissionPolicy {
    Proof,
    Signature,
    #[default]
    ProofOrSignature,
}

impl PermissionPolicy {
    pub fn allows_proof(self) -> bool {
        matches!(self, PermissionPolicy::Proof | PermissionPolicy::ProofOrSignature)
    }

    pub fn allows_signature(self) -> bool {
        matches!(
            self,
            PermissionPolicy::Signature | PermissionPolicy::ProofOrSignature
        )
    }
}

/// Client-side handle to a deployed eligibility checker
#[derive(Clone, Copy, Debug)]
pub struct MortgageContract {
    address: Address,
}

impl MortgageContract {
    pub fn at(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Read the committed thresholds.
    ///
    /// Fails with [`LedgerError::Uninitialized`] when the account exists
    /// but deployment never installed thresholds, and with
    /// [`LedgerError::UnknownContract`] when there is no account at all.
    /// Both are configuration errors at the protocol layer.
    pub async fn requirements(
        &self,
        ledger: &LocalLedger,
    ) -> Result<EligibilityRequirements, LedgerError> {
        ledger.requirements(&self.address).await
    }
}
