//! Deploy and proof-submission protocol
//!
//! The read-then-assert pattern: every submission reads the current
//! thresholds, proves against exactly those values, and re-asserts them as
//! an on-chain precondition of the transaction. If the thresholds change
//! between read and apply, the precondition fails and the submission is
//! rejected; it is never applied against thresholds the prover did not
//! reason about.
//!
//! Constraint violations and stale preconditions are recovered into an
//! `Ok(false)` result; configuration and confirmation failures propagate
//! as errors.

use mortgage_circuits::{CircuitError, IncomeHistory};

use crate::contract::{EligibilityRequirements, MortgageContract, PermissionPolicy};
use crate::error::SubmissionError;
use crate::ledger::account::Keypair;
use crate::ledger::transaction::{FailureReason, Transaction, TransactionKind, TransactionStatus};
use crate::ledger::LocalLedger;
use crate::services::prover::EligibilityProver;
use crate::Scalar;

/// Deploy the eligibility checker: create and fund the contract account,
/// install the thresholds and verifying keys, and set the
/// proof-or-signature permission policy.
///
/// After confirmation, no path may alter the contract state without a
/// passing proof or the owner's signature.
pub async fn deploy(
    ledger: &LocalLedger,
    prover: &EligibilityProver,
    contract_keypair: &Keypair,
    fee_payer: &Keypair,
    min_credit_score: Scalar,
    monthly_income_req: Scalar,
) -> Result<MortgageContract, SubmissionError> {
    tracing::info!(contract = %contract_keypair.address(), "deploying eligibility checker");

    ledger.register_keypair(contract_keypair).await;
    let verifying_keys = prover.verifying_keys().await?;

    let tx = Transaction::new(
        contract_keypair.address(),
        fee_payer.address(),
        ledger.config().transaction_fee,
        TransactionKind::Deploy {
            requirements: EligibilityRequirements::new(min_credit_score, monthly_income_req),
            verifying_keys,
            policy: PermissionPolicy::ProofOrSignature,
        },
    )
    .signed_by(contract_keypair);

    let hash = ledger.submit(tx).await;
    let status = ledger
        .await_confirmation(&hash, ledger.config().confirmation_timeout())
        .await?;

    match status {
        TransactionStatus::Confirmed => {
            tracing::info!(contract = %contract_keypair.address(), "deployment confirmed");
            Ok(MortgageContract::at(contract_keypair.address()))
        }
        TransactionStatus::Failed(reason) => Err(SubmissionError::Configuration(format!(
            "deployment rejected: {reason}"
        ))),
        TransactionStatus::Pending => Err(SubmissionError::NetworkConfirmation {
            timeout_ms: ledger.config().confirmation_timeout_ms,
        }),
    }
}

/// Submit the combined credit-and-income proof. Acceptance is
/// all-or-nothing across both predicate groups.
pub async fn submit_credit_proofs(
    ledger: &LocalLedger,
    prover: &EligibilityProver,
    contract: &MortgageContract,
    fee_payer: &Keypair,
    credit_score: Scalar,
    income: IncomeHistory<Scalar>,
) -> Result<bool, SubmissionError> {
    submit_proof(
        ledger,
        prover,
        contract,
        fee_payer,
        ProofRequest::Combined {
            credit_score,
            income,
        },
    )
    .await
}

/// Submit the credit-score check alone
pub async fn submit_credit_score(
    ledger: &LocalLedger,
    prover: &EligibilityProver,
    contract: &MortgageContract,
    fee_payer: &Keypair,
    credit_score: Scalar,
) -> Result<bool, SubmissionError> {
    submit_proof(
        ledger,
        prover,
        contract,
        fee_payer,
        ProofRequest::Credit { credit_score },
    )
    .await
}

/// Submit the income-history check alone
pub async fn submit_income_history(
    ledger: &LocalLedger,
    prover: &EligibilityProver,
    contract: &MortgageContract,
    fee_payer: &Keypair,
    income: IncomeHistory<Scalar>,
) -> Result<bool, SubmissionError> {
    submit_proof(
        ledger,
        prover,
        contract,
        fee_payer,
        ProofRequest::Income { income },
    )
    .await
}

enum ProofRequest {
    Credit {
        credit_score: Scalar,
    },
    Income {
        income: IncomeHistory<Scalar>,
    },
    Combined {
        credit_score: Scalar,
        income: IncomeHistory<Scalar>,
    },
}

async fn submit_proof(
    ledger: &LocalLedger,
    prover: &EligibilityProver,
    contract: &MortgageContract,
    fee_payer: &Keypair,
    request: ProofRequest,
) -> Result<bool, SubmissionError> {
    // Step 1: read the current thresholds.
    let current = contract.requirements(ledger).await?;

    // Steps 2-3: evaluate the circuit against the thresholds just read.
    // A failing witness never produces a transaction.
    let proved = match &request {
        ProofRequest::Credit { credit_score } => {
            prover
                .prove_credit(*credit_score, current.min_credit_score)
                .await
        }
        ProofRequest::Income { income } => {
            prover.prove_income(income, current.monthly_income_req).await
        }
        ProofRequest::Combined {
            credit_score,
            income,
        } => {
            prover
                .prove_eligibility(
                    *credit_score,
                    income,
                    current.min_credit_score,
                    current.monthly_income_req,
                )
                .await
        }
    };

    let proof = match proved {
        Ok(proof) => proof,
        Err(CircuitError::Unsatisfiable) => {
            tracing::warn!(
                contract = %contract.address(),
                "witness fails the eligibility constraints; submission rejected"
            );
            return Ok(false);
        }
        Err(err) => return Err(err.into()),
    };

    // Step 4: the transaction re-asserts the thresholds it was proved
    // against as a precondition.
    let tx = Transaction::new(
        contract.address(),
        fee_payer.address(),
        ledger.config().transaction_fee,
        TransactionKind::SubmitProof {
            precondition: current,
        },
    )
    .with_proof(proof);

    let hash = ledger.submit(tx).await;
    let status = ledger
        .await_confirmation(&hash, ledger.config().confirmation_timeout())
        .await?;

    match status {
        TransactionStatus::Confirmed => {
            tracing::info!(contract = %contract.address(), "eligibility proof accepted");
            Ok(true)
        }
        TransactionStatus::Failed(FailureReason::StalePrecondition) => {
            tracing::warn!(
                contract = %contract.address(),
                "thresholds changed between read and apply; re-read and retry"
            );
            Ok(false)
        }
        TransactionStatus::Failed(
            reason @ (FailureReason::InvalidProof | FailureReason::Unauthorized),
        ) => {
            tracing::warn!(contract = %contract.address(), %reason, "submission rejected");
            Ok(false)
        }
        TransactionStatus::Failed(reason) => Err(SubmissionError::Configuration(format!(
            "submission could not be processed: {reason}"
        ))),
        TransactionStatus::Pending => Err(SubmissionError::NetworkConfirmation {
            timeout_ms: ledger.config().confirmation_timeout_ms,
        }),
    }
}
