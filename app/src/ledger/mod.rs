//! Explicit in-memory ledger
//!
//! `LocalLedger` replaces the implicit global "active ledger instance" of
//! the original harness with a handle that is created per run, threaded
//! through deploy and submit, and torn down explicitly. It owns the
//! accounts, the contract state store, and the transaction journal, and it
//! is the single place where preconditions, permission policies and proof
//! verification are enforced at apply time.

pub mod account;
pub mod transaction;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use ark_bn254::Bn254;
use ark_groth16::PreparedVerifyingKey;
use rand::rngs::OsRng;
use sha3::{Digest, Keccak256};
use tokio::sync::RwLock;

use mortgage_circuits::{proof, CircuitKind, EligibilityProof};

use crate::config::LedgerConfig;
use crate::contract::{EligibilityRequirements, PermissionPolicy};
use crate::error::LedgerError;
use account::{signature_mac, Address, Keypair};
use transaction::{
    Authorization, FailureReason, Transaction, TransactionKind, TransactionReceipt,
    TransactionStatus, TxHash,
};

/// Poll interval while awaiting confirmation
const CONFIRMATION_POLL: Duration = Duration::from_millis(10);

struct UserAccount {
    balance: u64,
}

struct ContractAccount {
    owner: Address,
    /// Funded at creation; a redeploy keeps the existing balance.
    balance: u64,
    /// `None` until deployment installs thresholds. Reading `None` is a
    /// configuration error, never a silent default.
    requirements: Option<EligibilityRequirements>,
    policy: PermissionPolicy,
    verifying_keys: HashMap<CircuitKind, PreparedVerifyingKey<Bn254>>,
}

struct LedgerInner {
    users: HashMap<Address, UserAccount>,
    contracts: HashMap<Address, ContractAccount>,
    /// Secrets of accounts this ledger registered, for MAC checks
    secrets: HashMap<Address, [u8; 32]>,
    pending: Vec<(TxHash, Transaction)>,
    journal: HashMap<TxHash, (TransactionStatus, Option<u64>)>,
    height: u64,
    sequence: u64,
}

/// In-memory ledger with pre-fundable accounts and a single-threshold
/// contract model. Clones are handles to the same ledger state.
#[derive(Clone)]
pub struct LocalLedger {
    inner: Arc<RwLock<LedgerInner>>,
    config: LedgerConfig,
}

impl LocalLedger {
    pub fn new(config: LedgerConfig) -> Self {
        tracing::info!(
            auto_commit = config.auto_commit,
            "local ledger created"
        );
        Self {
            inner: Arc::new(RwLock::new(LedgerInner {
                users: HashMap::new(),
                contracts: HashMap::new(),
                secrets: HashMap::new(),
                pending: Vec::new(),
                journal: HashMap::new(),
                height: 0,
                sequence: 0,
            })),
            config,
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Create a pre-funded user account and register its keypair
    pub async fn create_funded_account(&self) -> Keypair {
        let keypair = Keypair::random(&mut OsRng);
        let mut inner = self.inner.write().await;
        inner.users.insert(
            keypair.address(),
            UserAccount {
                balance: self.config.initial_balance,
            },
        );
        inner
            .secrets
            .insert(keypair.address(), *keypair.secret_bytes());
        keypair
    }

    /// Register an externally generated keypair (e.g. a fresh contract
    /// key) so its signatures can be checked
    pub async fn register_keypair(&self, keypair: &Keypair) {
        let mut inner = self.inner.write().await;
        inner
            .secrets
            .insert(keypair.address(), *keypair.secret_bytes());
    }

    pub async fn balance(&self, address: &Address) -> Option<u64> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(address)
            .map(|a| a.balance)
            .or_else(|| inner.contracts.get(address).map(|c| c.balance))
    }

    /// Last committed thresholds of a contract account
    pub async fn requirements(
        &self,
        contract: &Address,
    ) -> Result<EligibilityRequirements, LedgerError> {
        let inner = self.inner.read().await;
        let account = inner
            .contracts
            .get(contract)
            .ok_or_else(|| LedgerError::UnknownContract(contract.to_hex()))?;
        account
            .requirements
            .ok_or_else(|| LedgerError::Uninitialized(contract.to_hex()))
    }

    /// Submit a transaction. With `auto_commit` it is applied immediately;
    /// otherwise it stays pending until [`LocalLedger::commit_pending`].
    pub async fn submit(&self, tx: Transaction) -> TxHash {
        let mut inner = self.inner.write().await;
        inner.sequence += 1;
        let hash = tx_hash(&tx, inner.sequence);

        if self.config.auto_commit {
            let outcome = apply(&mut inner, &tx, self.config.initial_balance);
            inner.height += 1;
            let height = inner.height;
            match outcome {
                Outcome::Final(status) => {
                    log_status(&hash, &status);
                    inner.journal.insert(hash, (status, Some(height)));
                }
                Outcome::Verify { vk, proof } => {
                    inner
                        .journal
                        .insert(hash, (TransactionStatus::Pending, Some(height)));
                    drop(inner);
                    self.finish_verification(hash, height, vk, proof).await;
                }
            }
        } else {
            tracing::debug!(hash = %hash, "transaction pending");
            inner.journal.insert(hash, (TransactionStatus::Pending, None));
            inner.pending.push((hash, tx));
        }

        hash
    }

    /// Apply every pending transaction; returns how many were processed
    pub async fn commit_pending(&self) -> usize {
        let mut inner = self.inner.write().await;
        let pending = std::mem::take(&mut inner.pending);
        let count = pending.len();
        let mut verifications = Vec::new();

        for (hash, tx) in pending {
            let outcome = apply(&mut inner, &tx, self.config.initial_balance);
            inner.height += 1;
            let height = inner.height;
            match outcome {
                Outcome::Final(status) => {
                    log_status(&hash, &status);
                    inner.journal.insert(hash, (status, Some(height)));
                }
                Outcome::Verify { vk, proof } => {
                    inner
                        .journal
                        .insert(hash, (TransactionStatus::Pending, Some(height)));
                    verifications.push((hash, height, vk, proof));
                }
            }
        }
        drop(inner);

        for (hash, height, vk, proof) in verifications {
            self.finish_verification(hash, height, vk, proof).await;
        }

        count
    }

    /// Run the pairing check outside the ledger lock and record the final
    /// status. All state-dependent checks happened under the write guard;
    /// verification is pure computation on that snapshot.
    async fn finish_verification(
        &self,
        hash: TxHash,
        height: u64,
        vk: PreparedVerifyingKey<Bn254>,
        proof: EligibilityProof<Bn254>,
    ) {
        let status = match proof::verify(&vk, &proof) {
            Ok(true) => TransactionStatus::Confirmed,
            _ => TransactionStatus::Failed(FailureReason::InvalidProof),
        };
        log_status(&hash, &status);
        self.inner
            .write()
            .await
            .journal
            .insert(hash, (status, Some(height)));
    }

    pub async fn status(&self, hash: &TxHash) -> Option<TransactionStatus> {
        self.inner
            .read()
            .await
            .journal
            .get(hash)
            .map(|(status, _)| status.clone())
    }

    pub async fn receipt(&self, hash: &TxHash) -> Option<TransactionReceipt> {
        self.inner
            .read()
            .await
            .journal
            .get(hash)
            .map(|(status, height)| TransactionReceipt {
                hash: hash.to_hex(),
                status: status.clone(),
                height: *height,
            })
    }

    /// Wait until the transaction leaves `Pending`, or time out.
    ///
    /// The timeout cancels only the wait: a transaction still pending in
    /// the ledger remains eligible and the same hash may be re-awaited.
    pub async fn await_confirmation(
        &self,
        hash: &TxHash,
        timeout: Duration,
    ) -> Result<TransactionStatus, LedgerError> {
        let poll = async {
            loop {
                match self.status(hash).await {
                    Some(TransactionStatus::Pending) => {
                        tokio::time::sleep(CONFIRMATION_POLL).await;
                    }
                    Some(status) => return Ok(status),
                    None => return Err(LedgerError::UnknownTransaction(hash.to_hex())),
                }
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| LedgerError::ConfirmationTimeout {
                timeout_ms: timeout.as_millis() as u64,
            })?
    }

    /// Tear the ledger down explicitly, dropping all state
    pub async fn shutdown(self) {
        let mut inner = self.inner.write().await;
        inner.users.clear();
        inner.contracts.clear();
        inner.secrets.clear();
        inner.pending.clear();
        inner.journal.clear();
        tracing::info!("local ledger shut down");
    }
}

fn tx_hash(tx: &Transaction, sequence: u64) -> TxHash {
    let mut hasher = Keccak256::new();
    hasher.update(tx.digest());
    hasher.update(sequence.to_le_bytes());
    TxHash::new(hasher.finalize().into())
}

fn log_status(hash: &TxHash, status: &TransactionStatus) {
    match status {
        TransactionStatus::Confirmed => tracing::info!(hash = %hash, "transaction confirmed"),
        TransactionStatus::Failed(reason) => {
            tracing::warn!(hash = %hash, %reason, "transaction failed")
        }
        TransactionStatus::Pending => {}
    }
}

/// Result of applying a transaction under the write guard. The pairing
/// check is deferred so the lock is not held across it; everything the
/// verdict depends on besides the pairing is already decided.
enum Outcome {
    Final(TransactionStatus),
    Verify {
        vk: PreparedVerifyingKey<Bn254>,
        proof: EligibilityProof<Bn254>,
    },
}

impl From<FailureReason> for Outcome {
    fn from(reason: FailureReason) -> Self {
        Outcome::Final(TransactionStatus::Failed(reason))
    }
}

/// Core apply semantics: fee, existence, precondition, authorization,
/// state update, in that order.
fn apply(inner: &mut LedgerInner, tx: &Transaction, initial_balance: u64) -> Outcome {
    let Some(account) = inner.users.get_mut(&tx.fee_payer) else {
        return FailureReason::UnknownAccount.into();
    };
    if account.balance < tx.fee {
        return FailureReason::InsufficientBalance.into();
    }
    // The fee is charged whether or not the transaction is accepted.
    account.balance -= tx.fee;

    let digest = tx.digest();

    match &tx.kind {
        TransactionKind::Deploy {
            requirements,
            verifying_keys,
            policy,
        } => {
            let balance = if let Some(existing) = inner.contracts.get(&tx.contract) {
                // Authorized re-deployment: only the owner's signature may
                // replace an existing contract account.
                let authorized = existing.policy.allows_signature()
                    && check_signature(&inner.secrets, &tx.authorization, existing.owner, &digest);
                if !authorized {
                    return FailureReason::Unauthorized.into();
                }
                existing.balance
            } else {
                // Initial deploy: the contract key signs its own creation.
                if !check_signature(&inner.secrets, &tx.authorization, tx.contract, &digest) {
                    return FailureReason::Unauthorized.into();
                }
                initial_balance
            };

            inner.contracts.insert(
                tx.contract,
                ContractAccount {
                    owner: tx.contract,
                    balance,
                    requirements: Some(*requirements),
                    policy: *policy,
                    verifying_keys: verifying_keys.clone(),
                },
            );
            Outcome::Final(TransactionStatus::Confirmed)
        }

        TransactionKind::SubmitProof { precondition } => {
            let Some(contract) = inner.contracts.get(&tx.contract) else {
                return FailureReason::UnknownContract.into();
            };
            let Some(current) = contract.requirements else {
                return FailureReason::UnknownContract.into();
            };

            // Precondition assertion: binds the transaction to the state
            // value the prover read. Closes the read-time/apply-time gap.
            if current != *precondition {
                return FailureReason::StalePrecondition.into();
            }

            match &tx.authorization {
                Authorization::Proof(proof) => {
                    if !contract.policy.allows_proof() {
                        return FailureReason::Unauthorized.into();
                    }
                    let Some(vk) = contract.verifying_keys.get(&proof.kind) else {
                        return FailureReason::MissingVerifyingKey.into();
                    };
                    if !proof_binds_precondition(proof, precondition) {
                        return FailureReason::InvalidProof.into();
                    }
                    Outcome::Verify {
                        vk: vk.clone(),
                        proof: proof.clone(),
                    }
                }
                Authorization::Signature(_) => {
                    if !contract.policy.allows_signature() {
                        return FailureReason::Unauthorized.into();
                    }
                    if check_signature(&inner.secrets, &tx.authorization, contract.owner, &digest) {
                        Outcome::Final(TransactionStatus::Confirmed)
                    } else {
                        FailureReason::Unauthorized.into()
                    }
                }
                Authorization::None => FailureReason::Unauthorized.into(),
            }
        }
    }
}

fn check_signature(
    secrets: &HashMap<Address, [u8; 32]>,
    authorization: &Authorization,
    required_signer: Address,
    digest: &[u8; 32],
) -> bool {
    let Authorization::Signature(sig) = authorization else {
        return false;
    };
    if sig.signer != required_signer {
        return false;
    }
    match secrets.get(&sig.signer) {
        Some(secret) => sig.mac == signature_mac(secret, digest),
        None => false,
    }
}

/// The proof's public inputs must carry exactly the thresholds asserted in
/// the precondition; the commitment slot is the prover's own binder.
fn proof_binds_precondition(
    proof: &EligibilityProof<Bn254>,
    precondition: &EligibilityRequirements,
) -> bool {
    match proof.kind {
        CircuitKind::Credit => {
            matches!(proof.public_inputs.as_slice(),
                [min] if *min == precondition.min_credit_score)
        }
        CircuitKind::Income => {
            matches!(proof.public_inputs.as_slice(),
                [req, _] if *req == precondition.monthly_income_req)
        }
        CircuitKind::Eligibility => {
            matches!(proof.public_inputs.as_slice(),
                [min, req, _] if *min == precondition.min_credit_score
                    && *req == precondition.monthly_income_req)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scalar;

    fn requirements() -> EligibilityRequirements {
        EligibilityRequirements::new(Scalar::from(620u64), Scalar::from(1200u64))
    }

    fn deploy_tx(contract: &Keypair, payer: &Keypair) -> Transaction {
        Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::Deploy {
                requirements: requirements(),
                verifying_keys: HashMap::new(),
                policy: PermissionPolicy::ProofOrSignature,
            },
        )
        .signed_by(contract)
    }

    async fn deployed_ledger() -> (LocalLedger, Keypair, Keypair) {
        let ledger = LocalLedger::new(LedgerConfig::default());
        let payer = ledger.create_funded_account().await;
        let contract = Keypair::random(&mut OsRng);
        ledger.register_keypair(&contract).await;

        let hash = ledger.submit(deploy_tx(&contract, &payer)).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Confirmed)
        );
        (ledger, contract, payer)
    }

    #[tokio::test]
    async fn test_deploy_initializes_state() {
        let (ledger, contract, _) = deployed_ledger().await;

        let read = ledger.requirements(&contract.address()).await.unwrap();
        assert_eq!(read, requirements());

        // Idempotent reads: no mutation between reads.
        let again = ledger.requirements(&contract.address()).await.unwrap();
        assert_eq!(read, again);
    }

    #[tokio::test]
    async fn test_deploy_funds_contract_account() {
        let (ledger, contract, _) = deployed_ledger().await;

        let funded = ledger.balance(&contract.address()).await.unwrap();
        assert_eq!(funded, LedgerConfig::default().initial_balance);
    }

    #[tokio::test]
    async fn test_tampered_deploy_rejected() {
        use mortgage_circuits::CreditCircuit;

        let ledger = LocalLedger::new(LedgerConfig::default());
        let payer = ledger.create_funded_account().await;
        let contract = Keypair::random(&mut OsRng);
        ledger.register_keypair(&contract).await;

        let keys =
            proof::setup::<Bn254, _, _>(CreditCircuit::<Scalar>::empty(), &mut OsRng).unwrap();

        // Sign a deploy carrying no keys, then swap a key map into the
        // signed transaction. The signature must not survive the swap.
        let mut tx = deploy_tx(&contract, &payer);
        if let TransactionKind::Deploy { verifying_keys, .. } = &mut tx.kind {
            verifying_keys.insert(CircuitKind::Eligibility, keys.verifying_key.clone());
        }

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Failed(FailureReason::Unauthorized))
        );
        assert!(ledger.requirements(&contract.address()).await.is_err());
    }

    #[tokio::test]
    async fn test_proof_authorized_submission() {
        use mortgage_circuits::CreditCircuit;

        let ledger = LocalLedger::new(LedgerConfig::default());
        let payer = ledger.create_funded_account().await;
        let contract = Keypair::random(&mut OsRng);
        ledger.register_keypair(&contract).await;

        let keys =
            proof::setup::<Bn254, _, _>(CreditCircuit::<Scalar>::empty(), &mut OsRng).unwrap();
        let mut verifying_keys = HashMap::new();
        verifying_keys.insert(CircuitKind::Credit, keys.verifying_key.clone());

        let deploy = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::Deploy {
                requirements: requirements(),
                verifying_keys,
                policy: PermissionPolicy::ProofOrSignature,
            },
        )
        .signed_by(&contract);
        ledger.submit(deploy).await;

        let min = Scalar::from(620u64);
        let credit_proof = proof::prove(
            CircuitKind::Credit,
            &keys.proving_key,
            CreditCircuit::new(Scalar::from(700u64), min),
            CreditCircuit::public_inputs(min),
            &mut OsRng,
        )
        .unwrap();

        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        )
        .with_proof(credit_proof);

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Confirmed)
        );
    }

    #[tokio::test]
    async fn test_proof_from_foreign_setup_rejected() {
        use mortgage_circuits::CreditCircuit;

        let ledger = LocalLedger::new(LedgerConfig::default());
        let payer = ledger.create_funded_account().await;
        let contract = Keypair::random(&mut OsRng);
        ledger.register_keypair(&contract).await;

        let installed =
            proof::setup::<Bn254, _, _>(CreditCircuit::<Scalar>::empty(), &mut OsRng).unwrap();
        let foreign =
            proof::setup::<Bn254, _, _>(CreditCircuit::<Scalar>::empty(), &mut OsRng).unwrap();
        let mut verifying_keys = HashMap::new();
        verifying_keys.insert(CircuitKind::Credit, installed.verifying_key.clone());

        let deploy = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::Deploy {
                requirements: requirements(),
                verifying_keys,
                policy: PermissionPolicy::ProofOrSignature,
            },
        )
        .signed_by(&contract);
        ledger.submit(deploy).await;

        // Same public inputs, but proved under a different setup: the
        // binding check passes and pairing verification must fail.
        let min = Scalar::from(620u64);
        let credit_proof = proof::prove(
            CircuitKind::Credit,
            &foreign.proving_key,
            CreditCircuit::new(Scalar::from(700u64), min),
            CreditCircuit::public_inputs(min),
            &mut OsRng,
        )
        .unwrap();

        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        )
        .with_proof(credit_proof);

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Failed(FailureReason::InvalidProof))
        );
    }

    #[tokio::test]
    async fn test_requirements_unknown_contract() {
        let ledger = LocalLedger::new(LedgerConfig::default());
        let stranger = Keypair::random(&mut OsRng);

        let err = ledger.requirements(&stranger.address()).await.unwrap_err();
        assert!(matches!(err, LedgerError::UnknownContract(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_redeploy_fails() {
        let (ledger, contract, payer) = deployed_ledger().await;

        // A different key cannot replace the contract account.
        let attacker = Keypair::random(&mut OsRng);
        ledger.register_keypair(&attacker).await;
        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::Deploy {
                requirements: EligibilityRequirements::new(
                    Scalar::from(1u64),
                    Scalar::from(1u64),
                ),
                verifying_keys: HashMap::new(),
                policy: PermissionPolicy::ProofOrSignature,
            },
        )
        .signed_by(&attacker);

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Failed(FailureReason::Unauthorized))
        );

        // State unchanged.
        let read = ledger.requirements(&contract.address()).await.unwrap();
        assert_eq!(read, requirements());
    }

    #[tokio::test]
    async fn test_authorized_redeploy_replaces_state() {
        let (ledger, contract, payer) = deployed_ledger().await;

        let updated = EligibilityRequirements::new(Scalar::from(640u64), Scalar::from(1500u64));
        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::Deploy {
                requirements: updated,
                verifying_keys: HashMap::new(),
                policy: PermissionPolicy::ProofOrSignature,
            },
        )
        .signed_by(&contract);

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Confirmed)
        );
        let read = ledger.requirements(&contract.address()).await.unwrap();
        assert_eq!(read, updated);
    }

    #[tokio::test]
    async fn test_stale_precondition_rejected() {
        let (ledger, contract, payer) = deployed_ledger().await;

        // Build a submission asserting the current thresholds...
        let stale = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        )
        .signed_by(&contract);

        // ...then change the thresholds before it is applied.
        let updated = EligibilityRequirements::new(Scalar::from(700u64), Scalar::from(2000u64));
        let redeploy = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::Deploy {
                requirements: updated,
                verifying_keys: HashMap::new(),
                policy: PermissionPolicy::ProofOrSignature,
            },
        )
        .signed_by(&contract);
        ledger.submit(redeploy).await;

        let hash = ledger.submit(stale).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Failed(FailureReason::StalePrecondition))
        );
    }

    #[tokio::test]
    async fn test_signature_authorized_submission() {
        let (ledger, contract, payer) = deployed_ledger().await;

        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        )
        .signed_by(&contract);

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Confirmed)
        );
    }

    #[tokio::test]
    async fn test_forged_signature_rejected() {
        let (ledger, contract, payer) = deployed_ledger().await;

        // Signed by a key that is not the contract owner.
        let forger = Keypair::random(&mut OsRng);
        ledger.register_keypair(&forger).await;
        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        )
        .signed_by(&forger);

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Failed(FailureReason::Unauthorized))
        );
    }

    #[tokio::test]
    async fn test_unauthenticated_submission_rejected() {
        let (ledger, contract, payer) = deployed_ledger().await;

        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        );

        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Failed(FailureReason::Unauthorized))
        );
    }

    #[tokio::test]
    async fn test_unknown_fee_payer() {
        let ledger = LocalLedger::new(LedgerConfig::default());
        let contract = Keypair::random(&mut OsRng);
        let stranger = Keypair::random(&mut OsRng);
        ledger.register_keypair(&contract).await;

        let tx = deploy_tx(&contract, &stranger);
        let hash = ledger.submit(tx).await;
        assert_eq!(
            ledger.status(&hash).await,
            Some(TransactionStatus::Failed(FailureReason::UnknownAccount))
        );
    }

    #[tokio::test]
    async fn test_fee_charged_per_transaction() {
        let (ledger, contract, payer) = deployed_ledger().await;
        let before = ledger.balance(&payer.address()).await.unwrap();

        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        )
        .signed_by(&contract);
        ledger.submit(tx).await;

        let after = ledger.balance(&payer.address()).await.unwrap();
        assert_eq!(after, before - 1);
    }

    #[tokio::test]
    async fn test_manual_commit_and_timeout() {
        let config = LedgerConfig {
            auto_commit: false,
            ..Default::default()
        };
        let ledger = LocalLedger::new(config);
        let payer = ledger.create_funded_account().await;
        let contract = Keypair::random(&mut OsRng);
        ledger.register_keypair(&contract).await;

        let hash = ledger.submit(deploy_tx(&contract, &payer)).await;
        assert_eq!(ledger.status(&hash).await, Some(TransactionStatus::Pending));

        // Confirmation window elapses while the transaction is pending.
        let err = ledger
            .await_confirmation(&hash, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ConfirmationTimeout { .. }));

        assert_eq!(ledger.commit_pending().await, 1);
        let status = ledger
            .await_confirmation(&hash, Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(status, TransactionStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_receipt_serializes() {
        let (ledger, contract, payer) = deployed_ledger().await;

        let tx = Transaction::new(
            contract.address(),
            payer.address(),
            1,
            TransactionKind::SubmitProof {
                precondition: requirements(),
            },
        )
        .signed_by(&contract);
        let hash = ledger.submit(tx).await;

        let receipt = ledger.receipt(&hash).await.unwrap();
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("Confirmed"));

        let restored: TransactionReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.status, TransactionStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_explicit_shutdown() {
        let (ledger, contract, _) = deployed_ledger().await;
        let address = contract.address();
        ledger.shutdown().await;

        // A fresh ledger shares nothing with the old one.
        let fresh = LocalLedger::new(LedgerConfig::default());
        assert!(fresh.requirements(&address).await.is_err());
    }
}
