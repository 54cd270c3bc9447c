//! Eligibility prover service
//!
//! Keeps one Groth16 key pair per circuit behind a read/write lock.
//! Key generation is expensive, so keys are created lazily on first use
//! and cached for the life of the service; proving itself is synchronous
//! and CPU-bound; once started it runs to completion or failure and is
//! not cancellable mid-computation.

use std::collections::HashMap;
use std::sync::Arc;

use ark_bn254::Bn254;
use ark_groth16::PreparedVerifyingKey;
use rand::rngs::OsRng;
use tokio::sync::RwLock;

use mortgage_circuits::{
    proof, CircuitError, CircuitKeys, CircuitKind, CreditCircuit, EligibilityCircuit,
    EligibilityProof, IncomeCircuit, IncomeHistory,
};

use crate::Scalar;

struct ProvingContext {
    credit: Option<CircuitKeys<Bn254>>,
    income: Option<CircuitKeys<Bn254>>,
    eligibility: Option<CircuitKeys<Bn254>>,
}

/// Groth16 prover with per-circuit cached keys. Clones share the key
/// cache.
#[derive(Clone)]
pub struct EligibilityProver {
    context: Arc<RwLock<ProvingContext>>,
}

impl EligibilityProver {
    pub fn new() -> Self {
        Self {
            context: Arc::new(RwLock::new(ProvingContext {
                credit: None,
                income: None,
                eligibility: None,
            })),
        }
    }

    async fn ensure_credit_keys(&self) -> Result<(), CircuitError> {
        if self.context.read().await.credit.is_some() {
            return Ok(());
        }

        tracing::info!("generating credit circuit keys");
        let mut context = self.context.write().await;

        // Double-check after acquiring the write lock.
        if context.credit.is_some() {
            return Ok(());
        }

        context.credit = Some(proof::setup(CreditCircuit::<Scalar>::empty(), &mut OsRng)?);
        Ok(())
    }

    async fn ensure_income_keys(&self) -> Result<(), CircuitError> {
        if self.context.read().await.income.is_some() {
            return Ok(());
        }

        tracing::info!("generating income circuit keys");
        let mut context = self.context.write().await;

        if context.income.is_some() {
            return Ok(());
        }

        context.income = Some(proof::setup(IncomeCircuit::<Scalar>::empty(), &mut OsRng)?);
        Ok(())
    }

    async fn ensure_eligibility_keys(&self) -> Result<(), CircuitError> {
        if self.context.read().await.eligibility.is_some() {
            return Ok(());
        }

        tracing::info!("generating eligibility circuit keys");
        let mut context = self.context.write().await;

        if context.eligibility.is_some() {
            return Ok(());
        }

        context.eligibility = Some(proof::setup(
            EligibilityCircuit::<Scalar>::empty(),
            &mut OsRng,
        )?);
        Ok(())
    }

    /// Verifying keys for every circuit, for installation at deploy time
    pub async fn verifying_keys(
        &self,
    ) -> Result<HashMap<CircuitKind, PreparedVerifyingKey<Bn254>>, CircuitError> {
        self.ensure_credit_keys().await?;
        self.ensure_income_keys().await?;
        self.ensure_eligibility_keys().await?;

        let context = self.context.read().await;
        let mut keys = HashMap::new();
        if let Some(credit) = &context.credit {
            keys.insert(CircuitKind::Credit, credit.verifying_key.clone());
        }
        if let Some(income) = &context.income {
            keys.insert(CircuitKind::Income, income.verifying_key.clone());
        }
        if let Some(eligibility) = &context.eligibility {
            keys.insert(CircuitKind::Eligibility, eligibility.verifying_key.clone());
        }
        Ok(keys)
    }

    /// Prove `credit_score >= min_credit_score`
    pub async fn prove_credit(
        &self,
        credit_score: Scalar,
        min_credit_score: Scalar,
    ) -> Result<EligibilityProof<Bn254>, CircuitError> {
        self.ensure_credit_keys().await?;
        let context = self.context.read().await;
        let keys = context.credit.as_ref().ok_or(CircuitError::Synthesis {
            reason: "credit keys missing after setup".to_string(),
        })?;

        proof::prove(
            CircuitKind::Credit,
            &keys.proving_key,
            CreditCircuit::new(credit_score, min_credit_score),
            CreditCircuit::public_inputs(min_credit_score),
            &mut OsRng,
        )
    }

    /// Prove every month of the history clears `monthly_income_req`
    pub async fn prove_income(
        &self,
        income: &IncomeHistory<Scalar>,
        monthly_income_req: Scalar,
    ) -> Result<EligibilityProof<Bn254>, CircuitError> {
        self.ensure_income_keys().await?;
        let context = self.context.read().await;
        let keys = context.income.as_ref().ok_or(CircuitError::Synthesis {
            reason: "income keys missing after setup".to_string(),
        })?;

        let commitment = income.commitment();
        proof::prove(
            CircuitKind::Income,
            &keys.proving_key,
            IncomeCircuit::new(income.clone(), monthly_income_req, commitment),
            IncomeCircuit::public_inputs(monthly_income_req, commitment),
            &mut OsRng,
        )
    }

    /// Prove the conjunction of the credit and income checks
    pub async fn prove_eligibility(
        &self,
        credit_score: Scalar,
        income: &IncomeHistory<Scalar>,
        min_credit_score: Scalar,
        monthly_income_req: Scalar,
    ) -> Result<EligibilityProof<Bn254>, CircuitError> {
        self.ensure_eligibility_keys().await?;
        let context = self.context.read().await;
        let keys = context.eligibility.as_ref().ok_or(CircuitError::Synthesis {
            reason: "eligibility keys missing after setup".to_string(),
        })?;

        let commitment = income.commitment();
        proof::prove(
            CircuitKind::Eligibility,
            &keys.proving_key,
            EligibilityCircuit::new(
                credit_score,
                income.clone(),
                min_credit_score,
                monthly_income_req,
                commitment,
            ),
            EligibilityCircuit::public_inputs(min_credit_score, monthly_income_req, commitment),
            &mut OsRng,
        )
    }
}

impl Default for EligibilityProver {
    fn default() -> Self {
        Self::new()
    }
}
