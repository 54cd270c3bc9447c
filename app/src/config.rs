//! Configuration Module
//!
//! Settings come from environment variables with development defaults, and
//! are validated fail-fast when loaded: a malformed value stops the run
//! before any ledger or prover state exists.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

/// Local ledger and submission settings
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Balance granted to accounts created by the ledger
    pub initial_balance: u64,

    /// Flat fee charged per processed transaction
    pub transaction_fee: u64,

    /// When true, submitted transactions are applied immediately. When
    /// false they stay pending until `commit_pending` is called, which
    /// models the confirmation window.
    pub auto_commit: bool,

    /// How long `await_confirmation` waits before giving up
    pub confirmation_timeout_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1_000_000,
            transaction_fee: 1,
            auto_commit: true,
            confirmation_timeout_ms: 30_000,
        }
    }
}

impl LedgerConfig {
    /// Load settings from the environment.
    ///
    /// # Optional Environment Variables
    ///
    /// - `INITIAL_BALANCE`: balance for ledger-created accounts
    /// - `TRANSACTION_FEE`: flat per-transaction fee
    /// - `AUTO_COMMIT`: `true` | `false`
    /// - `CONFIRMATION_TIMEOUT_MS`: confirmation wait in milliseconds
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            initial_balance: env::var("INITIAL_BALANCE")
                .map(|v| v.parse())
                .unwrap_or(Ok(defaults.initial_balance))
                .context("INITIAL_BALANCE must be a valid number")?,

            transaction_fee: env::var("TRANSACTION_FEE")
                .map(|v| v.parse())
                .unwrap_or(Ok(defaults.transaction_fee))
                .context("TRANSACTION_FEE must be a valid number")?,

            auto_commit: env::var("AUTO_COMMIT")
                .map(|v| v.parse())
                .unwrap_or(Ok(defaults.auto_commit))
                .context("AUTO_COMMIT must be true or false")?,

            confirmation_timeout_ms: env::var("CONFIRMATION_TIMEOUT_MS")
                .map(|v| v.parse())
                .unwrap_or(Ok(defaults.confirmation_timeout_ms))
                .context("CONFIRMATION_TIMEOUT_MS must be a valid number")?,
        })
    }

    /// Confirmation window as a [`Duration`]
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }
}
