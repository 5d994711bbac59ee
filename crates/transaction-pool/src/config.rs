//! Pool configuration.

use crate::domain::InvariantPolicy;
use std::env;
use tracing::warn;

/// Transaction pool configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum standard transactions in the dependency graph.
    pub max_transactions: usize,
    /// Maximum storage-proof transactions across all buckets.
    pub max_proof_transactions: usize,
    /// Handling of broken internal invariants.
    pub invariant_policy: InvariantPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_transactions: 10_000,
            max_proof_transactions: 1_000,
            invariant_policy: InvariantPolicy::default(),
        }
    }
}

impl PoolConfig {
    /// Creates a minimal config for testing.
    pub fn for_testing() -> Self {
        Self {
            max_transactions: 100,
            max_proof_transactions: 50,
            invariant_policy: InvariantPolicy::Report,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TXPOOL_MAX_TRANSACTIONS` (default: 10000)
    /// - `TXPOOL_MAX_PROOF_TRANSACTIONS` (default: 1000)
    /// - `TXPOOL_INVARIANT_POLICY`: `abort` or `report` (default: abort in
    ///   debug builds, report in release builds)
    ///
    /// Unparseable values fall back to the default with a warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_transactions: parse_var("TXPOOL_MAX_TRANSACTIONS", defaults.max_transactions),
            max_proof_transactions: parse_var(
                "TXPOOL_MAX_PROOF_TRANSACTIONS",
                defaults.max_proof_transactions,
            ),
            invariant_policy: parse_var("TXPOOL_INVARIANT_POLICY", defaults.invariant_policy),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("[txpool] ignoring invalid {}={:?}", name, raw);
            default
        }),
        Err(_) => default,
    }
}
