//! Invariant-checking layer.
//!
//! Always compiled in. The configured [`InvariantPolicy`] decides whether a
//! broken invariant aborts the process or comes back to the caller as
//! [`PoolError::InvariantViolation`]. Either way it is logged first.

use super::errors::{InvariantViolation, PoolError};
use std::str::FromStr;
use tracing::error;

/// What to do when an internal invariant breaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvariantPolicy {
    /// Panic with the violation message.
    Abort,
    /// Refuse the operation and return the violation.
    Report,
}

impl Default for InvariantPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Abort
        } else {
            Self::Report
        }
    }
}

impl FromStr for InvariantPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "report" => Ok(Self::Report),
            other => Err(format!("unknown invariant policy: {other}")),
        }
    }
}

impl InvariantPolicy {
    /// Applies the policy to `violation`.
    ///
    /// Returns the error to hand back under `Report`; panics under `Abort`.
    pub fn enforce(self, violation: InvariantViolation) -> PoolError {
        error!("[txpool] invariant violated: {}", violation);
        match self {
            Self::Abort => panic!("transaction pool invariant violated: {violation}"),
            Self::Report => PoolError::InvariantViolation(violation),
        }
    }
}
