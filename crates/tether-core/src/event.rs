//! Events emitted while a probe runs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use crate::error::ProbeError;

/// Probe event for presenters
///
/// A probe emits zero or more `Progress` events followed by exactly one
/// terminal event (`Reachable` or `Failed`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProbeEvent {
    /// A single attempt failed; more may follow
    Progress { attempt: u32, attempt_count: u32 },
    /// The address answered
    Reachable { address: IpAddr },
    /// The probe gave up
    Failed { reason: String },
}

impl ProbeEvent {
    pub fn progress(attempt: u32, attempt_count: u32) -> Self {
        Self::Progress {
            attempt,
            attempt_count,
        }
    }

    /// Whether no further events will follow this one
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }

    /// Human-readable status line
    ///
    /// Progress uses the zero-based attempt index against the attempt
    /// count, so the first failure reads "Attempt 0/5 failed".
    pub fn message(&self) -> String {
        match self {
            Self::Progress {
                attempt,
                attempt_count,
            } => format!("Attempt {}/{} failed", attempt, attempt_count),
            Self::Reachable { address } => format!("{} is reachable", address),
            Self::Failed { reason } => reason.clone(),
        }
    }
}

impl fmt::Display for ProbeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<Result<IpAddr, ProbeError>> for ProbeEvent {
    fn from(result: Result<IpAddr, ProbeError>) -> Self {
        match result {
            Ok(address) => Self::Reachable { address },
            Err(e) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }
}
