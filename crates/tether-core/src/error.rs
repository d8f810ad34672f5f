//! Terminal probe failures

use std::io;
use thiserror::Error;

/// Why a probe ended without confirming the address
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The address supplier failed; never retried
    #[error("{0}")]
    Resolution(#[source] io::Error),
    /// Every attempt in the budget came back unreachable
    #[error("Failed to connect")]
    ConnectionExhausted,
    /// The probe was cancelled before reaching a verdict
    #[error("Probe cancelled")]
    Cancelled,
}
