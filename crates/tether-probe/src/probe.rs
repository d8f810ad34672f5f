//! Retrying reachability probe

use std::net::IpAddr;
use tether_core::{ProbeError, ProbeEvent, ProbePolicy};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::reachability::Reachability;
use crate::supplier::AddressSupplier;

/// Confirms an address answers before it is handed to a deployment
///
/// The address is resolved once, then checked up to
/// `policy.attempt_count` times in order. Each failed check is reported as
/// a progress event before the next one starts.
pub struct ReachabilityProbe<R> {
    checker: R,
    policy: ProbePolicy,
}

impl<R: Reachability> ReachabilityProbe<R> {
    /// Create a probe with the default policy (5 attempts, 1000 ms each)
    pub fn new(checker: R) -> Self {
        Self::with_policy(checker, ProbePolicy::default())
    }

    pub fn with_policy(checker: R, policy: ProbePolicy) -> Self {
        Self { checker, policy }
    }

    /// Run the probe to completion on the current task
    ///
    /// Progress events go to `progress`; the terminal outcome is the return
    /// value. A dropped receiver does not stop the probe.
    pub async fn run<S: AddressSupplier>(
        &self,
        supplier: S,
        progress: &mpsc::UnboundedSender<ProbeEvent>,
        cancel: &CancellationToken,
    ) -> Result<IpAddr, ProbeError> {
        let address = supplier.resolve().await.map_err(|e| {
            warn!(error = %e, "Address resolution failed");
            ProbeError::Resolution(e)
        })?;

        let attempt_count = self.policy.attempt_count;
        let limit = self.policy.timeout();

        for attempt in 0..attempt_count {
            if cancel.is_cancelled() {
                info!(ip = %address, attempt, "Probe cancelled");
                return Err(ProbeError::Cancelled);
            }

            let reachable = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(ip = %address, attempt, "Probe cancelled");
                    return Err(ProbeError::Cancelled);
                }
                result = tokio::time::timeout(limit, self.checker.is_reachable(address, limit)) => {
                    result.unwrap_or(false)
                }
            };

            if reachable {
                info!(ip = %address, attempt, "Address is reachable");
                return Ok(address);
            }

            let event = ProbeEvent::progress(attempt, attempt_count);
            debug!(ip = %address, "{}", event);
            let _ = progress.send(event);
        }

        warn!(ip = %address, attempts = attempt_count, "Address not reachable");
        Err(ProbeError::ConnectionExhausted)
    }

    /// Run the probe on a background task
    ///
    /// Every event, including the terminal one, is delivered through the
    /// returned handle.
    pub fn spawn<S>(self, supplier: S) -> ProbeHandle
    where
        R: 'static,
        S: AddressSupplier + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let result = self.run(supplier, &tx, &token).await;
            let _ = tx.send(ProbeEvent::from(result));
        });

        ProbeHandle { events: rx, cancel }
    }
}

/// Receiving end of a spawned probe
///
/// Dropping the handle cancels the probe.
pub struct ProbeHandle {
    events: mpsc::UnboundedReceiver<ProbeEvent>,
    cancel: CancellationToken,
}

impl ProbeHandle {
    /// Next event, or `None` once the terminal event has been taken
    pub async fn next_event(&mut self) -> Option<ProbeEvent> {
        self.events.recv().await
    }

    /// Ask the probe to stop before its next attempt
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drain all remaining events
    pub async fn collect(mut self) -> Vec<ProbeEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }
}

impl Drop for ProbeHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
