//! Deploy presenter
//!
//! Applies probe events to a view from a single task, so whatever owns the
//! visible state never sees events from the probe's worker directly.

use std::net::IpAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tether_core::ProbeEvent;
use thiserror::Error;
use tracing::{debug, warn};

use crate::probe::ProbeHandle;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PresenterError {
    /// Another deploy holds the presenter; no probe was started
    #[error("A deploy is already in progress")]
    AlreadyRunning,
    /// The event stream closed before a terminal event arrived
    #[error("Probe ended without a result")]
    Interrupted,
}

/// Visible state touched by a deploy
pub trait DeployView {
    /// Show or hide the busy indicator and lock the deploy trigger
    fn set_busy(&mut self, busy: bool);
    /// Replace the status line
    fn set_status(&mut self, status: &str);
    /// The target answered and deployment can proceed
    fn deployed(&mut self, address: IpAddr);
}

/// Runs at most one probe at a time and mirrors its events onto a view
#[derive(Debug, Clone, Default)]
pub struct DeployPresenter {
    in_flight: Arc<AtomicBool>,
}

impl DeployPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Start a probe with `start` and present it on `view` until it ends
    ///
    /// `start` is only called when no other deploy is in flight.
    pub async fn deploy<V, F>(&self, view: &mut V, start: F) -> Result<ProbeEvent, PresenterError>
    where
        V: DeployView,
        F: FnOnce() -> ProbeHandle,
    {
        let _guard = InFlight::acquire(&self.in_flight)?;

        view.set_busy(true);
        let mut handle = start();

        while let Some(event) = handle.next_event().await {
            match &event {
                ProbeEvent::Progress { .. } => {
                    view.set_status(&event.message());
                }
                ProbeEvent::Failed { reason } => {
                    debug!(reason = %reason, "Deploy failed");
                    view.set_status(reason);
                    view.set_busy(false);
                    return Ok(event);
                }
                ProbeEvent::Reachable { address } => {
                    debug!(ip = %address, "Deploy target confirmed");
                    view.deployed(*address);
                    view.set_busy(false);
                    return Ok(event);
                }
            }
        }

        warn!("Probe channel closed before a terminal event");
        view.set_busy(false);
        Err(PresenterError::Interrupted)
    }
}

/// Clears the in-flight flag when dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, PresenterError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map(|_| Self(flag))
            .map_err(|_| PresenterError::AlreadyRunning)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ReachabilityProbe;
    use crate::reachability::test_support::{ScriptedReachability, SilentReachability};
    use std::io;
    use std::net::Ipv4Addr;
    use tether_core::ProbePolicy;

    const ADDR: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 42));

    #[derive(Default)]
    struct RecordingView {
        log: Vec<String>,
    }

    impl DeployView for RecordingView {
        fn set_busy(&mut self, busy: bool) {
            self.log.push(format!("busy={}", busy));
        }

        fn set_status(&mut self, status: &str) {
            self.log.push(format!("status={}", status));
        }

        fn deployed(&mut self, address: IpAddr) {
            self.log.push(format!("deployed={}", address));
        }
    }

    fn fixed(addr: IpAddr) -> impl FnOnce() -> io::Result<IpAddr> + Send {
        move || Ok(addr)
    }

    #[tokio::test]
    async fn test_success_flow() {
        let presenter = DeployPresenter::new();
        let mut view = RecordingView::default();
        let checker = ScriptedReachability::new(vec![false, true]);

        let outcome = presenter
            .deploy(&mut view, || ReachabilityProbe::new(checker).spawn(fixed(ADDR)))
            .await
            .unwrap();

        assert_eq!(outcome, ProbeEvent::Reachable { address: ADDR });
        assert_eq!(
            view.log,
            vec![
                "busy=true",
                "status=Attempt 0/5 failed",
                "deployed=10.0.0.42",
                "busy=false",
            ]
        );
        assert!(!presenter.is_busy());
    }

    #[tokio::test]
    async fn test_failure_flow() {
        let presenter = DeployPresenter::new();
        let mut view = RecordingView::default();
        let supplier = || -> io::Result<IpAddr> { Err(io::Error::other("DNS lookup failed")) };

        let outcome = presenter
            .deploy(&mut view, || {
                ReachabilityProbe::new(ScriptedReachability::never()).spawn(supplier)
            })
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ProbeEvent::Failed {
                reason: "DNS lookup failed".to_string()
            }
        );
        assert_eq!(
            view.log,
            vec!["busy=true", "status=DNS lookup failed", "busy=false"]
        );
    }

    #[tokio::test]
    async fn test_rejects_reentrant_deploy() {
        let presenter = DeployPresenter::new();
        let mut first_view = RecordingView::default();
        let mut second_view = RecordingView::default();
        let mut second_started = false;

        let first = presenter.deploy(&mut first_view, || {
            ReachabilityProbe::with_policy(SilentReachability, ProbePolicy::new(1, 20))
                .spawn(fixed(ADDR))
        });
        let second = async {
            tokio::task::yield_now().await;
            presenter
                .deploy(&mut second_view, || {
                    second_started = true;
                    ReachabilityProbe::new(ScriptedReachability::new(vec![true]))
                        .spawn(fixed(ADDR))
                })
                .await
        };

        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first, Ok(ProbeEvent::Failed { .. })));
        assert_eq!(second, Err(PresenterError::AlreadyRunning));
        assert!(!second_started);
        assert!(second_view.log.is_empty());
        assert!(!presenter.is_busy());
    }
}
