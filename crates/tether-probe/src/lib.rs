//! Tether Probe - Reachability probing for deploy targets
//!
//! This crate provides:
//! - Reachability checkers (TCP echo port, ICMP echo)
//! - Address suppliers (hostname resolution, closures)
//! - The retrying reachability probe and its spawned handle
//! - A headless deploy presenter that applies probe events to a view

pub mod presenter;
pub mod probe;
pub mod reachability;
pub mod supplier;

pub use presenter::{DeployPresenter, DeployView, PresenterError};
pub use probe::{ProbeHandle, ReachabilityProbe};
pub use reachability::{Checker, IcmpReachability, Reachability, TcpReachability};
pub use supplier::{AddressSupplier, HostSupplier};
