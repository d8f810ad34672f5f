//! Reachability checks for a single address

use std::future::Future;
use std::io::{self, ErrorKind};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tether_core::{CheckConfig, CheckMethod, ECHO_PORT};
use tokio::net::TcpStream;
use tokio::time::error::Elapsed;
use tokio::time::timeout;
use tracing::{debug, trace};

/// A best-effort test of whether a host answers within a timeout
pub trait Reachability: Send + Sync {
    fn is_reachable(&self, addr: IpAddr, limit: Duration) -> impl Future<Output = bool> + Send;
}

/// TCP connect check
///
/// A refused connection still proves the host is up, so it counts as
/// reachable. Only timeouts and other errors count as unreachable.
#[derive(Debug, Clone, Copy)]
pub struct TcpReachability {
    pub port: u16,
}

impl Default for TcpReachability {
    fn default() -> Self {
        Self { port: ECHO_PORT }
    }
}

impl TcpReachability {
    pub fn new(port: u16) -> Self {
        Self { port }
    }
}

impl Reachability for TcpReachability {
    async fn is_reachable(&self, addr: IpAddr, limit: Duration) -> bool {
        let target = SocketAddr::new(addr, self.port);
        answered(target, timeout(limit, TcpStream::connect(target)).await)
    }
}

/// Whether a bounded connect attempt heard back from the host
fn answered<T>(target: SocketAddr, result: Result<io::Result<T>, Elapsed>) -> bool {
    match result {
        Ok(Ok(_)) => {
            trace!(target = %target, "TCP connect succeeded");
            true
        }
        Ok(Err(e)) if e.kind() == ErrorKind::ConnectionRefused => {
            trace!(target = %target, "TCP connect refused, host is up");
            true
        }
        Ok(Err(e)) => {
            debug!(target = %target, error = %e, "TCP connect failed");
            false
        }
        Err(_) => {
            trace!(target = %target, "TCP connect timed out");
            false
        }
    }
}

/// ICMP echo check
///
/// Needs raw socket privileges on most systems; without them every check
/// reports unreachable.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcmpReachability;

impl Reachability for IcmpReachability {
    async fn is_reachable(&self, addr: IpAddr, limit: Duration) -> bool {
        let payload = (std::process::id() as u16).to_be_bytes();
        match timeout(limit, surge_ping::ping(addr, &payload)).await {
            Ok(Ok((_packet, rtt))) => {
                trace!(ip = %addr, rtt_ms = rtt.as_millis() as u64, "ICMP echo reply");
                true
            }
            Ok(Err(e)) => {
                debug!(ip = %addr, error = %e, "ICMP echo failed");
                false
            }
            Err(_) => {
                trace!(ip = %addr, "ICMP echo timed out");
                false
            }
        }
    }
}

/// Checker selected at runtime from configuration
#[derive(Debug, Clone, Copy)]
pub enum Checker {
    Tcp(TcpReachability),
    Icmp(IcmpReachability),
}

impl Checker {
    pub fn from_config(config: &CheckConfig) -> Self {
        match config.method {
            CheckMethod::Tcp => Self::Tcp(TcpReachability::new(config.port)),
            CheckMethod::Icmp => Self::Icmp(IcmpReachability),
        }
    }
}

impl Reachability for Checker {
    async fn is_reachable(&self, addr: IpAddr, limit: Duration) -> bool {
        match self {
            Self::Tcp(tcp) => tcp.is_reachable(addr, limit).await,
            Self::Icmp(icmp) => icmp.is_reachable(addr, limit).await,
        }
    }
}
