//! Address suppliers

use std::future::Future;
use std::io;
use std::net::IpAddr;
use tokio::net::lookup_host;
use tracing::debug;

/// Produces the address to probe, or fails with a resolution error
pub trait AddressSupplier: Send {
    fn resolve(self) -> impl Future<Output = io::Result<IpAddr>> + Send;
}

impl<F> AddressSupplier for F
where
    F: FnOnce() -> io::Result<IpAddr> + Send,
{
    async fn resolve(self) -> io::Result<IpAddr> {
        self()
    }
}

/// Resolves a hostname or literal IP address
#[derive(Debug, Clone)]
pub struct HostSupplier {
    host: String,
}

impl HostSupplier {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }
}

impl AddressSupplier for HostSupplier {
    async fn resolve(self) -> io::Result<IpAddr> {
        if let Ok(ip) = self.host.parse::<IpAddr>() {
            return Ok(ip);
        }

        let mut addrs = lookup_host((self.host.as_str(), 0)).await?;
        match addrs.next() {
            Some(addr) => {
                debug!(host = %self.host, ip = %addr.ip(), "Resolved host");
                Ok(addr.ip())
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("No address found for {}", self.host),
            )),
        }
    }
}
