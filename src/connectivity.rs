//! Network reachability check consumed once per screen load.
//!
//! The check is shallow: resolve the API host and open a TCP connection with
//! a short timeout, trying each resolved address in turn. It answers "is
//! there a network path to the service right now", not "will the request
//! succeed".

use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, warn};
use url::Url;

/// Default time allowed for the probe's TCP connect.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Answers whether network access is available.
pub trait ConnectivityProbe: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Probe that opens (and immediately closes) a TCP connection to a host.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Probe the host and port the given endpoint would be requested on.
    ///
    /// Returns `None` if `endpoint` has no host (or is not a URL at all).
    pub fn for_endpoint(endpoint: &str, timeout: Duration) -> Option<Self> {
        let url = Url::parse(endpoint).ok()?;
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        Some(Self::new(host, port, timeout))
    }

    fn resolve(&self) -> Vec<SocketAddr> {
        match (self.host.as_str(), self.port).to_socket_addrs() {
            Ok(addrs) => addrs.collect(),
            Err(e) => {
                warn!(host = %self.host, error = %e, "Could not resolve host");
                Vec::new()
            }
        }
    }

    fn check(&self) -> bool {
        let addrs = self.resolve();
        if connect_any(&addrs, self.timeout) {
            return true;
        }
        warn!(host = %self.host, port = self.port, tried = addrs.len(), "Connectivity probe failed");
        false
    }
}

impl ConnectivityProbe for TcpProbe {
    /// Blocks for DNS and up to `timeout` per address. On a multi-threaded
    /// tokio runtime the worker is handed off with `block_in_place` first.
    fn is_connected(&self) -> bool {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| self.check())
            }
            _ => self.check(),
        }
    }
}

/// `true` as soon as one of `addrs` accepts a TCP connection.
fn connect_any(addrs: &[SocketAddr], timeout: Duration) -> bool {
    addrs.iter().any(|addr| match TcpStream::connect_timeout(addr, timeout) {
        Ok(_) => {
            debug!(%addr, "Connectivity probe succeeded");
            true
        }
        Err(e) => {
            debug!(%addr, error = %e, "Address unreachable");
            false
        }
    })
}

/// Probe that always reports the same answer. Used with `--no-probe`.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub bool);

impl ConnectivityProbe for FixedProbe {
    fn is_connected(&self) -> bool {
        self.0
    }
}
