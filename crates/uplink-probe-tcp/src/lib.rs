// # TCP Probe
//
// This crate provides the default reachability probe for the watchdog.
//
// ## Purpose
//
// A quick TCP-connect check against a well-known remote host, used as a
// proxy for "does this network have working internet access". It is a
// liveness approximation, not a health check: resolve the hostname, attempt
// a TCP connect, and report reachable only if the connect completes within
// the timeout.
//
// ## Failure mapping
//
// Any resolution error, connection error, or timeout yields "unreachable"
// rather than an error. Probe failures drive the monitor's state machine;
// they are never surfaced as exceptions.

use std::io;
use std::time::Duration;

use tracing::debug;
use uplink_core::config::ProbeConfig;
use uplink_core::traits::{Probe, ProbeFactory};
use uplink_core::{ComponentRegistry, Error, Result};

/// Default connect timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// TCP-connect reachability probe
pub struct TcpProbe {
    /// Hostname to test connectivity against
    host: String,

    /// TCP port to connect to
    port: u16,

    /// Connect timeout, covering resolution and the connect itself
    timeout: Duration,
}

impl TcpProbe {
    /// Create a new TCP probe with the default 2s timeout
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_timeout(host, port, DEFAULT_TIMEOUT)
    }

    /// Create a new TCP probe with a custom timeout
    pub fn with_timeout(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Resolve the host and attempt one TCP connect
    async fn try_connect(&self) -> io::Result<()> {
        let mut addrs = tokio::net::lookup_host((self.host.as_str(), self.port)).await?;
        let addr = addrs.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "hostname resolved to no addresses")
        })?;

        tokio::net::TcpStream::connect(addr).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Probe for TcpProbe {
    async fn is_reachable(&self) -> bool {
        match tokio::time::timeout(self.timeout, self.try_connect()).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                debug!(host = %self.host, port = self.port, error = %e, "probe failed");
                false
            }
            Err(_) => {
                debug!(
                    host = %self.host,
                    port = self.port,
                    timeout = ?self.timeout,
                    "probe timed out"
                );
                false
            }
        }
    }

    fn target(&self) -> &str {
        &self.host
    }
}

/// Factory for creating TCP probes
pub struct TcpFactory;

impl ProbeFactory for TcpFactory {
    fn create(&self, config: &ProbeConfig) -> Result<Box<dyn Probe>> {
        match config {
            ProbeConfig::Tcp {
                host,
                port,
                timeout_secs,
            } => Ok(Box::new(TcpProbe::with_timeout(
                host.clone(),
                *port,
                Duration::from_secs(*timeout_secs),
            ))),
            _ => Err(Error::config("invalid config for TCP probe")),
        }
    }
}

/// Register the TCP probe with a registry
pub fn register(registry: &ComponentRegistry) {
    registry.register_probe("tcp", Box::new(TcpFactory));
}
